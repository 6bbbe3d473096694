use std::collections::HashMap;

use async_trait::async_trait;

use crate::catalog::{CatalogError, CatalogResult, CatalogStore};
use crate::data_types::CatalogVersionId;

/// Fixed catalog versions, e.g. from the config file when there's no host database around.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub versions: HashMap<String, CatalogVersionId>,
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn get_version_id(&self, catalog_name: &str) -> CatalogResult<CatalogVersionId> {
        self.versions.get(catalog_name).copied().ok_or_else(|| {
            CatalogError::CatalogVersionDoesNotExist {
                name: catalog_name.to_string(),
            }
        })
    }
}
