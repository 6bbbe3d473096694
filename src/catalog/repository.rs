use std::sync::Arc;

use async_trait::async_trait;

use crate::catalog::{CatalogError, CatalogResult, CatalogStore};
use crate::repository::interface::{CatalogVersionId, Error as RepositoryError, Repository};

// Catalog versions straight from the host's property catalogue tables.
pub struct RepositoryStore {
    pub repository: Arc<dyn Repository>,
}

impl From<RepositoryError> for CatalogError {
    fn from(err: RepositoryError) -> CatalogError {
        match err {
            RepositoryError::MissingTable(e) => CatalogError::MissingTables(e),
            RepositoryError::SqlxError(e) => CatalogError::SqlxError(e),
        }
    }
}

#[async_trait]
impl CatalogStore for RepositoryStore {
    async fn get_version_id(&self, catalog_name: &str) -> CatalogResult<CatalogVersionId> {
        let version_ids = self.repository.get_catalog_version_ids(catalog_name).await?;

        match version_ids.as_slice() {
            [version_id] => Ok(*version_id),
            [] => Err(CatalogError::CatalogVersionDoesNotExist {
                name: catalog_name.to_string(),
            }),
            _ => Err(CatalogError::AmbiguousCatalogVersion {
                name: catalog_name.to_string(),
                count: version_ids.len(),
            }),
        }
    }
}
