use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::data_types::{CatalogVersionId, UNRESOLVED_CATALOG_VERSION};

pub mod memory;
pub mod repository;

pub const DOKUMENTATION_CATALOG: &str = "OS.MolDokumentation";
pub const ERGEBNIS_CATALOG: &str = "OS.MolGenErgebnis";
pub const CHROMOSOME_CATALOG: &str = "OS.MolDiagFusionChromosome";
pub const MOLEKULARGENETIK_CATALOG: &str = "OS.Molekulargenetik";

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("No version found for catalog {name:?}")]
    CatalogVersionDoesNotExist { name: String },

    #[error("Catalog {name:?} has {count} versions, expected exactly one")]
    AmbiguousCatalogVersion { name: String, count: usize },

    #[error("Property catalogue tables not found: {0}")]
    MissingTables(sqlx::Error),

    #[error("Internal SQL error: {0:?}")]
    SqlxError(sqlx::Error),
}

pub type CatalogResult<T, E = CatalogError> = Result<T, E>;

/// Source of catalog version ids, looked up by catalog name.
#[async_trait]
pub trait CatalogStore: Sync + Send {
    async fn get_version_id(&self, catalog_name: &str) -> CatalogResult<CatalogVersionId>;
}

/// Resolves catalog versions for the mapping, never failing: any lookup error is logged
/// and replaced by [`UNRESOLVED_CATALOG_VERSION`].
#[derive(Clone)]
pub struct VersionResolver {
    store: Arc<dyn CatalogStore>,
}

impl VersionResolver {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    pub async fn find_version(&self, catalog_name: &str) -> CatalogVersionId {
        match self.store.get_version_id(catalog_name).await {
            Ok(version_id) => version_id,
            Err(err) => {
                error!("Error resolving the version of catalog {catalog_name:?}: {err}");
                UNRESOLVED_CATALOG_VERSION
            }
        }
    }

    /// Start a batch: lookups through the returned resolver are memoized until it's dropped.
    pub fn batch(&self) -> BatchVersionResolver<'_> {
        BatchVersionResolver {
            resolver: self,
            resolved: HashMap::new(),
        }
    }
}

/// Short-lived, per-batch cache in front of a [`VersionResolver`]. Sentinel results are
/// cached too, so a failing catalog is only queried (and logged) once per batch.
pub struct BatchVersionResolver<'a> {
    resolver: &'a VersionResolver,
    resolved: HashMap<String, CatalogVersionId>,
}

impl<'a> BatchVersionResolver<'a> {
    pub async fn find_version(&mut self, catalog_name: &str) -> CatalogVersionId {
        if let Some(version_id) = self.resolved.get(catalog_name) {
            return *version_id;
        }

        let version_id = self.resolver.find_version(catalog_name).await;
        debug!("Resolved catalog {catalog_name:?} to version {version_id}");
        self.resolved.insert(catalog_name.to_string(), version_id);
        version_id
    }
}
