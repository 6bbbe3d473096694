use std::fmt::Debug;

use async_trait::async_trait;

pub use crate::data_types::CatalogVersionId;

/// Wrapper for conversion of database-specific error codes into actual errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The property catalogue tables aren't there (wrong database / schema)
    #[error("Property catalogue tables not found: {0}")]
    MissingTable(sqlx::Error),

    // All other errors
    #[error(transparent)]
    SqlxError(sqlx::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Read access to the host's property catalogue tables.
#[async_trait]
pub trait Repository: Send + Sync + Debug {
    async fn setup(&self);

    /// IDs of all versions registered for the catalogue called `catalog_name`.
    async fn get_catalog_version_ids(
        &self,
        catalog_name: &str,
    ) -> Result<Vec<CatalogVersionId>, Error>;
}
