use std::collections::HashMap;
use std::sync::Arc;

use sqlx::sqlite::SqliteJournalMode;
use tracing::info;

use crate::{
    analyzer::{host::GlobalSettings, mafrepo::MafRepoProcedureAnalyzer},
    catalog::{memory::MemoryStore, repository::RepositoryStore, CatalogStore},
    repository::{interface::Repository, sqlite::SqliteRepository},
};

#[cfg(feature = "catalog-postgres")]
use crate::repository::postgres::PostgresRepository;

use super::schema;

/// Everything a running adapter needs, assembled from the config
pub struct MafRepoContext {
    pub analyzer: Arc<MafRepoProcedureAnalyzer>,
}

async fn build_catalog_store(
    config: &schema::Catalog,
) -> Result<Arc<dyn CatalogStore>, sqlx::Error> {
    // Initialize the repository
    let repository: Arc<dyn Repository> = match config {
        #[cfg(feature = "catalog-postgres")]
        schema::Catalog::Postgres(schema::Postgres {
            dsn,
            schema,
            read_only: false,
        }) => Arc::new(PostgresRepository::try_new(dsn.to_string(), schema.to_string()).await?),
        #[cfg(feature = "catalog-postgres")]
        schema::Catalog::Postgres(schema::Postgres {
            dsn,
            schema,
            read_only: true,
        }) => Arc::new(PostgresRepository::connect(dsn.to_string(), schema.to_string()).await?),
        schema::Catalog::Sqlite(schema::Sqlite {
            dsn,
            read_only: false,
        }) => Arc::new(
            SqliteRepository::try_new(dsn.to_string(), SqliteJournalMode::Wal).await?,
        ),
        schema::Catalog::Sqlite(schema::Sqlite {
            dsn,
            read_only: true,
        }) => Arc::new(
            SqliteRepository::try_new_read_only(dsn.to_string(), SqliteJournalMode::Wal)
                .await?,
        ),
        schema::Catalog::InMemory(schema::InMemory { versions }) => {
            let versions: HashMap<_, _> = versions
                .iter()
                .map(|v| (v.name.clone(), v.version_id))
                .collect();
            info!("Using {} catalog versions from the config", versions.len());

            return Ok(Arc::new(MemoryStore { versions }));
        }
    };

    Ok(Arc::new(RepositoryStore { repository }))
}

pub async fn build_context(cfg: &schema::MafRepoConfig) -> Result<MafRepoContext, sqlx::Error> {
    let catalog = build_catalog_store(&cfg.catalog).await?;
    let host = Arc::new(GlobalSettings::new(cfg.global_settings.clone()));

    let analyzer =
        MafRepoProcedureAnalyzer::new(host, catalog, reqwest::Client::new());

    Ok(MafRepoContext {
        analyzer: Arc::new(analyzer),
    })
}
