/// Default implementation for a Repository that factors out common
/// query patterns / SQL queries between Postgres and SQLite.
///
/// Usage:
///
/// The struct has to have certain fields, since this macro relies on them:
///
/// ```ignore
/// pub struct MyRepository {
///     pub executor: sqlx::Pool<sqlx::SqlxDatabaseType>
/// }
///
/// impl MyRepository {
///     pub const MIGRATOR: sqlx::Migrator = sqlx::migrate!("my/migrations");
///     pub fn interpret_error(error: sqlx::Error) -> Error {
///         // Interpret the database-specific error code and turn some sqlx errors
///         // into the Error enum values like MissingTable
///         // ...
///     }
/// }
///
/// implement_repository!(SqliteRepository)
/// ```
///
/// The catalogue tables are owned by the host, so the query has to stay portable
/// across the databases it runs on: no dialect-specific syntax.
pub const CATALOG_VERSION_IDS: &str = r#"
        SELECT pcv.id
        FROM property_catalogue_version pcv
        JOIN property_catalogue pc ON pc.id = pcv.datacatalog_id
        WHERE pc.name = $1
        "#;

#[macro_export]
macro_rules! implement_repository {
    ($repo: ident) => {
#[async_trait]
impl Repository for $repo {
    async fn setup(&self) {
        $repo::MIGRATOR
            .run(&self.executor)
            .await
            .expect("error running migrations");
    }

    async fn get_catalog_version_ids(
        &self,
        catalog_name: &str,
    ) -> Result<Vec<CatalogVersionId>, Error> {
        let rows = sqlx::query($crate::repository::default::CATALOG_VERSION_IDS)
            .bind(catalog_name)
            .fetch_all(&self.executor)
            .await
            .map_err($repo::interpret_error)?;

        let ids = rows
            .iter()
            .map(|row| row.try_get::<CatalogVersionId, _>("id"))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err($repo::interpret_error)?;

        Ok(ids)
    }
}

    };
}
