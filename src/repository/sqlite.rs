use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::SqliteJournalMode;
use sqlx::{
    migrate::Migrator,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};

use crate::implement_repository;

use super::interface::{CatalogVersionId, Error, Repository, Result};

#[derive(Debug)]
pub struct SqliteRepository {
    pub executor: Pool<Sqlite>,
}

impl SqliteRepository {
    pub const MIGRATOR: Migrator = sqlx::migrate!("migrations/sqlite");

    pub async fn try_new(
        dsn: String,
        journal_mode: SqliteJournalMode,
    ) -> std::result::Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(&dsn)?
            .create_if_missing(true)
            .journal_mode(journal_mode);

        // Every connection to `:memory:` opens its own, empty database
        let max_connections = if dsn.contains(":memory:") { 1 } else { 10 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        let repo = Self { executor: pool };
        repo.setup().await;
        Ok(repo)
    }

    ///
    /// Create a new `SqliteRepository` in read-only mode: assumes the
    /// database already exists and doesn't run migrations. This is how the
    /// host's own database is accessed.
    pub async fn try_new_read_only(
        dsn: String,
        journal_mode: SqliteJournalMode,
    ) -> std::result::Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(&dsn)?
            .read_only(true)
            .journal_mode(journal_mode);

        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        let repo = Self { executor: pool };
        Ok(repo)
    }

    pub fn interpret_error(error: sqlx::Error) -> Error {
        if let sqlx::Error::Database(ref d) = error {
            // Reference: https://www.sqlite.org/rescode.html
            // A missing table is reported as a generic SQLITE_ERROR, so go by the message.
            if d.message().contains("no such table") {
                return Error::MissingTable(error);
            }
        }
        Error::SqlxError(error)
    }
}

implement_repository!(SqliteRepository);
