use std::path::Path;
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use crate::config::Config;
use crate::error::{CatalogError, CatalogResult};

/// Connection pools for the two catalogs. Both may point at the same file.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub quotes: SqlitePool,
    pub images: SqlitePool,
}

impl Catalog {
    pub async fn close(&self) {
        self.quotes.close().await;
        self.images.close().await;
    }
}

/// Opens a pool on `db_path` and pings it. Any failure is
/// [`CatalogError::Unavailable`].
pub async fn connect(db_path: &Path) -> CatalogResult<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CatalogError::Unavailable(sqlx::Error::Io(e)))?;
        }
    }

    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))
        .map_err(CatalogError::Unavailable)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .map_err(CatalogError::Unavailable)?;

    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .map_err(CatalogError::Unavailable)?;

    tracing::info!(path = %db_path.display(), "connected to database");
    Ok(pool)
}

pub async fn connect_catalog(config: &Config) -> CatalogResult<Catalog> {
    let quotes = connect(&config.db.quotes_path).await?;
    let images = if config.db.images_path == config.db.quotes_path {
        quotes.clone()
    } else {
        connect(&config.db.images_path).await?
    };
    Ok(Catalog { quotes, images })
}

/// Migrated single-connection in-memory database for tests.
#[cfg(test)]
pub(crate) async fn memory_pool() -> anyhow::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;
    crate::migrate::create_schema(&pool).await?;
    Ok(pool)
}
