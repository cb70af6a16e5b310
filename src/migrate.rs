use anyhow::Result;
use sqlx::SqlitePool;

use crate::db::Catalog;

/// Creates the quotes and images tables (idempotent).
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS quotes (
            id TEXT PRIMARY KEY,
            quote TEXT NOT NULL,
            author TEXT,
            author_occupation TEXT,
            language TEXT NOT NULL DEFAULT 'en'
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS images (
            id TEXT PRIMARY KEY,
            camera TEXT,
            created_at TEXT,
            location_data TEXT,
            photographer TEXT NOT NULL,
            category TEXT NOT NULL,
            original_file_name TEXT NOT NULL,
            colour TEXT NOT NULL,
            pun INTEGER NOT NULL DEFAULT 0,
            version INTEGER NOT NULL DEFAULT 1,
            blur_hash TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_quotes_language ON quotes(language)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_images_category ON images(category)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_images_photographer ON images(photographer)")
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn run_migrations(catalog: &Catalog) -> Result<()> {
    create_schema(&catalog.quotes).await?;
    create_schema(&catalog.images).await?;
    Ok(())
}
