//! Catalog loading.
//!
//! The HTTP API is read-only; records enter the catalogs through
//! `mue-api import` (a JSON array of quotes or images) or the sample set
//! written by `mue-api init --sample`. Records without an `id` get a fresh
//! UUID. Existing IDs are replaced.

use anyhow::{bail, Context, Result};
use sqlx::SqlitePool;
use std::path::Path;
use uuid::Uuid;

use crate::config::Config;
use crate::db;
use crate::migrate;
use crate::models::{Image, Quote};

pub async fn insert_quotes(pool: &SqlitePool, quotes: &[Quote]) -> Result<u64> {
    let mut tx = pool.begin().await?;
    for q in quotes {
        sqlx::query(
            "INSERT OR REPLACE INTO quotes (id, quote, author, author_occupation, language) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&q.id)
        .bind(&q.quote)
        .bind(&q.author)
        .bind(&q.occupation)
        .bind(&q.language)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    Ok(quotes.len() as u64)
}

pub async fn insert_images(pool: &SqlitePool, images: &[Image]) -> Result<u64> {
    let mut tx = pool.begin().await?;
    for img in images {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO images (id, camera, created_at, location_data, photographer,
                                           category, original_file_name, colour, pun, version,
                                           blur_hash)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&img.id)
        .bind(&img.camera)
        .bind(&img.created_at)
        .bind(&img.location_data)
        .bind(&img.photographer)
        .bind(&img.category)
        .bind(&img.original_file_name)
        .bind(&img.colour)
        .bind(img.pun)
        .bind(img.version)
        .bind(&img.blur_hash)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    Ok(images.len() as u64)
}

fn assign_id(id: &mut String) {
    if id.trim().is_empty() {
        *id = Uuid::new_v4().to_string();
    }
}

/// Parses a JSON array of quotes, assigning IDs where missing.
pub fn parse_quotes(json: &str) -> Result<Vec<Quote>> {
    let mut quotes: Vec<Quote> =
        serde_json::from_str(json).context("Failed to parse quotes JSON")?;
    for q in &mut quotes {
        assign_id(&mut q.id);
        if q.language.trim().is_empty() {
            bail!("quote {} has an empty language", q.id);
        }
    }
    Ok(quotes)
}

/// Parses a JSON array of images, assigning IDs where missing.
pub fn parse_images(json: &str) -> Result<Vec<Image>> {
    let mut images: Vec<Image> =
        serde_json::from_str(json).context("Failed to parse images JSON")?;
    for img in &mut images {
        assign_id(&mut img.id);
    }
    Ok(images)
}

/// CLI entry point for `mue-api import <kind> <file>`.
pub async fn run_import(config: &Config, kind: &str, path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read import file: {}", path.display()))?;

    let (kind, written) = match kind {
        "quotes" => {
            let quotes = parse_quotes(&content)?;
            let pool = db::connect(&config.db.quotes_path).await?;
            migrate::create_schema(&pool).await?;
            let n = insert_quotes(&pool, &quotes).await?;
            pool.close().await;
            ("quotes", n)
        }
        "images" => {
            let images = parse_images(&content)?;
            let pool = db::connect(&config.db.images_path).await?;
            migrate::create_schema(&pool).await?;
            let n = insert_images(&pool, &images).await?;
            pool.close().await;
            ("images", n)
        }
        other => bail!("Unknown import kind: '{}'. Use quotes or images.", other),
    };

    tracing::info!(kind, written, "import finished");
    println!("import {}", kind);
    println!("  records written: {}", written);
    println!("ok");
    Ok(())
}

const SAMPLE_QUOTES: &[(&str, &str, &str, &str)] = &[
    (
        "The only limit to our realization of tomorrow is our doubts of today.",
        "Franklin D. Roosevelt",
        "32nd U.S. President",
        "en",
    ),
    (
        "In the end, we will remember not the words of our enemies, but the silence of our friends.",
        "Martin Luther King Jr.",
        "Civil Rights Leader",
        "en",
    ),
    (
        "The greatest glory in living lies not in never falling, but in rising every time we fall.",
        "Nelson Mandela",
        "Former President of South Africa",
        "en",
    ),
    (
        "La única limitación para nuestra realización del mañana son nuestras dudas de hoy.",
        "Franklin D. Roosevelt",
        "32º Presidente de los EE.UU.",
        "es",
    ),
    (
        "La seule limite à notre réalisation de demain est nos doutes d'aujourd'hui.",
        "Franklin D. Roosevelt",
        "32e Président des États-Unis",
        "fr",
    ),
    (
        "Der größte Ruhm im Leben liegt nicht darin, niemals zu fallen, sondern jedes Mal aufzustehen, wenn wir fallen.",
        "Nelson Mandela",
        "Ehemaliger Präsident von Südafrika",
        "de",
    ),
];

/// Writes the built-in sample quotes when the quotes table is empty.
/// Returns the number of rows written.
pub async fn seed_sample_quotes(pool: &SqlitePool) -> Result<u64> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quotes")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        return Ok(0);
    }

    let quotes: Vec<Quote> = SAMPLE_QUOTES
        .iter()
        .map(|(text, author, occupation, language)| Quote {
            id: Uuid::new_v4().to_string(),
            quote: text.to_string(),
            author: Some(author.to_string()),
            occupation: Some(occupation.to_string()),
            language: language.to_string(),
        })
        .collect();
    insert_quotes(pool, &quotes).await
}
