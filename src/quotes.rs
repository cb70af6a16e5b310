//! Quote catalog accessors.

use sqlx::SqlitePool;

use crate::error::CatalogResult;
use crate::models::{LanguageCount, Quote};
use crate::predicate::Column;
use crate::query;
use crate::selection::{pick_with_fallback, Dimension, Pick};
use crate::seen::SeenSet;

pub async fn get_quote(pool: &SqlitePool, id: &str) -> CatalogResult<Quote> {
    query::fetch_by_id(pool, id).await
}

/// All quotes in `language`.
pub async fn list_quotes(pool: &SqlitePool, language: &str) -> CatalogResult<Vec<Quote>> {
    query::list_where(pool, &[(Column::Language, language.to_string())]).await
}

/// Languages present in the catalog with their quote counts.
pub async fn quote_languages(pool: &SqlitePool) -> CatalogResult<Vec<LanguageCount>> {
    let counts = query::count_by::<Quote>(pool, Column::Language).await?;
    Ok(counts
        .into_iter()
        .map(|(language, count)| LanguageCount { language, count })
        .collect())
}

/// Random quote in one of `languages` (by one of `authors`, if any) that is
/// not in `seen`. Falls back to `default_language` with no author filter.
pub async fn random_quote(
    pool: &SqlitePool,
    seen: SeenSet,
    languages: Vec<String>,
    authors: Vec<String>,
    default_language: &str,
) -> CatalogResult<Pick<Quote>> {
    let include = vec![
        Dimension::new(Column::Language, languages),
        Dimension::new(Column::Author, authors),
    ];
    let defaults = vec![Dimension::new(
        Column::Language,
        vec![default_language.to_string()],
    )];
    pick_with_fallback(pool, seen, include, defaults).await
}

/// Reduces an `Accept-Language` header to the two-letter code of its first
/// entry (`"fr-CH, fr;q=0.9"` → `"fr"`).
pub fn primary_language(header: &str) -> Option<String> {
    let first = header.split(',').next()?.trim();
    let tag = first.split(';').next()?.trim();
    let code: String = tag.chars().take(2).collect();
    if code.chars().count() == 2 {
        Some(code.to_lowercase())
    } else {
        None
    }
}
