//! Image catalog accessors.

use sqlx::SqlitePool;

use crate::error::CatalogResult;
use crate::models::{CategoryCount, Image, PhotographerCount};
use crate::predicate::Column;
use crate::query;
use crate::selection::{pick_with_fallback, Dimension, Pick};
use crate::seen::SeenSet;

pub async fn get_image(pool: &SqlitePool, id: &str) -> CatalogResult<Image> {
    query::fetch_by_id(pool, id).await
}

/// Images, optionally narrowed to one photographer and/or one category.
pub async fn list_images(
    pool: &SqlitePool,
    photographer: Option<&str>,
    category: Option<&str>,
) -> CatalogResult<Vec<Image>> {
    let mut filters = Vec::new();
    if let Some(p) = photographer.filter(|p| !p.is_empty()) {
        filters.push((Column::Photographer, p.to_string()));
    }
    if let Some(c) = category.filter(|c| !c.is_empty()) {
        filters.push((Column::Category, c.to_string()));
    }
    query::list_where(pool, &filters).await
}

pub async fn image_categories(pool: &SqlitePool) -> CatalogResult<Vec<CategoryCount>> {
    let counts = query::count_by::<Image>(pool, Column::Category).await?;
    Ok(counts
        .into_iter()
        .map(|(category, count)| CategoryCount { category, count })
        .collect())
}

pub async fn image_photographers(pool: &SqlitePool) -> CatalogResult<Vec<PhotographerCount>> {
    let counts = query::count_by::<Image>(pool, Column::Photographer).await?;
    Ok(counts
        .into_iter()
        .map(|(photographer, count)| PhotographerCount {
            photographer,
            count,
        })
        .collect())
}

/// Random unseen image from `categories` by `photographers`. The final
/// fallback drops both filters.
pub async fn random_image(
    pool: &SqlitePool,
    seen: SeenSet,
    categories: Vec<String>,
    photographers: Vec<String>,
) -> CatalogResult<Pick<Image>> {
    let include = vec![
        Dimension::new(Column::Category, categories),
        Dimension::new(Column::Photographer, photographers),
    ];
    pick_with_fallback(pool, seen, include, Vec::new()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_pool;
    use crate::ingest::insert_images;
    use crate::query::count_all;
    use crate::selection::Tier;

    fn image(id: &str, category: &str, photographer: &str) -> Image {
        Image {
            id: id.to_string(),
            camera: Some("X100V".to_string()),
            created_at: None,
            location_data: Some("Lisbon".to_string()),
            photographer: photographer.to_string(),
            category: category.to_string(),
            original_file_name: format!("{id}.jpg"),
            colour: "#336699".to_string(),
            pun: 1,
            version: 2,
            blur_hash: "LEHV6nWB2yk8pyo0adR*.7kCMdnj".to_string(),
        }
    }

    async fn seeded() -> SqlitePool {
        let pool = memory_pool().await.unwrap();
        insert_images(
            &pool,
            &[
                image("i1", "nature", "Ana"),
                image("i2", "nature", "Ben"),
                image("i3", "city", "Ana"),
                image("i4", "ocean", "Cy"),
            ],
        )
        .await
        .unwrap();
        pool
    }

    #[tokio::test]
    async fn test_get_image_roundtrips_optional_fields() {
        let pool = seeded().await;
        let img = get_image(&pool, "i3").await.unwrap();
        assert_eq!(img.camera.as_deref(), Some("X100V"));
        assert!(img.created_at.is_none());
        assert_eq!(img.version, 2);
    }

    #[tokio::test]
    async fn test_get_missing_image() {
        let pool = seeded().await;
        let err = get_image(&pool, "zzz").await.unwrap_err();
        assert_eq!(err.to_string(), "no image found");
    }

    #[tokio::test]
    async fn test_list_filters_are_anded() {
        let pool = seeded().await;
        assert_eq!(list_images(&pool, None, None).await.unwrap().len(), 4);
        assert_eq!(list_images(&pool, Some("Ana"), None).await.unwrap().len(), 2);
        let both = list_images(&pool, Some("Ana"), Some("city")).await.unwrap();
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].id, "i3");
        assert_eq!(list_images(&pool, Some(""), Some("")).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_grouped_counts_sum_to_total() {
        let pool = seeded().await;
        let total = count_all::<Image>(&pool).await.unwrap();
        let cats = image_categories(&pool).await.unwrap();
        let phots = image_photographers(&pool).await.unwrap();
        assert_eq!(cats.iter().map(|c| c.count).sum::<i64>(), total);
        assert_eq!(phots.iter().map(|p| p.count).sum::<i64>(), total);
        assert_eq!(cats.len(), 3);
        assert_eq!(phots[0].photographer, "Ana");
        assert_eq!(phots[0].count, 2);
    }

    #[tokio::test]
    async fn test_random_image_with_filters() {
        let pool = seeded().await;
        let seen = SeenSet::from_cookie_value(Some("i1"));
        let pick = random_image(&pool, seen, vec!["nature".into()], vec![])
            .await
            .unwrap();
        assert_eq!(pick.item.id, "i2");
        assert_eq!(pick.seen.encode(), "i1,i2");
    }

    #[tokio::test]
    async fn test_random_image_unknown_category_falls_back() {
        let pool = seeded().await;
        let pick = random_image(&pool, SeenSet::new(), vec!["space".into()], vec![])
            .await
            .unwrap();
        assert_eq!(pick.tier, Tier::Defaults);
    }
}
