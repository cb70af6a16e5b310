//! Catalog records and the grouped-count rows served by the API.

use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

/// A row type stored in one catalog table.
///
/// `TABLE` and `COLUMNS` are fixed identifiers spliced into generated SQL;
/// nothing derived from a request ever lands there.
pub trait Record: Sized + Send + Unpin {
    /// Singular name used in error messages (`"no quote found"`).
    const KIND: &'static str;
    const TABLE: &'static str;
    const COLUMNS: &'static str;

    fn id(&self) -> &str;
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error>;
}

/// An inspirational quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    #[serde(default)]
    pub id: String,
    pub quote: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub occupation: Option<String>,
    pub language: String,
}

impl Record for Quote {
    const KIND: &'static str = "quote";
    const TABLE: &'static str = "quotes";
    const COLUMNS: &'static str = "id, quote, author, author_occupation, language";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Quote {
            id: row.try_get("id")?,
            quote: row.try_get("quote")?,
            author: row.try_get("author")?,
            occupation: row.try_get("author_occupation")?,
            language: row.try_get("language")?,
        })
    }
}

/// A background photograph. The binary itself lives on a CDN; this is its
/// catalog metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_data: Option<String>,
    pub photographer: String,
    pub category: String,
    pub original_file_name: String,
    pub colour: String,
    pub pun: i64,
    pub version: i64,
    pub blur_hash: String,
}

impl Record for Image {
    const KIND: &'static str = "image";
    const TABLE: &'static str = "images";
    const COLUMNS: &'static str = "id, camera, created_at, location_data, photographer, category, \
         original_file_name, colour, pun, version, blur_hash";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Image {
            id: row.try_get("id")?,
            camera: row.try_get("camera")?,
            created_at: row.try_get("created_at")?,
            location_data: row.try_get("location_data")?,
            photographer: row.try_get("photographer")?,
            category: row.try_get("category")?,
            original_file_name: row.try_get("original_file_name")?,
            colour: row.try_get("colour")?,
            pun: row.try_get("pun")?,
            version: row.try_get("version")?,
            blur_hash: row.try_get("blur_hash")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageCount {
    pub language: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhotographerCount {
    pub photographer: String,
    pub count: i64,
}

/// A downloadable image rendition offered by the CDN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageSize {
    pub id: &'static str,
    pub label: &'static str,
}

/// The renditions are fixed; they do not depend on catalog contents.
pub const IMAGE_SIZES: [ImageSize; 4] = [
    ImageSize {
        id: "original",
        label: "original",
    },
    ImageSize {
        id: "qhd",
        label: "high",
    },
    ImageSize {
        id: "fhd",
        label: "normal",
    },
    ImageSize {
        id: "hd",
        label: "datasaver",
    },
];
