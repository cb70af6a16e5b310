//! Error taxonomy for catalog access.
//!
//! Storage code distinguishes three outcomes: no matching row (recoverable by
//! the fallback cascade in [`crate::selection`]), an unreachable database,
//! and any other query failure. Everything above the storage layer that is
//! not an HTTP handler uses `anyhow`.

use thiserror::Error;

/// Errors returned by the catalog accessors and the selection engine.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No row satisfied the query. `kind` is the singular entity name
    /// (`"quote"`, `"image"`).
    #[error("no {kind} found")]
    NotFound { kind: &'static str },

    /// The database could not be opened or did not answer a ping.
    #[error("storage unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),

    /// Any other failure while executing a query or decoding a row.
    #[error("{0}")]
    Query(#[from] sqlx::Error),
}

impl CatalogError {
    pub fn not_found(kind: &'static str) -> Self {
        CatalogError::NotFound { kind }
    }

    /// True when the error only means "nothing matched".
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound { .. })
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
