//! # Mue API
//!
//! Randomized, filterable content for new-tab pages: quotes, background
//! images and a weather lookup, served over HTTP from SQLite catalogs.
//!
//! Random endpoints avoid repeating themselves without any server-side
//! session. The IDs a client has already received travel in a cookie, are
//! excluded from the next pick, and the list starts over once everything
//! matching has been seen.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌─────────────┐   ┌───────────┐   ┌──────────┐
//! │   HTTP   │──▶│  Selection  │──▶│ Predicate │──▶│  SQLite  │
//! │ (axum)   │   │  + fallback │   │  builder  │   │ catalogs │
//! └────┬─────┘   └─────────────┘   └───────────┘   └──────────┘
//!      │ seen_quotes / seen_images cookies
//!      ▼
//! ┌──────────┐
//! │  Client  │
//! └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! mue-api init --sample                # create schema, seed a few quotes
//! mue-api import images images.json    # load image metadata
//! mue-api stats                        # grouped counts
//! mue-api serve                        # start HTTP server
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration and environment overrides |
//! | [`db`] | Catalog connection pools |
//! | [`migrate`] | Schema creation |
//! | [`models`] | Quote, image and grouped-count types |
//! | [`error`] | Storage error taxonomy |
//! | [`predicate`] | Parameterized WHERE-clause builder |
//! | [`selection`] | Random pick with seen-set exclusion and fallbacks |
//! | [`seen`] | Seen-set cookie codec |
//! | [`query`] | Shared read queries |
//! | [`quotes`] | Quote accessors |
//! | [`images`] | Image accessors |
//! | [`ingest`] | JSON import and sample data |
//! | [`stats`] | Catalog overview |
//! | [`weather`] | Weather provider passthrough |
//! | [`server`] | HTTP server |

pub mod config;
pub mod db;
pub mod error;
pub mod images;
pub mod ingest;
pub mod migrate;
pub mod models;
pub mod predicate;
pub mod query;
pub mod quotes;
pub mod seen;
pub mod selection;
pub mod server;
pub mod stats;
pub mod weather;
