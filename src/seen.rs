//! Client-held "already seen" lists.
//!
//! The server keeps no session state. Each random endpoint reads the IDs it
//! already delivered from a cookie, excludes them, and writes the list back
//! with the new ID appended. IDs are opaque; the codec never validates them.

use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;
use std::collections::HashSet;

pub const DELIMITER: char = ',';

/// Splits a raw cookie value into IDs. Absent or empty input yields an empty
/// list; empty segments (`"a,,b"`) are dropped.
pub fn decode(raw: Option<&str>) -> Vec<String> {
    match raw {
        Some(value) => value
            .split(DELIMITER)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    }
}

/// Joins IDs with the delimiter. The empty list encodes to `""`, which is
/// still written so the client drops its previous state.
pub fn encode(ids: &[String]) -> String {
    ids.join(&DELIMITER.to_string())
}

/// Most IDs a seen-set keeps. Older entries are dropped first, which bounds
/// both the `NOT IN` parameter list and the cookie size.
pub const MAX_SEEN_IDS: usize = 1000;

/// Ordered, duplicate-free list of delivered IDs, capped at
/// [`MAX_SEEN_IDS`] most recent entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeenSet {
    ids: Vec<String>,
    index: HashSet<String>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a cookie value, keeping the first occurrence of any repeated ID
    /// and only the last [`MAX_SEEN_IDS`] distinct IDs.
    pub fn from_cookie_value(raw: Option<&str>) -> Self {
        let mut set = Self::new();
        for id in decode(raw) {
            if !set.index.contains(&id) {
                set.index.insert(id.clone());
                set.ids.push(id);
            }
        }
        if set.ids.len() > MAX_SEEN_IDS {
            let overflow = set.ids.len() - MAX_SEEN_IDS;
            for old in set.ids.drain(..overflow) {
                set.index.remove(&old);
            }
        }
        set
    }

    /// Appends `id` unless it is already present, evicting the oldest entry
    /// when full.
    pub fn push(&mut self, id: impl Into<String>) {
        let id = id.into();
        if self.index.contains(&id) {
            return;
        }
        if self.ids.len() >= MAX_SEEN_IDS {
            let oldest = self.ids.remove(0);
            self.index.remove(&oldest);
        }
        self.index.insert(id.clone());
        self.ids.push(id);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains(id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.index.clear();
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn encode(&self) -> String {
        encode(&self.ids)
    }
}

/// Attributes of the seen-set cookies.
#[derive(Debug, Clone, Deserialize)]
pub struct CookieConfig {
    /// Cookie `Path`. Default `/`.
    #[serde(default = "default_path")]
    pub path: String,
    /// `Max-Age` in seconds. `0` (default) omits the attribute, making it a
    /// session cookie.
    #[serde(default)]
    pub max_age_secs: i64,
    /// Name of the quotes cookie. Default `seen_quotes`.
    #[serde(default = "default_seen_quotes")]
    pub seen_quotes: String,
    /// Name of the images cookie. Default `seen_images`.
    #[serde(default = "default_seen_images")]
    pub seen_images: String,
}

fn default_path() -> String {
    "/".to_string()
}
fn default_seen_quotes() -> String {
    "seen_quotes".to_string()
}
fn default_seen_images() -> String {
    "seen_images".to_string()
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            max_age_secs: 0,
            seen_quotes: default_seen_quotes(),
            seen_images: default_seen_images(),
        }
    }
}

impl CookieConfig {
    /// Builds the cookie carrying `seen` under `name`.
    pub fn build(&self, name: &str, seen: &SeenSet) -> Cookie<'static> {
        let mut cookie = Cookie::new(name.to_string(), seen.encode());
        cookie.set_path(self.path.clone());
        if self.max_age_secs > 0 {
            cookie.set_max_age(cookie::time::Duration::seconds(self.max_age_secs));
        }
        cookie
    }
}

/// Reads the seen-set stored under `name`; a missing cookie is an empty set.
pub fn read(jar: &CookieJar, name: &str) -> SeenSet {
    SeenSet::from_cookie_value(jar.get(name).map(|c| c.value()))
}
