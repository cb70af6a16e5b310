//! Random selection with a seen-set exclusion and a fallback cascade.
//!
//! A pick runs one `ORDER BY RANDOM() LIMIT 1` query built from an optional
//! `id NOT IN (…)` fragment plus one optional `IN (…)` fragment per inclusion
//! dimension. When nothing matches, [`pick_with_fallback`] relaxes the
//! constraints in two fixed steps:
//!
//! | Tier | Exclusions | Inclusion filters |
//! |------|------------|-------------------|
//! | [`Tier::Filtered`] | seen-set | requested |
//! | [`Tier::SeenReset`] | none | requested |
//! | [`Tier::Defaults`] | none | per-endpoint defaults |
//!
//! The three queries are strictly sequential. Randomness comes from SQLite's
//! `RANDOM()` evaluated per query, so no generator state lives in-process.

use sqlx::SqlitePool;

use crate::error::{CatalogError, CatalogResult};
use crate::models::Record;
use crate::predicate::{build_clause, combine_clauses, Clause, Column, Op};
use crate::seen::SeenSet;

/// One optional filter axis. An empty `values` list leaves the axis
/// unrestricted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    pub column: Column,
    pub values: Vec<String>,
}

impl Dimension {
    pub fn new(column: Column, values: Vec<String>) -> Self {
        Self { column, values }
    }
}

/// Request-scoped filter: IDs to skip plus inclusion dimensions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    pub exclude_ids: Vec<String>,
    pub include: Vec<Dimension>,
}

impl FilterSet {
    /// Renders the WHERE clause and its positional parameters.
    pub fn where_clause(&self) -> (String, Vec<String>) {
        let mut params = Vec::new();
        let mut fragments = Vec::new();

        if let Some(f) = build_clause(
            Clause::new(Column::Id, Op::NotIn),
            &self.exclude_ids,
            &mut params,
        ) {
            fragments.push(f);
        }
        for dim in &self.include {
            if let Some(f) = build_clause(Clause::new(dim.column, Op::In), &dim.values, &mut params)
            {
                fragments.push(f);
            }
        }

        (combine_clauses(&fragments), params)
    }
}

/// Returns one uniformly random row of `R` matching `filter`, or
/// [`CatalogError::NotFound`].
pub async fn pick_random_excluding<R: Record>(
    pool: &SqlitePool,
    filter: &FilterSet,
) -> CatalogResult<R> {
    let (where_clause, params) = filter.where_clause();
    let sql = format!(
        "SELECT {} FROM {} {} ORDER BY RANDOM() LIMIT 1",
        R::COLUMNS,
        R::TABLE,
        where_clause
    );

    let mut query = sqlx::query(&sql);
    for p in params {
        query = query.bind(p);
    }

    match query.fetch_optional(pool).await? {
        Some(row) => Ok(R::from_row(&row)?),
        None => Err(CatalogError::not_found(R::KIND)),
    }
}

/// Which step of the cascade produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Filtered,
    SeenReset,
    Defaults,
}

/// A successful pick and the seen-set to hand back to the client.
#[derive(Debug, Clone)]
pub struct Pick<R> {
    pub item: R,
    pub seen: SeenSet,
    pub tier: Tier,
}

/// Picks a random `R` the client has not seen, relaxing constraints tier by
/// tier until something matches.
///
/// The returned seen-set always ends with the picked ID. If the first tier
/// came up empty the previous list is discarded, so after a reset the set
/// holds exactly the new ID. When every tier is empty the last
/// [`CatalogError::NotFound`] is returned and the caller should leave the
/// client's cookie alone. Other storage errors abort the cascade at once.
pub async fn pick_with_fallback<R: Record>(
    pool: &SqlitePool,
    seen: SeenSet,
    include: Vec<Dimension>,
    defaults: Vec<Dimension>,
) -> CatalogResult<Pick<R>> {
    let mut seen = seen;
    let mut filter = FilterSet {
        exclude_ids: seen.ids().to_vec(),
        include,
    };

    let mut tier = Tier::Filtered;
    let item = loop {
        match pick_random_excluding::<R>(pool, &filter).await {
            Ok(item) => break item,
            Err(e) if e.is_not_found() => {
                tier = match tier {
                    Tier::Filtered => {
                        tracing::debug!(
                            kind = R::KIND,
                            excluded = filter.exclude_ids.len(),
                            "nothing unseen matches, resetting seen-set"
                        );
                        seen.clear();
                        filter.exclude_ids.clear();
                        Tier::SeenReset
                    }
                    Tier::SeenReset => {
                        tracing::debug!(kind = R::KIND, "filters match nothing, using defaults");
                        filter.include = defaults.clone();
                        Tier::Defaults
                    }
                    Tier::Defaults => {
                        tracing::warn!(kind = R::KIND, "fallback cascade exhausted");
                        return Err(e);
                    }
                };
            }
            Err(e) => return Err(e),
        }
    };

    seen.push(item.id());
    Ok(Pick { item, seen, tier })
}
