//! Read-only queries shared by the quote and image accessors.

use sqlx::{Row, SqlitePool};

use crate::error::{CatalogError, CatalogResult};
use crate::models::Record;
use crate::predicate::{build_clause, combine_clauses, Clause, Column, Op};

/// Fetches one record by primary key.
pub async fn fetch_by_id<R: Record>(pool: &SqlitePool, id: &str) -> CatalogResult<R> {
    let sql = format!("SELECT {} FROM {} WHERE id = ?", R::COLUMNS, R::TABLE);
    let row = sqlx::query(&sql).bind(id).fetch_optional(pool).await?;

    match row {
        Some(row) => Ok(R::from_row(&row)?),
        None => {
            tracing::debug!(kind = R::KIND, id, "lookup by id found nothing");
            Err(CatalogError::not_found(R::KIND))
        }
    }
}

/// Lists records matching every `(column, value)` pair, in storage order.
/// No filters lists the whole table.
pub async fn list_where<R: Record>(
    pool: &SqlitePool,
    filters: &[(Column, String)],
) -> CatalogResult<Vec<R>> {
    let mut params = Vec::new();
    let fragments: Vec<String> = filters
        .iter()
        .filter_map(|(column, value)| {
            build_clause(
                Clause::new(*column, Op::Eq),
                std::slice::from_ref(value),
                &mut params,
            )
        })
        .collect();

    let sql = format!(
        "SELECT {} FROM {} {}",
        R::COLUMNS,
        R::TABLE,
        combine_clauses(&fragments)
    );
    let mut query = sqlx::query(&sql);
    for p in params {
        query = query.bind(p);
    }

    let rows = query.fetch_all(pool).await?;
    rows.iter()
        .map(|row| R::from_row(row).map_err(CatalogError::from))
        .collect()
}

/// `SELECT <column>, COUNT(*) … GROUP BY <column>`, ordered by the group key.
pub async fn count_by<R: Record>(
    pool: &SqlitePool,
    column: Column,
) -> CatalogResult<Vec<(String, i64)>> {
    let col = column.as_str();
    let sql = format!(
        "SELECT {col} AS grp, COUNT(*) AS count FROM {} GROUP BY {col} ORDER BY {col}",
        R::TABLE
    );
    let rows = sqlx::query(&sql).fetch_all(pool).await?;

    let mut counts = Vec::with_capacity(rows.len());
    for row in &rows {
        counts.push((row.try_get("grp")?, row.try_get("count")?));
    }
    Ok(counts)
}

pub async fn count_all<R: Record>(pool: &SqlitePool) -> CatalogResult<i64> {
    let sql = format!("SELECT COUNT(*) FROM {}", R::TABLE);
    Ok(sqlx::query_scalar(&sql).fetch_one(pool).await?)
}
