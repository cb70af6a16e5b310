//! Parameterized WHERE-clause construction.
//!
//! Identifiers come only from the fixed [`Column`] allow-list; client values
//! never reach the SQL text and are appended to a parameter list bound
//! positionally by the caller.

use std::fmt;

/// Columns that may appear in a generated predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Id,
    Language,
    Author,
    Category,
    Photographer,
}

impl Column {
    pub fn as_str(self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::Language => "language",
            Column::Author => "author",
            Column::Category => "category",
            Column::Photographer => "photographer",
        }
    }
}

/// Comparison operator of a clause template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    NotIn,
    In,
    Eq,
}

impl Op {
    fn as_str(self) -> &'static str {
        match self {
            Op::NotIn => "NOT IN",
            Op::In => "IN",
            Op::Eq => "=",
        }
    }
}

/// A `"<column> <OP>"` template, e.g. `id NOT IN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clause {
    pub column: Column,
    pub op: Op,
}

impl Clause {
    pub const fn new(column: Column, op: Op) -> Self {
        Self { column, op }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.column.as_str(), self.op.as_str())
    }
}

/// Builds `"<column> <OP> (?,?,…)"` with one placeholder per value and
/// appends the values to `params` in order.
///
/// An empty `values` slice yields `None` and leaves `params` untouched: an
/// empty list means "no restriction on this column", never "match nothing".
pub fn build_clause(clause: Clause, values: &[String], params: &mut Vec<String>) -> Option<String> {
    if values.is_empty() {
        return None;
    }
    let placeholders = vec!["?"; values.len()].join(",");
    params.extend(values.iter().cloned());
    Some(format!("{} ({})", clause, placeholders))
}

/// Joins fragments into `WHERE f1 AND f2 …`, or an empty string (match all).
pub fn combine_clauses(fragments: &[String]) -> String {
    if fragments.is_empty() {
        return String::new();
    }
    format!("WHERE {}", fragments.join(" AND "))
}
