//! SQL rewriting filters.
//!
//! Statements are written once with backtick quoting and `?` placeholders;
//! each dialect picks the filters that turn them into its own syntax.
//! CrateDB uses [`IdFilter`], [`QuoteFilter`] and a `$`-numbered
//! [`SeqFilter`].

use std::fmt::Write;

use crate::dialect::Dialect;
use crate::schema::Table;

/// Rewrites a SQL statement for a dialect.
pub trait Filter: Send + Sync {
    /// Returns the rewritten statement.
    fn apply(&self, sql: &str, dialect: &dyn Dialect, table: Option<&Table>) -> String;
}

/// Replaces the `(id)` pseudo-column with the table's primary key.
///
/// Only applies to tables with exactly one primary key column.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdFilter;

impl Filter for IdFilter {
    fn apply(&self, sql: &str, dialect: &dyn Dialect, table: Option<&Table>) -> String {
        let Some(pk) = table.and_then(|t| match t.primary_keys.as_slice() {
            [pk] => Some(pk),
            _ => None,
        }) else {
            return sql.to_string();
        };

        let replacement = format!(" {} ", dialect.quote(pk));
        sql.replace(" `(id)` ", &replacement)
            .replace(&format!(" {} ", dialect.quote("(id)")), &replacement)
            .replace(" (id) ", &replacement)
    }
}

/// Replaces backticks with the dialect's identifier quote.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuoteFilter;

impl Filter for QuoteFilter {
    fn apply(&self, sql: &str, dialect: &dyn Dialect, _table: Option<&Table>) -> String {
        sql.replace('`', dialect.quote_str())
    }
}

/// Numbers `?` placeholders: `?` becomes `$1`, `$2`, ...
///
/// Question marks inside single-quoted literals are left alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeqFilter {
    /// Placeholder prefix (`$` for CrateDB).
    pub prefix: String,
    /// Number of the first placeholder.
    pub start: usize,
}

impl SeqFilter {
    #[must_use]
    pub fn new(prefix: impl Into<String>, start: usize) -> Self {
        Self {
            prefix: prefix.into(),
            start,
        }
    }
}

impl Filter for SeqFilter {
    fn apply(&self, sql: &str, _dialect: &dyn Dialect, _table: Option<&Table>) -> String {
        let mut out = String::with_capacity(sql.len() + 8);
        let mut in_literal = false;
        let mut next = self.start;

        for c in sql.chars() {
            match c {
                '\'' => {
                    in_literal = !in_literal;
                    out.push(c);
                }
                '?' if !in_literal => {
                    let _ = write!(out, "{}{}", self.prefix, next);
                    next += 1;
                }
                _ => out.push(c),
            }
        }

        out
    }
}
