//! Database dialect abstraction.
//!
//! A dialect translates the framework's column/index/table model into one
//! backend's SQL: type names, identifier quoting, reserved words, capability
//! flags and the catalog queries used to check what exists.

mod cratedb;

pub use cratedb::CrateDialect;

use crate::filter::Filter;
use crate::schema::{Column, Index, Table};
use crate::uri::DbType;

/// Trait for database-specific SQL generation.
pub trait Dialect: Send + Sync {
    /// Returns the dialect name.
    fn name(&self) -> &'static str;

    /// Returns the backend this dialect targets.
    fn db_type(&self) -> DbType;

    /// Returns the backend type string for a column, including any length
    /// arguments.
    fn sql_type(&self, column: &Column) -> String;

    /// Returns whether `name` is a reserved word in this dialect.
    fn is_reserved(&self, name: &str) -> bool;

    /// Returns the identifier quote.
    fn quote_str(&self) -> &'static str {
        "\""
    }

    /// Quotes an identifier (table name, column name, etc.).
    fn quote(&self, name: &str) -> String {
        let q = self.quote_str();
        format!("{q}{name}{q}")
    }

    /// Returns the keyword appended to auto-increment primary keys.
    fn auto_incr_str(&self) -> &'static str;

    /// Whether multi-row `INSERT ... VALUES (...), (...)` is accepted.
    fn support_insert_many(&self) -> bool;

    /// Whether `CREATE TABLE` takes a storage engine clause.
    fn support_engine(&self) -> bool;

    /// Whether `CREATE TABLE` takes a character set clause.
    fn support_charset(&self) -> bool;

    /// Whether indexes are declared inside `CREATE TABLE`.
    fn index_on_table(&self) -> bool;

    /// Whether column definitions spell out `NULL` / `NOT NULL`.
    fn show_create_null(&self) -> bool {
        true
    }

    /// Returns a query (with `?` placeholders) and its arguments that yields
    /// a row when `index` exists on `table`.
    fn index_check_sql(&self, table: &str, index: &str) -> (String, Vec<String>);

    /// Returns a query (with `?` placeholders) and its arguments that yields
    /// a row when `table` exists.
    fn table_check_sql(&self, table: &str) -> (String, Vec<String>);

    /// Returns the statement that changes a column's type.
    fn modify_column_sql(&self, table: &str, column: &Column) -> String;

    /// Returns the statement that drops an index.
    fn drop_index_sql(&self, table: &str, index: &Index) -> String;

    /// Returns the filters statements pass through before execution, in
    /// order.
    fn filters(&self) -> Vec<Box<dyn Filter>>;

    /// Generates a column definition.
    ///
    /// `inline_pk` renders `PRIMARY KEY` on the column itself; it is false
    /// for members of a composite key.
    fn column_definition(&self, column: &Column, inline_pk: bool) -> String {
        let mut parts = vec![self.quote(&column.name), self.sql_type(column)];

        if inline_pk && column.is_primary_key {
            parts.push("PRIMARY KEY".to_string());
            if column.is_auto_increment && !self.auto_incr_str().is_empty() {
                parts.push(self.auto_incr_str().to_string());
            }
        }

        if let Some(ref default) = column.default {
            parts.push(format!("DEFAULT {default}"));
        }

        if self.show_create_null() {
            parts.push(if column.nullable { "NULL" } else { "NOT NULL" }.to_string());
        }

        parts.join(" ")
    }

    /// Generates `CREATE TABLE IF NOT EXISTS` for a table.
    fn create_table_sql(&self, table: &Table) -> String {
        let inline_pk = table.primary_keys.len() == 1;

        let mut defs: Vec<String> = table
            .columns
            .iter()
            .map(|c| self.column_definition(c, inline_pk))
            .collect();

        if table.primary_keys.len() > 1 {
            let quoted: Vec<String> = table.primary_keys.iter().map(|c| self.quote(c)).collect();
            defs.push(format!("PRIMARY KEY ({})", quoted.join(", ")));
        }

        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n  {}\n)",
            self.quote(&table.name),
            defs.join(",\n  ")
        )
    }

    /// Generates `DROP TABLE IF EXISTS` for a table.
    fn drop_table_sql(&self, table: &str) -> String {
        format!("DROP TABLE IF EXISTS {}", self.quote(table))
    }
}

/// Runs `sql` through every filter of `dialect`, in order.
#[must_use]
pub fn apply_filters(dialect: &dyn Dialect, sql: &str, table: Option<&Table>) -> String {
    dialect
        .filters()
        .iter()
        .fold(sql.to_string(), |sql, filter| {
            filter.apply(&sql, dialect, table)
        })
}
