//! CrateDB dialect.
//!
//! CrateDB speaks the PostgreSQL wire protocol and accepts most Postgres
//! DDL, with a few differences that matter here:
//!
//! - There is no `VARCHAR`/`NVARCHAR` storage distinction; text columns are
//!   `string`.
//! - Auto-increment integers become `LONG`; there is no `AUTOINCREMENT`
//!   keyword.
//! - Table options such as engines and character sets do not exist.
//! - Indexes are never declared inline in `CREATE TABLE`.
//!
//! Catalog checks target either the Postgres-compatible `pg_*` catalogs or
//! `information_schema`, depending on [`CatalogGeneration`].

use crate::config::{CatalogGeneration, DialectConfig};
use crate::filter::{Filter, IdFilter, QuoteFilter, SeqFilter};
use crate::reserved;
use crate::schema::{Column, Index, SqlType};
use crate::uri::DbType;

use super::Dialect;

const PG_TABLE_CHECK_SQL: &str = "SELECT tablename FROM pg_tables WHERE tablename = ?";

const PG_INDEX_CHECK_SQL: &str =
    "SELECT indexname FROM pg_indexes WHERE tablename = ? AND indexname = ?";

const IS_TABLE_CHECK_SQL: &str =
    "SELECT table_name FROM information_schema.tables WHERE table_name = ?";

const IS_INDEX_CHECK_SQL: &str = "SELECT constraint_name FROM information_schema.table_constraints \
     WHERE table_name = ? AND constraint_name = ?";

/// CrateDB dialect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrateDialect {
    config: DialectConfig,
}

impl CrateDialect {
    /// Creates a dialect with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a dialect with the given configuration.
    #[must_use]
    pub fn with_config(config: DialectConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &DialectConfig {
        &self.config
    }

    /// Returns the schema introspection looks in.
    #[must_use]
    pub fn schema(&self) -> &str {
        &self.config.schema
    }

    /// Returns the catalog generation queries target.
    #[must_use]
    pub fn generation(&self) -> CatalogGeneration {
        self.config.generation
    }

    /// Appends `(length)` or `(length,length2)` when the column has them.
    fn with_length(mut name: String, column: &Column) -> String {
        if column.length2 > 0 {
            name.push_str(&format!("({},{})", column.length, column.length2));
        } else if column.length > 0 {
            name.push_str(&format!("({})", column.length));
        }
        name
    }
}

impl Dialect for CrateDialect {
    fn name(&self) -> &'static str {
        self.db_type().as_str()
    }

    fn db_type(&self) -> DbType {
        DbType::Crate
    }

    fn sql_type(&self, column: &Column) -> String {
        let auto = column.is_auto_increment;

        let name = match &column.sql_type {
            SqlType::Varchar | SqlType::NVarchar => return "string".to_string(),
            SqlType::TinyInt => return SqlType::SmallInt.name().to_string(),
            SqlType::Bit => return SqlType::Boolean.name().to_string(),
            SqlType::MediumInt | SqlType::Int | SqlType::Integer => {
                let t = if auto { SqlType::Long } else { SqlType::Integer };
                return t.name().to_string();
            }
            SqlType::BigInt => {
                let t = if auto { SqlType::Long } else { SqlType::BigInt };
                return t.name().to_string();
            }
            SqlType::Binary
            | SqlType::VarBinary
            | SqlType::TinyBlob
            | SqlType::Blob
            | SqlType::MediumBlob
            | SqlType::LongBlob => return SqlType::Bytea.name().to_string(),
            SqlType::Double => return "DOUBLE PRECISION".to_string(),

            t @ (SqlType::Serial | SqlType::BigSerial) => t.name().to_string(),
            SqlType::DateTime | SqlType::TimeStampz => SqlType::TimeStamp.name().to_string(),
            SqlType::Float => "float".to_string(),
            SqlType::TinyText | SqlType::MediumText | SqlType::LongText => {
                SqlType::Text.name().to_string()
            }
            SqlType::Uuid => SqlType::Uuid.name().to_string(),
            _ if auto => return SqlType::Serial.name().to_string(),
            other => other.name().to_string(),
        };

        Self::with_length(name, column)
    }

    fn is_reserved(&self, name: &str) -> bool {
        reserved::is_reserved(name)
    }

    /// Quotes an identifier; dotted names are quoted part by part, so
    /// `doc.users` becomes `"doc"."users"`.
    fn quote(&self, name: &str) -> String {
        format!("\"{}\"", name.replace('.', "\".\""))
    }

    fn auto_incr_str(&self) -> &'static str {
        ""
    }

    fn support_insert_many(&self) -> bool {
        true
    }

    fn support_engine(&self) -> bool {
        false
    }

    fn support_charset(&self) -> bool {
        false
    }

    fn index_on_table(&self) -> bool {
        false
    }

    fn show_create_null(&self) -> bool {
        false
    }

    fn index_check_sql(&self, table: &str, index: &str) -> (String, Vec<String>) {
        let sql = match self.generation() {
            CatalogGeneration::PgCatalog => PG_INDEX_CHECK_SQL,
            CatalogGeneration::InformationSchema => IS_INDEX_CHECK_SQL,
        };
        (sql.to_string(), vec![table.to_string(), index.to_string()])
    }

    fn table_check_sql(&self, table: &str) -> (String, Vec<String>) {
        let sql = match self.generation() {
            CatalogGeneration::PgCatalog => PG_TABLE_CHECK_SQL,
            CatalogGeneration::InformationSchema => IS_TABLE_CHECK_SQL,
        };
        (sql.to_string(), vec![table.to_string()])
    }

    fn modify_column_sql(&self, table: &str, column: &Column) -> String {
        format!(
            "alter table {} ALTER COLUMN {} TYPE {}",
            table,
            column.name,
            self.sql_type(column)
        )
    }

    fn drop_index_sql(&self, table: &str, index: &Index) -> String {
        format!("DROP INDEX {}", self.quote(&index.qualified_name(table)))
    }

    fn filters(&self) -> Vec<Box<dyn Filter>> {
        vec![
            Box::new(IdFilter),
            Box::new(QuoteFilter),
            Box::new(SeqFilter::new("$", 1)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::apply_filters;
    use crate::schema::{IndexType, Table};

    fn dialect() -> CrateDialect {
        CrateDialect::new()
    }

    fn sql_type(t: SqlType) -> String {
        dialect().sql_type(&Column::new("c", t))
    }

    #[test]
    fn test_string_types() {
        assert_eq!(sql_type(SqlType::Varchar), "string");
        assert_eq!(sql_type(SqlType::NVarchar), "string");
        assert_eq!(
            dialect().sql_type(&Column::new("c", SqlType::Varchar).length(255)),
            "string"
        );
        assert_eq!(sql_type(SqlType::TinyText), "TEXT");
        assert_eq!(sql_type(SqlType::MediumText), "TEXT");
        assert_eq!(sql_type(SqlType::LongText), "TEXT");
        assert_eq!(sql_type(SqlType::Text), "TEXT");
    }

    #[test]
    fn test_integer_types() {
        assert_eq!(sql_type(SqlType::TinyInt), "SMALLINT");
        assert_eq!(sql_type(SqlType::SmallInt), "SMALLINT");
        assert_eq!(sql_type(SqlType::MediumInt), "INTEGER");
        assert_eq!(sql_type(SqlType::Int), "INTEGER");
        assert_eq!(sql_type(SqlType::Integer), "INTEGER");
        assert_eq!(sql_type(SqlType::BigInt), "BIGINT");
        assert_eq!(sql_type(SqlType::Bit), "BOOLEAN");
    }

    #[test]
    fn test_auto_increment_integers_become_long() {
        let d = dialect();
        for t in [SqlType::MediumInt, SqlType::Int, SqlType::Integer, SqlType::BigInt] {
            let col = Column::new("id", t).auto_increment();
            assert_eq!(d.sql_type(&col), "LONG");
        }
    }

    #[test]
    fn test_auto_increment_fallback_is_serial() {
        let col = Column::new("id", SqlType::Decimal).auto_increment();
        assert_eq!(dialect().sql_type(&col), "SERIAL");
    }

    #[test]
    fn test_serial_types_keep_length() {
        assert_eq!(sql_type(SqlType::Serial), "SERIAL");
        assert_eq!(sql_type(SqlType::BigSerial), "BIGSERIAL");
        assert_eq!(
            dialect().sql_type(&Column::new("id", SqlType::BigSerial).length(8)),
            "BIGSERIAL(8)"
        );
    }

    #[test]
    fn test_binary_types_become_bytea() {
        for t in [
            SqlType::Binary,
            SqlType::VarBinary,
            SqlType::TinyBlob,
            SqlType::Blob,
            SqlType::MediumBlob,
            SqlType::LongBlob,
        ] {
            let col = Column::new("data", t).length(16);
            assert_eq!(dialect().sql_type(&col), "BYTEA");
        }
    }

    #[test]
    fn test_time_types() {
        assert_eq!(sql_type(SqlType::DateTime), "TIMESTAMP");
        assert_eq!(sql_type(SqlType::TimeStampz), "TIMESTAMP");
        assert_eq!(sql_type(SqlType::TimeStamp), "TIMESTAMP");
        assert_eq!(sql_type(SqlType::Date), "DATE");
        assert_eq!(
            dialect().sql_type(&Column::new("at", SqlType::DateTime).length(3)),
            "TIMESTAMP(3)"
        );
    }

    #[test]
    fn test_floating_point_types() {
        assert_eq!(sql_type(SqlType::Float), "float");
        assert_eq!(sql_type(SqlType::Double), "DOUBLE PRECISION");
        assert_eq!(sql_type(SqlType::Real), "REAL");
    }

    #[test]
    fn test_length_rule() {
        let d = dialect();
        assert_eq!(
            d.sql_type(&Column::new("price", SqlType::Decimal).precision(10, 2)),
            "DECIMAL(10,2)"
        );
        assert_eq!(
            d.sql_type(&Column::new("code", SqlType::Char).length(2)),
            "CHAR(2)"
        );
        assert_eq!(d.sql_type(&Column::new("id", SqlType::Uuid)), "UUID");
        assert_eq!(
            d.sql_type(&Column::new("geo", SqlType::Custom("GEO_POINT".into()))),
            "GEO_POINT"
        );
    }

    #[test]
    fn test_quote() {
        let d = dialect();
        assert_eq!(d.quote("users"), "\"users\"");
        assert_eq!(d.quote("doc.users"), "\"doc\".\"users\"");
        assert_eq!(d.quote_str(), "\"");
    }

    #[test]
    fn test_capabilities() {
        let d = dialect();
        assert_eq!(d.name(), "crate");
        assert_eq!(d.db_type(), DbType::Crate);
        assert!(d.support_insert_many());
        assert!(!d.support_engine());
        assert!(!d.support_charset());
        assert!(!d.index_on_table());
        assert!(!d.show_create_null());
        assert_eq!(d.auto_incr_str(), "");
    }

    #[test]
    fn test_reserved_words() {
        let d = dialect();
        assert!(d.is_reserved("select"));
        assert!(d.is_reserved("INDEX"));
        assert!(!d.is_reserved("username"));
    }

    #[test]
    fn test_pg_catalog_check_sql() {
        let d = dialect();
        let (sql, args) = d.table_check_sql("users");
        assert_eq!(sql, "SELECT tablename FROM pg_tables WHERE tablename = ?");
        assert_eq!(args, vec!["users"]);

        let (sql, args) = d.index_check_sql("users", "IDX_users_email");
        assert_eq!(
            sql,
            "SELECT indexname FROM pg_indexes WHERE tablename = ? AND indexname = ?"
        );
        assert_eq!(args, vec!["users", "IDX_users_email"]);
    }

    #[test]
    fn test_information_schema_check_sql() {
        let d = CrateDialect::with_config(
            DialectConfig::new().generation(CatalogGeneration::InformationSchema),
        );
        let (sql, args) = d.table_check_sql("users");
        assert_eq!(
            sql,
            "SELECT table_name FROM information_schema.tables WHERE table_name = ?"
        );
        assert_eq!(args, vec!["users"]);

        let (sql, _) = d.index_check_sql("users", "email");
        assert!(sql.starts_with("SELECT constraint_name FROM information_schema.table_constraints"));
        assert!(sql.ends_with("WHERE table_name = ? AND constraint_name = ?"));
    }

    #[test]
    fn test_check_sql_through_filters() {
        let d = dialect();
        let (sql, _) = d.index_check_sql("users", "IDX_users_email");
        assert_eq!(
            apply_filters(&d, &sql, None),
            "SELECT indexname FROM pg_indexes WHERE tablename = $1 AND indexname = $2"
        );
    }

    #[test]
    fn test_modify_column_sql() {
        let col = Column::new("age", SqlType::BigInt);
        assert_eq!(
            dialect().modify_column_sql("users", &col),
            "alter table users ALTER COLUMN age TYPE BIGINT"
        );
    }

    #[test]
    fn test_drop_index_sql() {
        let d = dialect();
        let idx = Index::new("email", IndexType::Unique);
        assert_eq!(d.drop_index_sql("users", &idx), "DROP INDEX \"UQE_users_email\"");

        let idx = Index::new("created", IndexType::Index);
        assert_eq!(
            d.drop_index_sql("users", &idx),
            "DROP INDEX \"IDX_users_created\""
        );

        let idx = Index::new("IDX_users_created", IndexType::Index);
        assert_eq!(
            d.drop_index_sql("users", &idx),
            "DROP INDEX \"IDX_users_created\""
        );
    }

    #[test]
    fn test_filters_order() {
        let d = dialect();
        let table = Table::new("users").column(Column::new("uid", SqlType::BigInt).primary_key());
        let sql = apply_filters(&d, "SELECT `name` FROM `users` WHERE (id) = ?", Some(&table));
        assert_eq!(sql, "SELECT \"name\" FROM \"users\" WHERE \"uid\" = $1");
        assert_eq!(d.filters().len(), 3);
    }

    #[test]
    fn test_create_table_sql() {
        let d = dialect();
        let table = Table::new("users")
            .column(Column::new("id", SqlType::BigInt).primary_key().auto_increment())
            .column(Column::new("name", SqlType::Varchar).length(255).not_null())
            .column(Column::new("active", SqlType::Bool).default("true"));

        assert_eq!(
            d.create_table_sql(&table),
            "CREATE TABLE IF NOT EXISTS \"users\" (\n  \
             \"id\" LONG PRIMARY KEY,\n  \
             \"name\" string,\n  \
             \"active\" BOOL DEFAULT true\n)"
        );
    }

    #[test]
    fn test_create_table_composite_primary_key() {
        let d = dialect();
        let table = Table::new("doc.memberships")
            .column(Column::new("user_id", SqlType::BigInt).primary_key())
            .column(Column::new("group_id", SqlType::BigInt).primary_key());

        let sql = d.create_table_sql(&table);
        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS \"doc\".\"memberships\" ("));
        assert!(sql.contains("\"user_id\" BIGINT,"));
        assert!(!sql.contains("BIGINT PRIMARY KEY"));
        assert!(sql.contains("PRIMARY KEY (\"user_id\", \"group_id\")"));
    }

    #[test]
    fn test_drop_table_sql() {
        assert_eq!(
            dialect().drop_table_sql("users"),
            "DROP TABLE IF EXISTS \"users\""
        );
    }
}
