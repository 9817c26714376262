//! Live schema introspection.
//!
//! Reads tables, columns and indexes back out of CrateDB's system catalogs
//! and turns them into the framework's [`Table`], [`Column`] and [`Index`]
//! types. Row decoding is kept separate from the queries so it can be
//! exercised without a server.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use tracing::debug;

use crate::config::{CatalogGeneration, DialectConfig};
use crate::dialect::{CrateDialect, Dialect, apply_filters};
use crate::error::{CrateError, Result};
use crate::schema::{Column, Index, IndexType, SqlType, Table};

/// Checks for a column by table and column name.
pub const COLUMN_EXISTS_SQL: &str = "SELECT column_name FROM INFORMATION_SCHEMA.COLUMNS \
     WHERE table_name = $1 AND column_name = $2";

/// Lists user tables, skipping CrateDB's system schemas.
pub const TABLES_SQL: &str = "SELECT table_schema, table_name FROM information_schema.tables \
     WHERE table_schema NOT IN ('blob', 'information_schema', 'sys', 'pg_catalog')";

/// Column details from the Postgres-compatible catalogs. `$1` table, `$2` schema.
pub const PG_COLUMNS_SQL: &str = r"SELECT column_name, column_default, is_nullable, data_type, character_maximum_length, numeric_precision, numeric_precision_radix ,
    CASE WHEN p.contype = 'p' THEN true ELSE false END AS primarykey,
    CASE WHEN p.contype = 'u' THEN true ELSE false END AS uniquekey
FROM pg_attribute f
    JOIN pg_class c ON c.oid = f.attrelid JOIN pg_type t ON t.oid = f.atttypid
    LEFT JOIN pg_attrdef d ON d.adrelid = c.oid AND d.adnum = f.attnum
    LEFT JOIN pg_namespace n ON n.oid = c.relnamespace
    LEFT JOIN pg_constraint p ON p.conrelid = c.oid AND f.attnum = ANY (p.conkey)
    LEFT JOIN pg_class AS g ON p.confrelid = g.oid
    LEFT JOIN INFORMATION_SCHEMA.COLUMNS s ON s.column_name=f.attname AND c.relname=s.table_name
WHERE c.relkind = 'r'::char AND c.relname = $1 AND s.table_schema = $2 AND f.attnum > 0 ORDER BY f.attnum;";

/// Column details from `information_schema`. `$1` table, `$2` schema.
pub const IS_COLUMNS_SQL: &str = r"SELECT c.column_name, c.column_default,
    CASE WHEN c.is_nullable THEN 'YES' ELSE 'NO' END AS is_nullable,
    c.data_type, c.character_maximum_length, c.numeric_precision, c.numeric_precision_radix,
    CASE WHEN k.column_name IS NULL THEN false ELSE true END AS primarykey,
    false AS uniquekey
FROM information_schema.columns c
    LEFT JOIN information_schema.key_column_usage k
        ON k.table_schema = c.table_schema AND k.table_name = c.table_name AND k.column_name = c.column_name
WHERE c.table_name = $1 AND c.table_schema = $2
ORDER BY c.ordinal_position";

/// Index definitions from `pg_indexes`. `$1` schema, `$2` table.
pub const PG_INDEXES_SQL: &str =
    "SELECT indexname, indexdef FROM pg_indexes WHERE schemaname=$1 AND tablename=$2";

/// Constraint columns from `information_schema`. `$1` schema, `$2` table.
pub const IS_INDEXES_SQL: &str = r"SELECT tc.constraint_name, tc.constraint_type, k.column_name
FROM information_schema.table_constraints tc
    JOIN information_schema.key_column_usage k
        ON k.constraint_name = tc.constraint_name AND k.table_schema = tc.table_schema AND k.table_name = tc.table_name
WHERE tc.table_schema = $1 AND tc.table_name = $2
ORDER BY tc.constraint_name, k.ordinal_position";

static INDEX_COLUMNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^()]*)\)").expect("index column pattern is valid"));

/// One row of a column catalog query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnRow {
    pub name: String,
    pub default: Option<String>,
    /// `YES` or `NO`.
    pub is_nullable: String,
    pub data_type: String,
    pub max_length: Option<i64>,
    pub is_primary_key: bool,
}

impl ColumnRow {
    fn from_pg_row(row: &PgRow) -> Result<Self> {
        // CrateDB reports is_nullable as a boolean, Postgres as YES/NO.
        let is_nullable = match row.try_get::<String, _>("is_nullable") {
            Ok(s) => s,
            Err(_) => {
                let nullable: bool = row.try_get("is_nullable")?;
                let flag = if nullable { "YES" } else { "NO" };
                flag.to_string()
            }
        };

        Ok(Self {
            name: row.try_get("column_name")?,
            default: row.try_get("column_default")?,
            is_nullable,
            data_type: row.try_get("data_type")?,
            max_length: row
                .try_get::<Option<i32>, _>("character_maximum_length")?
                .map(i64::from),
            is_primary_key: row.try_get("primarykey")?,
        })
    }
}

/// One row of the `information_schema` constraint query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintRow {
    pub name: String,
    /// `PRIMARY KEY`, `UNIQUE`, `CHECK`, ...
    pub constraint_type: String,
    pub column: String,
}

fn trim_identifier(name: &str) -> &str {
    name.trim_matches(|c| c == '"' || c == ' ')
}

/// Maps a catalog `data_type` to an abstract type.
///
/// Fails with [`CrateError::UnknownColumnType`] when the type has no
/// framework name.
pub fn map_catalog_type(data_type: &str) -> Result<SqlType> {
    let sql_type = match data_type {
        "character varying" | "character" => SqlType::Varchar,
        "timestamp without time zone" | "timestamp with time zone" | "time without time zone" => {
            SqlType::TimeStamp
        }
        "double precision" => SqlType::Double,
        "boolean" => SqlType::Bool,
        "oid" => SqlType::Long,
        other => SqlType::from_name(other)
            .ok_or_else(|| CrateError::UnknownColumnType(data_type.to_string()))?,
    };
    Ok(sql_type)
}

/// Builds a [`Column`] from a catalog row.
pub fn column_from_row(row: ColumnRow) -> Result<Column> {
    let name = trim_identifier(&row.name).to_string();
    let sql_type = map_catalog_type(&row.data_type)?;

    let length = match row.max_length {
        None => 0,
        Some(len) => usize::try_from(len).map_err(|_| CrateError::InvalidLength {
            column: name.clone(),
            value: len,
        })?,
    };

    // Serial types are already NOT NULL and auto-incrementing here.
    let mut col = Column::new(name, sql_type);
    col.length = length;
    col.nullable &= row.is_nullable == "YES";
    col.is_auto_increment |= row
        .default
        .as_deref()
        .is_some_and(|d| d.starts_with("nextval("));

    if row.is_primary_key {
        col.is_primary_key = true;
    } else {
        col.default = row.default;
    }

    if col.sql_type.is_text() || col.sql_type.is_time() {
        col.default = match col.default.take() {
            Some(d) if !d.is_empty() => Some(format!("'{d}'")),
            _ if col.default_is_empty => Some("''".to_string()),
            other => other,
        };
    }

    Ok(col)
}

/// Marks indexes following the `IDX_<table>_<name>` / `UQE_<table>_<name>`
/// scheme as regular and strips the prefix from their name.
fn regularize(table: &str, index: &mut Index) {
    let idx_prefix = format!("IDX_{table}");
    let uqe_prefix = format!("UQE_{table}");
    if !index.name.starts_with(&idx_prefix) && !index.name.starts_with(&uqe_prefix) {
        return;
    }

    index.is_regular = true;
    if let Some(short) = index.name.get(idx_prefix.len() + 1..).filter(|s| !s.is_empty()) {
        index.name = short.to_string();
    }
}

/// Builds an [`Index`] from a `pg_indexes` row.
///
/// Returns `None` for primary key indexes (`*_pkey`).
pub fn index_from_definition(table: &str, name: &str, definition: &str) -> Result<Option<Index>> {
    let name = trim_identifier(name);
    if name.ends_with("_pkey") {
        return Ok(None);
    }

    let index_type = if definition.starts_with("CREATE UNIQUE INDEX") {
        IndexType::Unique
    } else {
        IndexType::Index
    };

    let columns = INDEX_COLUMNS
        .captures(definition)
        .and_then(|caps| caps.get(1))
        .ok_or_else(|| CrateError::MalformedIndexDefinition {
            index: name.to_string(),
            definition: definition.to_string(),
        })?
        .as_str()
        .split(',')
        .map(|c| trim_identifier(c).to_string())
        .collect();

    let mut index = Index::new(name, index_type);
    index.columns = columns;
    regularize(table, &mut index);
    Ok(Some(index))
}

/// Groups `information_schema` constraint rows into indexes.
///
/// Only `UNIQUE` constraints are backed by an index; primary key, foreign
/// key and check constraints are skipped.
#[must_use]
pub fn indexes_from_constraints(table: &str, rows: Vec<ConstraintRow>) -> BTreeMap<String, Index> {
    let mut grouped: BTreeMap<String, Index> = BTreeMap::new();

    for row in rows {
        if !row.constraint_type.eq_ignore_ascii_case("UNIQUE") {
            continue;
        }
        let name = trim_identifier(&row.name).to_string();
        grouped
            .entry(name.clone())
            .or_insert_with(|| Index::new(name, IndexType::Unique))
            .columns
            .push(trim_identifier(&row.column).to_string());
    }

    grouped
        .into_values()
        .map(|mut index| {
            regularize(table, &mut index);
            (index.name.clone(), index)
        })
        .collect()
}

/// Reads schema information from a live CrateDB.
pub struct CrateIntrospector {
    pool: PgPool,
    dialect: CrateDialect,
}

impl CrateIntrospector {
    /// Creates an introspector over an existing pool.
    pub fn new(pool: PgPool, dialect: CrateDialect) -> Self {
        Self { pool, dialect }
    }

    /// Connects to `url` (PostgreSQL wire protocol, usually port 5432).
    pub async fn connect(url: &str, config: DialectConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await?;
        Ok(Self::new(pool, CrateDialect::with_config(config)))
    }

    /// Returns the dialect.
    #[must_use]
    pub fn dialect(&self) -> &CrateDialect {
        &self.dialect
    }

    /// Returns the connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Returns whether `table` has a column named `column`.
    pub async fn is_column_exist(&self, table: &str, column: &str) -> Result<bool> {
        debug!(sql = COLUMN_EXISTS_SQL, args = ?[table, column], "Checking column");

        let row = sqlx::query(COLUMN_EXISTS_SQL)
            .bind(table)
            .bind(column)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    /// Returns the columns of `table` in declaration order.
    pub async fn get_columns(&self, table: &str) -> Result<Vec<Column>> {
        let sql = match self.dialect.generation() {
            CatalogGeneration::PgCatalog => PG_COLUMNS_SQL,
            CatalogGeneration::InformationSchema => IS_COLUMNS_SQL,
        };
        let schema = self.dialect.schema();
        debug!(sql, args = ?[table, schema], "Reading columns");

        let rows = sqlx::query(sql)
            .bind(table)
            .bind(schema)
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| ColumnRow::from_pg_row(row).and_then(column_from_row))
            .collect()
    }

    /// Returns all user tables, named `<schema>.<table>`.
    pub async fn get_tables(&self) -> Result<Vec<Table>> {
        debug!(sql = TABLES_SQL, "Listing tables");

        let rows: Vec<(String, String)> = sqlx::query_as(TABLES_SQL).fetch_all(&self.pool).await?;

        Ok(rows
            .into_iter()
            .map(|(schema, name)| Table::new(format!("{schema}.{name}")))
            .collect())
    }

    /// Returns the indexes of `table`, keyed by (short) index name.
    pub async fn get_indexes(&self, table: &str) -> Result<BTreeMap<String, Index>> {
        let schema = self.dialect.schema();

        match self.dialect.generation() {
            CatalogGeneration::PgCatalog => {
                debug!(sql = PG_INDEXES_SQL, args = ?[schema, table], "Reading indexes");

                let rows: Vec<(String, String)> = sqlx::query_as(PG_INDEXES_SQL)
                    .bind(schema)
                    .bind(table)
                    .fetch_all(&self.pool)
                    .await?;

                let mut indexes = BTreeMap::new();
                for (name, definition) in rows {
                    if let Some(index) = index_from_definition(table, &name, &definition)? {
                        indexes.insert(index.name.clone(), index);
                    }
                }
                Ok(indexes)
            }
            CatalogGeneration::InformationSchema => {
                debug!(sql = IS_INDEXES_SQL, args = ?[schema, table], "Reading indexes");

                let rows: Vec<(String, String, String)> = sqlx::query_as(IS_INDEXES_SQL)
                    .bind(schema)
                    .bind(table)
                    .fetch_all(&self.pool)
                    .await?;

                let rows = rows
                    .into_iter()
                    .map(|(name, constraint_type, column)| ConstraintRow {
                        name,
                        constraint_type,
                        column,
                    })
                    .collect();
                Ok(indexes_from_constraints(table, rows))
            }
        }
    }

    /// Returns whether `table` exists, using the dialect's check query.
    pub async fn table_exists(&self, table: &str) -> Result<bool> {
        let (sql, args) = self.dialect.table_check_sql(table);
        self.check(&sql, &args).await
    }

    /// Returns whether `index` exists on `table`, using the dialect's check
    /// query.
    pub async fn index_exists(&self, table: &str, index: &str) -> Result<bool> {
        let (sql, args) = self.dialect.index_check_sql(table, index);
        self.check(&sql, &args).await
    }

    async fn check(&self, sql: &str, args: &[String]) -> Result<bool> {
        let sql = apply_filters(&self.dialect, sql, None);
        debug!(sql = %sql, args = ?args, "Running existence check");

        let mut query = sqlx::query(&sql);
        for arg in args {
            query = query.bind(arg.as_str());
        }
        Ok(query.fetch_optional(&self.pool).await?.is_some())
    }
}
