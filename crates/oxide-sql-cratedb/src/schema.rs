//! Column, index and table model.
//!
//! These are the framework-side types the CrateDB dialect conforms to. They
//! describe what the application expects the table to look like and are also
//! what catalog introspection produces, so a model and a live table can be
//! compared field by field.

use serde::{Deserialize, Serialize};

/// Abstract SQL types, named the way the framework names them.
///
/// The dialect turns these into CrateDB type strings with
/// [`Dialect::sql_type`](crate::dialect::Dialect::sql_type).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SqlType {
    Bit,
    TinyInt,
    SmallInt,
    MediumInt,
    Int,
    Integer,
    BigInt,
    /// CrateDB 64-bit integer.
    Long,

    Enum,
    Set,

    Char,
    Varchar,
    NVarchar,
    TinyText,
    Text,
    NText,
    Clob,
    MediumText,
    LongText,
    Uuid,

    Date,
    DateTime,
    Time,
    TimeStamp,
    /// Timestamp with time zone.
    TimeStampz,

    Decimal,
    Numeric,
    Real,
    Float,
    Double,

    Binary,
    VarBinary,
    TinyBlob,
    Blob,
    MediumBlob,
    LongBlob,
    Bytea,

    Bool,
    Boolean,

    Serial,
    BigSerial,

    Json,
    Jsonb,

    /// A type name the framework does not know about, passed through as is.
    Custom(String),
}

/// Every named variant, used by [`SqlType::from_name`].
const KNOWN_TYPES: &[SqlType] = &[
    SqlType::Bit,
    SqlType::TinyInt,
    SqlType::SmallInt,
    SqlType::MediumInt,
    SqlType::Int,
    SqlType::Integer,
    SqlType::BigInt,
    SqlType::Long,
    SqlType::Enum,
    SqlType::Set,
    SqlType::Char,
    SqlType::Varchar,
    SqlType::NVarchar,
    SqlType::TinyText,
    SqlType::Text,
    SqlType::NText,
    SqlType::Clob,
    SqlType::MediumText,
    SqlType::LongText,
    SqlType::Uuid,
    SqlType::Date,
    SqlType::DateTime,
    SqlType::Time,
    SqlType::TimeStamp,
    SqlType::TimeStampz,
    SqlType::Decimal,
    SqlType::Numeric,
    SqlType::Real,
    SqlType::Float,
    SqlType::Double,
    SqlType::Binary,
    SqlType::VarBinary,
    SqlType::TinyBlob,
    SqlType::Blob,
    SqlType::MediumBlob,
    SqlType::LongBlob,
    SqlType::Bytea,
    SqlType::Bool,
    SqlType::Boolean,
    SqlType::Serial,
    SqlType::BigSerial,
    SqlType::Json,
    SqlType::Jsonb,
];

impl SqlType {
    /// Returns the canonical (uppercase) type name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Bit => "BIT",
            Self::TinyInt => "TINYINT",
            Self::SmallInt => "SMALLINT",
            Self::MediumInt => "MEDIUMINT",
            Self::Int => "INT",
            Self::Integer => "INTEGER",
            Self::BigInt => "BIGINT",
            Self::Long => "LONG",
            Self::Enum => "ENUM",
            Self::Set => "SET",
            Self::Char => "CHAR",
            Self::Varchar => "VARCHAR",
            Self::NVarchar => "NVARCHAR",
            Self::TinyText => "TINYTEXT",
            Self::Text => "TEXT",
            Self::NText => "NTEXT",
            Self::Clob => "CLOB",
            Self::MediumText => "MEDIUMTEXT",
            Self::LongText => "LONGTEXT",
            Self::Uuid => "UUID",
            Self::Date => "DATE",
            Self::DateTime => "DATETIME",
            Self::Time => "TIME",
            Self::TimeStamp => "TIMESTAMP",
            Self::TimeStampz => "TIMESTAMPZ",
            Self::Decimal => "DECIMAL",
            Self::Numeric => "NUMERIC",
            Self::Real => "REAL",
            Self::Float => "FLOAT",
            Self::Double => "DOUBLE",
            Self::Binary => "BINARY",
            Self::VarBinary => "VARBINARY",
            Self::TinyBlob => "TINYBLOB",
            Self::Blob => "BLOB",
            Self::MediumBlob => "MEDIUMBLOB",
            Self::LongBlob => "LONGBLOB",
            Self::Bytea => "BYTEA",
            Self::Bool => "BOOL",
            Self::Boolean => "BOOLEAN",
            Self::Serial => "SERIAL",
            Self::BigSerial => "BIGSERIAL",
            Self::Json => "JSON",
            Self::Jsonb => "JSONB",
            Self::Custom(name) => name,
        }
    }

    /// Parses a canonical type name, ignoring case.
    ///
    /// Returns `None` for names that are not known types; `Custom` is never
    /// produced here.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        KNOWN_TYPES
            .iter()
            .find(|t| t.name().eq_ignore_ascii_case(name.trim()))
            .cloned()
    }

    /// Character and document types whose defaults are string literals.
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            Self::Char
                | Self::Varchar
                | Self::NVarchar
                | Self::TinyText
                | Self::Text
                | Self::NText
                | Self::Clob
                | Self::MediumText
                | Self::LongText
                | Self::Enum
                | Self::Set
                | Self::Uuid
                | Self::Json
                | Self::Jsonb
        )
    }

    /// Date and time types.
    #[must_use]
    pub fn is_time(&self) -> bool {
        matches!(
            self,
            Self::Date | Self::DateTime | Self::Time | Self::TimeStamp | Self::TimeStampz
        )
    }

    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Bit
                | Self::TinyInt
                | Self::SmallInt
                | Self::MediumInt
                | Self::Int
                | Self::Integer
                | Self::BigInt
                | Self::Long
                | Self::Decimal
                | Self::Numeric
                | Self::Real
                | Self::Float
                | Self::Double
                | Self::Serial
                | Self::BigSerial
        )
    }

    #[must_use]
    pub fn is_blob(&self) -> bool {
        matches!(
            self,
            Self::Binary
                | Self::VarBinary
                | Self::TinyBlob
                | Self::Blob
                | Self::MediumBlob
                | Self::LongBlob
                | Self::Bytea
        )
    }

    /// Serial types imply an auto-incrementing, non-null column.
    #[must_use]
    pub fn is_serial(&self) -> bool {
        matches!(self, Self::Serial | Self::BigSerial)
    }
}

impl std::fmt::Display for SqlType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Schema definition for a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Abstract SQL type.
    pub sql_type: SqlType,
    /// First length/precision argument (0 when unset).
    pub length: usize,
    /// Second length/scale argument (0 when unset).
    pub length2: usize,
    /// Whether the column allows NULL values.
    pub nullable: bool,
    /// Default value as SQL text, already quoted where needed.
    pub default: Option<String>,
    /// Renders an empty string literal default for text columns.
    pub default_is_empty: bool,
    /// Whether this column is part of the primary key.
    pub is_primary_key: bool,
    /// Whether this column auto-increments.
    pub is_auto_increment: bool,
}

impl Column {
    /// Creates a new nullable column.
    ///
    /// `SERIAL` and `BIGSERIAL` columns start out auto-incrementing and
    /// NOT NULL.
    #[must_use]
    pub fn new(name: impl Into<String>, sql_type: SqlType) -> Self {
        let serial = sql_type.is_serial();
        Self {
            name: name.into(),
            sql_type,
            length: 0,
            length2: 0,
            nullable: !serial,
            default: None,
            default_is_empty: false,
            is_primary_key: false,
            is_auto_increment: serial,
        }
    }

    /// Sets the length (e.g. `VARCHAR(255)`).
    #[must_use]
    pub fn length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    /// Sets precision and scale (e.g. `DECIMAL(10,2)`).
    #[must_use]
    pub fn precision(mut self, length: usize, length2: usize) -> Self {
        self.length = length;
        self.length2 = length2;
        self
    }

    /// Sets the column as NOT NULL.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Sets the default value (raw SQL).
    #[must_use]
    pub fn default(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Sets the column as the primary key.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self.nullable = false; // Primary keys are always NOT NULL
        self
    }

    /// Sets the column to auto-increment.
    #[must_use]
    pub fn auto_increment(mut self) -> Self {
        self.is_auto_increment = true;
        self
    }
}

/// Kind of index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum IndexType {
    /// Plain index.
    #[default]
    Index,
    /// Unique index.
    Unique,
}

/// Schema definition for an index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Index {
    /// Logical index name (without the `IDX_<table>_` prefix when regular).
    pub name: String,
    /// Plain or unique.
    pub index_type: IndexType,
    /// Indexed columns, in order.
    pub columns: Vec<String>,
    /// Whether the physical name follows the `IDX_`/`UQE_` naming scheme.
    pub is_regular: bool,
}

impl Index {
    /// Creates a new index with no columns.
    #[must_use]
    pub fn new(name: impl Into<String>, index_type: IndexType) -> Self {
        Self {
            name: name.into(),
            index_type,
            columns: Vec::new(),
            is_regular: false,
        }
    }

    /// Adds a column to the index.
    #[must_use]
    pub fn column(mut self, name: impl Into<String>) -> Self {
        self.columns.push(name.into());
        self
    }

    /// Returns the physical index name for `table`.
    ///
    /// Names already carrying the `UQE_` or `IDX_` prefix are used as they
    /// are.
    #[must_use]
    pub fn qualified_name(&self, table: &str) -> String {
        if self.name.starts_with("UQE_") || self.name.starts_with("IDX_") {
            return self.name.clone();
        }
        match self.index_type {
            IndexType::Unique => format!("UQE_{}_{}", table, self.name),
            IndexType::Index => format!("IDX_{}_{}", table, self.name),
        }
    }
}

/// Schema definition for a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Table name, possibly schema-qualified (`doc.users`).
    pub name: String,
    /// Columns in declaration order.
    pub columns: Vec<Column>,
    /// Primary key column names.
    pub primary_keys: Vec<String>,
    /// Indexes on this table.
    pub indexes: Vec<Index>,
}

impl Table {
    /// Creates an empty table.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds a column, registering it as a primary key column when flagged.
    #[must_use]
    pub fn column(mut self, column: Column) -> Self {
        if column.is_primary_key && !self.primary_keys.contains(&column.name) {
            self.primary_keys.push(column.name.clone());
        }
        self.columns.push(column);
        self
    }

    /// Adds an index.
    #[must_use]
    pub fn index(mut self, index: Index) -> Self {
        self.indexes.push(index);
        self
    }

    /// Gets a column by name.
    #[must_use]
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_is_case_insensitive() {
        assert_eq!(SqlType::from_name("varchar"), Some(SqlType::Varchar));
        assert_eq!(SqlType::from_name("TIMESTAMPZ"), Some(SqlType::TimeStampz));
        assert_eq!(SqlType::from_name(" Long "), Some(SqlType::Long));
        assert_eq!(SqlType::from_name("OBJECT"), None);
    }

    #[test]
    fn test_name_round_trips_for_known_types() {
        for t in KNOWN_TYPES {
            assert_eq!(SqlType::from_name(t.name()).as_ref(), Some(t));
        }
    }

    #[test]
    fn test_custom_type_keeps_its_name() {
        let t = SqlType::Custom("GEO_POINT".to_string());
        assert_eq!(t.name(), "GEO_POINT");
        assert_eq!(t.to_string(), "GEO_POINT");
    }

    #[test]
    fn test_categories() {
        assert!(SqlType::Varchar.is_text());
        assert!(SqlType::Uuid.is_text());
        assert!(!SqlType::Integer.is_text());
        assert!(SqlType::TimeStampz.is_time());
        assert!(SqlType::Date.is_time());
        assert!(SqlType::Double.is_numeric());
        assert!(SqlType::MediumBlob.is_blob());
        assert!(!SqlType::Text.is_blob());
    }

    #[test]
    fn test_serial_column_is_auto_increment_and_not_null() {
        let col = Column::new("id", SqlType::BigSerial);
        assert!(col.is_auto_increment);
        assert!(!col.nullable);

        let col = Column::new("name", SqlType::Varchar);
        assert!(!col.is_auto_increment);
        assert!(col.nullable);
    }

    #[test]
    fn test_primary_key_is_not_null() {
        let col = Column::new("id", SqlType::BigInt).primary_key();
        assert!(col.is_primary_key);
        assert!(!col.nullable);
    }

    #[test]
    fn test_index_qualified_name() {
        let idx = Index::new("email", IndexType::Unique);
        assert_eq!(idx.qualified_name("users"), "UQE_users_email");

        let idx = Index::new("created", IndexType::Index);
        assert_eq!(idx.qualified_name("users"), "IDX_users_created");

        let idx = Index::new("IDX_users_created", IndexType::Unique);
        assert_eq!(idx.qualified_name("users"), "IDX_users_created");
    }

    #[test]
    fn test_table_builder_collects_primary_keys() {
        let table = Table::new("users")
            .column(Column::new("id", SqlType::BigInt).primary_key())
            .column(Column::new("name", SqlType::Varchar).length(255));

        assert_eq!(table.primary_keys, vec!["id"]);
        assert_eq!(table.columns.len(), 2);
        assert_eq!(table.get_column("name").map(|c| c.length), Some(255));
        assert!(table.get_column("missing").is_none());
    }
}
