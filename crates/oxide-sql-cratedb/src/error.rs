//! Error types for the CrateDB dialect.

/// Errors that can occur while talking to or decoding CrateDB catalogs.
#[derive(Debug, thiserror::Error)]
pub enum CrateError {
    /// Database error while running a catalog query.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A catalog reported a column type the framework has no name for.
    #[error("Unknown column type: {0}")]
    UnknownColumnType(String),

    /// A catalog reported a column length that cannot be a length.
    #[error("Invalid length {value} for column '{column}'")]
    InvalidLength {
        /// Column name.
        column: String,
        /// Reported length.
        value: i64,
    },

    /// An index definition without a column list.
    #[error("Malformed definition for index '{index}': {definition}")]
    MalformedIndexDefinition {
        /// Index name.
        index: String,
        /// Raw `CREATE INDEX` statement.
        definition: String,
    },

    /// The data source name could not be parsed.
    #[error("Invalid data source name: {0}")]
    InvalidDsn(#[from] url::ParseError),

    /// Unrecognised catalog generation name.
    #[error("Unknown catalog generation '{0}' (expected pg-catalog or information-schema)")]
    UnknownCatalogGeneration(String),
}

/// Result type for dialect operations.
pub type Result<T> = std::result::Result<T, CrateError>;
