//! Dialect configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CrateError;

/// CrateDB's default schema.
pub const DEFAULT_SCHEMA: &str = "doc";

/// Which generation of system catalogs introspection queries target.
///
/// Older CrateDB releases expose Postgres-compatible `pg_*` catalogs;
/// newer ones are introspected through `information_schema`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CatalogGeneration {
    /// `pg_tables`, `pg_indexes`, `pg_attribute` and friends.
    #[default]
    PgCatalog,
    /// `information_schema.tables`, `.columns`, `.table_constraints`.
    InformationSchema,
}

impl CatalogGeneration {
    /// Returns the kebab-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PgCatalog => "pg-catalog",
            Self::InformationSchema => "information-schema",
        }
    }
}

impl fmt::Display for CatalogGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CatalogGeneration {
    type Err = CrateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pg-catalog" | "pg_catalog" | "legacy" => Ok(Self::PgCatalog),
            "information-schema" | "information_schema" => Ok(Self::InformationSchema),
            other => Err(CrateError::UnknownCatalogGeneration(other.to_string())),
        }
    }
}

/// Settings for [`CrateDialect`](crate::dialect::CrateDialect).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialectConfig {
    /// Schema that column and index introspection looks in.
    pub schema: String,
    /// Catalog generation to query.
    pub generation: CatalogGeneration,
}

impl Default for DialectConfig {
    fn default() -> Self {
        Self {
            schema: DEFAULT_SCHEMA.to_string(),
            generation: CatalogGeneration::default(),
        }
    }
}

impl DialectConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the schema.
    #[must_use]
    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    /// Sets the catalog generation.
    #[must_use]
    pub fn generation(mut self, generation: CatalogGeneration) -> Self {
        self.generation = generation;
        self
    }
}
