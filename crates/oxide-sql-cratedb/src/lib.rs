//! # oxide-sql-cratedb
//!
//! CrateDB dialect for the oxide-sql schema layer.
//!
//! The crate translates the framework's column/index/table model into
//! CrateDB's SQL and reads it back from CrateDB's system catalogs:
//!
//! - **Type mapping**: abstract [`SqlType`]s become CrateDB type strings
//!   (`VARCHAR` is `string`, auto-increment integers are `LONG`, blobs are
//!   `BYTEA`, ...).
//! - **Identifiers**: double-quote quoting, with dotted names quoted part by
//!   part, and the CrateDB reserved-word table.
//! - **Capabilities**: multi-row inserts, no storage engines or character
//!   sets, no inline index declarations.
//! - **Introspection**: tables, columns and indexes from either the
//!   Postgres-compatible `pg_*` catalogs or `information_schema`
//!   ([`CatalogGeneration`]).
//!
//! CrateDB speaks the PostgreSQL wire protocol, so live introspection goes
//! through `sqlx`'s Postgres driver.
//!
//! ## Example
//!
//! ```rust
//! use oxide_sql_cratedb::prelude::*;
//!
//! let dialect = CrateDialect::new();
//!
//! let id = Column::new("id", SqlType::BigInt).primary_key().auto_increment();
//! assert_eq!(dialect.sql_type(&id), "LONG");
//!
//! let name = Column::new("name", SqlType::Varchar).length(255);
//! assert_eq!(dialect.sql_type(&name), "string");
//!
//! assert_eq!(dialect.quote("doc.users"), "\"doc\".\"users\"");
//! assert!(dialect.is_reserved("select"));
//!
//! let (sql, args) = dialect.table_check_sql("users");
//! assert_eq!(
//!     apply_filters(&dialect, &sql, None),
//!     "SELECT tablename FROM pg_tables WHERE tablename = $1"
//! );
//! assert_eq!(args, vec!["users"]);
//! ```

pub mod config;
pub mod dialect;
pub mod error;
pub mod filter;
pub mod introspect;
pub mod reserved;
pub mod schema;
pub mod uri;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::{CatalogGeneration, DialectConfig};
    pub use crate::dialect::{CrateDialect, Dialect, apply_filters};
    pub use crate::error::{CrateError, Result};
    pub use crate::filter::{Filter, IdFilter, QuoteFilter, SeqFilter};
    pub use crate::introspect::CrateIntrospector;
    pub use crate::schema::{Column, Index, IndexType, SqlType, Table};
    pub use crate::uri::{CrateDriver, DbType, Uri};
}
