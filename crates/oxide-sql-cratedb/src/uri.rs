//! Data source name parsing.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Result;

/// Database backend identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DbType {
    /// CrateDB.
    Crate,
}

impl DbType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Crate => "crate",
        }
    }
}

/// Connection details extracted from a data source name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Uri {
    pub db_type: DbType,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
}

impl Uri {
    /// An empty URI for `db_type`.
    #[must_use]
    pub const fn new(db_type: DbType) -> Self {
        Self {
            db_type,
            host: None,
            port: None,
            user: None,
        }
    }
}

/// Parses CrateDB data source names.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrateDriver;

impl CrateDriver {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Parses `dsn` into a [`Uri`].
    ///
    /// Only HTTP endpoints (`http://host:4200`) carry connection details;
    /// any other DSN yields a URI with just the database type set.
    pub fn parse(&self, _driver_name: &str, dsn: &str) -> Result<Uri> {
        let mut uri = Uri::new(DbType::Crate);

        if dsn.starts_with("http://") || dsn.starts_with("https://") {
            let url = Url::parse(dsn)?;
            uri.host = url.host_str().map(str::to_string);
            uri.port = url.port();
            if !url.username().is_empty() {
                uri.user = Some(url.username().to_string());
            }
        }

        Ok(uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CrateError;

    #[test]
    fn test_parse_http_dsn() {
        let uri = CrateDriver::new()
            .parse("crate", "http://crate@localhost:4200")
            .unwrap();
        assert_eq!(uri.db_type, DbType::Crate);
        assert_eq!(uri.host.as_deref(), Some("localhost"));
        assert_eq!(uri.port, Some(4200));
        assert_eq!(uri.user.as_deref(), Some("crate"));
    }

    #[test]
    fn test_parse_http_dsn_without_port() {
        let uri = CrateDriver::new()
            .parse("crate", "http://db.example.com")
            .unwrap();
        assert_eq!(uri.host.as_deref(), Some("db.example.com"));
        assert_eq!(uri.port, None);
        assert_eq!(uri.user, None);
    }

    #[test]
    fn test_parse_other_dsn_keeps_only_db_type() {
        let uri = CrateDriver::new()
            .parse("crate", "postgres://crate@localhost:5432/doc")
            .unwrap();
        assert_eq!(uri, Uri::new(DbType::Crate));
    }

    #[test]
    fn test_parse_malformed_http_dsn() {
        let result = CrateDriver::new().parse("crate", "http://[::1");
        assert!(matches!(result, Err(CrateError::InvalidDsn(_))));
    }
}
