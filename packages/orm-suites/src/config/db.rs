use std::env;

use crate::error::SuiteError;

/// Overrides the URL built from the individual variables, as long as its
/// scheme matches the backend being connected to.
pub const DATABASE_URL_VAR: &str = "ORM_TEST_DATABASE_URL";

/// Database engines the suites know how to reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbKind {
    Sqlite,
    Postgres,
    Mysql,
}

impl DbKind {
    /// Map a backend identifier to an engine.
    ///
    /// This is the first place an unknown identifier is noticed; the launcher
    /// passes the value through unchecked.
    pub fn parse(backend: &str) -> Result<Self, SuiteError> {
        match backend.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "mysql" => Ok(Self::Mysql),
            _ => Err(SuiteError::UnknownBackend {
                backend: backend.to_string(),
            }),
        }
    }

    fn accepts_url(self, url: &str) -> bool {
        match self {
            DbKind::Sqlite => url.starts_with("sqlite:"),
            DbKind::Postgres => url.starts_with("postgres://") || url.starts_with("postgresql://"),
            DbKind::Mysql => url.starts_with("mysql://"),
        }
    }
}

/// Builds a connection URL for the given engine from environment variables.
pub fn db_url(kind: DbKind) -> Result<String, SuiteError> {
    if let Ok(url) = env::var(DATABASE_URL_VAR) {
        if kind.accepts_url(&url) {
            return Ok(url);
        }
    }

    match kind {
        DbKind::Sqlite => Ok("sqlite::memory:".to_string()),
        DbKind::Postgres => {
            let host = var_or("POSTGRES_HOST", "localhost");
            let port = var_or("POSTGRES_PORT", "5432");
            let username = var_or("POSTGRES_USER", "postgres");
            let password = var_or("POSTGRES_PASSWORD", "postgres");
            let db_name = test_db_name()?;
            Ok(format!(
                "postgresql://{username}:{password}@{host}:{port}/{db_name}"
            ))
        }
        DbKind::Mysql => {
            let host = var_or("MYSQL_HOST", "localhost");
            let port = var_or("MYSQL_PORT", "3306");
            let username = var_or("MYSQL_USER", "root");
            let password = var_or("MYSQL_PASSWORD", "");
            let db_name = test_db_name()?;
            Ok(format!("mysql://{username}:{password}@{host}:{port}/{db_name}"))
        }
    }
}

/// Name of the server-side test database (defaults to `orm_test`).
///
/// The suites drop and recreate tables freely, so the name must end with
/// `_test`.
fn test_db_name() -> Result<String, SuiteError> {
    let db_name = var_or("TEST_DB", "orm_test");
    if !db_name.ends_with("_test") {
        return Err(SuiteError::config(format!(
            "Test database name must end with '_test', but got: '{db_name}'"
        )));
    }
    Ok(db_name)
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Mask the password of a connection URL for logging.
pub fn sanitize_db_url(url: &str) -> String {
    let Some((auth, host)) = url.rsplit_once('@') else {
        return url.to_string();
    };
    match auth.rfind(':') {
        Some(colon) if auth[..colon].contains("://") => {
            format!("{}:***@{host}", &auth[..colon])
        }
        _ => url.to_string(),
    }
}
