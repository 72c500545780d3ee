use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SuiteError {
    #[error("Unknown database backend '{backend}', expected one of [sqlite, postgres, mysql]")]
    UnknownBackend { backend: String },
    #[error("Configuration error: {message}")]
    Config { message: String },
    #[error("Database error: {0}")]
    Db(#[from] DbErr),
}

impl SuiteError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
