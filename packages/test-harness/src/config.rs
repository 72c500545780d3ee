use std::env;

/// Environment variable carrying the backend identifier.
pub const BACKEND_VAR: &str = "ORM_TEST_BACKEND";
/// Environment variable carrying the verbosity, as a decimal string.
pub const VERBOSITY_VAR: &str = "ORM_TEST_VERBOSITY";

pub const DEFAULT_BACKEND: &str = "sqlite";
pub const DEFAULT_VERBOSITY: u32 = 1;

/// Configuration handed to every suite entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestConfig {
    /// Backend identifier, e.g. `sqlite` or `postgres`. Not validated here.
    pub backend: String,
    pub verbosity: u32,
}

impl TestConfig {
    pub fn new(backend: impl Into<String>, verbosity: u32) -> Self {
        Self {
            backend: backend.into(),
            verbosity,
        }
    }

    /// Read the configuration published by [`TestConfig::export_env`].
    ///
    /// Missing variables fall back to the defaults; an unparsable verbosity
    /// falls back to [`DEFAULT_VERBOSITY`].
    pub fn from_env() -> Self {
        let backend = env::var(BACKEND_VAR).unwrap_or_else(|_| DEFAULT_BACKEND.to_string());
        let verbosity = env::var(VERBOSITY_VAR)
            .ok()
            .and_then(|v| v.trim().parse::<u32>().ok())
            .unwrap_or(DEFAULT_VERBOSITY);
        Self { backend, verbosity }
    }

    /// Publish the configuration to the process environment.
    ///
    /// Must run before any suite is built and while the process is still
    /// single-threaded.
    pub fn export_env(&self) {
        env::set_var(BACKEND_VAR, &self.backend);
        env::set_var(VERBOSITY_VAR, self.verbosity.to_string());
    }
}

impl Default for TestConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BACKEND, DEFAULT_VERBOSITY)
    }
}
