use std::io;

use thiserror::Error;

/// Failures of the launcher itself, as opposed to test failures.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to write test output: {0}")]
    Io(#[from] io::Error),

    #[error("failed to start the async runtime: {0}")]
    Runtime(#[source] io::Error),
}
