//! Launcher for the ORM test suites.
//!
//! Parse → configure → select → run each module in order → fold outcomes into
//! an exit status.

pub mod environment;
pub mod error;
pub mod launcher;
pub mod options;
pub mod outcome;
pub mod select;
pub mod telemetry;

pub use environment::configure;
pub use error::LaunchError;
pub use launcher::{collect, launch, launch_with, run, run_module};
pub use options::Options;
pub use outcome::{Aggregate, ModuleOutcome, RunStatus};
pub use select::{select, Selection};
