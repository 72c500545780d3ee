//! The ORM test modules and the table describing when each one runs.
//!
//! Every suite talks to the database through `sea-orm` (or, for the SQLite
//! extension suite, `rusqlite`) and takes its backend from the
//! [`test_harness::TestConfig`] it is handed.

pub mod capability;
pub mod catalog;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod suites;

pub use capability::{Capability, CapabilityProbe, CompiledDrivers};
pub use catalog::{catalog, ModuleKind, SuiteModule};
pub use config::db::DbKind;
pub use error::SuiteError;

#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_support::logging::init();
}
