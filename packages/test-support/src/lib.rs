//! Shared helpers for the suites and their tests.
//!
//! - [`logging`] installs one tracing subscriber per test binary.
//! - [`unique`] hands out collision-free names for scratch tables.

pub mod logging;
pub mod unique;

pub use unique::unique_ident;
