//! Unique names for scratch database objects.
//!
//! Suites that run against a shared server (PostgreSQL, MySQL) cannot rely
//! on a fresh database per case, so every scratch table they create
//! carries a ULID suffix.

use ulid::Ulid;

/// A unique, lowercase SQL identifier in the format `{prefix}_{ulid}`.
///
/// The result only contains ASCII letters, digits and underscores, so it can
/// be spliced into DDL without quoting as long as `prefix` is itself a plain
/// identifier.
///
/// # Examples
/// ```
/// use test_support::unique_ident;
///
/// let table = unique_ident("scratch");
/// assert!(table.starts_with("scratch_"));
/// assert!(table.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));
/// ```
pub fn unique_ident(prefix: &str) -> String {
    format!("{prefix}_{}", Ulid::new().to_string().to_ascii_lowercase())
}
