//! Test subscriber shared by the suite and launcher test binaries.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Variables consulted for a filter, first non-blank one wins.
pub const FILTER_VARS: [&str; 2] = ["TEST_LOG", "RUST_LOG"];

const DEFAULT_DIRECTIVE: &str = "warn";

/// Driver targets that log every statement at `info`/`debug`. They stay at
/// `warn` unless the chosen directive names them.
const CHATTY_TARGETS: [&str; 2] = ["sqlx", "sea_orm"];

/// Build the filter directive from `lookup` (normally `std::env::var`).
pub fn filter_directive(lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut directive = FILTER_VARS
        .into_iter()
        .filter_map(|var| lookup(var))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_DIRECTIVE.to_string());

    for target in CHATTY_TARGETS {
        let named = directive
            .split(',')
            .any(|part| part.trim().starts_with(target));
        if !named {
            directive.push_str(&format!(",{target}=warn"));
        }
    }
    directive
}

/// Install the test subscriber once per binary; later calls do nothing.
///
/// Output goes through `with_test_writer()` so the harness captures it with
/// the rest of a case's output. A directive that fails to parse falls back
/// to `warn`.
pub fn init() {
    INITIALIZED.get_or_init(|| {
        let directive = filter_directive(|var| std::env::var(var).ok());
        let filter = EnvFilter::try_new(&directive)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .with_target(false)
            .try_init()
            .ok();
    });
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_to_warn_with_quiet_drivers() {
        assert_eq!(filter_directive(env(&[])), "warn,sqlx=warn,sea_orm=warn");
    }

    #[test]
    fn test_log_beats_rust_log() {
        let directive = filter_directive(env(&[("TEST_LOG", "debug"), ("RUST_LOG", "trace")]));
        assert_eq!(directive, "debug,sqlx=warn,sea_orm=warn");
    }

    #[test]
    fn blank_test_log_falls_through() {
        let directive = filter_directive(env(&[("TEST_LOG", "  "), ("RUST_LOG", "info")]));
        assert_eq!(directive, "info,sqlx=warn,sea_orm=warn");
    }

    #[test]
    fn naming_a_driver_keeps_its_level() {
        let directive = filter_directive(env(&[("TEST_LOG", "warn, sqlx=debug")]));
        assert_eq!(directive, "warn, sqlx=debug,sea_orm=warn");
    }

    #[test]
    fn built_directives_parse() {
        for value in ["", "debug", "orm_suites=trace,sea_orm=info"] {
            let directive = filter_directive(env(&[("TEST_LOG", value)]));
            assert!(EnvFilter::try_new(&directive).is_ok(), "{directive}");
        }
    }

    #[test]
    fn init_is_idempotent() {
        init();
        init();
        assert!(INITIALIZED.get().is_some());
    }
}
