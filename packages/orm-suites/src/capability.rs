//! Optional driver probes.
//!
//! A module that needs an optional driver names a [`Capability`]; the
//! launcher asks a [`CapabilityProbe`] whether it is present before the
//! module is ever built.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// The alternate SQLite driver (`rusqlite`) with functions and collations.
    SqliteExtension,
    /// The PostgreSQL driver.
    Postgres,
}

impl Capability {
    /// Name of the driver behind the capability.
    pub fn driver(self) -> &'static str {
        match self {
            Capability::SqliteExtension => "rusqlite",
            Capability::Postgres => "postgres",
        }
    }

    /// The cargo feature that compiles the driver in.
    pub fn feature(self) -> &'static str {
        match self {
            Capability::SqliteExtension => "sqlite-ext",
            Capability::Postgres => "postgres",
        }
    }

    /// Human-readable note printed when the capability is missing.
    pub fn skip_notice(self) -> String {
        let skipped = match self {
            Capability::SqliteExtension => "sqlite_ext",
            Capability::Postgres => "postgres",
        };
        format!(
            "Unable to load {} driver, skipping {skipped} tests",
            self.driver()
        )
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.driver())
    }
}

pub trait CapabilityProbe {
    fn is_available(&self, capability: Capability) -> bool;
}

/// Reports the drivers compiled into this build.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompiledDrivers;

impl CapabilityProbe for CompiledDrivers {
    fn is_available(&self, capability: Capability) -> bool {
        match capability {
            Capability::SqliteExtension => cfg!(feature = "sqlite-ext"),
            Capability::Postgres => cfg!(feature = "postgres"),
        }
    }
}

impl<F> CapabilityProbe for F
where
    F: Fn(Capability) -> bool,
{
    fn is_available(&self, capability: Capability) -> bool {
        self(capability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiled_drivers_follow_features() {
        let probe = CompiledDrivers;
        assert_eq!(
            probe.is_available(Capability::SqliteExtension),
            cfg!(feature = "sqlite-ext")
        );
        assert_eq!(
            probe.is_available(Capability::Postgres),
            cfg!(feature = "postgres")
        );
    }

    #[test]
    fn closures_report_capabilities() {
        let only_postgres = |c: Capability| c == Capability::Postgres;
        assert!(only_postgres.is_available(Capability::Postgres));
        assert!(!only_postgres.is_available(Capability::SqliteExtension));
    }

    #[test]
    fn notices_name_the_driver() {
        assert_eq!(
            Capability::Postgres.skip_notice(),
            "Unable to load postgres driver, skipping postgres tests"
        );
        assert_eq!(
            Capability::SqliteExtension.skip_notice(),
            "Unable to load rusqlite driver, skipping sqlite_ext tests"
        );
    }

    #[test]
    fn features_match_the_drivers_compiled_in() {
        for capability in [Capability::SqliteExtension, Capability::Postgres] {
            let compiled = match capability.feature() {
                "sqlite-ext" => cfg!(feature = "sqlite-ext"),
                "postgres" => cfg!(feature = "postgres"),
                other => panic!("unknown feature {other}"),
            };
            assert_eq!(CompiledDrivers.is_available(capability), compiled);
        }
    }
}
