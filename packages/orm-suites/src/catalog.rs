//! The declarative table of test modules.
//!
//! Order matters: it is the order modules run in.

use test_harness::TestSuite;

use crate::capability::Capability;
use crate::suites::{core_suite, gfk, kv, migrate, postgres, signals, sqlite_ext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKind {
    /// The baseline suite.
    Core,
    /// Add-on feature and backend suites.
    Extra,
}

/// One row of the catalog.
#[derive(Clone, Copy)]
pub struct SuiteModule {
    pub name: &'static str,
    pub kind: ModuleKind,
    /// Driver the module cannot run without, if any.
    pub requires: Option<Capability>,
    constructor: fn() -> Box<dyn TestSuite>,
}

impl SuiteModule {
    pub const fn new(
        name: &'static str,
        kind: ModuleKind,
        requires: Option<Capability>,
        constructor: fn() -> Box<dyn TestSuite>,
    ) -> Self {
        Self {
            name,
            kind,
            requires,
            constructor,
        }
    }

    pub fn is_core(&self) -> bool {
        self.kind == ModuleKind::Core
    }

    /// Instantiate the suite. Suites may read process state here.
    pub fn build(&self) -> Box<dyn TestSuite> {
        (self.constructor)()
    }
}

impl std::fmt::Debug for SuiteModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuiteModule")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("requires", &self.requires)
            .finish()
    }
}

static CATALOG: [SuiteModule; 7] = [
    SuiteModule::new(
        core_suite::NAME,
        ModuleKind::Core,
        None,
        core_suite::suite,
    ),
    SuiteModule::new(signals::NAME, ModuleKind::Extra, None, signals::suite),
    SuiteModule::new(gfk::NAME, ModuleKind::Extra, None, gfk::suite),
    SuiteModule::new(kv::NAME, ModuleKind::Extra, None, kv::suite),
    SuiteModule::new(
        sqlite_ext::NAME,
        ModuleKind::Extra,
        Some(Capability::SqliteExtension),
        sqlite_ext::suite,
    ),
    SuiteModule::new(
        postgres::NAME,
        ModuleKind::Extra,
        Some(Capability::Postgres),
        postgres::suite,
    ),
    SuiteModule::new(
        migrate::NAME,
        ModuleKind::Extra,
        Some(Capability::Postgres),
        migrate::suite,
    ),
];

pub fn catalog() -> &'static [SuiteModule] {
    &CATALOG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_comes_first_and_only_once() {
        let table = catalog();
        assert!(table[0].is_core());
        assert_eq!(table.iter().filter(|m| m.is_core()).count(), 1);
    }

    #[test]
    fn module_order_is_fixed() {
        let names: Vec<_> = catalog().iter().map(|m| m.name).collect();
        assert_eq!(
            names,
            vec![
                "orm_suites::core",
                "orm_suites::signals",
                "orm_suites::gfk",
                "orm_suites::kv",
                "orm_suites::sqlite_ext",
                "orm_suites::postgres",
                "orm_suites::migrate",
            ]
        );
    }

    #[test]
    fn built_suites_carry_the_module_name() {
        for module in catalog() {
            assert_eq!(module.build().name(), module.name);
        }
    }
}
