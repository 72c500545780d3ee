mod common;

use orm_suites::{catalog, Capability};
use proptest::prelude::*;
use runtests::{select, Options};

const EXTENSIONS: [&str; 3] = ["orm_suites::signals", "orm_suites::gfk", "orm_suites::kv"];
const POSTGRES_MODULES: [&str; 2] = ["orm_suites::postgres", "orm_suites::migrate"];

fn options(all: bool, extra: bool) -> Options {
    Options {
        all,
        extra,
        ..Options::default()
    }
}

proptest! {
    #[test]
    fn selection_follows_flags_and_drivers(
        all in any::<bool>(),
        extra in any::<bool>(),
        has_sqlite_ext in any::<bool>(),
        has_postgres in any::<bool>(),
    ) {
        let probe = move |c: Capability| match c {
            Capability::SqliteExtension => has_sqlite_ext,
            Capability::Postgres => has_postgres,
        };

        let selection = select(&options(all, extra), catalog(), &probe);
        let names = selection.names();

        if !all && !extra {
            prop_assert_eq!(names, vec!["orm_suites::core"]);
            return Ok(());
        }

        prop_assert_eq!(names.contains(&"orm_suites::core"), all);
        for name in EXTENSIONS {
            prop_assert!(names.contains(&name), "{} missing", name);
        }
        prop_assert_eq!(names.contains(&"orm_suites::sqlite_ext"), has_sqlite_ext);
        for name in POSTGRES_MODULES {
            prop_assert_eq!(names.contains(&name), has_postgres);
        }

        let expected_notices = usize::from(!has_sqlite_ext) + usize::from(!has_postgres);
        prop_assert_eq!(selection.notices().len(), expected_notices);

        // catalog order is preserved
        let positions: Vec<usize> = names
            .iter()
            .map(|n| catalog().iter().position(|m| m.name == *n).unwrap())
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
}

#[test]
fn extra_without_postgres_driver_prints_one_postgres_notice() {
    let only_sqlite_ext = |c: Capability| c == Capability::SqliteExtension;

    let selection = select(&options(false, true), catalog(), &only_sqlite_ext);

    assert_eq!(
        selection.names(),
        vec![
            "orm_suites::signals",
            "orm_suites::gfk",
            "orm_suites::kv",
            "orm_suites::sqlite_ext",
        ]
    );
    assert_eq!(
        selection.notices(),
        vec!["Unable to load postgres driver, skipping postgres tests"]
    );
}

#[test]
fn plain_invocation_is_core_only() {
    let selection = select(&Options::default(), catalog(), &|_: Capability| true);

    assert_eq!(selection.names(), vec!["orm_suites::core"]);
    assert!(selection.notices().is_empty());
}
