//! Test collection and text reporting for the ORM suites.
//!
//! A suite is a named list of async test cases. Each case receives the
//! [`TestConfig`] of the run explicitly, so the backend and verbosity reach the
//! code under test without going through process-wide state.

pub mod case;
pub mod config;
pub mod runner;
pub mod suite;

pub use case::{CaseError, CaseFn, CaseResult, TestCase};
pub use config::TestConfig;
pub use runner::{TestResult, TextTestRunner};
pub use suite::TestSuite;

#[doc(hidden)]
pub use futures::FutureExt as __FutureExt;

/// Fail the current case unless the condition holds.
#[macro_export]
macro_rules! check {
    ($cond:expr $(,)?) => {
        if !$cond {
            return Err($crate::CaseError::failure(concat!(
                "check failed: ",
                stringify!($cond)
            )));
        }
    };
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return Err($crate::CaseError::failure(format!($($arg)+)));
        }
    };
}

/// Fail the current case unless both sides compare equal.
#[macro_export]
macro_rules! check_eq {
    ($left:expr, $right:expr $(,)?) => {
        match (&$left, &$right) {
            (left, right) => {
                if !(*left == *right) {
                    return Err($crate::CaseError::failure(format!(
                        "check_eq failed: `{} == {}`\n  left: {:?}\n right: {:?}",
                        stringify!($left),
                        stringify!($right),
                        left,
                        right
                    )));
                }
            }
        }
    };
}

/// Skip the current case with a reason.
#[macro_export]
macro_rules! skip {
    ($($arg:tt)+) => {
        return Err($crate::CaseError::skip(format!($($arg)+)))
    };
}

/// Build a `Vec<TestCase>` from `async fn name(TestConfig) -> CaseResult` items.
#[macro_export]
macro_rules! cases {
    ($($case:ident),* $(,)?) => {
        vec![$(
            $crate::TestCase::new(stringify!($case), |config| {
                $crate::__FutureExt::boxed_local($case(config))
            })
        ),*]
    };
}

#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_support::logging::init();
}
