use std::any::Any;
use std::error::Error as StdError;
use std::fmt;
use std::panic::AssertUnwindSafe;

use futures::future::LocalBoxFuture;
use futures::FutureExt;

use crate::config::TestConfig;

pub type CaseResult = Result<(), CaseError>;

/// Entry point of a single case.
pub type CaseFn = fn(TestConfig) -> LocalBoxFuture<'static, CaseResult>;

/// Why a case did not pass.
///
/// Any `std::error::Error` converts into [`CaseError::Error`], so case bodies
/// can use `?` on database and I/O results directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseError {
    /// An assertion that did not hold.
    Failure(String),
    /// Anything else that went wrong while the case ran.
    Error(String),
    /// The case chose not to run.
    Skip(String),
}

impl CaseError {
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(message.into())
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }

    pub fn skip(reason: impl Into<String>) -> Self {
        Self::Skip(reason.into())
    }

    /// A panic inside a case is a failed expectation, the same as a panic in
    /// a `#[test]`, whatever macro raised it. Errors are the `Err` values a
    /// case returns.
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "test panicked with a non-string payload".to_string());

        Self::Failure(message)
    }
}

impl fmt::Display for CaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseError::Failure(detail) => write!(f, "failure: {detail}"),
            CaseError::Error(detail) => write!(f, "error: {detail}"),
            CaseError::Skip(reason) => write!(f, "skipped: {reason}"),
        }
    }
}

impl<E> From<E> for CaseError
where
    E: StdError,
{
    fn from(err: E) -> Self {
        let mut detail = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            detail.push_str("\n  caused by: ");
            detail.push_str(&cause.to_string());
            source = cause.source();
        }
        CaseError::Error(detail)
    }
}

/// A named, runnable test case.
#[derive(Clone, Copy)]
pub struct TestCase {
    name: &'static str,
    body: CaseFn,
}

impl TestCase {
    pub fn new(name: &'static str, body: CaseFn) -> Self {
        Self { name, body }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Run the case, converting a panic into a failure.
    pub async fn run(&self, config: TestConfig) -> CaseResult {
        let future = (self.body)(config);
        match AssertUnwindSafe(future).catch_unwind().await {
            Ok(result) => result,
            Err(payload) => Err(CaseError::from_panic(payload)),
        }
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase").field("name", &self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assertion_panics_are_failures() {
        let payload: Box<dyn Any + Send> =
            Box::new(String::from("assertion `left == right` failed"));
        assert!(matches!(CaseError::from_panic(payload), CaseError::Failure(_)));
    }

    #[test]
    fn custom_assert_messages_are_failures() {
        let payload: Box<dyn Any + Send> = Box::new(String::from("math is broken"));
        assert_eq!(
            CaseError::from_panic(payload),
            CaseError::Failure("math is broken".to_string())
        );
    }

    #[test]
    fn unwrap_panics_are_failures() {
        let payload: Box<dyn Any + Send> =
            Box::new("called `Option::unwrap()` on a `None` value");
        match CaseError::from_panic(payload) {
            CaseError::Failure(detail) => assert!(detail.contains("Option::unwrap")),
            other => panic!("expected a failure, got {other:?}"),
        }
    }

    #[test]
    fn std_errors_keep_their_source_chain() {
        #[derive(Debug)]
        struct Outer(std::io::Error);

        impl fmt::Display for Outer {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "could not open fixture")
            }
        }

        impl StdError for Outer {
            fn source(&self) -> Option<&(dyn StdError + 'static)> {
                Some(&self.0)
            }
        }

        let err: CaseError = Outer(std::io::Error::other("disk on fire")).into();
        assert_eq!(
            err,
            CaseError::Error("could not open fixture\n  caused by: disk on fire".to_string())
        );
    }
}
