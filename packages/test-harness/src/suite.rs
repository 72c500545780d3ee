use crate::case::TestCase;

/// A named collection of test cases, run in the order returned by `cases`.
pub trait TestSuite {
    fn name(&self) -> &str;

    fn cases(&self) -> Vec<TestCase>;
}
