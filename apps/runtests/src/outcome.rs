use std::process::ExitCode;

use test_harness::TestResult;

/// Counts reported by one module's run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleOutcome {
    pub module_name: String,
    pub tests_run: usize,
    pub failure_count: usize,
    pub error_count: usize,
    pub skipped_count: usize,
}

impl ModuleOutcome {
    pub fn from_result(module_name: &str, result: &TestResult) -> Self {
        Self {
            module_name: module_name.to_string(),
            tests_run: result.tests_run,
            failure_count: result.failures.len(),
            error_count: result.errors.len(),
            skipped_count: result.skipped.len(),
        }
    }
}

/// Process status of a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum RunStatus {
    Passed = 0,
    Failed = 1,
    Errored = 2,
}

impl RunStatus {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl From<RunStatus> for ExitCode {
    fn from(status: RunStatus) -> Self {
        ExitCode::from(status.code())
    }
}

/// Outcomes of every module run so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregate {
    pub modules: Vec<ModuleOutcome>,
    pub any_failures: bool,
    pub any_errors: bool,
}

impl Aggregate {
    pub fn record(&mut self, outcome: ModuleOutcome) {
        self.any_failures |= outcome.failure_count > 0;
        self.any_errors |= outcome.error_count > 0;
        self.modules.push(outcome);
    }

    pub fn fold<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = ModuleOutcome>,
    {
        outcomes.into_iter().fold(Self::default(), |mut acc, o| {
            acc.record(o);
            acc
        })
    }

    /// Errors outrank failures.
    pub fn status(&self) -> RunStatus {
        if self.any_errors {
            RunStatus::Errored
        } else if self.any_failures {
            RunStatus::Failed
        } else {
            RunStatus::Passed
        }
    }
}
