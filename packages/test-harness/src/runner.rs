use std::io::{self, Write};
use std::time::Instant;

use tracing::debug;

use crate::case::CaseError;
use crate::config::TestConfig;
use crate::suite::TestSuite;

const HEAVY_RULE: &str =
    "======================================================================";
const LIGHT_RULE: &str =
    "----------------------------------------------------------------------";

/// What happened while running one suite.
///
/// Each entry of `failures`, `errors` and `skipped` is `(label, detail)`,
/// where the label reads `case (suite)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestResult {
    pub suite: String,
    pub tests_run: usize,
    pub failures: Vec<(String, String)>,
    pub errors: Vec<(String, String)>,
    pub skipped: Vec<(String, String)>,
}

impl TestResult {
    fn new(suite: &str) -> Self {
        Self {
            suite: suite.to_string(),
            ..Self::default()
        }
    }

    pub fn was_successful(&self) -> bool {
        self.failures.is_empty() && self.errors.is_empty()
    }

    fn summary_line(&self) -> String {
        let mut parts = Vec::new();
        if !self.failures.is_empty() {
            parts.push(format!("failures={}", self.failures.len()));
        }
        if !self.errors.is_empty() {
            parts.push(format!("errors={}", self.errors.len()));
        }
        if !self.skipped.is_empty() {
            parts.push(format!("skipped={}", self.skipped.len()));
        }

        let verdict = if self.was_successful() { "OK" } else { "FAILED" };
        if parts.is_empty() {
            verdict.to_string()
        } else {
            format!("{verdict} ({})", parts.join(", "))
        }
    }
}

/// Runs a suite case by case and reports progress as text.
///
/// Verbosity 0 prints only the summary, 1 prints one character per case and
/// 2 or more prints one line per case.
pub struct TextTestRunner<W> {
    out: W,
    verbosity: u32,
}

impl<W: Write> TextTestRunner<W> {
    pub fn new(out: W, verbosity: u32) -> Self {
        Self { out, verbosity }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub async fn run(
        &mut self,
        suite: &dyn TestSuite,
        config: &TestConfig,
    ) -> io::Result<TestResult> {
        let started = Instant::now();
        let mut result = TestResult::new(suite.name());

        for case in suite.cases() {
            let label = format!("{} ({})", case.name(), suite.name());
            if self.verbosity > 1 {
                write!(self.out, "{label} ... ")?;
                self.out.flush()?;
            }

            debug!(suite = suite.name(), case = case.name(), "running test case");
            let outcome = case.run(config.clone()).await;
            result.tests_run += 1;

            match outcome {
                Ok(()) => self.progress(".", "ok")?,
                Err(CaseError::Failure(detail)) => {
                    self.progress("F", "FAIL")?;
                    result.failures.push((label, detail));
                }
                Err(CaseError::Error(detail)) => {
                    self.progress("E", "ERROR")?;
                    result.errors.push((label, detail));
                }
                Err(CaseError::Skip(reason)) => {
                    self.progress("s", &format!("skipped '{reason}'"))?;
                    result.skipped.push((label, reason));
                }
            }
        }

        if self.verbosity == 1 {
            writeln!(self.out)?;
        }
        self.print_problems("ERROR", &result.errors)?;
        self.print_problems("FAIL", &result.failures)?;

        let elapsed = started.elapsed().as_secs_f64();
        let plural = if result.tests_run == 1 { "" } else { "s" };
        writeln!(self.out, "{LIGHT_RULE}")?;
        writeln!(
            self.out,
            "Ran {} test{plural} in {elapsed:.3}s",
            result.tests_run
        )?;
        writeln!(self.out)?;
        writeln!(self.out, "{}", result.summary_line())?;
        self.out.flush()?;

        Ok(result)
    }

    fn progress(&mut self, short: &str, long: &str) -> io::Result<()> {
        match self.verbosity {
            0 => Ok(()),
            1 => {
                write!(self.out, "{short}")?;
                self.out.flush()
            }
            _ => writeln!(self.out, "{long}"),
        }
    }

    fn print_problems(&mut self, flavour: &str, problems: &[(String, String)]) -> io::Result<()> {
        for (label, detail) in problems {
            writeln!(self.out, "{HEAVY_RULE}")?;
            writeln!(self.out, "{flavour}: {label}")?;
            writeln!(self.out, "{LIGHT_RULE}")?;
            writeln!(self.out, "{detail}")?;
            writeln!(self.out)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::{CaseResult, TestCase};
    use crate::{cases, check, check_eq, skip};

    async fn passes(_config: TestConfig) -> CaseResult {
        Ok(())
    }

    async fn sees_its_config(config: TestConfig) -> CaseResult {
        check_eq!(config.backend, "sqlite");
        check!(config.verbosity <= 2, "unexpected verbosity {}", config.verbosity);
        Ok(())
    }

    async fn fails(_config: TestConfig) -> CaseResult {
        check_eq!(1 + 1, 3);
        Ok(())
    }

    async fn errors(_config: TestConfig) -> CaseResult {
        let _parsed: u8 = "not a number".parse()?;
        Ok(())
    }

    async fn assert_panics(config: TestConfig) -> CaseResult {
        assert_eq!(config.verbosity, 99);
        Ok(())
    }

    async fn custom_assert(_config: TestConfig) -> CaseResult {
        assert!(1 + 1 == 3, "math is broken");
        Ok(())
    }

    async fn unwrap_panics(_config: TestConfig) -> CaseResult {
        let missing: Option<u8> = None;
        let _value = missing.unwrap();
        Ok(())
    }

    async fn skips(_config: TestConfig) -> CaseResult {
        skip!("needs a {} server", "postgres");
    }

    struct Stub(Vec<TestCase>);

    impl TestSuite for Stub {
        fn name(&self) -> &str {
            "stub"
        }

        fn cases(&self) -> Vec<TestCase> {
            self.0.clone()
        }
    }

    async fn run(suite: &Stub, verbosity: u32) -> (TestResult, String) {
        let mut runner = TextTestRunner::new(Vec::new(), verbosity);
        let result = runner
            .run(suite, &TestConfig::new("sqlite", verbosity))
            .await
            .expect("writing to a Vec cannot fail");
        let output = String::from_utf8(runner.into_inner()).expect("utf-8 output");
        (result, output)
    }

    #[tokio::test]
    async fn passing_suite_reports_ok() {
        let suite = Stub(cases![passes, sees_its_config]);
        let (result, output) = run(&suite, 1).await;

        assert!(result.was_successful());
        assert_eq!(result.tests_run, 2);
        assert!(output.starts_with("..\n"), "{output}");
        assert!(output.contains("Ran 2 tests in "));
        assert!(output.trim_end().ends_with("OK"));
    }

    #[tokio::test]
    async fn outcomes_are_classified() {
        let suite = Stub(cases![passes, fails, errors, assert_panics, unwrap_panics, skips]);
        let (result, output) = run(&suite, 1).await;

        assert_eq!(result.tests_run, 6);
        let failed: Vec<_> = result.failures.iter().map(|(l, _)| l.as_str()).collect();
        let errored: Vec<_> = result.errors.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(
            failed,
            vec!["fails (stub)", "assert_panics (stub)", "unwrap_panics (stub)"]
        );
        assert_eq!(errored, vec!["errors (stub)"]);
        assert_eq!(result.skipped, vec![("skips (stub)".to_string(), "needs a postgres server".to_string())]);

        assert!(output.starts_with(".FEFFs\n"), "{output}");
        assert!(output.contains("ERROR: errors (stub)"));
        assert!(output.contains("FAIL: fails (stub)"));
        assert!(output.contains("left: 2"));
        assert!(output.trim_end().ends_with("FAILED (failures=3, errors=1, skipped=1)"));
    }

    #[tokio::test]
    async fn assert_with_a_custom_message_is_a_failure() {
        let suite = Stub(cases![custom_assert]);
        let (result, output) = run(&suite, 1).await;

        assert!(result.errors.is_empty(), "{output}");
        assert_eq!(
            result.failures,
            vec![("custom_assert (stub)".to_string(), "math is broken".to_string())]
        );
        assert!(output.trim_end().ends_with("FAILED (failures=1)"));
    }

    #[tokio::test]
    async fn errors_are_listed_before_failures() {
        let suite = Stub(cases![fails, errors]);
        let (_, output) = run(&suite, 0).await;

        let error_at = output.find("ERROR: errors (stub)").expect("error block");
        let fail_at = output.find("FAIL: fails (stub)").expect("failure block");
        assert!(error_at < fail_at);
    }

    #[tokio::test]
    async fn verbose_output_names_each_case() {
        let suite = Stub(cases![passes, fails, skips]);
        let (_, output) = run(&suite, 2).await;

        assert!(output.contains("passes (stub) ... ok\n"));
        assert!(output.contains("fails (stub) ... FAIL\n"));
        assert!(output.contains("skips (stub) ... skipped 'needs a postgres server'\n"));
        assert!(output.contains("Ran 3 tests in "));
    }

    #[tokio::test]
    async fn quiet_output_has_only_the_summary() {
        let suite = Stub(cases![passes]);
        let (_, output) = run(&suite, 0).await;

        assert!(output.starts_with(LIGHT_RULE), "{output}");
        assert!(output.contains("Ran 1 test in "));
    }

    #[tokio::test]
    async fn skips_do_not_fail_the_suite() {
        let suite = Stub(cases![passes, skips]);
        let (result, output) = run(&suite, 1).await;

        assert!(result.was_successful());
        assert!(output.trim_end().ends_with("OK (skipped=1)"));
    }

    #[tokio::test]
    async fn empty_suite_runs_nothing() {
        let (result, output) = run(&Stub(Vec::new()), 1).await;

        assert_eq!(result.tests_run, 0);
        assert!(output.contains("Ran 0 tests in "));
        assert!(output.trim_end().ends_with("OK"));
    }
}
