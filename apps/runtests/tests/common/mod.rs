#![allow(dead_code)]

// tests/common/mod.rs
use std::sync::Mutex;

use orm_suites::{Capability, ModuleKind, SuiteModule};
use test_harness::{cases, check_eq, CaseResult, TestCase, TestConfig, TestSuite};

// Logging is auto-installed for every test binary
#[ctor::ctor]
fn init_logging() {
    test_support::logging::init();
}

/// A suite made of a fixed name and case list.
pub struct StubSuite {
    name: &'static str,
    cases: fn() -> Vec<TestCase>,
}

impl TestSuite for StubSuite {
    fn name(&self) -> &str {
        self.name
    }

    fn cases(&self) -> Vec<TestCase> {
        (self.cases)()
    }
}

async fn passes(_config: TestConfig) -> CaseResult {
    Ok(())
}

async fn also_passes(_config: TestConfig) -> CaseResult {
    Ok(())
}

async fn fails(_config: TestConfig) -> CaseResult {
    check_eq!("sqlite", "postgres");
    Ok(())
}

async fn asserts_with_a_message(config: TestConfig) -> CaseResult {
    assert!(
        config.verbosity > 200,
        "verbosity {} is too low",
        config.verbosity
    );
    Ok(())
}

async fn errors(_config: TestConfig) -> CaseResult {
    let _port: u16 = "five thousand".parse()?;
    Ok(())
}

pub fn passing() -> Box<dyn TestSuite> {
    Box::new(StubSuite {
        name: "stub::passing",
        cases: || cases![passes, also_passes],
    })
}

pub fn failing() -> Box<dyn TestSuite> {
    Box::new(StubSuite {
        name: "stub::failing",
        cases: || cases![passes, fails],
    })
}

pub fn asserting() -> Box<dyn TestSuite> {
    Box::new(StubSuite {
        name: "stub::asserting",
        cases: || cases![passes, asserts_with_a_message],
    })
}

pub fn erroring() -> Box<dyn TestSuite> {
    Box::new(StubSuite {
        name: "stub::erroring",
        cases: || cases![errors],
    })
}

pub fn never_built() -> Box<dyn TestSuite> {
    panic!("a module whose driver is missing was built");
}

/// Environment seen by [`capturing`] at construction time.
pub static CAPTURED: Mutex<Option<TestConfig>> = Mutex::new(None);

async fn matches_captured_env(config: TestConfig) -> CaseResult {
    let captured = CAPTURED.lock().unwrap().clone();
    check_eq!(captured, Some(config));
    Ok(())
}

/// Records the exported configuration when built, like a module reading
/// the environment at import time.
pub fn capturing() -> Box<dyn TestSuite> {
    *CAPTURED.lock().unwrap() = Some(TestConfig::from_env());
    Box::new(StubSuite {
        name: "stub::capturing",
        cases: || cases![matches_captured_env],
    })
}

pub const fn core(constructor: fn() -> Box<dyn TestSuite>) -> SuiteModule {
    SuiteModule::new("stub::core", ModuleKind::Core, None, constructor)
}

pub const fn extra(name: &'static str, constructor: fn() -> Box<dyn TestSuite>) -> SuiteModule {
    SuiteModule::new(name, ModuleKind::Extra, None, constructor)
}

pub const fn needs(
    name: &'static str,
    capability: Capability,
    constructor: fn() -> Box<dyn TestSuite>,
) -> SuiteModule {
    SuiteModule::new(name, ModuleKind::Extra, Some(capability), constructor)
}

pub fn output(buf: Vec<u8>) -> String {
    String::from_utf8(buf).expect("runner output is utf-8")
}
