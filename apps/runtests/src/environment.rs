use test_harness::TestConfig;
use tracing::info;

use crate::options::Options;

/// Build the run's configuration and publish it to the process environment.
///
/// Must run before any suite is built: suites may read the environment from
/// their constructors. The engine is not validated here.
pub fn configure(options: &Options) -> TestConfig {
    let config = TestConfig::new(options.engine.clone(), options.verbosity);
    config.export_env();
    info!(
        backend = %config.backend,
        verbosity = config.verbosity,
        "test configuration exported"
    );
    config
}
