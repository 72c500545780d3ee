use std::io::Write;

use orm_suites::{catalog, CapabilityProbe, CompiledDrivers, SuiteModule};
use test_harness::{TestConfig, TextTestRunner};
use tracing::info;

use crate::environment::configure;
use crate::error::LaunchError;
use crate::options::Options;
use crate::outcome::{Aggregate, ModuleOutcome, RunStatus};
use crate::select::select;

/// Run one module: banner, then every case through the text runner.
pub async fn run_module(
    module: &SuiteModule,
    config: &TestConfig,
    out: &mut dyn Write,
) -> Result<ModuleOutcome, LaunchError> {
    writeln!(out, "\nRunning tests for \"{}\"", module.name)?;
    out.flush()?;

    let suite = module.build();
    let mut runner = TextTestRunner::new(&mut *out, config.verbosity);
    let result = runner.run(suite.as_ref(), config).await?;

    let outcome = ModuleOutcome::from_result(module.name, &result);
    info!(
        module = %outcome.module_name,
        run = outcome.tests_run,
        failures = outcome.failure_count,
        errors = outcome.error_count,
        skipped = outcome.skipped_count,
        "module finished"
    );
    Ok(outcome)
}

/// Select modules for `options` and run them one after another.
///
/// Skipped-driver notices are printed before the first module. A failing
/// module never stops the ones after it.
pub fn run(
    options: &Options,
    config: &TestConfig,
    catalog: &[SuiteModule],
    probe: &dyn CapabilityProbe,
    out: &mut dyn Write,
) -> Result<Vec<ModuleOutcome>, LaunchError> {
    let selection = select(options, catalog, probe);
    for notice in selection.notices() {
        writeln!(out, "{notice}")?;
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(LaunchError::Runtime)?;

    runtime.block_on(async {
        let mut outcomes = Vec::with_capacity(selection.modules.len());
        for module in &selection.modules {
            outcomes.push(run_module(module, config, out).await?);
        }
        Ok::<_, LaunchError>(outcomes)
    })
}

/// Configure the environment, run the selected modules and fold the result.
pub fn launch_with(
    options: &Options,
    catalog: &[SuiteModule],
    probe: &dyn CapabilityProbe,
    out: &mut dyn Write,
) -> Result<RunStatus, LaunchError> {
    let config = configure(options);
    let outcomes = run(options, &config, catalog, probe, out)?;
    let status = Aggregate::fold(outcomes).status();
    info!(?status, "run finished");
    Ok(status)
}

/// Run with the built-in catalog and the drivers compiled into this binary.
pub fn launch(options: &Options, out: &mut dyn Write) -> Result<RunStatus, LaunchError> {
    launch_with(options, catalog(), &CompiledDrivers, out)
}

/// Run the core module alone at verbosity 1, with the backend taken from the
/// environment.
pub fn collect(out: &mut dyn Write) -> Result<RunStatus, LaunchError> {
    let config = TestConfig {
        verbosity: 1,
        ..TestConfig::from_env()
    };
    let options = Options {
        engine: config.backend.clone(),
        verbosity: config.verbosity,
        ..Options::default()
    };
    let outcomes = run(&options, &config, catalog(), &CompiledDrivers, out)?;
    Ok(Aggregate::fold(outcomes).status())
}
