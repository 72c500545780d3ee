use std::io;
use std::process::ExitCode;

use clap::Parser;
use runtests::{launch, telemetry, Options, RunStatus};

fn main() -> ExitCode {
    telemetry::init_tracing();

    // Usage errors exit here, before any environment is touched.
    let options = Options::parse();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match launch(&options, &mut out) {
        Ok(status) => status.into(),
        Err(e) => {
            eprintln!("runtests: {e}");
            RunStatus::Errored.into()
        }
    }
}
