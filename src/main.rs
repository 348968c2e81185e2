use std::{io, process::ExitCode};

use catalint::cli::{Arguments, ExitStatus};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter, e.g. `catalint=debug`.
const LOG_ENV: &str = "CATALINT_LOG";

fn main() -> ExitCode {
    let args = Arguments::parse();
    init_tracing(args.verbose());

    match catalint::cli::run_cli(args) {
        Ok(status) => status.into(),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitStatus::Error.into()
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
