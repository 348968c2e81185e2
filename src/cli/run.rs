use std::io;

use anyhow::Result;

use super::{
    args::{Arguments, Command, OutputFormat},
    commands::{check::check, fix::fix, init::init, rules::rules},
    exit_status::ExitStatus,
    report,
};

/// Main entry point for the catalint CLI.
///
/// Dispatches to the command handler and prints its result.
///
/// # Returns
/// - `Ok(ExitStatus)`: `Failure` when error-severity issues were found or a
///   dry-run `fix` has work pending, `Error` when a dump could not be loaded
/// - `Err` if the command fails (e.g. invalid config)
pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    let verbose = args.verbose();

    let Some(Arguments {
        command: Some(command),
    }) = args.with_command_or_help()
    else {
        return Ok(ExitStatus::Success);
    };

    match command {
        Command::Check(cmd) => {
            let result = check(&cmd)?;
            match cmd.format {
                OutputFormat::Text => report::print(&result, verbose),
                OutputFormat::Json => {
                    report::print_json_to(&result, &mut io::stdout().lock())?;
                    report::print_load_warning_to(
                        result.load_error_count,
                        verbose,
                        &mut io::stderr().lock(),
                    );
                }
            }
            Ok(result.exit_status())
        }
        Command::Fix(cmd) => {
            let result = fix(&cmd)?;
            report::print(&result, verbose);
            Ok(result.exit_status())
        }
        Command::Rules => rules(),
        Command::Init => init(),
    }
}
