//! Command-line interface layer.
//!
//! Kept apart from the analysis so catalint can be used as a library.

pub mod args;
mod commands;
mod exit_status;
pub mod report;
mod run;

pub use args::{Arguments, Command};
pub use exit_status::ExitStatus;
pub use run::run_cli;
