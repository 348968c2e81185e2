//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `check`: Analyze compilation dumps and report issues
//! - `fix`: Preview or apply automatic fixes
//! - `rules`: List the rule catalogue
//! - `init`: Initialize a `.catalintrc.json` configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};

use crate::{core::catalog::CatalogKind, issues::RuleId};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Check(cmd)) => cmd.common.verbose,
            Some(Command::Fix(cmd)) => cmd.common.verbose,
            Some(Command::Rules) | Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by `check` and `fix`.
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Directory scanned for *.cmodel.json dumps (overrides config file)
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Rule ids to run (default: every enabled rule), e.g. MD0005 MD0010
    #[arg(value_name = "RULE_IDS")]
    pub rule_ids: Vec<RuleId>,

    #[command(flatten)]
    pub common: CommonArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct FixCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Actually write fixed documents (default is dry-run)
    #[arg(long)]
    pub apply: bool,

    /// Catalog used for localization fixes (default: first one available)
    #[arg(long, value_enum)]
    pub catalog: Option<CatalogKind>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check compilation dumps for localization, typography and string-building issues
    Check(CheckCommand),
    /// Apply automatic fixes to the source documents of every dump
    Fix(FixCommand),
    /// List every rule with its default severity
    Rules,
    /// Initialize a new .catalintrc.json configuration file
    Init,
}
