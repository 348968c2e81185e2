use std::{
    io::{self, Write},
    path::Path,
};

use anyhow::Result;
use colored::Colorize;

use super::super::exit_status::ExitStatus;
use crate::{
    config::load_config,
    issues::{RuleId, Severity},
    rules::RuleSettings,
};

/// Lists the rule catalogue with the settings in effect for the current
/// directory.
pub fn rules() -> Result<ExitStatus> {
    let settings = load_config(Path::new("."))?.config.rule_settings();
    print_rules_to(&settings, &mut io::stdout().lock());
    Ok(ExitStatus::Success)
}

pub fn print_rules_to<W: Write>(settings: &RuleSettings, writer: &mut W) {
    for id in RuleId::ALL {
        let descriptor = id.descriptor();
        let severity = settings.severity(id);
        let severity_str = match severity {
            Severity::Error => "error".red(),
            Severity::Warning => "warning".yellow(),
            Severity::Info => "info".cyan(),
        };
        let state = if settings.is_enabled(id) {
            "enabled".green()
        } else {
            "disabled".dimmed()
        };
        let _ = writeln!(
            writer,
            "{}  {:<7}  {:<8}  {:<11}  {}{}",
            id.code().bold(),
            severity_str,
            state,
            descriptor.category.to_string().dimmed(),
            descriptor.title,
            if descriptor.fixable { " (fixable)" } else { "" }
        );
    }
}
