use anyhow::{Ok, Result};

use super::super::args::CheckCommand;
use super::{CommandResult, CommandSummary, ReportedIssue};
use crate::{
    core::{AnalysisRun, CheckContext},
    engine::CancellationToken,
};

pub fn check(cmd: &CheckCommand) -> Result<CommandResult> {
    let mut ctx = CheckContext::new(&cmd.common)?;
    ctx.restrict_rules(&cmd.rule_ids);

    let run = ctx.analyze(&CancellationToken::new());
    Ok(finish(CommandSummary::Check, &run))
}

/// Builds the command result shared by `check` and `fix`.
pub(super) fn finish(summary: CommandSummary, run: &AnalysisRun) -> CommandResult {
    let issues = run
        .reports()
        .map(|(model, report)| ReportedIssue::resolve(model, report))
        .collect();
    let mut result = CommandResult::new(summary, issues);
    result.load_error_count = run.failures.len();
    result.models_checked = run.models.len();
    result
}
