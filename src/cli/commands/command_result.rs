use serde::Serialize;

use crate::{
    core::{AnalyzedModel, model::ProgramModel},
    issues::{IssueReport, Severity, SourceContext},
};

use super::super::exit_status::ExitStatus;

/// A report together with where it is displayed.
#[derive(Debug, Clone)]
pub struct ReportedIssue {
    pub report: IssueReport,
    pub context: SourceContext,
}

impl ReportedIssue {
    pub fn resolve(model: &AnalyzedModel, report: &IssueReport) -> Self {
        let document = &report.primary_span.document;
        let text = model
            .compilation
            .document_text(document)
            .unwrap_or_default();
        Self {
            context: SourceContext::resolve(model.display_path(document), &report.primary_span, text),
            report: report.clone(),
        }
    }
}

/// One fix as previewed or applied by `fix`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedFix {
    pub file_path: String,
    pub line: usize,
    pub col: usize,
    pub title: String,
    pub replacement: String,
}

#[derive(Debug, Default)]
pub struct FixSummary {
    pub fixes: Vec<PlannedFix>,
    /// Documents with at least one fix.
    pub file_count: usize,
    pub applied_count: usize,
    /// Fixes that overlapped another fix or no longer matched the text.
    pub skipped_count: usize,
    /// Fixable reports in documents that were not loaded from a file.
    pub unwritable_count: usize,
    pub is_apply: bool,
}

#[derive(Debug)]
pub enum CommandSummary {
    Check,
    Fix(FixSummary),
}

/// Result of running `check` or `fix`.
pub struct CommandResult {
    pub summary: CommandSummary,
    pub error_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
    /// If true, exit code 1 should be returned when error_count > 0.
    /// `fix` clears it: it exits 1 only while fixes are pending.
    pub exit_on_errors: bool,
    /// Reports in file, line and column order.
    pub issues: Vec<ReportedIssue>,
    /// Dumps that could not be loaded.
    pub load_error_count: usize,
    pub models_checked: usize,
}

impl CommandResult {
    pub fn new(summary: CommandSummary, mut issues: Vec<ReportedIssue>) -> Self {
        issues.sort_by(|a, b| {
            let (a, b) = (&a.context, &b.context);
            (&a.file_path, a.line, a.col).cmp(&(&b.file_path, b.line, b.col))
        });
        let count = |severity: Severity| {
            issues
                .iter()
                .filter(|i| i.report.severity == severity)
                .count()
        };
        Self {
            summary,
            error_count: count(Severity::Error),
            warning_count: count(Severity::Warning),
            info_count: count(Severity::Info),
            exit_on_errors: true,
            issues,
            load_error_count: 0,
            models_checked: 0,
        }
    }

    pub fn exit_status(&self) -> ExitStatus {
        let fixes_pending = matches!(
            &self.summary,
            CommandSummary::Fix(fix) if !fix.is_apply && fix.applied_count > 0
        );
        if self.load_error_count > 0 {
            ExitStatus::Error
        } else if fixes_pending || (self.exit_on_errors && self.error_count > 0) {
            ExitStatus::Failure
        } else {
            ExitStatus::Success
        }
    }
}
