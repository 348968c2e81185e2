//! Report formatting and printing utilities.
//!
//! Text output is cargo-style: severity, message and rule id, a clickable
//! location, the source line and a caret underline. JSON output carries the
//! same reports with their resolved positions.

use std::io::{self, Write};

use colored::Colorize;
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use super::commands::{CommandResult, CommandSummary, FixSummary, PlannedFix, ReportedIssue};
use crate::issues::{IssueReport, Severity};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print issues in cargo-style format to stdout.
pub fn report(issues: &[ReportedIssue]) {
    report_to(issues, &mut io::stdout().lock());
}

/// Print issues to a custom writer. Issues are expected in display order.
pub fn report_to<W: Write>(issues: &[ReportedIssue], writer: &mut W) {
    if issues.is_empty() {
        return;
    }

    let max_line_width = issues
        .iter()
        .map(|i| i.context.line.to_string().len())
        .max()
        .unwrap_or(1);

    for issue in issues {
        print_issue(issue, writer, max_line_width);
    }

    print_summary(issues, writer);
}

/// Print a success message when no issues are found.
pub fn print_success(models: usize) {
    print_success_to(models, &mut io::stdout().lock());
}

/// Print a success message to a custom writer.
pub fn print_success_to<W: Write>(models: usize, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Checked {} {} - no issues found",
            models,
            if models == 1 { "compilation" } else { "compilations" }
        )
        .green()
    );
}

/// Print a warning about dumps that could not be loaded.
pub fn print_load_warning_to<W: Write>(count: usize, verbose: bool, writer: &mut W) {
    if count > 0 {
        let _ = writeln!(
            writer,
            "{} {} compilation dump(s) could not be loaded{}",
            "warning:".bold().yellow(),
            count,
            if verbose {
                String::new()
            } else {
                format!(" (use {} for details)", "-v".cyan())
            }
        );
    }
}

pub fn print(result: &CommandResult, verbose: bool) {
    match &result.summary {
        CommandSummary::Check => {
            report(&result.issues);
            if result.issues.is_empty() {
                print_success(result.models_checked);
            }
        }
        CommandSummary::Fix(summary) => {
            print_fix_to(summary, &mut io::stdout().lock());
        }
    }

    print_load_warning_to(result.load_error_count, verbose, &mut io::stderr().lock());
}

/// Print the check result as JSON.
pub fn print_json_to<W: Write>(result: &CommandResult, writer: &mut W) -> serde_json::Result<()> {
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct JsonIssue<'a> {
        file_path: &'a str,
        line: usize,
        col: usize,
        #[serde(flatten)]
        report: &'a IssueReport,
    }

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct JsonOutput<'a> {
        issues: Vec<JsonIssue<'a>>,
        errors: usize,
        warnings: usize,
        infos: usize,
        compilations: usize,
        load_errors: usize,
    }

    let output = JsonOutput {
        issues: result
            .issues
            .iter()
            .map(|i| JsonIssue {
                file_path: &i.context.file_path,
                line: i.context.line,
                col: i.context.col,
                report: &i.report,
            })
            .collect(),
        errors: result.error_count,
        warnings: result.warning_count,
        infos: result.info_count,
        compilations: result.models_checked,
        load_errors: result.load_error_count,
    };
    serde_json::to_writer_pretty(&mut *writer, &output)?;
    let _ = writeln!(writer);
    Ok(())
}

// ============================================================
// Internal Functions
// ============================================================

fn print_issue<W: Write>(issue: &ReportedIssue, writer: &mut W, max_line_width: usize) {
    let ctx = &issue.context;
    let report = &issue.report;

    let severity_str = match report.severity {
        Severity::Error => "error".bold().red(),
        Severity::Warning => "warning".bold().yellow(),
        Severity::Info => "info".bold().cyan(),
    };

    let _ = writeln!(
        writer,
        "{}: {}  {}",
        severity_str,
        report.message,
        report.rule.to_string().dimmed().cyan()
    );

    // Clickable location: --> path:line:col
    let _ = writeln!(writer, "  {} {}:{}:{}", "-->".blue(), ctx.file_path, ctx.line, ctx.col);

    let caret = "^".repeat(ctx.width);
    let caret = match report.severity {
        Severity::Error => caret.red(),
        Severity::Warning => caret.yellow(),
        Severity::Info => caret.cyan(),
    };

    let _ = writeln!(
        writer,
        "{:>width$} {}",
        "",
        "|".blue(),
        width = max_line_width
    );
    let _ = writeln!(
        writer,
        "{:>width$} {} {}",
        ctx.line.to_string().blue(),
        "|".blue(),
        ctx.source_line,
        width = max_line_width
    );

    // col is 1-based
    let prefix: String = ctx.source_line.chars().take(ctx.col.saturating_sub(1)).collect();
    let caret_padding = UnicodeWidthStr::width(prefix.as_str());
    let _ = writeln!(
        writer,
        "{:>width$} {} {:>padding$}{}",
        "",
        "|".blue(),
        "",
        caret,
        width = max_line_width,
        padding = caret_padding
    );

    let title = report.rule.descriptor().title;
    let _ = writeln!(
        writer,
        "{:>width$} {} {} {}",
        "",
        "=".blue(),
        "note:".bold(),
        title,
        width = max_line_width
    );
    if report.is_fixable() {
        let _ = writeln!(
            writer,
            "{:>width$} {} {} run {} to fix automatically",
            "",
            "=".blue(),
            "help:".bold().cyan(),
            "catalint fix".cyan(),
            width = max_line_width
        );
    }

    let _ = writeln!(writer); // Empty line between issues
}

fn print_summary<W: Write>(issues: &[ReportedIssue], writer: &mut W) {
    let count = |severity: Severity| issues.iter().filter(|i| i.report.severity == severity).count();
    let (errors, warnings, infos) = (
        count(Severity::Error),
        count(Severity::Warning),
        count(Severity::Info),
    );

    let _ = writeln!(
        writer,
        "{} {} problems ({} {}, {} {}, {} {})",
        FAILURE_MARK.red(),
        issues.len(),
        errors,
        if errors == 1 { "error" } else { "errors" }.red(),
        warnings,
        if warnings == 1 { "warning" } else { "warnings" }.yellow(),
        infos,
        if infos == 1 { "info" } else { "infos" }.cyan()
    );
}

fn print_fix_to<W: Write>(summary: &FixSummary, writer: &mut W) {
    if !summary.is_apply {
        for fix in &summary.fixes {
            print_planned_fix(fix, writer);
        }
    }

    if summary.fixes.is_empty() {
        let _ = writeln!(writer, "{} {}", SUCCESS_MARK.green(), "Nothing to fix".green());
    } else if summary.is_apply {
        let _ = writeln!(
            writer,
            "{} {} fix(es) in {} file(s).",
            "Applied".green().bold(),
            summary.applied_count,
            summary.file_count
        );
    } else {
        let _ = writeln!(
            writer,
            "{} {} fix(es) in {} file(s).",
            "Would apply".yellow().bold(),
            summary.applied_count,
            summary.file_count
        );
        let _ = writeln!(writer, "Run with {} to write these fixes.", "--apply".cyan());
    }

    if summary.skipped_count > 0 {
        let _ = writeln!(
            writer,
            "  - skipped: {} fix(es) overlapping another fix or out of date",
            summary.skipped_count
        );
    }
    if summary.unwritable_count > 0 {
        let _ = writeln!(
            writer,
            "  - skipped: {} fix(es) in documents without a file",
            summary.unwritable_count
        );
    }
}

fn print_planned_fix<W: Write>(fix: &PlannedFix, writer: &mut W) {
    let _ = writeln!(
        writer,
        "  {} {}:{}:{}",
        "-->".blue(),
        fix.file_path,
        fix.line,
        fix.col
    );
    let _ = writeln!(
        writer,
        "   {} {}: {}",
        "=".blue(),
        fix.title,
        fix.replacement.green()
    );
}

// ============================================================
// Tests
// ============================================================
