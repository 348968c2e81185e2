use std::{
    collections::{BTreeMap, HashSet},
    fs,
    path::PathBuf,
};

use anyhow::{Context, Ok, Result};
use tracing::{debug, info};

use super::super::args::FixCommand;
use super::{CommandResult, CommandSummary, FixSummary, PlannedFix, check::finish};
use crate::{
    core::{
        AnalyzedModel, CheckContext,
        model::{DocumentId, ProgramModel},
    },
    engine::CancellationToken,
    fixes::{Fix, apply_fixes, preferred_fix},
    issues::SourceContext,
};

/// Previews, or with `--apply` writes, the preferred fix of every fixable
/// report. Documents are written once even when several dumps share them.
pub fn fix(cmd: &FixCommand) -> Result<CommandResult> {
    let ctx = CheckContext::new(&cmd.common)?;
    let run = ctx.analyze(&CancellationToken::new());

    let mut summary = FixSummary {
        is_apply: cmd.apply,
        ..Default::default()
    };
    let mut seen: HashSet<PathBuf> = HashSet::new();

    for model in &run.models {
        let mut by_document: BTreeMap<&DocumentId, Vec<Fix>> = BTreeMap::new();
        for report in &model.outcome.reports {
            if let Some(fix) = preferred_fix(report, cmd.catalog) {
                by_document
                    .entry(&report.primary_span.document)
                    .or_default()
                    .push(fix);
            }
        }

        for (document, fixes) in by_document {
            let Some(text) = model.compilation.document_text(document) else {
                continue;
            };
            let Some(path) = model.compilation.document_path(document) else {
                debug!(document = document.as_str(), "document has no file, not fixing");
                summary.unwritable_count += fixes.len();
                continue;
            };
            if !seen.insert(path.to_path_buf()) {
                debug!(path = %path.display(), "document already fixed through another dump");
                continue;
            }

            let batch = apply_fixes(document, text, &fixes);
            summary.file_count += 1;
            summary.applied_count += batch.applied;
            summary.skipped_count += batch.skipped;
            summary
                .fixes
                .extend(fixes.iter().map(|fix| planned(model, document, text, fix)));

            if cmd.apply && batch.changed() {
                fs::write(path, &batch.text)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                info!(path = %path.display(), fixes = batch.applied, "fixed document");
            }
        }
    }

    summary.fixes.sort_by(|a, b| {
        (&a.file_path, a.line, a.col).cmp(&(&b.file_path, b.line, b.col))
    });

    let mut result = finish(CommandSummary::Fix(summary), &run);
    result.exit_on_errors = false;
    Ok(result)
}

fn planned(model: &AnalyzedModel, document: &DocumentId, text: &str, fix: &Fix) -> PlannedFix {
    let context = SourceContext::resolve(model.display_path(document), &fix.edit.span, text);
    PlannedFix {
        file_path: context.file_path,
        line: context.line,
        col: context.col,
        title: fix.title.clone(),
        replacement: fix.edit.replacement.clone(),
    }
}
