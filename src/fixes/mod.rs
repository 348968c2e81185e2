//! Text fixes for reported issues.
//!
//! A fix is a single [`TextEdit`]: replace the bytes of one span with new
//! text. Every edit records the text it expects to find; if the document no
//! longer holds that text the edit is refused and the document is returned
//! untouched.
//!
//! Fix shapes:
//! - wrap a literal in a catalog lookup (one alternative per catalog)
//! - substitute a typographic character inside a literal
//! - fold a concatenation of literals into one literal

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::{
    core::{
        catalog::CatalogKind,
        model::{DocumentId, Span},
        text::encode_regular_literal,
    },
    issues::{IssueReport, Payload, RuleId},
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FixError {
    #[error("{0} has no automatic fix")]
    NotFixable(RuleId),

    #[error("span {start}..{end} is outside the document")]
    OutOfRange { start: usize, end: usize },

    #[error("text at {start}..{end} no longer matches the reported code")]
    Stale { start: usize, end: usize },
}

// ============================================================
// Edits and Fixes
// ============================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextEdit {
    pub span: Span,
    /// Text that must currently be at `span`.
    pub expected: String,
    pub replacement: String,
}

impl TextEdit {
    pub fn apply(&self, text: &str) -> Result<String, FixError> {
        let range = self.span.range();
        let current = text.get(range.clone()).ok_or(FixError::OutOfRange {
            start: range.start,
            end: range.end,
        })?;
        if current != self.expected {
            return Err(FixError::Stale {
                start: range.start,
                end: range.end,
            });
        }

        let mut out = String::with_capacity(text.len() - current.len() + self.replacement.len());
        out.push_str(&text[..range.start]);
        out.push_str(&self.replacement);
        out.push_str(&text[range.end..]);
        Ok(out)
    }
}

/// One named way to resolve an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fix {
    pub rule: RuleId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<CatalogKind>,
    pub edit: TextEdit,
}

impl Fix {
    /// Applies the fix to the whole document text.
    pub fn apply(&self, text: &str) -> Result<String, FixError> {
        self.edit.apply(text)
    }
}

/// Every fix alternative for `issue`, in preference order.
pub fn fixes_for(issue: &IssueReport) -> Vec<Fix> {
    match &issue.payload {
        Payload::None => Vec::new(),
        Payload::Localize {
            literal_span,
            literal_text,
            catalogs,
        } => catalogs
            .iter()
            .map(|&catalog| {
                let expression = catalog.get_string_expression();
                Fix {
                    rule: issue.rule,
                    title: format!("Localize with {expression}"),
                    catalog: Some(catalog),
                    edit: TextEdit {
                        span: literal_span.clone(),
                        expected: literal_text.clone(),
                        replacement: format!("{expression} ({literal_text})"),
                    },
                }
            })
            .collect(),
        Payload::LiteralSubSpan {
            typography,
            expected_raw,
            ..
        } => {
            let replacement = typography.replacement();
            vec![Fix {
                rule: issue.rule,
                title: format!("Replace with '{replacement}'"),
                catalog: None,
                edit: TextEdit {
                    span: issue.primary_span.clone(),
                    expected: expected_raw.clone(),
                    replacement: replacement.to_string(),
                },
            }]
        }
        Payload::FoldConcatenation {
            span,
            expected_text,
            folded,
        } => vec![Fix {
            rule: issue.rule,
            title: "Fold into a single literal".to_string(),
            catalog: None,
            edit: TextEdit {
                span: span.clone(),
                expected: expected_text.clone(),
                replacement: encode_regular_literal(folded),
            },
        }],
    }
}

/// The fix alternative using `catalog`, or the first one.
pub fn preferred_fix(issue: &IssueReport, catalog: Option<CatalogKind>) -> Option<Fix> {
    let mut fixes = fixes_for(issue);
    let index = catalog
        .and_then(|c| fixes.iter().position(|f| f.catalog == Some(c)))
        .unwrap_or(0);
    (index < fixes.len()).then(|| fixes.swap_remove(index))
}

/// Applies the first fix alternative of `issue` to `text`.
pub fn apply(issue: &IssueReport, text: &str) -> Result<String, FixError> {
    preferred_fix(issue, None)
        .ok_or(FixError::NotFixable(issue.rule))?
        .apply(text)
}

// ============================================================
// Batches
// ============================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixBatch {
    pub text: String,
    pub applied: usize,
    pub skipped: usize,
}

impl FixBatch {
    pub fn changed(&self) -> bool {
        self.applied > 0
    }
}

/// Applies several fixes to one document, last span first.
///
/// Fixes for other documents, fixes overlapping one already applied and
/// stale fixes are skipped.
pub fn apply_fixes(document: &DocumentId, text: &str, fixes: &[Fix]) -> FixBatch {
    let mut ordered: Vec<&Fix> = fixes.iter().collect();
    ordered.sort_by(|a, b| b.edit.span.start.cmp(&a.edit.span.start));

    let mut batch = FixBatch {
        text: text.to_string(),
        applied: 0,
        skipped: 0,
    };
    let mut applied_spans: Vec<&Span> = Vec::new();
    for fix in ordered {
        let span = &fix.edit.span;
        if &span.document != document || applied_spans.iter().any(|s| s.overlaps(span)) {
            batch.skipped += 1;
            continue;
        }
        match fix.apply(&batch.text) {
            Ok(text) => {
                batch.text = text;
                batch.applied += 1;
                applied_spans.push(span);
            }
            Err(err) => {
                debug!(rule = %fix.rule, error = %err, "skipping fix");
                batch.skipped += 1;
            }
        }
    }
    batch
}
