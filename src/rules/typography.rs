//! Typography rule: scans every string literal for ASCII stand-ins of
//! typographic characters.
//!
//! Matches are reported at the exact raw sub-span of the literal so a fix
//! replaces only the matched characters. When the literal's source cannot be
//! decoded the whole literal is reported without a fix.

use crate::{
    core::{
        model::{OperationKind, OperationKinds, OperationRef, Span},
        text::{DecodedLiteral, decode_literal},
        typography::{ScanOptions, TypographyKind, TypographyMatch, scan_with},
    },
    issues::{IssueReport, Payload, RuleId},
    rules::{ReportSink, Rule, RuleContext},
};

#[derive(Debug, Clone, Copy)]
pub struct TypographyRule {
    options: ScanOptions,
}

impl TypographyRule {
    pub fn new(options: ScanOptions) -> Self {
        Self { options }
    }
}

impl Default for TypographyRule {
    fn default() -> Self {
        Self::new(ScanOptions::default())
    }
}

fn rule_for(kind: TypographyKind) -> RuleId {
    match kind {
        TypographyKind::Ellipsis => RuleId::Ellipsis,
        TypographyKind::Multiplication => RuleId::Multiplication,
        TypographyKind::EnDash => RuleId::EnDash,
    }
}

/// Maps a match onto the raw source of the literal.
fn locate(
    literal_span: &Span,
    raw: &str,
    decoded: &DecodedLiteral,
    found: &TypographyMatch,
) -> Option<(Span, Payload)> {
    let range = decoded.raw_range(found.start, found.len)?;
    let expected_raw = raw.get(range.clone())?.to_string();
    let span = literal_span.sub_span(range.start, range.len());
    let payload = Payload::LiteralSubSpan {
        literal_span: literal_span.clone(),
        offset: found.start,
        len: found.len,
        typography: found.kind,
        expected_raw,
    };
    Some((span, payload))
}

impl Rule for TypographyRule {
    fn rule_ids(&self) -> &'static [RuleId] {
        &[RuleId::Ellipsis, RuleId::Multiplication, RuleId::EnDash]
    }

    fn interests(&self) -> OperationKinds {
        OperationKinds::of(&[OperationKind::Literal])
    }

    fn applies(&self, _ctx: &RuleContext<'_>) -> bool {
        self.options.any()
    }

    fn check_operation(&self, ctx: &RuleContext<'_>, op: OperationRef<'_>, sink: &mut ReportSink<'_>) {
        let Some(value) = op.operation.as_string_literal() else {
            return;
        };
        let literal_span = ctx.model.source_span(op.operation);
        let raw = ctx.model.syntax_text(literal_span);
        // Only trust the raw text if it decodes back to the literal's value.
        let decoded = raw
            .and_then(decode_literal)
            .filter(|decoded| decoded.value == value);

        for found in scan_with(value, self.options) {
            let located = match (raw, &decoded) {
                (Some(raw), Some(decoded)) => locate(literal_span, raw, decoded, &found),
                _ => None,
            };
            let report = match located {
                Some((span, payload)) => IssueReport::new(rule_for(found.kind), span).with_payload(payload),
                None => IssueReport::new(rule_for(found.kind), literal_span.clone()),
            };
            sink.report(report);
        }
    }
}
