//! Checks on the phrase passed to a catalog's `GetString`.
//!
//! Extraction tools read the phrase straight from source, so it has to be a
//! literal. The literal-only rule accepts a `+` chain of literals (it folds to
//! a constant); the strict rule rejects any concatenation.

use crate::{
    core::model::{Operation, OperationKind, OperationKinds, OperationRef, argument_at},
    issues::{IssueReport, Payload, RuleId},
    rules::{ReportSink, Rule, RuleContext},
};

const INTERESTS: OperationKinds = OperationKinds::of(&[OperationKind::Invocation]);

const GET_STRING_METHODS: &[&str] = &["GetString", "GetStringPlural"];

/// Members through which a catalog forwards to its own lookup.
const FORWARDING_MEMBERS: &[&str] = &["GetString", "GetPluralString", "GetStringPlural"];

/// The phrase argument of a catalog lookup that should be checked.
fn catalog_phrase<'a>(ctx: &RuleContext<'_>, op: OperationRef<'a>) -> Option<&'a Operation> {
    let Operation::Invocation {
        callee_name,
        callee_type,
        arguments,
        ..
    } = op.operation
    else {
        return None;
    };
    if !GET_STRING_METHODS.contains(&callee_name.as_str()) || !ctx.catalogs.is_catalog_type(callee_type) {
        return None;
    }

    let in_forwarding_member = op
        .scope
        .containing_member
        .as_deref()
        .is_some_and(|member| FORWARDING_MEMBERS.contains(&member));
    let in_catalog = op
        .scope
        .containing_type
        .as_ref()
        .is_some_and(|ty| ctx.catalogs.is_catalog_type(ty));
    if in_forwarding_member && in_catalog {
        return None;
    }

    let phrase = argument_at(arguments, 0)?;
    phrase.parameter_type.is_string().then_some(&phrase.value)
}

/// MD0001: the phrase must be a literal or a concatenation of literals.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogLiteralRule;

impl Rule for CatalogLiteralRule {
    fn rule_ids(&self) -> &'static [RuleId] {
        &[RuleId::CatalogLiteralOnly]
    }

    fn interests(&self) -> OperationKinds {
        INTERESTS
    }

    fn applies(&self, ctx: &RuleContext<'_>) -> bool {
        !ctx.catalogs.is_empty()
    }

    fn check_operation(&self, ctx: &RuleContext<'_>, op: OperationRef<'_>, sink: &mut ReportSink<'_>) {
        let Some(phrase) = catalog_phrase(ctx, op) else {
            return;
        };
        if !phrase.is_constant_concatenation() {
            let span = ctx.model.source_span(phrase).clone();
            sink.report(IssueReport::new(RuleId::CatalogLiteralOnly, span));
        }
    }
}

/// MD0009: the phrase must be a single literal token.
///
/// An interpolated string counts as a concatenation: extraction tools see
/// its holes no better than a `+` chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogConcatenationRule;

impl Rule for CatalogConcatenationRule {
    fn rule_ids(&self) -> &'static [RuleId] {
        &[RuleId::CatalogNoConcatenation]
    }

    fn interests(&self) -> OperationKinds {
        INTERESTS
    }

    fn applies(&self, ctx: &RuleContext<'_>) -> bool {
        !ctx.catalogs.is_empty()
    }

    fn check_operation(&self, ctx: &RuleContext<'_>, op: OperationRef<'_>, sink: &mut ReportSink<'_>) {
        let Some(phrase) = catalog_phrase(ctx, op) else {
            return;
        };
        if !phrase.is_concatenation() && !matches!(phrase, Operation::Interpolation { .. }) {
            return;
        }

        let span = ctx.model.source_span(phrase);
        let fold = phrase
            .folded_string()
            .zip(ctx.model.syntax_text(span))
            .map(|(folded, raw)| Payload::FoldConcatenation {
                span: span.clone(),
                expected_text: raw.to_string(),
                folded,
            });
        sink.report(
            IssueReport::new(RuleId::CatalogNoConcatenation, span.clone()).with_payload(fold.unwrap_or_default()),
        );
    }
}
