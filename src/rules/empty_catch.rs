//! Empty-catch rule: a catch-all handler with an empty body hides every error.

use crate::{
    core::model::{OBJECT_TYPE, Operation, OperationKind, OperationKinds, OperationRef},
    issues::{IssueReport, RuleId},
    rules::{ReportSink, Rule, RuleContext},
};

pub const EXCEPTION_TYPE: &str = "System.Exception";

#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyCatchRule;

impl Rule for EmptyCatchRule {
    fn rule_ids(&self) -> &'static [RuleId] {
        &[RuleId::EmptyCatch]
    }

    fn interests(&self) -> OperationKinds {
        OperationKinds::of(&[OperationKind::CatchClause])
    }

    fn check_operation(&self, ctx: &RuleContext<'_>, op: OperationRef<'_>, sink: &mut ReportSink<'_>) {
        let Operation::CatchClause {
            caught_type,
            has_filter: false,
            handler_is_empty: true,
            ..
        } = op.operation
        else {
            return;
        };
        // `catch {}` catches everything too.
        let catches_all = caught_type.as_ref().is_none_or(|ty| {
            ty.most_derived()
                .is_some_and(|t| matches!(t.full_name(), OBJECT_TYPE | EXCEPTION_TYPE))
        });
        if catches_all {
            let span = ctx.model.source_span(op.operation).clone();
            sink.report(IssueReport::new(RuleId::EmptyCatch, span));
        }
    }
}
