//! `StringBuilder.Append` argument checks.
//!
//! `sb.Append (a + b)` allocates the concatenation before appending it, and
//! `sb.Append (s.Substring (i, n))` allocates the substring. Both have
//! allocation-free spellings.

use crate::{
    core::model::{Operation, OperationKind, OperationKinds, OperationRef, argument_at},
    issues::{IssueReport, RuleId},
    rules::{ReportSink, Rule, RuleContext},
};

pub const STRING_BUILDER_TYPE: &str = "System.Text.StringBuilder";

const APPEND_METHODS: &[&str] = &["Append", "AppendLine", "AppendFormat"];

#[derive(Debug, Clone, Copy, Default)]
pub struct StringBuilderAppendRule;

impl Rule for StringBuilderAppendRule {
    fn rule_ids(&self) -> &'static [RuleId] {
        &[RuleId::AppendConcatenation, RuleId::AppendSubstring]
    }

    fn interests(&self) -> OperationKinds {
        OperationKinds::of(&[OperationKind::Invocation])
    }

    fn check_operation(&self, ctx: &RuleContext<'_>, op: OperationRef<'_>, sink: &mut ReportSink<'_>) {
        let Operation::Invocation {
            callee_name,
            receiver_type: Some(receiver),
            arguments,
            ..
        } = op.operation
        else {
            return;
        };
        if !receiver.derives_from(STRING_BUILDER_TYPE) || !APPEND_METHODS.contains(&callee_name.as_str()) {
            return;
        }
        let Some(arg) = argument_at(arguments, 0) else {
            return;
        };

        let rule = match &arg.value {
            value if value.is_concatenation() && !value.is_constant_concatenation() => {
                RuleId::AppendConcatenation
            }
            Operation::Invocation { callee_name, .. } if callee_name == "Substring" => RuleId::AppendSubstring,
            _ => return,
        };
        let span = ctx.model.source_span(op.operation).clone();
        sink.report(IssueReport::new(rule, span).with_additional_span(arg.value.span().clone()));
    }
}
