//! UI-localization rule.
//!
//! Flags translatable string literals that reach a text-carrying member of a
//! UI widget (a mapped property, constructor argument or method argument)
//! without going through a localization catalog. One rule instance runs per
//! toolkit, parameterized by that toolkit's mapping table.

use crate::{
    core::{
        mapping::{MappingEntry, Toolkit},
        model::{Argument, Operation, OperationKind, OperationKinds, OperationRef, argument_at},
    },
    issues::{IssueReport, Payload, RuleId},
    rules::{ReportSink, Rule, RuleContext},
};

const INTERESTS: OperationKinds = OperationKinds::of(&[
    OperationKind::Assignment,
    OperationKind::Construction,
    OperationKind::Invocation,
]);

#[derive(Debug, Clone, Copy)]
pub struct UiLocalizationRule {
    toolkit: Toolkit,
}

impl UiLocalizationRule {
    pub fn new(toolkit: Toolkit) -> Self {
        Self { toolkit }
    }

    fn rule_id(&self) -> RuleId {
        match self.toolkit {
            Toolkit::Gtk => RuleId::GtkLocalization,
            Toolkit::Xwt => RuleId::XwtLocalization,
        }
    }

    fn check_arguments(
        &self,
        ctx: &RuleContext<'_>,
        entries: &[&MappingEntry],
        arguments: &[Argument],
        sink: &mut ReportSink<'_>,
    ) {
        for entry in entries {
            let Some(arg) = entry.arg_position.and_then(|pos| argument_at(arguments, pos)) else {
                continue;
            };
            if arg.parameter_type.is_string()
                && entry.matches_parameter(arg.position, &arg.parameter_name)
            {
                self.check_literal(ctx, &arg.value, sink);
            }
        }
    }

    fn check_literal(&self, ctx: &RuleContext<'_>, value: &Operation, sink: &mut ReportSink<'_>) {
        let Some(text) = value.as_string_literal() else {
            return;
        };
        if !ctx.classifier.is_translatable(text) {
            return;
        }

        let span = ctx.model.source_span(value);
        let payload = match ctx.model.syntax_text(span) {
            Some(raw) => Payload::Localize {
                literal_span: span.clone(),
                literal_text: raw.to_string(),
                catalogs: ctx.catalogs.kinds(),
            },
            None => Payload::None,
        };
        sink.report(IssueReport::new(self.rule_id(), span.clone()).with_payload(payload));
    }
}

impl Rule for UiLocalizationRule {
    fn rule_ids(&self) -> &'static [RuleId] {
        match self.toolkit {
            Toolkit::Gtk => &[RuleId::GtkLocalization],
            Toolkit::Xwt => &[RuleId::XwtLocalization],
        }
    }

    fn interests(&self) -> OperationKinds {
        INTERESTS
    }

    fn applies(&self, ctx: &RuleContext<'_>) -> bool {
        let base = self.toolkit.registry().base_type();
        !ctx.catalogs.is_empty() && ctx.model.resolve_well_known_type(base).is_some()
    }

    fn check_operation(&self, ctx: &RuleContext<'_>, op: OperationRef<'_>, sink: &mut ReportSink<'_>) {
        // A catalog's own implementation does not localize through itself.
        if op
            .scope
            .containing_type
            .as_ref()
            .is_some_and(|ty| ctx.catalogs.is_catalog_type(ty))
        {
            return;
        }

        let registry = self.toolkit.registry();
        let base = registry.base_type();
        match op.operation {
            Operation::Assignment {
                target_property,
                target_type,
                value,
                ..
            } => {
                if !target_type.derives_from(base)
                    || registry.property(target_type, target_property).is_none()
                {
                    return;
                }
                let Some(text) = value.as_string_literal() else {
                    return;
                };
                if registry.is_filtered_special_case(target_type, target_property, text) {
                    return;
                }
                self.check_literal(ctx, value, sink);
            }
            Operation::Construction {
                constructed_type,
                arguments,
                ..
            } if constructed_type.derives_from(base) => {
                let entries = registry.constructor_arguments(constructed_type);
                self.check_arguments(ctx, &entries, arguments, sink);
            }
            Operation::Invocation {
                callee_name,
                callee_type,
                arguments,
                ..
            } if callee_type.derives_from(base) => {
                let entries = registry.method_arguments(callee_type, callee_name);
                self.check_arguments(ctx, &entries, arguments, sink);
            }
            _ => {}
        }
    }
}
