//! Gtk-Destroy rule: `Destroy` on a `Gtk.Object` is not called when the
//! native side destroys the object, so cleanup has to go in `OnDestroyed`.

use crate::{
    core::model::TypeDeclaration,
    issues::{IssueReport, RuleId},
    rules::{ReportSink, Rule, RuleContext},
};

pub const GTK_OBJECT_TYPE: &str = "Gtk.Object";
pub const GTK_WIDGET_TYPE: &str = "Gtk.Widget";

const DESTROY_METHOD: &str = "Destroy";

#[derive(Debug, Clone, Copy, Default)]
pub struct GtkDestroyRule;

impl Rule for GtkDestroyRule {
    fn rule_ids(&self) -> &'static [RuleId] {
        &[RuleId::GtkDestroy]
    }

    fn applies(&self, ctx: &RuleContext<'_>) -> bool {
        ctx.model.resolve_well_known_type(GTK_OBJECT_TYPE).is_some()
    }

    fn check_type(&self, _ctx: &RuleContext<'_>, ty: &TypeDeclaration, sink: &mut ReportSink<'_>) {
        if ty.identity.full_name() == GTK_WIDGET_TYPE || !ty.chain.derives_from(GTK_OBJECT_TYPE) {
            return;
        }
        for method in &ty.methods {
            if method.is_override && method.name == DESTROY_METHOD {
                sink.report(IssueReport::new(RuleId::GtkDestroy, method.span.clone()));
            }
        }
    }
}
