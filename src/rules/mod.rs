//! Rule implementations for catalint.
//!
//! Every rule is a plain struct implementing [`Rule`]. A rule declares the
//! operation kinds it subscribes to and a compilation-start gate; the engine
//! only feeds it operations when the gate passes. Rules never hold mutable
//! state: they read an operation and push zero or more reports into a
//! [`ReportSink`].
//!
//! ## Module Structure
//!
//! - `settings`: per-rule enabled state and severity overrides
//! - `ui_localization`: user-facing literals passed to UI toolkit members
//! - `catalog_calls`: literal-only and no-concatenation `GetString` checks
//! - `string_builder`: inefficient `StringBuilder.Append` arguments
//! - `typography`: ellipsis, multiplication sign and en-dash in literals
//! - `gtk_destroy`: overrides of `Gtk.Object.Destroy`
//! - `empty_catch`: empty catch-all handlers

use enum_dispatch::enum_dispatch;

use crate::{
    core::{
        catalog::CatalogSet,
        classify::LiteralClassifier,
        mapping::Toolkit,
        model::{OperationKinds, OperationRef, ProgramModel, TypeDeclaration},
        typography::ScanOptions,
    },
    issues::{IssueReport, RuleId},
};

pub mod catalog_calls;
pub mod empty_catch;
pub mod gtk_destroy;
pub mod settings;
pub mod string_builder;
pub mod typography;
pub mod ui_localization;

pub use catalog_calls::{CatalogConcatenationRule, CatalogLiteralRule};
pub use empty_catch::EmptyCatchRule;
pub use gtk_destroy::GtkDestroyRule;
pub use settings::{RuleOverride, RuleSettings};
pub use string_builder::StringBuilderAppendRule;
pub use typography::TypographyRule;
pub use ui_localization::UiLocalizationRule;

// ============================================================
// Rule Context
// ============================================================

/// Read-only state captured once per compilation and shared by every rule.
#[derive(Clone, Copy)]
pub struct RuleContext<'a> {
    pub model: &'a dyn ProgramModel,
    pub catalogs: &'a CatalogSet,
    pub classifier: &'a LiteralClassifier,
}

// ============================================================
// Report Sink
// ============================================================

/// Collects the reports of one rule, applying configured enabled state and
/// severity.
pub struct ReportSink<'a> {
    settings: &'a RuleSettings,
    reports: Vec<IssueReport>,
}

impl<'a> ReportSink<'a> {
    pub fn new(settings: &'a RuleSettings) -> Self {
        Self {
            settings,
            reports: Vec::new(),
        }
    }

    pub fn report(&mut self, mut report: IssueReport) {
        if !self.settings.is_enabled(report.rule) {
            return;
        }
        report.severity = self.settings.severity(report.rule);
        self.reports.push(report);
    }

    pub fn into_reports(self) -> Vec<IssueReport> {
        self.reports
    }
}

// ============================================================
// Rule Trait
// ============================================================

#[enum_dispatch]
pub trait Rule {
    /// Ids this rule may report under.
    fn rule_ids(&self) -> &'static [RuleId];

    /// Operation kinds fed to [`Rule::check_operation`].
    fn interests(&self) -> OperationKinds {
        OperationKinds::NONE
    }

    /// Compilation-start gate. A rule that does not apply sees nothing.
    fn applies(&self, _ctx: &RuleContext<'_>) -> bool {
        true
    }

    fn check_operation(&self, _ctx: &RuleContext<'_>, _op: OperationRef<'_>, _sink: &mut ReportSink<'_>) {}

    /// Symbol-level check, run once per declared type.
    fn check_type(&self, _ctx: &RuleContext<'_>, _ty: &TypeDeclaration, _sink: &mut ReportSink<'_>) {}
}

#[enum_dispatch(Rule)]
#[derive(Debug, Clone)]
pub enum RuleKind {
    UiLocalization(UiLocalizationRule),
    CatalogLiteral(CatalogLiteralRule),
    CatalogConcatenation(CatalogConcatenationRule),
    StringBuilderAppend(StringBuilderAppendRule),
    Typography(TypographyRule),
    GtkDestroy(GtkDestroyRule),
    EmptyCatch(EmptyCatchRule),
}

impl RuleKind {
    /// Position of the rule's first id in the catalogue, for stable output.
    pub fn order(&self) -> usize {
        let first = self.rule_ids().first().copied();
        RuleId::ALL
            .iter()
            .position(|id| Some(*id) == first)
            .unwrap_or(usize::MAX)
    }

    pub fn name(&self) -> &'static str {
        match self {
            RuleKind::UiLocalization(_) => "ui-localization",
            RuleKind::CatalogLiteral(_) => "catalog-literal-only",
            RuleKind::CatalogConcatenation(_) => "catalog-no-concatenation",
            RuleKind::StringBuilderAppend(_) => "string-builder-append",
            RuleKind::Typography(_) => "typography",
            RuleKind::GtkDestroy(_) => "gtk-destroy",
            RuleKind::EmptyCatch(_) => "empty-catch",
        }
    }
}

/// Instantiates every rule with at least one enabled id, in catalogue order.
pub fn build_rules(settings: &RuleSettings, toolkits: &[Toolkit]) -> Vec<RuleKind> {
    let scan = ScanOptions {
        ellipsis: settings.is_enabled(RuleId::Ellipsis),
        multiplication: settings.is_enabled(RuleId::Multiplication),
        en_dash: settings.is_enabled(RuleId::EnDash),
    };

    let mut rules: Vec<RuleKind> = vec![
        CatalogLiteralRule.into(),
        GtkDestroyRule.into(),
        StringBuilderAppendRule.into(),
        TypographyRule::new(scan).into(),
        CatalogConcatenationRule.into(),
        EmptyCatchRule.into(),
    ];
    rules.extend(
        toolkits
            .iter()
            .map(|&toolkit| RuleKind::from(UiLocalizationRule::new(toolkit))),
    );
    rules.retain(|rule| rule.rule_ids().iter().any(|id| settings.is_enabled(*id)));
    rules.sort_by_key(RuleKind::order);
    rules.dedup_by_key(|rule| rule.order());
    rules
}
