//! Rule engine.
//!
//! An [`Engine`] holds the configured rule set and stays idle until
//! [`Engine::start`] opens one [`CompilationSession`] per analyzed program:
//!
//! 1. `CompilationStarted`: catalogs are resolved once and every rule's gate
//!    is evaluated; gated-off rules see no operations.
//! 2. `Evaluating`: active rules run in parallel, each over the operation
//!    kinds it subscribes to and then over declared types.
//! 3. `Finalized`: per-rule reports are sorted by primary span and
//!    concatenated in catalogue order.
//!
//! Cancellation is checked between operations only. A cancelled run still
//! returns every report gathered so far.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use glob::Pattern;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::{
    core::{
        catalog::CatalogSet,
        classify::LiteralClassifier,
        mapping::Toolkit,
        model::{DocumentId, ProgramModel},
    },
    issues::IssueReport,
    rules::{ReportSink, Rule, RuleContext, RuleKind, RuleSettings, build_rules},
};

// ============================================================
// Cancellation
// ============================================================

/// Shared cancellation flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

// ============================================================
// Options and Outcome
// ============================================================

#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    pub settings: RuleSettings,
    pub toolkits: Vec<Toolkit>,
    /// Literal texts never treated as translatable.
    pub ignore_texts: Vec<String>,
    /// Documents matching any pattern produce no reports.
    pub ignores: Vec<Pattern>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            settings: RuleSettings::default(),
            toolkits: Toolkit::ALL.to_vec(),
            ignore_texts: Vec::new(),
            ignores: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnalysisOutcome {
    pub reports: Vec<IssueReport>,
    pub catalogs: CatalogSet,
    /// Number of rules whose gate passed.
    pub active_rules: usize,
    pub cancelled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    CompilationStarted,
    Evaluating,
    Finalized,
}

// ============================================================
// Engine
// ============================================================

pub struct Engine {
    rules: Vec<RuleKind>,
    settings: RuleSettings,
    classifier: LiteralClassifier,
    ignores: Vec<Pattern>,
}

impl Engine {
    pub fn new(options: AnalysisOptions) -> Self {
        let rules = build_rules(&options.settings, &options.toolkits);
        debug!(rules = rules.len(), "engine configured");
        Self {
            rules,
            settings: options.settings,
            classifier: LiteralClassifier::new(options.ignore_texts),
            ignores: options.ignores,
        }
    }

    /// Starts a session: resolves the catalogs of `model` once.
    pub fn start<'a>(&'a self, model: &'a dyn ProgramModel) -> CompilationSession<'a> {
        let catalogs = CatalogSet::resolve(model);
        debug!(catalogs = ?catalogs.kinds(), "compilation started");
        CompilationSession {
            engine: self,
            model,
            catalogs,
            state: SessionState::CompilationStarted,
        }
    }

    /// Runs a full session over `model`.
    pub fn analyze(&self, model: &dyn ProgramModel, token: &CancellationToken) -> AnalysisOutcome {
        self.start(model).run(token)
    }

    fn is_ignored(&self, document: &DocumentId) -> bool {
        self.ignores.iter().any(|p| p.matches(document.as_str()))
    }
}

pub struct CompilationSession<'a> {
    engine: &'a Engine,
    model: &'a dyn ProgramModel,
    catalogs: CatalogSet,
    state: SessionState,
}

impl<'a> CompilationSession<'a> {
    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn catalogs(&self) -> &CatalogSet {
        &self.catalogs
    }

    /// Evaluates every active rule. A finalized session returns nothing.
    pub fn run(&mut self, token: &CancellationToken) -> AnalysisOutcome {
        if self.state == SessionState::Finalized {
            debug!("session already finalized");
            return AnalysisOutcome::default();
        }

        let engine = self.engine;
        let ctx = RuleContext {
            model: self.model,
            catalogs: &self.catalogs,
            classifier: &engine.classifier,
        };
        let active: Vec<&RuleKind> = engine
            .rules
            .iter()
            .filter(|rule| {
                let applies = rule.applies(&ctx);
                if !applies {
                    debug!(rule = rule.name(), "rule does not apply to this compilation");
                }
                applies
            })
            .collect();

        self.state = SessionState::Evaluating;
        let results: Vec<(Vec<IssueReport>, bool)> = active
            .par_iter()
            .map(|rule| evaluate(rule, &ctx, engine, token))
            .collect();

        let mut outcome = AnalysisOutcome {
            active_rules: active.len(),
            ..Default::default()
        };
        for (reports, cancelled) in results {
            outcome.reports.extend(reports);
            outcome.cancelled |= cancelled;
        }
        if outcome.cancelled {
            info!(reports = outcome.reports.len(), "analysis cancelled");
        }
        outcome.catalogs = self.catalogs.clone();
        self.state = SessionState::Finalized;
        outcome
    }
}

/// Runs one rule. Returns its sorted reports and whether it was cancelled.
fn evaluate(
    rule: &RuleKind,
    ctx: &RuleContext<'_>,
    engine: &Engine,
    token: &CancellationToken,
) -> (Vec<IssueReport>, bool) {
    let mut sink = ReportSink::new(&engine.settings);
    let mut cancelled = false;

    let interests = rule.interests();
    if !interests.is_empty() {
        for op in ctx.model.operations(interests) {
            if token.is_cancelled() {
                cancelled = true;
                break;
            }
            rule.check_operation(ctx, op, &mut sink);
        }
    }
    if !cancelled {
        for ty in ctx.model.declared_types() {
            if token.is_cancelled() {
                cancelled = true;
                break;
            }
            rule.check_type(ctx, ty, &mut sink);
        }
    }

    let mut reports = sink.into_reports();
    reports.retain(|r| !engine.is_ignored(&r.primary_span.document));
    reports.sort_by(|a, b| a.primary_span.cmp(&b.primary_span));
    debug!(rule = rule.name(), reports = reports.len(), "rule finished");
    (reports, cancelled)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::{
        core::model::{
            Compilation, CompilationBuilder, OperationKinds, OperationRef, Span, TypeDeclaration,
            TypeIdentity,
            dump::{ArgumentDump, OperationDump, RootDump, SpanDump},
        },
        issues::RuleId,
    };

    const MAIN: &str = r#"
label.Text = "Loading...";
var b = new Label ("Name");
try { Run (); } catch {}
"#;

    const OTHER: &str = r#"title.Text = "Size 2x3";"#;

    fn at(text: &str, needle: &str) -> SpanDump {
        SpanDump::locate(text, needle).unwrap()
    }

    fn compilation() -> Compilation {
        CompilationBuilder::new("Sample")
            .document("Main.cs", MAIN)
            .document("Generated/Other.cs", OTHER)
            .class("MonoDevelop.Core.GettextCatalog", None)
            .class("Gtk.Widget", None)
            .class("Gtk.Label", Some("Gtk.Widget"))
            .root(RootDump::new(
                "Main.cs",
                OperationDump::assignment(
                    at(MAIN, r#"label.Text = "Loading...""#),
                    "Text",
                    "Gtk.Label",
                    OperationDump::string(at(MAIN, r#""Loading...""#), "Loading..."),
                ),
            ))
            .root(RootDump::new(
                "Main.cs",
                OperationDump::construction(
                    at(MAIN, r#"new Label ("Name")"#),
                    "Gtk.Label",
                    vec![ArgumentDump::string(
                        0,
                        "str",
                        OperationDump::string(at(MAIN, r#""Name""#), "Name"),
                    )],
                ),
            ))
            .root(RootDump::new(
                "Main.cs",
                OperationDump::catch_clause(at(MAIN, "catch {}"), None, false, true),
            ))
            .root(RootDump::new(
                "Generated/Other.cs",
                OperationDump::assignment(
                    at(OTHER, r#"title.Text = "Size 2x3""#),
                    "Text",
                    "Gtk.Label",
                    OperationDump::string(at(OTHER, r#""Size 2x3""#), "Size 2x3"),
                ),
            ))
            .build()
            .unwrap()
    }

    fn rules_of(outcome: &AnalysisOutcome) -> Vec<(RuleId, &str)> {
        outcome
            .reports
            .iter()
            .map(|r| (r.rule, r.primary_span.document.as_str()))
            .collect()
    }

    #[test]
    fn test_analyze_groups_by_catalogue_order() {
        let engine = Engine::new(AnalysisOptions::default());
        let model = compilation();
        let outcome = engine.analyze(&model, &CancellationToken::new());
        assert!(!outcome.cancelled);
        assert_eq!(
            rules_of(&outcome),
            vec![
                (RuleId::GtkLocalization, "Generated/Other.cs"),
                (RuleId::GtkLocalization, "Main.cs"),
                (RuleId::GtkLocalization, "Main.cs"),
                (RuleId::Multiplication, "Generated/Other.cs"),
                (RuleId::Ellipsis, "Main.cs"),
                (RuleId::EmptyCatch, "Main.cs"),
            ]
        );
    }

    #[test]
    fn test_reports_are_deterministic() {
        let engine = Engine::new(AnalysisOptions::default());
        let model = compilation();
        let first = engine.analyze(&model, &CancellationToken::new());
        let second = engine.analyze(&model, &CancellationToken::new());
        assert_eq!(first.reports, second.reports);
    }

    #[test]
    fn test_ignored_documents() {
        let options = AnalysisOptions {
            ignores: vec![Pattern::new("Generated/**").unwrap()],
            ..Default::default()
        };
        let model = compilation();
        let outcome = Engine::new(options).analyze(&model, &CancellationToken::new());
        assert!(
            outcome
                .reports
                .iter()
                .all(|r| r.primary_span.document.as_str() == "Main.cs")
        );
        assert_eq!(outcome.reports.len(), 4);
    }

    #[test]
    fn test_ignore_texts() {
        let options = AnalysisOptions {
            ignore_texts: vec!["Name".to_string()],
            ..Default::default()
        };
        let model = compilation();
        let outcome = Engine::new(options).analyze(&model, &CancellationToken::new());
        let localization = outcome
            .reports
            .iter()
            .filter(|r| r.rule == RuleId::GtkLocalization)
            .count();
        assert_eq!(localization, 2);
    }

    #[test]
    fn test_session_states() {
        let engine = Engine::new(AnalysisOptions::default());
        let model = compilation();
        let mut session = engine.start(&model);
        assert_eq!(session.state(), SessionState::CompilationStarted);
        assert!(!session.catalogs().is_empty());
        let outcome = session.run(&CancellationToken::new());
        assert_eq!(session.state(), SessionState::Finalized);
        assert!(!outcome.reports.is_empty());
        assert!(session.run(&CancellationToken::new()).reports.is_empty());
    }

    #[test]
    fn test_cancelled_before_start_returns_partial_outcome() {
        let token = CancellationToken::new();
        token.cancel();
        let model = compilation();
        let outcome = Engine::new(AnalysisOptions::default()).analyze(&model, &token);
        assert!(outcome.cancelled);
        assert!(outcome.reports.is_empty());
    }

    #[test]
    fn test_gated_rules_are_not_counted() {
        let model = CompilationBuilder::new("Empty").build().unwrap();
        let outcome = Engine::new(AnalysisOptions::default()).analyze(&model, &CancellationToken::new());
        // String builder, typography and empty catch need no well-known types.
        assert_eq!(outcome.active_rules, 3);
        assert!(outcome.reports.is_empty());
    }

    const LITERALS: &str = r#"a = "1x2";
b = "3x4";
c = "5x6";
d = "7x8";
e = "9x9";
try { Run (); } catch {}
"#;

    fn literal_compilation() -> Compilation {
        let mut builder = CompilationBuilder::new("Literals").document("Main.cs", LITERALS);
        for value in ["1x2", "3x4", "5x6", "7x8", "9x9"] {
            let raw = format!("\"{value}\"");
            builder = builder.root(RootDump::new(
                "Main.cs",
                OperationDump::string(at(LITERALS, &raw), value),
            ));
        }
        builder
            .root(RootDump::new(
                "Main.cs",
                OperationDump::catch_clause(at(LITERALS, "catch {}"), None, false, true),
            ))
            .build()
            .unwrap()
    }

    /// Cancels `token` once `budget` literal texts have been read.
    struct CancelAfter<'a> {
        inner: &'a Compilation,
        token: CancellationToken,
        budget: AtomicUsize,
    }

    impl ProgramModel for CancelAfter<'_> {
        fn resolve_well_known_type(&self, full_name: &str) -> Option<TypeIdentity> {
            self.inner.resolve_well_known_type(full_name)
        }

        fn operations(&self, kinds: OperationKinds) -> Vec<OperationRef<'_>> {
            self.inner.operations(kinds)
        }

        fn declared_types(&self) -> &[TypeDeclaration] {
            self.inner.declared_types()
        }

        fn document_text(&self, document: &DocumentId) -> Option<&str> {
            self.inner.document_text(document)
        }

        fn syntax_text(&self, span: &Span) -> Option<&str> {
            if self.budget.fetch_sub(1, Ordering::SeqCst) == 1 {
                self.token.cancel();
            }
            self.inner.syntax_text(span)
        }
    }

    fn spans_of(outcome: &AnalysisOutcome, rule: RuleId) -> Vec<Span> {
        outcome
            .reports
            .iter()
            .filter(|r| r.rule == rule)
            .map(|r| r.primary_span.clone())
            .collect()
    }

    #[test]
    fn test_cancelled_mid_run_keeps_sorted_prefix() {
        let mut settings = RuleSettings::default();
        settings.restrict_to(&[RuleId::Multiplication, RuleId::EmptyCatch]);
        let engine = Engine::new(AnalysisOptions {
            settings,
            ..Default::default()
        });
        let model = literal_compilation();

        let full = engine.analyze(&model, &CancellationToken::new());
        assert!(!full.cancelled);
        let full_typography = spans_of(&full, RuleId::Multiplication);
        let full_catch = spans_of(&full, RuleId::EmptyCatch);
        assert_eq!(full_typography.len(), 5);
        assert_eq!(full_catch.len(), 1);

        let token = CancellationToken::new();
        let cancelling = CancelAfter {
            inner: &model,
            token: token.clone(),
            budget: AtomicUsize::new(3),
        };
        let partial = engine.analyze(&cancelling, &token);

        assert!(partial.cancelled);
        // The third literal is finished before the check that stops the rule.
        let typography = spans_of(&partial, RuleId::Multiplication);
        assert_eq!(typography, full_typography[..3].to_vec());
        assert!(typography.windows(2).all(|w| w[0] < w[1]));

        // Other rules stop wherever the flag found them.
        let catch = spans_of(&partial, RuleId::EmptyCatch);
        assert!(full_catch.starts_with(&catch));

        // Groups stay in catalogue order.
        let rules: Vec<RuleId> = partial.reports.iter().map(|r| r.rule).collect();
        let mut ordered = rules.clone();
        ordered.sort_by_key(|rule| RuleId::ALL.iter().position(|id| id == rule));
        assert_eq!(rules, ordered);
    }
}
