//! Issue types for analysis results.
//!
//! Every rule emits [`IssueReport`]s. A report is self-contained with all the
//! information needed by:
//! - Reporter: to display the issue to users (text or JSON)
//! - Fixer: to rewrite the source text that caused it

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize, Serializer};

use crate::core::{
    catalog::CatalogKind,
    model::Span,
    text::{line_at, offset_to_position},
    typography::TypographyKind,
};

// ============================================================
// Severity and Category
// ============================================================

/// Severity level of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Gettext,
    Gtk,
    Xwt,
    Performance,
    Typography,
    Reliability,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Gettext => "gettext",
            Category::Gtk => "gtk",
            Category::Xwt => "xwt",
            Category::Performance => "performance",
            Category::Typography => "typography",
            Category::Reliability => "reliability",
        };
        f.write_str(name)
    }
}

// ============================================================
// Rule identifiers and descriptors
// ============================================================

/// Stable rule identifier. Displays as its code (`MD0005`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleId {
    CatalogLiteralOnly,
    GtkDestroy,
    AppendConcatenation,
    AppendSubstring,
    GtkLocalization,
    Ellipsis,
    Multiplication,
    EnDash,
    CatalogNoConcatenation,
    EmptyCatch,
    XwtLocalization,
}

/// What the host needs to know about a rule.
#[derive(Debug)]
pub struct RuleDescriptor {
    pub id: RuleId,
    pub code: &'static str,
    pub title: &'static str,
    pub message: &'static str,
    pub category: Category,
    pub default_severity: Severity,
    pub enabled_by_default: bool,
    pub fixable: bool,
}

static DESCRIPTORS: [RuleDescriptor; 11] = [
    RuleDescriptor {
        id: RuleId::CatalogLiteralOnly,
        code: "MD0001",
        title: "GetString calls should only use literal strings",
        message: "GetString calls should only use literal strings",
        category: Category::Gettext,
        default_severity: Severity::Warning,
        enabled_by_default: true,
        fixable: false,
    },
    RuleDescriptor {
        id: RuleId::GtkDestroy,
        code: "MD0002",
        title: "Do not override Gtk.Object.Destroy",
        message: "Override OnDestroyed rather than Destroy - the latter will not run from unmanaged destruction",
        category: Category::Gtk,
        default_severity: Severity::Error,
        enabled_by_default: true,
        fixable: false,
    },
    RuleDescriptor {
        id: RuleId::AppendConcatenation,
        code: "MD0003",
        title: "StringBuilder Append optimization",
        message: "Avoid concatenating non-constant strings by using multiple Append calls",
        category: Category::Performance,
        default_severity: Severity::Warning,
        enabled_by_default: true,
        fixable: false,
    },
    RuleDescriptor {
        id: RuleId::AppendSubstring,
        code: "MD0004",
        title: "StringBuilder Append optimization",
        message: "Use offset overloads of StringBuilder for better performance by avoiding string allocations",
        category: Category::Performance,
        default_severity: Severity::Warning,
        enabled_by_default: true,
        fixable: false,
    },
    RuleDescriptor {
        id: RuleId::GtkLocalization,
        code: "MD0005",
        title: "Localize user facing string",
        message: "Localize strings that are user facing",
        category: Category::Gtk,
        default_severity: Severity::Error,
        enabled_by_default: true,
        fixable: true,
    },
    RuleDescriptor {
        id: RuleId::Ellipsis,
        code: "MD0006",
        title: "Typography: ellipsis",
        message: "Use the ellipsis character instead of three dots",
        category: Category::Typography,
        default_severity: Severity::Info,
        enabled_by_default: true,
        fixable: true,
    },
    RuleDescriptor {
        id: RuleId::Multiplication,
        code: "MD0007",
        title: "Typography: multiplication sign",
        message: "Use the multiplication sign instead of the letter x between numbers",
        category: Category::Typography,
        default_severity: Severity::Info,
        enabled_by_default: true,
        fixable: true,
    },
    RuleDescriptor {
        id: RuleId::EnDash,
        code: "MD0008",
        title: "Typography: en dash",
        message: "Use an en dash instead of a hyphen between words",
        category: Category::Typography,
        default_severity: Severity::Info,
        enabled_by_default: false,
        fixable: true,
    },
    RuleDescriptor {
        id: RuleId::CatalogNoConcatenation,
        code: "MD0009",
        title: "GetString calls should not use concatenation",
        message: "GetString calls should not use concatenation",
        category: Category::Gettext,
        default_severity: Severity::Error,
        enabled_by_default: false,
        fixable: true,
    },
    RuleDescriptor {
        id: RuleId::EmptyCatch,
        code: "MD0010",
        title: "A catch clause that catches everything without doing anything to the exception",
        message: "Empty general catch clause suppresses any error",
        category: Category::Reliability,
        default_severity: Severity::Error,
        enabled_by_default: true,
        fixable: false,
    },
    RuleDescriptor {
        id: RuleId::XwtLocalization,
        code: "MD0011",
        title: "Localize user facing string",
        message: "Localize strings that are user facing",
        category: Category::Xwt,
        default_severity: Severity::Error,
        enabled_by_default: true,
        fixable: true,
    },
];

impl RuleId {
    /// Every rule, in catalogue order.
    pub const ALL: [RuleId; 11] = [
        RuleId::CatalogLiteralOnly,
        RuleId::GtkDestroy,
        RuleId::AppendConcatenation,
        RuleId::AppendSubstring,
        RuleId::GtkLocalization,
        RuleId::Ellipsis,
        RuleId::Multiplication,
        RuleId::EnDash,
        RuleId::CatalogNoConcatenation,
        RuleId::EmptyCatch,
        RuleId::XwtLocalization,
    ];

    pub fn descriptor(self) -> &'static RuleDescriptor {
        &DESCRIPTORS[self as usize]
    }

    pub fn code(self) -> &'static str {
        self.descriptor().code
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|id| id.code().eq_ignore_ascii_case(code))
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for RuleId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| format!("unknown rule id '{}'", s))
    }
}

impl Serialize for RuleId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

// ============================================================
// Issue Report
// ============================================================

/// Data a fixer needs to rewrite the code behind a report.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Payload {
    #[default]
    None,
    /// A typography match inside a literal. `offset` and `len` are decoded
    /// character positions in the literal's value; the report's primary span
    /// is the matching raw source range, whose text is `expected_raw`.
    LiteralSubSpan {
        literal_span: Span,
        offset: usize,
        len: usize,
        typography: TypographyKind,
        expected_raw: String,
    },
    /// A literal that should be wrapped in a catalog call.
    Localize {
        literal_span: Span,
        literal_text: String,
        catalogs: Vec<CatalogKind>,
    },
    /// A concatenation of literals that can be folded into one literal.
    FoldConcatenation {
        span: Span,
        expected_text: String,
        folded: String,
    },
}

impl Payload {
    pub fn is_none(&self) -> bool {
        matches!(self, Payload::None)
    }
}

/// One detected rule violation. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueReport {
    pub rule: RuleId,
    pub severity: Severity,
    pub message: String,
    pub primary_span: Span,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub additional_spans: Vec<Span>,
    #[serde(skip_serializing_if = "Payload::is_none")]
    pub payload: Payload,
}

impl IssueReport {
    pub fn new(rule: RuleId, primary_span: Span) -> Self {
        let descriptor = rule.descriptor();
        Self {
            rule,
            severity: descriptor.default_severity,
            message: descriptor.message.to_string(),
            primary_span,
            additional_spans: Vec::new(),
            payload: Payload::None,
        }
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    pub fn with_additional_span(mut self, span: Span) -> Self {
        self.additional_spans.push(span);
        self
    }

    pub fn is_fixable(&self) -> bool {
        !self.payload.is_none()
    }
}

// ============================================================
// Source Context (for CLI output)
// ============================================================

/// Position of a report in its document, with the line for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceContext {
    pub file_path: String,
    pub line: usize,
    pub col: usize,
    pub source_line: String,
    /// Number of characters to underline on `source_line`.
    pub width: usize,
}

impl SourceContext {
    pub fn resolve(file_path: impl Into<String>, span: &Span, text: &str) -> Self {
        let (line, col) = offset_to_position(text, span.start);
        let source_line = line_at(text, line).unwrap_or_default().to_string();
        let remaining = source_line.chars().count().saturating_sub(col - 1);
        let spanned = text
            .get(span.range())
            .map_or(1, |s| s.split('\n').next().unwrap_or_default().chars().count());
        Self {
            file_path: file_path.into(),
            line,
            col,
            source_line,
            width: spanned.clamp(1, remaining.max(1)),
        }
    }
}
