//! Program model facade.
//!
//! The engine never parses source text itself. It reads a resolved
//! [`ProgramModel`]: a stream of semantic [`Operation`]s with byte spans, plus
//! type resolution for is-a checks. [`Compilation`] is the in-memory model
//! loaded from a JSON compilation dump (see [`dump`]).
//!
//! ## Module Structure
//!
//! - `types`: type identities and ancestry chains
//! - `operation`: the operation tree and its walk
//! - `dump`: serializable wire format of a compilation
//! - `compilation`: the loaded model and its builder

use std::{fmt, ops::Range, path::PathBuf, sync::Arc};

use serde::Serialize;
use thiserror::Error;

mod compilation;
pub mod dump;
mod operation;
mod types;

pub use compilation::{Compilation, CompilationBuilder};
pub use operation::{
    Argument, BinaryOperator, Constant, Descendants, Operation, OperationKind, OperationKinds,
    argument_at,
};
pub use types::{OBJECT_TYPE, STRING_TYPE, TypeChain, TypeIdentity};

/// Identifier of a source document inside a compilation (usually its path).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DocumentId(Arc<str>);

impl DocumentId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Byte range inside one document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Span {
    pub document: DocumentId,
    pub start: usize,
    pub len: usize,
}

impl Span {
    pub fn new(document: DocumentId, start: usize, len: usize) -> Self {
        Self {
            document,
            start,
            len,
        }
    }

    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }

    /// A span relative to this one: `offset` bytes in, `len` bytes long.
    pub fn sub_span(&self, offset: usize, len: usize) -> Span {
        Span::new(self.document.clone(), self.start + offset, len)
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.document == other.document && self.start < other.end() && other.start < self.end()
    }
}

/// Where a root operation occurs textually.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    pub containing_type: Option<TypeChain>,
    pub containing_member: Option<String>,
}

/// An operation together with the scope it was found in.
#[derive(Debug, Clone, Copy)]
pub struct OperationRef<'a> {
    pub operation: &'a Operation,
    pub scope: &'a Scope,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDeclaration {
    pub name: String,
    pub is_override: bool,
    pub span: Span,
}

/// A type declared by the compilation, for symbol-level rules.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDeclaration {
    pub identity: TypeIdentity,
    pub chain: TypeChain,
    pub is_interface: bool,
    pub methods: Vec<MethodDeclaration>,
}

/// Read-only view of a resolved program.
///
/// Implementations must be safe for unsynchronized concurrent reads: rules
/// are evaluated in parallel against the same model.
pub trait ProgramModel: Sync {
    /// Looks a type up by fully-qualified name. `None` when the compilation
    /// does not reference it.
    fn resolve_well_known_type(&self, full_name: &str) -> Option<TypeIdentity>;

    /// Every operation whose kind is in `kinds`, nested ones included, in
    /// source order.
    fn operations(&self, kinds: OperationKinds) -> Vec<OperationRef<'_>>;

    fn declared_types(&self) -> &[TypeDeclaration];

    fn document_text(&self, document: &DocumentId) -> Option<&str>;

    fn source_span<'a>(&self, operation: &'a Operation) -> &'a Span {
        operation.span()
    }

    /// Source text under `span`; `None` if the span is out of range or does
    /// not fall on character boundaries.
    fn syntax_text(&self, span: &Span) -> Option<&str> {
        self.document_text(&span.document)?.get(span.range())
    }
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid compilation dump: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document '{0}' has neither inline text nor a path")]
    MissingDocumentText(String),

    #[error("document '{0}' is declared more than once")]
    DuplicateDocument(String),

    #[error("reference to unknown document '{0}'")]
    UnknownDocument(String),

    #[error("span {start}..{end} is outside document '{document}'")]
    SpanOutOfRange {
        document: String,
        start: usize,
        end: usize,
    },

    #[error("type '{0}' is declared more than once")]
    DuplicateType(String),

    #[error("type '{0}' has a cyclic inheritance chain")]
    CyclicInheritance(String),
}
