//! Serializable compilation dump.
//!
//! A dump is what an external front-end writes after parsing and binding a
//! program. Types are referenced by fully-qualified name and spans are
//! `[start, len]` byte pairs relative to the root operation's document.
//!
//! ```json
//! {
//!   "name": "Sample",
//!   "documents": [{ "id": "Main.cs", "path": "Main.cs" }],
//!   "types": [{ "name": "Gtk.Label", "base": "Gtk.Widget" }],
//!   "operations": [{
//!     "document": "Main.cs",
//!     "containingType": "Sample.MainWindow",
//!     "operation": {
//!       "kind": "assignment",
//!       "property": "Text",
//!       "propertyType": "Gtk.Label",
//!       "value": { "kind": "literal", "value": "Hello", "span": [120, 7] },
//!       "span": [107, 20]
//!     }
//!   }]
//! }
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{BinaryOperator, Constant, STRING_TYPE};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilationDump {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub documents: Vec<DocumentDump>,
    #[serde(default)]
    pub types: Vec<TypeDump>,
    #[serde(default)]
    pub operations: Vec<RootDump>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDump {
    pub id: String,
    /// Inline document text. Takes precedence over `path`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Path of the document, relative to the dump file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl DocumentDump {
    pub fn inline(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: Some(text.into()),
            path: None,
        }
    }

    pub fn file(id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            text: None,
            path: Some(path.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDump {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_interface: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<MethodDump>,
}

impl TypeDump {
    pub fn class(name: impl Into<String>, base: Option<&str>) -> Self {
        Self {
            name: name.into(),
            base: base.map(str::to_owned),
            interfaces: Vec::new(),
            is_interface: false,
            methods: Vec::new(),
        }
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self {
            is_interface: true,
            ..Self::class(name, None)
        }
    }

    pub fn implementing(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn with_method(mut self, method: MethodDump) -> Self {
        self.methods.push(method);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDump {
    pub name: String,
    #[serde(default, rename = "override")]
    pub is_override: bool,
    pub document: String,
    pub span: SpanDump,
}

impl MethodDump {
    pub fn new(
        document: impl Into<String>,
        span: SpanDump,
        name: impl Into<String>,
        is_override: bool,
    ) -> Self {
        Self {
            name: name.into(),
            is_override,
            document: document.into(),
            span,
        }
    }
}

/// `[start, len]` in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct SpanDump(pub usize, pub usize);

impl SpanDump {
    /// Span of the first occurrence of `needle` in `text`.
    pub fn locate(text: &str, needle: &str) -> Option<Self> {
        Self::locate_nth(text, needle, 0)
    }

    /// Span of the `n`-th (0-based) occurrence of `needle` in `text`.
    pub fn locate_nth(text: &str, needle: &str, n: usize) -> Option<Self> {
        text.match_indices(needle)
            .nth(n)
            .map(|(start, m)| SpanDump(start, m.len()))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RootDump {
    pub document: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub containing_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub containing_member: Option<String>,
    pub operation: OperationDump,
}

impl RootDump {
    pub fn new(document: impl Into<String>, operation: OperationDump) -> Self {
        Self {
            document: document.into(),
            containing_type: None,
            containing_member: None,
            operation,
        }
    }

    pub fn within(mut self, containing_type: &str, containing_member: &str) -> Self {
        self.containing_type = Some(containing_type.to_owned());
        self.containing_member = Some(containing_member.to_owned());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgumentDump {
    /// Parameter position; defaults to the argument's index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    pub name: String,
    #[serde(rename = "type")]
    pub parameter_type: String,
    pub value: OperationDump,
}

impl ArgumentDump {
    pub fn new(
        position: usize,
        name: impl Into<String>,
        parameter_type: impl Into<String>,
        value: OperationDump,
    ) -> Self {
        Self {
            position: Some(position),
            name: name.into(),
            parameter_type: parameter_type.into(),
            value,
        }
    }

    /// Argument bound to a `System.String` parameter.
    pub fn string(position: usize, name: impl Into<String>, value: OperationDump) -> Self {
        Self::new(position, name, STRING_TYPE, value)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(
    tag = "kind",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum OperationDump {
    Literal {
        value: Constant,
        span: SpanDump,
    },
    Assignment {
        property: String,
        property_type: String,
        value: Box<OperationDump>,
        span: SpanDump,
    },
    Invocation {
        method: String,
        method_type: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        receiver_type: Option<String>,
        #[serde(default)]
        arguments: Vec<ArgumentDump>,
        span: SpanDump,
    },
    Construction {
        #[serde(rename = "type")]
        constructed_type: String,
        #[serde(default)]
        arguments: Vec<ArgumentDump>,
        span: SpanDump,
    },
    Binary {
        #[serde(default)]
        operator: BinaryOperator,
        left: Box<OperationDump>,
        right: Box<OperationDump>,
        span: SpanDump,
    },
    Interpolation {
        span: SpanDump,
    },
    Reference {
        name: String,
        span: SpanDump,
    },
    CatchClause {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caught_type: Option<String>,
        #[serde(default)]
        has_filter: bool,
        #[serde(default)]
        handler_is_empty: bool,
        span: SpanDump,
    },
}

impl OperationDump {
    pub fn string(span: SpanDump, value: impl Into<String>) -> Self {
        OperationDump::Literal {
            value: Constant::Str(value.into()),
            span,
        }
    }

    pub fn reference(span: SpanDump, name: impl Into<String>) -> Self {
        OperationDump::Reference {
            name: name.into(),
            span,
        }
    }

    pub fn concat(span: SpanDump, left: OperationDump, right: OperationDump) -> Self {
        OperationDump::Binary {
            operator: BinaryOperator::Add,
            left: Box::new(left),
            right: Box::new(right),
            span,
        }
    }

    pub fn assignment(
        span: SpanDump,
        property: impl Into<String>,
        property_type: impl Into<String>,
        value: OperationDump,
    ) -> Self {
        OperationDump::Assignment {
            property: property.into(),
            property_type: property_type.into(),
            value: Box::new(value),
            span,
        }
    }

    pub fn invocation(
        span: SpanDump,
        method_type: impl Into<String>,
        method: impl Into<String>,
        receiver_type: Option<&str>,
        arguments: Vec<ArgumentDump>,
    ) -> Self {
        OperationDump::Invocation {
            method: method.into(),
            method_type: method_type.into(),
            receiver_type: receiver_type.map(str::to_owned),
            arguments,
            span,
        }
    }

    pub fn construction(
        span: SpanDump,
        constructed_type: impl Into<String>,
        arguments: Vec<ArgumentDump>,
    ) -> Self {
        OperationDump::Construction {
            constructed_type: constructed_type.into(),
            arguments,
            span,
        }
    }

    pub fn catch_clause(
        span: SpanDump,
        caught_type: Option<&str>,
        has_filter: bool,
        handler_is_empty: bool,
    ) -> Self {
        OperationDump::CatchClause {
            caught_type: caught_type.map(str::to_owned),
            has_filter,
            handler_is_empty,
            span,
        }
    }
}
