use serde::{Deserialize, Serialize};

use super::{Span, TypeChain, TypeIdentity};

/// Kind tag of an [`Operation`], used to subscribe rules to what they inspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Literal,
    Assignment,
    Invocation,
    Construction,
    Binary,
    Interpolation,
    Reference,
    CatchClause,
}

impl OperationKind {
    const fn bit(self) -> u16 {
        1 << self as u16
    }
}

/// Set of operation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OperationKinds(u16);

impl OperationKinds {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(u16::MAX);

    pub const fn of(kinds: &[OperationKind]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < kinds.len() {
            bits |= kinds[i].bit();
            i += 1;
        }
        Self(bits)
    }

    pub const fn contains(self, kind: OperationKind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Compile-time constant carried by a literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Constant {
    Str(String),
    Number(f64),
    Bool(bool),
    Null,
}

impl Constant {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Constant::Str(s) => Some(s),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BinaryOperator {
    /// `+`, which is string concatenation when either side is a string.
    #[default]
    Add,
    Other,
}

/// One argument of an invocation or construction, bound to its parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub position: usize,
    pub parameter_name: String,
    pub parameter_type: TypeIdentity,
    pub value: Operation,
}

/// A semantic construct of the analyzed program.
///
/// Operations are immutable; the engine only reads them.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Literal {
        value: Constant,
        span: Span,
    },
    /// Property assignment. `target_type` is the chain of the type declaring
    /// the property.
    Assignment {
        target_property: String,
        target_type: TypeChain,
        value: Box<Operation>,
        span: Span,
    },
    /// Method call. `callee_type` is the chain of the type declaring the
    /// method; `receiver_type` is the static type of the instance, if any.
    Invocation {
        callee_name: String,
        callee_type: TypeChain,
        receiver_type: Option<TypeChain>,
        arguments: Vec<Argument>,
        span: Span,
    },
    Construction {
        constructed_type: TypeChain,
        arguments: Vec<Argument>,
        span: Span,
    },
    Binary {
        operator: BinaryOperator,
        left: Box<Operation>,
        right: Box<Operation>,
        span: Span,
    },
    /// Interpolated string; never a literal even without holes.
    Interpolation {
        span: Span,
    },
    /// Any other non-literal expression (local, field, call result, ...).
    Reference {
        name: String,
        span: Span,
    },
    CatchClause {
        caught_type: Option<TypeChain>,
        has_filter: bool,
        handler_is_empty: bool,
        span: Span,
    },
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Literal { .. } => OperationKind::Literal,
            Operation::Assignment { .. } => OperationKind::Assignment,
            Operation::Invocation { .. } => OperationKind::Invocation,
            Operation::Construction { .. } => OperationKind::Construction,
            Operation::Binary { .. } => OperationKind::Binary,
            Operation::Interpolation { .. } => OperationKind::Interpolation,
            Operation::Reference { .. } => OperationKind::Reference,
            Operation::CatchClause { .. } => OperationKind::CatchClause,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            Operation::Literal { span, .. }
            | Operation::Assignment { span, .. }
            | Operation::Invocation { span, .. }
            | Operation::Construction { span, .. }
            | Operation::Binary { span, .. }
            | Operation::Interpolation { span }
            | Operation::Reference { span, .. }
            | Operation::CatchClause { span, .. } => span,
        }
    }

    /// The value of a string literal.
    pub fn as_string_literal(&self) -> Option<&str> {
        match self {
            Operation::Literal { value, .. } => value.as_str(),
            _ => None,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Operation::Literal { .. })
    }

    pub fn is_concatenation(&self) -> bool {
        matches!(
            self,
            Operation::Binary {
                operator: BinaryOperator::Add,
                ..
            }
        )
    }

    /// A literal, or a `+` chain whose every leaf is a literal.
    pub fn is_constant_concatenation(&self) -> bool {
        match self {
            Operation::Literal { .. } => true,
            Operation::Binary {
                operator: BinaryOperator::Add,
                left,
                right,
                ..
            } => left.is_constant_concatenation() && right.is_constant_concatenation(),
            _ => false,
        }
    }

    /// Folds a `+` chain of string literals into its value.
    pub fn folded_string(&self) -> Option<String> {
        match self {
            Operation::Literal { value, .. } => value.as_str().map(str::to_owned),
            Operation::Binary {
                operator: BinaryOperator::Add,
                left,
                right,
                ..
            } => {
                let mut folded = left.folded_string()?;
                folded.push_str(&right.folded_string()?);
                Some(folded)
            }
            _ => None,
        }
    }

    /// Direct child operations in source order.
    pub fn children(&self) -> Vec<&Operation> {
        match self {
            Operation::Assignment { value, .. } => vec![value.as_ref()],
            Operation::Invocation { arguments, .. } | Operation::Construction { arguments, .. } => {
                arguments.iter().map(|a| &a.value).collect()
            }
            Operation::Binary { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            Operation::Literal { .. }
            | Operation::Interpolation { .. }
            | Operation::Reference { .. }
            | Operation::CatchClause { .. } => Vec::new(),
        }
    }

    /// Pre-order walk over this operation and everything nested in it.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }
}

/// Finds the argument bound to the parameter at `position`.
pub fn argument_at(arguments: &[Argument], position: usize) -> Option<&Argument> {
    arguments.iter().find(|a| a.position == position)
}

pub struct Descendants<'a> {
    stack: Vec<&'a Operation>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Operation;

    fn next(&mut self) -> Option<Self::Item> {
        let op = self.stack.pop()?;
        self.stack.extend(op.children().into_iter().rev());
        Some(op)
    }
}
