use std::{fmt, sync::Arc};

use serde::Serialize;

/// Fully-qualified name of the string type parameters are compared against.
pub const STRING_TYPE: &str = "System.String";

/// Synthetic root every resolved class chain ends with.
pub const OBJECT_TYPE: &str = "System.Object";

/// Identity of a type, keyed by its fully-qualified name (e.g. `Gtk.Label`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TypeIdentity(Arc<str>);

impl TypeIdentity {
    pub fn new(full_name: impl AsRef<str>) -> Self {
        Self(Arc::from(full_name.as_ref()))
    }

    pub fn full_name(&self) -> &str {
        &self.0
    }

    /// Last dotted segment: `Gtk.Label` -> `Label`.
    pub fn simple_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }

    pub fn is_string(&self) -> bool {
        matches!(&*self.0, STRING_TYPE | "string")
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ancestry of a type used for is-a checks.
///
/// `ancestors` runs from the most-derived type to the synthetic root and never
/// repeats a type. `interfaces` holds every interface implemented anywhere in
/// the chain, deduplicated in discovery order.
///
/// A chain built for a type the program model does not declare is *unresolved*:
/// it only contains the type itself, so is-a checks against anything else fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeChain {
    ancestors: Vec<TypeIdentity>,
    interfaces: Vec<TypeIdentity>,
    resolved: bool,
}

impl TypeChain {
    pub fn new(ancestors: Vec<TypeIdentity>, interfaces: Vec<TypeIdentity>) -> Self {
        Self {
            ancestors,
            interfaces,
            resolved: true,
        }
    }

    pub fn unresolved(ty: TypeIdentity) -> Self {
        Self {
            ancestors: vec![ty],
            interfaces: Vec::new(),
            resolved: false,
        }
    }

    pub fn most_derived(&self) -> Option<&TypeIdentity> {
        self.ancestors.first()
    }

    /// Simple name of the most-derived type, or `""` for an empty chain.
    pub fn simple_name(&self) -> &str {
        self.most_derived().map_or("", TypeIdentity::simple_name)
    }

    pub fn ancestors(&self) -> &[TypeIdentity] {
        &self.ancestors
    }

    pub fn interfaces(&self) -> &[TypeIdentity] {
        &self.interfaces
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// True if `full_name` is this type or one of its base classes.
    pub fn derives_from(&self, full_name: &str) -> bool {
        self.ancestors.iter().any(|t| t.full_name() == full_name)
    }

    pub fn implements(&self, full_name: &str) -> bool {
        self.interfaces.iter().any(|t| t.full_name() == full_name)
    }

    pub fn is_a(&self, full_name: &str) -> bool {
        self.derives_from(full_name) || self.implements(full_name)
    }

    /// Walks the ancestors upward and returns the first value produced by `f`.
    pub fn find_ancestor<'a, T>(&'a self, f: impl FnMut(&'a TypeIdentity) -> Option<T>) -> Option<T> {
        self.ancestors.iter().find_map(f)
    }
}
