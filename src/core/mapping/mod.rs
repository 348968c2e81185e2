//! Declarative tables of which members of which UI types carry user-facing text.
//!
//! Tables are process-wide constants indexed once on first use and never
//! mutated afterwards, so concurrent readers need no synchronization.
//!
//! Owner types are matched by simple name while walking a [`TypeChain`] from
//! the most-derived type upward; the first ancestor with a match wins and
//! tables are never merged across ancestors.

use std::{collections::HashMap, fmt, sync::LazyLock};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::model::TypeChain;

mod gtk;
mod xwt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Property,
    ConstructorArg,
    MethodArg,
}

/// Member name used for constructor entries.
pub const CONSTRUCTOR: &str = ".ctor";

/// One member of one type that carries user-facing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingEntry {
    pub owner_type: &'static str,
    pub member_kind: MemberKind,
    pub member_name: &'static str,
    pub arg_position: Option<usize>,
    pub arg_name: Option<&'static str>,
}

impl MappingEntry {
    pub const fn property(owner_type: &'static str, name: &'static str) -> Self {
        Self {
            owner_type,
            member_kind: MemberKind::Property,
            member_name: name,
            arg_position: None,
            arg_name: None,
        }
    }

    pub const fn constructor_arg(
        owner_type: &'static str,
        position: usize,
        arg_name: &'static str,
    ) -> Self {
        Self {
            owner_type,
            member_kind: MemberKind::ConstructorArg,
            member_name: CONSTRUCTOR,
            arg_position: Some(position),
            arg_name: Some(arg_name),
        }
    }

    pub const fn method_arg(
        owner_type: &'static str,
        method: &'static str,
        position: usize,
        arg_name: &'static str,
    ) -> Self {
        Self {
            owner_type,
            member_kind: MemberKind::MethodArg,
            member_name: method,
            arg_position: Some(position),
            arg_name: Some(arg_name),
        }
    }

    /// Both the position and the declared parameter name must agree.
    pub fn matches_parameter(&self, position: usize, name: &str) -> bool {
        self.arg_position == Some(position) && self.arg_name == Some(name)
    }
}

/// A known-noisy combination that is never reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialCase {
    pub owner_type: &'static str,
    pub member_name: &'static str,
    /// Only filter this literal value; `None` filters every value.
    pub literal: Option<&'static str>,
}

impl SpecialCase {
    pub fn matches(&self, member_name: &str, literal: &str) -> bool {
        self.member_name == member_name && self.literal.is_none_or(|l| l == literal)
    }
}

/// Static data for one UI toolkit.
#[derive(Debug)]
pub struct ToolkitTable {
    pub name: &'static str,
    /// Fully-qualified base widget type; a compilation that does not
    /// reference it is not checked against this table.
    pub base_type: &'static str,
    pub entries: &'static [MappingEntry],
    pub special_cases: &'static [SpecialCase],
}

/// Indexed view of a [`ToolkitTable`].
#[derive(Debug)]
pub struct MappingRegistry {
    table: &'static ToolkitTable,
    by_owner: HashMap<&'static str, Vec<&'static MappingEntry>>,
}

impl MappingRegistry {
    pub fn new(table: &'static ToolkitTable) -> Self {
        let mut by_owner: HashMap<&'static str, Vec<&'static MappingEntry>> = HashMap::new();
        for entry in table.entries {
            by_owner.entry(entry.owner_type).or_default().push(entry);
        }
        Self { table, by_owner }
    }

    pub fn table(&self) -> &'static ToolkitTable {
        self.table
    }

    pub fn base_type(&self) -> &'static str {
        self.table.base_type
    }

    /// Entries for `member` on the nearest ancestor of `chain` that has any.
    pub fn lookup(
        &self,
        chain: &TypeChain,
        kind: MemberKind,
        member: &str,
    ) -> Vec<&'static MappingEntry> {
        chain
            .find_ancestor(|ty| {
                let found: Vec<_> = self
                    .by_owner
                    .get(ty.simple_name())?
                    .iter()
                    .copied()
                    .filter(|e| e.member_kind == kind && e.member_name == member)
                    .collect();
                (!found.is_empty()).then_some(found)
            })
            .unwrap_or_default()
    }

    pub fn property(&self, chain: &TypeChain, name: &str) -> Option<&'static MappingEntry> {
        self.lookup(chain, MemberKind::Property, name).into_iter().next()
    }

    pub fn constructor_arguments(&self, chain: &TypeChain) -> Vec<&'static MappingEntry> {
        self.lookup(chain, MemberKind::ConstructorArg, CONSTRUCTOR)
    }

    pub fn method_arguments(&self, chain: &TypeChain, method: &str) -> Vec<&'static MappingEntry> {
        self.lookup(chain, MemberKind::MethodArg, method)
    }

    /// True if `member` on `chain` with value `literal` is a filtered special case.
    pub fn is_filtered_special_case(&self, chain: &TypeChain, member: &str, literal: &str) -> bool {
        chain.ancestors().iter().any(|ty| {
            self.table
                .special_cases
                .iter()
                .any(|case| case.owner_type == ty.simple_name() && case.matches(member, literal))
        })
    }
}

static GTK_REGISTRY: LazyLock<MappingRegistry> = LazyLock::new(|| MappingRegistry::new(&gtk::TABLE));
static XWT_REGISTRY: LazyLock<MappingRegistry> = LazyLock::new(|| MappingRegistry::new(&xwt::TABLE));

/// Supported UI toolkits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Toolkit {
    Gtk,
    Xwt,
}

impl Toolkit {
    pub const ALL: [Toolkit; 2] = [Toolkit::Gtk, Toolkit::Xwt];

    pub fn registry(self) -> &'static MappingRegistry {
        match self {
            Toolkit::Gtk => &GTK_REGISTRY,
            Toolkit::Xwt => &XWT_REGISTRY,
        }
    }
}

impl fmt::Display for Toolkit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.registry().table().name)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::model::{OBJECT_TYPE, TypeIdentity};

    fn chain(names: &[&str]) -> TypeChain {
        TypeChain::new(names.iter().map(TypeIdentity::new).collect(), Vec::new())
    }

    #[test]
    fn test_matching_requires_position_and_name() {
        let entry = MappingEntry::constructor_arg("Label", 0, "str");
        assert!(entry.matches_parameter(0, "str"));
        assert!(!entry.matches_parameter(0, "text"));
        assert!(!entry.matches_parameter(1, "str"));
    }

    #[test]
    fn test_property_lookup_walks_to_widget() {
        let registry = Toolkit::Gtk.registry();
        let label = chain(&["Gtk.Label", "Gtk.Misc", "Gtk.Widget", OBJECT_TYPE]);
        assert!(registry.property(&label, "Text").is_some());
        assert!(registry.property(&label, "Name").is_none());
        let unrelated = chain(&["App.Model", OBJECT_TYPE]);
        assert!(registry.property(&unrelated, "Text").is_none());
    }

    #[test]
    fn test_constructor_lookup_first_match_wins() {
        let registry = Toolkit::Gtk.registry();
        let derived = chain(&["App.FancyRadio", "Gtk.RadioButton", "Gtk.CheckButton", "Gtk.Widget"]);
        let entries = registry.constructor_arguments(&derived);
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.owner_type == "RadioButton"));
    }

    #[test]
    fn test_method_lookup() {
        let registry = Toolkit::Gtk.registry();
        let notebook = chain(&["Gtk.Notebook", "Gtk.Container", "Gtk.Widget"]);
        let entries = registry.method_arguments(&notebook, "SetTabLabelText");
        assert_eq!(entries.len(), 1);
        assert!(entries[0].matches_parameter(1, "tab_text"));
        assert!(registry.method_arguments(&notebook, "AppendPage").is_empty());
    }

    #[test]
    fn test_special_cases() {
        let registry = Toolkit::Gtk.registry();
        let entry = chain(&["Gtk.Entry", "Gtk.Widget"]);
        let window = chain(&["Gtk.Window", "Gtk.Bin", "Gtk.Widget"]);
        assert!(registry.is_filtered_special_case(&entry, "Text", "anything"));
        assert!(registry.is_filtered_special_case(&window, "Title", "tooltip"));
        assert!(!registry.is_filtered_special_case(&window, "Title", "Preferences"));
        assert!(!registry.is_filtered_special_case(&window, "Text", "tooltip"));
    }

    #[test]
    fn test_toolkit_names() {
        assert_eq!(Toolkit::Gtk.to_string(), "gtk");
        assert_eq!(Toolkit::Xwt.registry().base_type(), "Xwt.Widget");
    }
}
