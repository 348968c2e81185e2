//! Localization catalog resolution.
//!
//! A program may use zero, one or several catalog mechanisms. The set of
//! catalogs a compilation references is resolved once when analysis starts
//! and gates every catalog-aware rule.

use std::fmt;

use clap::ValueEnum;
use serde::Serialize;

use super::model::{ProgramModel, TypeChain, TypeIdentity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    /// Gettext-style catalog of the IDE core.
    Gettext,
    /// Translation catalog of IDE components.
    Translation,
    /// Add-in localizer.
    Addins,
    /// Operating-system catalog.
    Unix,
}

impl CatalogKind {
    /// Expression that translates a string through this catalog, ready to be
    /// followed by `(<literal>)`.
    pub fn get_string_expression(self) -> &'static str {
        match self {
            CatalogKind::Gettext => "GettextCatalog.GetString",
            CatalogKind::Translation => "TranslationCatalog.GetString",
            CatalogKind::Addins => "AddinManager.CurrentLocalizer.GetString",
            CatalogKind::Unix => "Catalog.GetString",
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CatalogKind::Gettext => "gettext",
            CatalogKind::Translation => "translation",
            CatalogKind::Addins => "addins",
            CatalogKind::Unix => "unix",
        };
        f.write_str(name)
    }
}

/// A catalog type looked up by fully-qualified name.
#[derive(Debug, Clone, Copy)]
pub struct WellKnownCatalog {
    pub kind: CatalogKind,
    pub type_name: &'static str,
}

pub const WELL_KNOWN_CATALOGS: &[WellKnownCatalog] = &[
    WellKnownCatalog {
        kind: CatalogKind::Gettext,
        type_name: "MonoDevelop.Core.GettextCatalog",
    },
    WellKnownCatalog {
        kind: CatalogKind::Translation,
        type_name: "Xamarin.Components.Ide.TranslationCatalog",
    },
    WellKnownCatalog {
        kind: CatalogKind::Addins,
        type_name: "Mono.Addins.Localization.IAddinLocalizer",
    },
    WellKnownCatalog {
        kind: CatalogKind::Addins,
        type_name: "Mono.Addins.AddinLocalizer",
    },
    WellKnownCatalog {
        kind: CatalogKind::Unix,
        type_name: "Mono.Unix.Catalog",
    },
];

/// Catalog types resolved for one compilation. Immutable once resolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogSet {
    resolved: Vec<(CatalogKind, TypeIdentity)>,
}

impl CatalogSet {
    /// Looks up every well-known catalog independently; any subset may be absent.
    pub fn resolve<M: ProgramModel + ?Sized>(model: &M) -> Self {
        let resolved = WELL_KNOWN_CATALOGS
            .iter()
            .filter_map(|c| Some((c.kind, model.resolve_well_known_type(c.type_name)?)))
            .collect();
        Self { resolved }
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }

    pub fn types(&self) -> impl Iterator<Item = &TypeIdentity> {
        self.resolved.iter().map(|(_, ty)| ty)
    }

    /// Distinct catalog kinds in resolution order.
    pub fn kinds(&self) -> Vec<CatalogKind> {
        let mut kinds: Vec<CatalogKind> = Vec::with_capacity(self.resolved.len());
        for (kind, _) in &self.resolved {
            if !kinds.contains(kind) {
                kinds.push(*kind);
            }
        }
        kinds
    }

    pub fn contains(&self, kind: CatalogKind) -> bool {
        self.resolved.iter().any(|(k, _)| *k == kind)
    }

    /// True if `chain` derives from or implements a resolved catalog type.
    pub fn is_catalog_type(&self, chain: &TypeChain) -> bool {
        self.types().any(|ty| chain.is_a(ty.full_name()))
    }
}
