//! Catalint - localization and typography checker for .NET desktop code
//!
//! Catalint analyzes compilation dumps written by a C# front-end and reports
//! user-visible strings that bypass a localization catalog, catalog lookups
//! whose phrase is not a literal, ASCII stand-ins for typographic characters,
//! wasteful `StringBuilder.Append` calls and a few reliability problems.
//! Most text issues come with automatic fixes.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (user-facing commands)
//! - `config`: Configuration file loading and parsing
//! - `core`: Program model, catalogs, classifier, toolkit tables and scanners
//! - `engine`: Rule engine driving one analysis session per compilation
//! - `fixes`: Text fixes for reported issues
//! - `issues`: Rule catalogue and issue reports
//! - `rules`: Detection rules

pub mod cli;
pub mod config;
pub mod core;
pub mod engine;
pub mod fixes;
pub mod issues;
pub mod rules;
