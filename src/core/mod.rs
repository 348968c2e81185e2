//! Core analysis building blocks.
//!
//! ## Module Structure
//!
//! - `model`: Program model facade and the in-memory compilation dump
//! - `catalog`: Localization catalogs referenced by a compilation
//! - `classify`: Literal classifier (is a string user-visible text?)
//! - `mapping`: Toolkit tables of localizable properties and parameters
//! - `typography`: Typography scanner
//! - `text`: Literal syntax codec and line/column helpers
//! - `file_scanner`: Discovery of compilation dumps on disk
//! - `context`: Configuration plus dumps for one CLI run

pub mod catalog;
pub mod classify;
pub mod context;
pub mod file_scanner;
pub mod mapping;
pub mod model;
pub mod text;
pub mod typography;

pub use context::{AnalysisRun, AnalyzedModel, CheckContext, LoadFailure};
