use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use anyhow::Result;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::{
    cli::args::CommonArgs,
    config::{CONFIG_FILE_NAME, Config, load_config},
    core::{
        file_scanner::scan_model_files,
        model::{Compilation, DocumentId, ModelError},
    },
    engine::{AnalysisOptions, AnalysisOutcome, CancellationToken, Engine},
    issues::{IssueReport, RuleId},
};

/// A dump that loaded and was analyzed.
pub struct AnalyzedModel {
    pub path: PathBuf,
    pub compilation: Compilation,
    pub outcome: AnalysisOutcome,
}

impl AnalyzedModel {
    /// Path shown to users for `document`: its file on disk when known,
    /// otherwise the document id.
    pub fn display_path(&self, document: &DocumentId) -> String {
        self.compilation
            .document_path(document)
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| document.as_str().to_string())
    }
}

/// A dump that could not be loaded.
pub struct LoadFailure {
    pub path: PathBuf,
    pub error: ModelError,
}

#[derive(Default)]
pub struct AnalysisRun {
    pub models: Vec<AnalyzedModel>,
    pub failures: Vec<LoadFailure>,
}

impl AnalysisRun {
    pub fn reports(&self) -> impl Iterator<Item = (&AnalyzedModel, &IssueReport)> {
        self.models
            .iter()
            .flat_map(|model| model.outcome.reports.iter().map(move |r| (model, r)))
    }

    pub fn report_count(&self) -> usize {
        self.models.iter().map(|m| m.outcome.reports.len()).sum()
    }
}

/// Configuration and dump files for one `check` or `fix` run.
///
/// Configuration priority (highest to lowest):
/// 1. CLI arguments (`--source-root`, rule ids)
/// 2. `.catalintrc.json`
/// 3. Built-in defaults
pub struct CheckContext {
    pub config: Config,
    /// Directory scanned for dumps.
    pub root_dir: PathBuf,
    pub files: BTreeSet<PathBuf>,
    pub verbose: bool,
    options: AnalysisOptions,
}

impl CheckContext {
    pub fn new(common_args: &CommonArgs) -> Result<Self> {
        let start_dir = common_args
            .source_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));

        let config_result = load_config(&start_dir)?;
        if !config_result.from_file {
            info!("no {} found, using default configuration", CONFIG_FILE_NAME);
        }
        let config = config_result.config;

        // The CLI root already located the config; otherwise the config decides.
        let root_dir = match &common_args.source_root {
            Some(root) => root.clone(),
            None => Path::new(&config.source_root).to_path_buf(),
        };

        let scan_result = scan_model_files(&root_dir);
        if scan_result.skipped_count > 0 {
            warn!(
                skipped = scan_result.skipped_count,
                "paths skipped due to access errors"
            );
        }

        let options = config.analysis_options();
        Ok(Self {
            config,
            root_dir,
            files: scan_result.files,
            verbose: common_args.verbose,
            options,
        })
    }

    /// Runs only `ids`; an empty list keeps the configured rule set.
    pub fn restrict_rules(&mut self, ids: &[RuleId]) {
        if !ids.is_empty() {
            self.options.settings.restrict_to(ids);
        }
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    /// Loads and analyzes every dump in parallel. Results follow file order.
    pub fn analyze(&self, token: &CancellationToken) -> AnalysisRun {
        let engine = Engine::new(self.options.clone());
        let results: Vec<Result<AnalyzedModel, LoadFailure>> = self
            .files
            .par_iter()
            .map(|path| {
                let compilation = Compilation::load(path).map_err(|error| LoadFailure {
                    path: path.clone(),
                    error,
                })?;
                debug!(dump = %path.display(), name = compilation.name(), "analyzing");
                let outcome = engine.analyze(&compilation, token);
                Ok(AnalyzedModel {
                    path: path.clone(),
                    compilation,
                    outcome,
                })
            })
            .collect();

        let mut run = AnalysisRun::default();
        for result in results {
            match result {
                Ok(model) => run.models.push(model),
                Err(failure) => {
                    warn!(dump = %failure.path.display(), error = %failure.error, "failed to load dump");
                    run.failures.push(failure);
                }
            }
        }
        run
    }
}
