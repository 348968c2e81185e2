use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::{
    core::mapping::Toolkit,
    engine::AnalysisOptions,
    issues::RuleId,
    rules::{RuleOverride, RuleSettings},
};

pub const CONFIG_FILE_NAME: &str = ".catalintrc.json";

/// File name suffix of compilation dumps picked up by `check` and `fix`.
pub const MODEL_FILE_SUFFIX: &str = ".cmodel.json";

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub ignores: Vec<String>,
    #[serde(default)]
    pub ignore_texts: Vec<String>,
    #[serde(default = "default_toolkits")]
    pub toolkits: Vec<Toolkit>,
    #[serde(default)]
    pub rules: BTreeMap<String, RuleOverride>,
    #[serde(default)]
    pub en_dash: bool,
    #[serde(default = "default_source_root")]
    pub source_root: String,
}

fn default_toolkits() -> Vec<Toolkit> {
    Toolkit::ALL.to_vec()
}

fn default_source_root() -> String {
    "./".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignores: Vec::new(),
            ignore_texts: Vec::new(),
            toolkits: default_toolkits(),
            rules: BTreeMap::new(),
            en_dash: false,
            source_root: default_source_root(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error for invalid glob patterns in `ignores` and for
    /// unknown rule ids in `rules`. Unknown toolkits fail while parsing.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        for code in self.rules.keys() {
            if RuleId::from_code(code).is_none() {
                bail!("Unknown rule id in 'rules': \"{}\"", code);
            }
        }

        Ok(())
    }

    /// Rule settings after applying `enDash` and the `rules` map, in that order.
    pub fn rule_settings(&self) -> RuleSettings {
        let mut settings = RuleSettings::default();
        if self.en_dash {
            settings.set_enabled(RuleId::EnDash, true);
        }
        for (code, rule) in &self.rules {
            if let Some(id) = RuleId::from_code(code) {
                settings.set_override(id, *rule);
            }
        }
        settings
    }

    /// Engine options for this configuration. Call [`Config::validate`] first;
    /// invalid patterns are dropped here.
    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            settings: self.rule_settings(),
            toolkits: self.toolkits.clone(),
            ignore_texts: self.ignore_texts.clone(),
            ignores: self
                .ignores
                .iter()
                .filter_map(|p| Pattern::new(p).ok())
                .collect(),
        }
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}
