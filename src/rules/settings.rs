//! Enabled state and severity per rule id.
//!
//! Defaults come from each rule's descriptor; overrides come from the config
//! file and CLI flags.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::issues::{RuleId, Severity};

/// Per-rule override as written in `.catalintrc.json`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSettings {
    overrides: BTreeMap<RuleId, RuleOverride>,
}

impl RuleSettings {
    /// Every rule enabled at its default severity.
    pub fn all_enabled() -> Self {
        let mut settings = Self::default();
        for id in RuleId::ALL {
            settings.set_enabled(id, true);
        }
        settings
    }

    pub fn set_override(&mut self, id: RuleId, rule: RuleOverride) {
        let entry = self.overrides.entry(id).or_default();
        if rule.enabled.is_some() {
            entry.enabled = rule.enabled;
        }
        if rule.severity.is_some() {
            entry.severity = rule.severity;
        }
    }

    pub fn set_enabled(&mut self, id: RuleId, enabled: bool) {
        self.overrides.entry(id).or_default().enabled = Some(enabled);
    }

    pub fn set_severity(&mut self, id: RuleId, severity: Severity) {
        self.overrides.entry(id).or_default().severity = Some(severity);
    }

    /// Disables every rule not in `ids` and enables those in it.
    pub fn restrict_to(&mut self, ids: &[RuleId]) {
        for id in RuleId::ALL {
            self.set_enabled(id, ids.contains(&id));
        }
    }

    pub fn is_enabled(&self, id: RuleId) -> bool {
        self.overrides
            .get(&id)
            .and_then(|o| o.enabled)
            .unwrap_or(id.descriptor().enabled_by_default)
    }

    pub fn severity(&self, id: RuleId) -> Severity {
        self.overrides
            .get(&id)
            .and_then(|o| o.severity)
            .unwrap_or(id.descriptor().default_severity)
    }

    pub fn enabled_rules(&self) -> Vec<RuleId> {
        RuleId::ALL
            .into_iter()
            .filter(|id| self.is_enabled(*id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_defaults_follow_descriptors() {
        let settings = RuleSettings::default();
        assert!(settings.is_enabled(RuleId::GtkLocalization));
        assert!(!settings.is_enabled(RuleId::EnDash));
        assert!(!settings.is_enabled(RuleId::CatalogNoConcatenation));
        assert_eq!(settings.severity(RuleId::AppendSubstring), Severity::Warning);
    }

    #[test]
    fn test_override_merges_fields() {
        let mut settings = RuleSettings::default();
        settings.set_override(
            RuleId::EnDash,
            RuleOverride {
                enabled: Some(true),
                severity: None,
            },
        );
        settings.set_override(
            RuleId::EnDash,
            RuleOverride {
                enabled: None,
                severity: Some(Severity::Warning),
            },
        );
        assert!(settings.is_enabled(RuleId::EnDash));
        assert_eq!(settings.severity(RuleId::EnDash), Severity::Warning);
    }

    #[test]
    fn test_restrict_to() {
        let mut settings = RuleSettings::default();
        settings.restrict_to(&[RuleId::EmptyCatch, RuleId::EnDash]);
        assert_eq!(settings.enabled_rules(), vec![RuleId::EnDash, RuleId::EmptyCatch]);
    }

    #[test]
    fn test_parse_override() {
        let rule: RuleOverride = serde_json::from_str(r#"{ "severity": "error" }"#).unwrap();
        assert_eq!(rule.enabled, None);
        assert_eq!(rule.severity, Some(Severity::Error));
    }
}
