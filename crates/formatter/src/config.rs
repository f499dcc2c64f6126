use crate::error::{FormatError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thoughts_protocol::MetaField;

/// Configuration layered over the built-in label and synonym tables.
///
/// ```toml
/// pre_content_only = true
///
/// [labels]
/// plan_notes = "Planner Notes"
///
/// [meta_labels]
/// agentType = ["Agent Type", "Persona"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormatterConfig {
    /// Extra or replacement display labels, keyed by raw payload key
    pub labels: BTreeMap<String, String>,

    /// Synonym lists replacing the built-in ones, keyed by camelCase field name
    pub meta_labels: BTreeMap<String, Vec<String>>,

    /// Parse metadata only from the text before the `Content:` marker
    pub pre_content_only: bool,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            labels: BTreeMap::new(),
            meta_labels: BTreeMap::new(),
            pre_content_only: true,
        }
    }
}

impl FormatterConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&raw)?;
        log::debug!(
            "loaded formatter config from {} ({} labels, {} meta overrides)",
            path.display(),
            config.labels.len(),
            config.meta_labels.len()
        );
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        for (key, label) in &self.labels {
            if key.trim().is_empty() {
                return Err(FormatError::invalid_config("label keys must not be blank"));
            }
            if label.trim().is_empty() {
                return Err(FormatError::invalid_config(format!(
                    "label for {key:?} must not be blank"
                )));
            }
        }

        for (name, synonyms) in &self.meta_labels {
            if MetaField::from_name(name).is_none() {
                return Err(FormatError::invalid_config(format!(
                    "unknown meta field {name:?}"
                )));
            }
            if synonyms.is_empty() {
                return Err(FormatError::invalid_config(format!(
                    "meta field {name:?} needs at least one label"
                )));
            }
            if synonyms.iter().any(|s| s.trim().is_empty()) {
                return Err(FormatError::invalid_config(format!(
                    "meta field {name:?} has a blank label"
                )));
            }
        }

        Ok(())
    }

    /// `meta_labels` keyed by field. Unknown names are skipped; `validate` reports them.
    #[must_use]
    pub fn meta_overrides(&self) -> BTreeMap<MetaField, Vec<String>> {
        self.meta_labels
            .iter()
            .filter_map(|(name, labels)| Some((MetaField::from_name(name)?, labels.clone())))
            .collect()
    }
}
