//! Editor configuration persistence
//!
//! Stores editor preferences in `~/.config/draftkit/config.yaml`

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::length::LengthLimit;
use crate::links::DEFAULT_SCHEMES;
use crate::model::types;
use crate::registry::EntityRegistry;

/// Editor configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Maximum document length in characters (None = unlimited)
    #[serde(default)]
    pub max_length: Option<usize>,

    /// URL schemes accepted when pasting links
    #[serde(default = "default_link_schemes")]
    pub link_schemes: Vec<String>,

    /// Entity types the editor offers
    #[serde(default = "default_entity_types")]
    pub enabled_entity_types: Vec<String>,

    /// Number of undo steps kept
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

fn default_link_schemes() -> Vec<String> {
    DEFAULT_SCHEMES.iter().map(|s| s.to_string()).collect()
}

fn default_entity_types() -> Vec<String> {
    [types::LINK, types::DOCUMENT, types::IMAGE, types::EMBED]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_history_size() -> usize {
    100
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_length: None,
            link_schemes: default_link_schemes(),
            enabled_entity_types: default_entity_types(),
            history_size: default_history_size(),
        }
    }
}

impl EditorConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from a specific file, or return defaults on any failure
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        let path = crate::config_paths::config_file().context("No config directory available")?;
        self.save_to(&path)
    }

    /// Save config to a specific file
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Entity registry restricted to the enabled types
    pub fn registry(&self) -> EntityRegistry {
        EntityRegistry::with_defaults().restricted_to(&self.enabled_entity_types)
    }

    pub fn length_limit(&self) -> LengthLimit {
        LengthLimit::new(self.max_length)
    }
}
