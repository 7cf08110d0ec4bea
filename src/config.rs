//! Lookup configuration, persisted as TOML.
//!
//! The default relation set lives here as a plain value rather than global
//! state; callers that want a different set pass their own config. A user
//! config is looked up at `$XDG_CONFIG_HOME/scene-facts/config.toml`.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::filter::RelationFilter;
use crate::render::Relation;

/// Default ConceptNet API host.
pub const DEFAULT_BASE_URL: &str = "https://api.conceptnet.io";

/// Settings for one fact lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactsConfig {
    /// Base URL of the ConceptNet API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Language segment of concept URIs (`/c/{language}/...`).
    #[serde(default = "default_language")]
    pub language: String,
    /// Relation labels to keep.
    #[serde(default = "default_relations")]
    pub relations: BTreeSet<String>,
    /// Result limit for each single-object lookup.
    #[serde(default = "default_limit")]
    pub per_object_limit: usize,
    /// Result limit for each pair lookup.
    #[serde(default = "default_limit")]
    pub pair_limit: usize,
    /// Minimum edge weight to keep.
    #[serde(default = "default_min_weight")]
    pub min_weight: f64,
    /// Maximum number of facts returned.
    #[serde(default = "default_max_facts")]
    pub max_facts: usize,
    /// Per-request timeout. Requests are never retried.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Issue the lookups concurrently.
    #[serde(default)]
    pub parallel: bool,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}
fn default_language() -> String {
    "en".into()
}
/// The nine relations with sentence templates.
pub fn default_relations() -> BTreeSet<String> {
    Relation::KNOWN
        .iter()
        .map(|r| r.label().to_string())
        .collect()
}
fn default_limit() -> usize {
    25
}
fn default_min_weight() -> f64 {
    1.0
}
fn default_max_facts() -> usize {
    40
}
fn default_timeout_secs() -> u64 {
    30
}

impl Default for FactsConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            language: default_language(),
            relations: default_relations(),
            per_object_limit: default_limit(),
            pair_limit: default_limit(),
            min_weight: default_min_weight(),
            max_facts: default_max_facts(),
            timeout_secs: default_timeout_secs(),
            parallel: false,
        }
    }
}

impl FactsConfig {
    /// Replace the relation set.
    pub fn with_relations<I, S>(mut self, relations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.relations = relations.into_iter().map(Into::into).collect();
        self
    }

    /// Edge filter for this config. An empty relation set means the defaults.
    pub fn filter(&self) -> RelationFilter {
        if self.relations.is_empty() {
            return RelationFilter::new(default_relations(), self.min_weight);
        }
        RelationFilter::new(self.relations.iter().cloned(), self.min_weight)
    }

    /// Reject values no lookup can work with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "base_url",
                message: "must not be empty".into(),
            });
        }
        if self.language.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "language",
                message: "must not be empty".into(),
            });
        }
        if !self.min_weight.is_finite() {
            return Err(ConfigError::Invalid {
                field: "min_weight",
                message: format!("must be a finite number, got {}", self.min_weight),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "timeout_secs",
                message: "must be greater than zero".into(),
            });
        }
        Ok(())
    }

    /// Load from a TOML file. Missing keys take their defaults.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, else the user config if it exists, else defaults.
    pub fn resolve(path: Option<&Path>) -> ConfigResult<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match default_config_path() {
            Ok(path) if path.is_file() => {
                tracing::debug!(path = %path.display(), "loading user config");
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize {
            message: e.to_string(),
        })
    }
}

/// `$XDG_CONFIG_HOME/scene-facts/config.toml`, falling back to
/// `$HOME/.config/scene-facts/config.toml`.
pub fn default_config_path() -> ConfigResult<PathBuf> {
    let config_home = match std::env::var("XDG_CONFIG_HOME") {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => std::env::var("HOME")
            .map(|home| PathBuf::from(home).join(".config"))
            .map_err(|_| ConfigError::NoHome)?,
    };
    Ok(config_home.join("scene-facts").join("config.toml"))
}
