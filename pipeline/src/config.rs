//! Run configuration loaded from a TOML file.
//!
//! ```toml
//! keywords = ["python", "data science"]
//! question = "Is this subreddit relevant to learning Python?"
//! top_n = 10
//! top_k = 5
//! model = "gpt-4o-mini"
//! output_path = "subreddits.json"
//!
//! [consensus]
//! method = "majority"
//! n_votes = 5
//! ```

use consensus::ConsensusPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use subscout_core::{ConfigError, CoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Search keywords, one subreddit search each.
    pub keywords: Vec<String>,
    /// Yes/no relevance question put to the vote caster.
    pub question: String,
    /// Subreddits fetched per keyword.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Posts fetched per subreddit.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Vote-caster model identifier.
    #[serde(default = "default_model")]
    pub model: String,
    /// Report destination.
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
    /// Consensus policy applied to every subreddit decision.
    #[serde(default)]
    pub consensus: ConsensusPolicy,
}

fn default_top_n() -> usize {
    10
}

fn default_top_k() -> usize {
    5
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_output_path() -> PathBuf {
    PathBuf::from("output.json")
}

impl RunConfig {
    /// Load and validate a run configuration file.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let contents = std::fs::read_to_string(path).map_err(|_| {
            CoreError::Config(ConfigError::FileNotFound {
                path: path.display().to_string(),
            })
        })?;

        let config: RunConfig = toml::from_str(&contents).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject bad parameters before any external call is made.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.keywords.is_empty() || self.keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(ConfigError::MissingField {
                field: "keywords".to_string(),
            });
        }
        if self.question.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "question".to_string(),
            });
        }
        if self.top_n < 1 {
            return Err(ConfigError::InvalidValue {
                field: "top_n".to_string(),
                value: self.top_n.to_string(),
            });
        }
        self.consensus.validate()
    }
}
