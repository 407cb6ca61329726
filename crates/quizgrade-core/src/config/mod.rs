pub mod scoring;

pub use scoring::{RatingBand, ScoringConfig};

use crate::errors::ConfigError;
use crate::providers::llm::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "quizgrade.yaml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProviderKind {
    /// OpenAI-compatible chat completions endpoint.
    #[default]
    #[serde(rename = "openai")]
    OpenAi,
    /// Scripted responses from `fake_responses`; never touches the network.
    #[serde(rename = "fake")]
    Fake,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    pub provider: ProviderKind,
    pub model: String,
    pub base_url: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    pub retry: RetryPolicy,
    pub scoring: ScoringConfig,
    /// References shorter than this are replaced by a generated gold answer.
    pub gold_answer_min_words: usize,
    /// Responses replayed in order by the `fake` provider.
    pub fake_responses: Vec<String>,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::OpenAi,
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "QUIZGRADE_API_KEY".to_string(),
            temperature: 0.3,
            max_tokens: 1024,
            timeout_secs: 30,
            retry: RetryPolicy::default(),
            scoring: ScoringConfig::default(),
            gold_answer_min_words: 30,
            fake_responses: Vec::new(),
        }
    }
}

impl EvaluatorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scoring.validate()?;
        if self.model.trim().is_empty() {
            return Err(ConfigError::Invalid("model must not be empty".to_string()));
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::Invalid(
                "max_tokens must be greater than 0".to_string(),
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::Invalid(format!(
                "temperature must lie in [0, 2] (got {})",
                self.temperature
            )));
        }
        Ok(())
    }
}

/// Loads and validates a YAML config file. Missing keys take their defaults.
pub fn load_config(path: &Path) -> Result<EvaluatorConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let cfg = if raw.trim().is_empty() {
        EvaluatorConfig::default()
    } else {
        serde_yaml::from_str::<EvaluatorConfig>(&raw).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?
    };
    cfg.validate()?;
    tracing::debug!(path = %path.display(), provider = ?cfg.provider, model = %cfg.model, "config loaded");
    Ok(cfg)
}
