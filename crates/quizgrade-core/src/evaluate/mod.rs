mod evaluate_internal;
pub mod feedback;
pub mod scoring;

use crate::config::EvaluatorConfig;
use crate::model::EvaluationResult;
use crate::providers::llm::{build_client, LlmClient};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Pipeline stages, in execution order. There is no branching back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    GoldAnswer,
    Rubric,
    Analysis,
    Contradictions,
    FinalScore,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::GoldAnswer,
        Stage::Rubric,
        Stage::Analysis,
        Stage::Contradictions,
        Stage::FinalScore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::GoldAnswer => "gold_answer",
            Stage::Rubric => "rubric",
            Stage::Analysis => "analysis",
            Stage::Contradictions => "contradictions",
            Stage::FinalScore => "final_score",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const DEFAULT_MAX_SCORE: f64 = 100.0;

fn default_max_score() -> f64 {
    DEFAULT_MAX_SCORE
}

/// One submission to grade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub question: String,
    pub submission: String,
    /// Reference answer; replaced by a generated one when too short.
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default = "default_max_score")]
    pub max_score: f64,
}

impl EvaluationRequest {
    pub fn new(question: impl Into<String>, submission: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            submission: submission.into(),
            reference: None,
            max_score: DEFAULT_MAX_SCORE,
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn with_max_score(mut self, max_score: f64) -> Self {
        self.max_score = max_score;
        self
    }
}

/// Multi-stage descriptive-answer grader.
///
/// `evaluate` never fails outward: every internal failure degrades to a
/// stage default or, when nothing usable remains, to the fallback result.
#[derive(Clone)]
pub struct Evaluator {
    config: EvaluatorConfig,
    client: Arc<dyn LlmClient>,
}

impl Evaluator {
    pub fn new(config: EvaluatorConfig, client: Arc<dyn LlmClient>) -> Self {
        Self { config, client }
    }

    /// Builds the configured provider client.
    pub fn from_config(config: EvaluatorConfig) -> anyhow::Result<Self> {
        let client = build_client(&config)?;
        Ok(Self::new(config, client))
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    pub fn model_id(&self) -> &str {
        self.client.model_id()
    }

    pub async fn evaluate(&self, request: &EvaluationRequest) -> EvaluationResult {
        evaluate_internal::run::evaluate_impl(self, request).await
    }

    /// Sequential; results keep the order of `requests`.
    pub async fn evaluate_batch(&self, requests: &[EvaluationRequest]) -> Vec<EvaluationResult> {
        let mut results = Vec::with_capacity(requests.len());
        for (idx, request) in requests.iter().enumerate() {
            tracing::debug!(item = idx + 1, total = requests.len(), "batch evaluation");
            results.push(self.evaluate(request).await);
        }
        results
    }
}
