use super::prompt::SYSTEM_PROMPT;
use crate::errors::MalformedResponseError;
use crate::evaluate::{Evaluator, Stage};
use crate::json_extract::extract_json;
use serde_json::{Map, Value};

/// Why a stage could not use the generator's output.
#[derive(Debug)]
pub(crate) enum StageError {
    /// The call itself failed (transport, status, retries exhausted).
    Unreachable(String),
    /// A reply arrived but held no usable structure.
    Malformed(MalformedResponseError),
}

impl std::fmt::Display for StageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StageError::Unreachable(e) => write!(f, "generation unavailable: {}", e),
            StageError::Malformed(e) => write!(f, "malformed response: {}", e),
        }
    }
}

impl StageError {
    pub(crate) fn is_unreachable(&self) -> bool {
        matches!(self, StageError::Unreachable(_))
    }
}

pub(crate) async fn call_text(
    svc: &Evaluator,
    stage: Stage,
    prompt: &str,
) -> Result<String, StageError> {
    let system = [SYSTEM_PROMPT.to_string()];
    tracing::debug!(stage = %stage, prompt_chars = prompt.len(), "calling generator");
    let resp = svc
        .client
        .complete(prompt, Some(&system))
        .await
        .map_err(|e| StageError::Unreachable(format!("{:#}", e)))?;
    let text = resp.text.trim();
    if text.is_empty() {
        return Err(StageError::Malformed(MalformedResponseError::Empty));
    }
    Ok(text.to_string())
}

/// Generation call whose reply must contain a JSON object.
pub(crate) async fn call_json(
    svc: &Evaluator,
    stage: Stage,
    prompt: &str,
) -> Result<Map<String, Value>, StageError> {
    let text = call_text(svc, stage, prompt).await?;
    extract_json(&text).map_err(StageError::Malformed)
}
