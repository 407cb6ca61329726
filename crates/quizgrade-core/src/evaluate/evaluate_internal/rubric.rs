use super::client::{call_json, StageError};
use super::StageOutput;
use crate::errors::MalformedResponseError;
use crate::evaluate::{Evaluator, Stage};
use crate::json_extract::string_list;
use crate::model::{Rubric, RubricWeights};
use serde_json::{Map, Value};

/// Reads the three checkpoint lists; weights always come from configuration.
pub(crate) fn rubric_from_json(
    obj: &Map<String, Value>,
    weights: RubricWeights,
) -> Result<Rubric, MalformedResponseError> {
    let read = |key: &str| {
        string_list(obj, key).ok_or_else(|| MalformedResponseError::MissingField(key.to_string()))
    };
    Ok(Rubric {
        essential_points: read("essential_points")?,
        supporting_points: read("supporting_points")?,
        required_keywords: read("required_keywords")?,
        weights,
        is_fallback: false,
    })
}

pub(crate) async fn build_rubric(
    svc: &Evaluator,
    question: &str,
    gold_answer: &str,
) -> StageOutput<Rubric> {
    let weights = svc.config.scoring.weights;
    let prompt = super::prompt::rubric_prompt(question, gold_answer);
    let parsed = call_json(svc, Stage::Rubric, &prompt)
        .await
        .and_then(|obj| rubric_from_json(&obj, weights).map_err(StageError::Malformed));
    match parsed {
        Ok(rubric) => StageOutput::ok(rubric),
        Err(e) => {
            tracing::warn!(stage = %Stage::Rubric, error = %e, "using fallback rubric");
            StageOutput::degraded(Rubric::fallback(weights), e)
        }
    }
}
