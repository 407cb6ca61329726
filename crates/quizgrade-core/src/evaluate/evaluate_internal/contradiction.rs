use super::client::call_json;
use super::StageOutput;
use crate::evaluate::{Evaluator, Stage};
use crate::json_extract::string_list;
use serde_json::{Map, Value};

pub(crate) fn contradictions_from_json(obj: &Map<String, Value>) -> Vec<String> {
    string_list(obj, "contradictions").unwrap_or_default()
}

/// Fails open: an unverifiable answer is not scored as contradictory.
pub(crate) async fn check_contradictions(
    svc: &Evaluator,
    question: &str,
    submission: &str,
) -> StageOutput<Vec<String>> {
    let prompt = super::prompt::contradiction_prompt(question, submission);
    match call_json(svc, Stage::Contradictions, &prompt).await {
        Ok(obj) => StageOutput::ok(contradictions_from_json(&obj)),
        Err(e) => {
            tracing::warn!(stage = %Stage::Contradictions, error = %e, "contradiction check failed");
            StageOutput::degraded(Vec::new(), e)
        }
    }
}
