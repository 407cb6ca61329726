use super::client::call_json;
use super::StageOutput;
use crate::evaluate::{Evaluator, Stage};
use crate::json_extract::{number, string_list};
use crate::model::{AnswerAnalysis, Field, Rubric, MISSING_FIELD_SCORE};
use serde_json::{Map, Value};

fn list_field(obj: &Map<String, Value>, key: &str) -> Field<Vec<String>> {
    match string_list(obj, key) {
        Some(items) => Field::Present(items),
        None => Field::Defaulted(Vec::new()),
    }
}

fn score_field(obj: &Map<String, Value>, key: &str, max: f64, default: f64) -> Field<f64> {
    match number(obj, key) {
        Some(n) => Field::Present(n.clamp(0.0, max)),
        None => Field::Defaulted(default),
    }
}

/// Field-by-field read; anything absent or unreadable takes its default.
pub(crate) fn analysis_from_json(obj: &Map<String, Value>) -> AnswerAnalysis {
    AnswerAnalysis {
        covered_essential: list_field(obj, "covered_essential"),
        covered_supporting: list_field(obj, "covered_supporting"),
        keywords_found: list_field(obj, "keywords_found"),
        missing_points: list_field(obj, "missing_points"),
        factual_errors: list_field(obj, "factual_errors"),
        irrelevant_segments: list_field(obj, "irrelevant_segments"),
        fluff_percent: score_field(obj, "fluff_percent", 100.0, 0.0),
        grammar_score: score_field(obj, "grammar_score", 10.0, MISSING_FIELD_SCORE),
        clarity_score: score_field(obj, "clarity_score", 10.0, MISSING_FIELD_SCORE),
        relevance_score: score_field(obj, "relevance_score", 10.0, MISSING_FIELD_SCORE),
        degraded: false,
    }
}

pub(crate) async fn analyze(
    svc: &Evaluator,
    question: &str,
    submission: &str,
    gold_answer: &str,
    rubric: &Rubric,
) -> StageOutput<AnswerAnalysis> {
    let prompt = super::prompt::analysis_prompt(question, submission, gold_answer, rubric);
    match call_json(svc, Stage::Analysis, &prompt).await {
        Ok(obj) => {
            let analysis = analysis_from_json(&obj);
            let defaulted = analysis.defaulted_fields();
            if !defaulted.is_empty() {
                tracing::warn!(fields = ?defaulted, "analysis fields defaulted");
            }
            StageOutput::ok(analysis)
        }
        Err(e) => {
            tracing::warn!(stage = %Stage::Analysis, error = %e, "analysis failed, using degraded defaults");
            StageOutput::degraded(AnswerAnalysis::failed(), e)
        }
    }
}
