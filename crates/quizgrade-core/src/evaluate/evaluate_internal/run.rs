use super::analysis::analyze;
use super::contradiction::check_contradictions;
use super::gold::resolve_gold_answer;
use super::rubric::build_rubric;
use crate::errors::PipelineFailure;
use crate::evaluate::feedback::{feedback, strengths, suggestions};
use crate::evaluate::scoring::{aggregate, round2};
use crate::evaluate::{EvaluationRequest, Evaluator, Stage};
use crate::model::EvaluationResult;
use chrono::Utc;
use std::time::Instant;
use tracing::{info_span, Instrument};

pub(crate) async fn evaluate_impl(svc: &Evaluator, req: &EvaluationRequest) -> EvaluationResult {
    let evaluation_id = uuid::Uuid::new_v4().to_string();
    let model = svc.client.model_id().to_string();
    let span = info_span!(
        "evaluation",
        evaluation_id = %evaluation_id,
        model = %model,
        max_score = req.max_score
    );

    async move {
        let start = Instant::now();
        let outcome = run_stages(svc, req, &evaluation_id, &model).await;
        let elapsed = round2(start.elapsed().as_secs_f64());
        match outcome {
            Ok(mut result) => {
                result.execution_time = elapsed;
                tracing::info!(
                    score = result.overall_score,
                    rating = %result.rating,
                    elapsed_s = elapsed,
                    "evaluation complete"
                );
                result
            }
            Err(failure) => {
                tracing::warn!(error = %failure, elapsed_s = elapsed, "evaluation fell back");
                let mut result = EvaluationResult::fallback(
                    evaluation_id.clone(),
                    req.max_score,
                    svc.config.scoring.fallback_share,
                    model.clone(),
                    failure.to_string(),
                );
                result.execution_time = elapsed;
                result
            }
        }
    }
    .instrument(span)
    .await
}

async fn run_stages(
    svc: &Evaluator,
    req: &EvaluationRequest,
    evaluation_id: &str,
    model: &str,
) -> Result<EvaluationResult, PipelineFailure> {
    if !(req.max_score.is_finite() && req.max_score > 0.0) {
        return Err(PipelineFailure {
            stage: Stage::FinalScore.to_string(),
            cause: format!("max_score must be a positive number (got {})", req.max_score),
        });
    }

    tracing::debug!(stage = %Stage::GoldAnswer, "stage start");
    let gold = resolve_gold_answer(svc, &req.question, req.reference.as_deref()).await?;

    tracing::debug!(stage = %Stage::Rubric, generated_gold = gold.generated, "stage start");
    let rubric = build_rubric(svc, &req.question, &gold.text).await;

    tracing::debug!(stage = %Stage::Analysis, "stage start");
    let analysis = analyze(
        svc,
        &req.question,
        &req.submission,
        &gold.text,
        &rubric.value,
    )
    .await;

    tracing::debug!(stage = %Stage::Contradictions, "stage start");
    let contradictions = check_contradictions(svc, &req.question, &req.submission).await;

    if rubric.unreachable() && analysis.unreachable() && contradictions.unreachable() {
        let cause = rubric
            .error
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        return Err(PipelineFailure {
            stage: Stage::Rubric.to_string(),
            cause: format!("no stage reached the generator; first error: {}", cause),
        });
    }

    tracing::debug!(stage = %Stage::FinalScore, "stage start");
    let scoring = &svc.config.scoring;
    let rubric = rubric.value;
    let analysis = analysis.value;
    let contradictions = contradictions.value;
    let score = aggregate(&analysis, &contradictions, &rubric, req.max_score, scoring);

    Ok(EvaluationResult {
        evaluation_id: evaluation_id.to_string(),
        overall_score: score.overall_score,
        max_score: req.max_score,
        percentage: score.percentage,
        rating: score.rating,
        detailed_breakdown: score.breakdown,
        missing_details: analysis.missing_points.value().clone(),
        wrong_facts: analysis.factual_errors.value().clone(),
        strengths: strengths(&analysis, scoring),
        fluff_percent: *analysis.fluff_percent.value(),
        irrelevant_segments: analysis.irrelevant_segments.value().clone(),
        feedback: feedback(&analysis, &contradictions, score.rating, scoring),
        suggested_improvement: suggestions(&analysis, &contradictions, scoring),
        contradictions,
        execution_time: 0.0,
        model_identifier: model.to_string(),
        gold_answer: Some(gold.text),
        rubric: Some(rubric),
        evaluated_at: Utc::now(),
        error: None,
    })
}
