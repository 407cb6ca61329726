use quizgrade_core::answer_check::check_answer;
use quizgrade_core::config::{load_config, DEFAULT_CONFIG_FILE};
use quizgrade_core::model::EvaluationResult;
use quizgrade_core::{EvaluationRequest, Evaluator, EvaluatorConfig};
use std::path::Path;

use super::io::{emit, inline_or_file, read_input};
use crate::cli::args::{EvaluateArgs, OutputFormat};
use crate::exit_codes;

pub async fn run(args: EvaluateArgs) -> anyhow::Result<i32> {
    let cfg = match resolve_config(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {:#}", e);
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };

    let requests = match build_requests(&args) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {:#}", e);
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };

    if !args.skip_precheck {
        let mut blocked = false;
        for (idx, req) in requests.iter().enumerate() {
            let check = check_answer(&req.submission, None);
            if !check.should_evaluate {
                blocked = true;
                eprintln!("submission {} not gradable:", idx + 1);
                for e in &check.errors {
                    eprintln!("  - {}", e);
                }
            }
        }
        if blocked {
            eprintln!("hint: pass --skip-precheck to grade anyway");
            return Ok(exit_codes::FAILED);
        }
    }

    let evaluator = match Evaluator::from_config(cfg) {
        Ok(ev) => ev,
        Err(e) => {
            eprintln!("error: {:#}", e);
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };
    tracing::info!(
        model = %evaluator.model_id(),
        submissions = requests.len(),
        "grading"
    );

    let results = evaluator.evaluate_batch(&requests).await;
    for r in results.iter().filter(|r| r.is_fallback()) {
        tracing::warn!(
            evaluation_id = %r.evaluation_id,
            error = r.error.as_deref().unwrap_or_default(),
            "fallback result returned"
        );
    }

    let rendered = match (args.format, args.batch.is_some()) {
        (OutputFormat::Json, true) => serde_json::to_string_pretty(&results)?,
        (OutputFormat::Json, false) => match results.first() {
            Some(r) => serde_json::to_string_pretty(r)?,
            None => "null".to_string(),
        },
        (OutputFormat::Text, _) => results
            .iter()
            .map(render_text)
            .collect::<Vec<_>>()
            .join("\n"),
    };
    emit(args.output.as_deref(), rendered.trim_end())?;

    Ok(exit_codes::SUCCESS)
}

/// `--config`, then `./quizgrade.yaml`, then built-in defaults.
fn resolve_config(args: &EvaluateArgs) -> anyhow::Result<EvaluatorConfig> {
    let mut cfg = match &args.config {
        Some(path) => load_config(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            load_config(Path::new(DEFAULT_CONFIG_FILE))?
        }
        None => EvaluatorConfig::default(),
    };
    if let Some(model) = &args.model {
        cfg.model = model.clone();
        cfg.validate()?;
    }
    Ok(cfg)
}

fn build_requests(args: &EvaluateArgs) -> anyhow::Result<Vec<EvaluationRequest>> {
    if let Some(path) = &args.batch {
        let raw = read_input(path)?;
        let requests: Vec<EvaluationRequest> = serde_json::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("invalid batch file {}: {}", path.display(), e))?;
        return Ok(requests);
    }

    let question = args
        .question
        .clone()
        .ok_or_else(|| anyhow::anyhow!("--question is required"))?;
    let submission = inline_or_file(args.answer.as_deref(), args.answer_file.as_deref())?
        .ok_or_else(|| anyhow::anyhow!("one of --answer or --answer-file is required"))?;
    let reference = inline_or_file(args.reference.as_deref(), args.reference_file.as_deref())?;

    let mut request = EvaluationRequest::new(question, submission).with_max_score(args.max_score);
    if let Some(reference) = reference {
        request = request.with_reference(reference);
    }
    Ok(vec![request])
}

fn render_text(r: &EvaluationResult) -> String {
    let mut out = format!(
        "Score: {} / {} ({}%) - {}\n{}\n",
        r.overall_score, r.max_score, r.percentage, r.rating, r.feedback
    );
    if !r.strengths.is_empty() {
        out.push_str("Strengths:\n");
        for s in &r.strengths {
            out.push_str(&format!("  + {}\n", s));
        }
    }
    if !r.suggested_improvement.is_empty() {
        out.push_str("Suggestions:\n");
        for s in &r.suggested_improvement {
            out.push_str(&format!("  - {}\n", s));
        }
    }
    if let Some(err) = &r.error {
        out.push_str(&format!("(fallback: {})\n", err));
    }
    out
}
