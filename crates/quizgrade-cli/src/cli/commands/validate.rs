use quizgrade_core::extract::{repair, validate};
use quizgrade_core::model::ParsedQuestion;
use serde_json::json;

use super::io::read_input;
use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::exit_codes;

pub fn run(args: ValidateArgs) -> anyhow::Result<i32> {
    let questions: Vec<ParsedQuestion> = match read_input(&args.input)
        .and_then(|raw| serde_json::from_str(&raw).map_err(anyhow::Error::from))
    {
        Ok(q) => q,
        Err(e) => {
            eprintln!("error: failed to load questions: {:#}", e);
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };

    let mut dropped = Vec::new();
    let questions = if args.repair {
        questions
            .into_iter()
            .filter_map(|q| {
                let stem = q.stem.clone();
                repair(q)
                    .map_err(|reason| dropped.push(json!({ "stem": stem, "reason": reason })))
                    .ok()
            })
            .collect()
    } else {
        questions
    };

    let report = validate(&questions);
    let exit_code = if report.is_valid {
        exit_codes::SUCCESS
    } else {
        exit_codes::FAILED
    };

    match args.format {
        OutputFormat::Json => {
            let mut out = json!({
                "is_valid": report.is_valid,
                "errors": report.errors,
                "questions": questions.len(),
                "exit_code": exit_code,
            });
            if args.repair {
                out["repaired"] = json!(questions);
                out["dropped"] = json!(dropped);
            }
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            if report.is_valid {
                eprintln!("✔ {} question(s) valid", questions.len());
            } else {
                eprintln!(
                    "✖ Validation failed ({} error{})",
                    report.errors.len(),
                    if report.errors.len() != 1 { "s" } else { "" }
                );
                for e in &report.errors {
                    eprintln!("  - {}", e);
                }
            }
            if !dropped.is_empty() {
                eprintln!("{} record(s) could not be repaired", dropped.len());
            }
        }
    }
    Ok(exit_code)
}
