use quizgrade_core::extract::{extract_with_outcome, ExtractionOutcome};
use serde_json::json;

use super::io::{emit, read_input};
use crate::cli::args::{ExtractArgs, OutputFormat};
use crate::exit_codes;

pub fn run(args: ExtractArgs) -> anyhow::Result<i32> {
    let raw = match read_input(&args.input) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {:#}", e);
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };

    let outcome = match extract_with_outcome(raw.lines()) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("error: {}", e);
            return Ok(exit_codes::FAILED);
        }
    };

    let rendered = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&build_json(&outcome))?,
        OutputFormat::Text => render_text(&outcome),
    };
    emit(args.output.as_deref(), rendered.trim_end())?;

    if args.show_dropped {
        for d in &outcome.dropped {
            eprintln!("dropped: {:?} ({})", d.stem, d.reason);
        }
    }
    eprintln!(
        "Extracted {} question{} ({} dropped)",
        outcome.questions.len(),
        if outcome.questions.len() != 1 { "s" } else { "" },
        outcome.dropped.len()
    );
    Ok(exit_codes::SUCCESS)
}

fn build_json(outcome: &ExtractionOutcome) -> serde_json::Value {
    let questions: Vec<_> = outcome
        .questions
        .iter()
        .map(|q| {
            json!({
                "stem": q.stem,
                "options": q.options,
                "correct": q.correct_letter().map(String::from),
            })
        })
        .collect();
    json!({
        "questions": questions,
        "dropped": outcome.dropped,
        "lines_seen": outcome.lines_seen,
        "orphan_lines": outcome.orphan_lines,
    })
}

fn render_text(outcome: &ExtractionOutcome) -> String {
    let mut out = String::new();
    for (n, q) in outcome.questions.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", n + 1, q.stem));
        for (i, opt) in q.options.iter().enumerate() {
            let letter = (b'A' + i as u8) as char;
            let mark = if opt.is_correct { " *" } else { "" };
            out.push_str(&format!("   {}) {}{}\n", letter, opt.text, mark));
        }
        out.push('\n');
    }
    out
}
