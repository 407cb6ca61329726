//! Document lines to validated multiple-choice records.
//!
//! - normalize.rs: enumerator stripping, blank-line removal
//! - classify.rs: stem/option heuristics (pure, swappable)
//! - group.rs: stateful grouping plus structural repair
//! - validate.rs: violation report over any question-shaped input

pub mod classify;
pub mod group;
pub mod normalize;
pub mod validate;

pub use classify::{classify, classify_source, is_option, is_question, LineKind};
pub use group::{group_lines, repair, DroppedRecord, ExtractionOutcome};
pub use normalize::{normalize_line, normalize_lines};
pub use validate::validate;

use crate::errors::ExtractionError;
use crate::model::ParsedQuestion;

/// Extracts questions and keeps the per-record diagnostics.
///
/// Fails when nothing survives repair; an empty success is never returned.
pub fn extract_with_outcome<I, S>(lines: I) -> Result<ExtractionOutcome, ExtractionError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let outcome = group_lines(lines);
    if outcome.questions.is_empty() {
        tracing::warn!(
            lines = outcome.lines_seen,
            dropped = outcome.dropped.len(),
            "extraction produced no questions"
        );
        return Err(ExtractionError::no_questions(
            outcome.lines_seen,
            outcome.dropped.len(),
        ));
    }
    tracing::info!(
        questions = outcome.questions.len(),
        dropped = outcome.dropped.len(),
        orphans = outcome.orphan_lines,
        "extraction complete"
    );
    Ok(outcome)
}

/// Extracts repaired questions from already-flattened document lines.
pub fn extract<I, S>(lines: I) -> Result<Vec<ParsedQuestion>, ExtractionError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    extract_with_outcome(lines).map(|o| o.questions)
}

/// Renders questions back into the line format the extractor reads.
///
/// Stems get a `1.` enumerator and options an `A)` letter, the prefixes
/// normalization strips, so re-extraction removes exactly what was added
/// and never eats into the text itself.
pub fn render_lines(questions: &[ParsedQuestion]) -> Vec<String> {
    let mut out = Vec::with_capacity(questions.len() * 6);
    for (n, q) in questions.iter().enumerate() {
        out.push(format!("{}. {}", n + 1, q.stem));
        for (i, opt) in q.options.iter().enumerate() {
            let letter = (b'A' + (i % 26) as u8) as char;
            if opt.is_correct {
                out.push(format!("{}) {}{}", letter, opt.text, classify::CORRECT_MARKER));
            } else {
                out.push(format!("{}) {}", letter, opt.text));
            }
        }
        out.push(String::new());
    }
    out
}
