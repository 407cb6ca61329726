//! Cheap pre-submission checks run before a descriptive answer is graded.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const MIN_WORDS: usize = 20;
const MIN_AVG_WORD_LEN: f64 = 3.0;
const MAX_REPETITION_RATIO: f64 = 3.0;
const MAX_LINE_CHARS: usize = 500;
const WORD_LIMIT_TOLERANCE: f64 = 1.5;
const MIN_SENTENCES: usize = 2;

lazy_static! {
    static ref SENTENCE_END: Regex = Regex::new(r"[.!?]+").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerCheck {
    pub is_valid: bool,
    pub should_evaluate: bool,
    pub word_count: usize,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Checks one submission. Errors block grading; warnings only inform.
pub fn check_answer(text: &str, word_limit: Option<usize>) -> AnswerCheck {
    let text = text.trim();
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if text.is_empty() {
        errors.push("Answer cannot be empty".to_string());
        return AnswerCheck {
            is_valid: false,
            should_evaluate: false,
            word_count: 0,
            errors,
            warnings,
        };
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    let word_count = words.len();
    if word_count < MIN_WORDS {
        errors.push(format!(
            "Answer too short ({} words). Minimum {} words required.",
            word_count, MIN_WORDS
        ));
    }

    let letters = text.chars().filter(|c| !c.is_whitespace()).count();
    if (letters as f64 / word_count.max(1) as f64) < MIN_AVG_WORD_LEN {
        warnings.push("Answer may contain excessive gibberish or incomplete words".to_string());
    }

    let unique: HashSet<String> = words.iter().map(|w| w.to_lowercase()).collect();
    if word_count as f64 / unique.len().max(1) as f64 > MAX_REPETITION_RATIO {
        warnings.push("Answer contains excessive word repetition".to_string());
    }

    if text.lines().any(|l| l.chars().count() > MAX_LINE_CHARS) {
        warnings.push("Answer may be copy-pasted content without proper formatting".to_string());
    }

    if let Some(limit) = word_limit.filter(|l| *l > 0) {
        if word_count as f64 > limit as f64 * WORD_LIMIT_TOLERANCE {
            warnings.push(format!(
                "Answer significantly exceeds recommended limit ({} vs {} words)",
                word_count, limit
            ));
        }
    }

    let sentences = SENTENCE_END
        .split(text)
        .filter(|s| !s.trim().is_empty())
        .count();
    if sentences < MIN_SENTENCES {
        warnings.push("Answer should contain at least 2 complete sentences".to_string());
    }

    let is_valid = errors.is_empty();
    AnswerCheck {
        is_valid,
        should_evaluate: is_valid && word_count >= MIN_WORDS,
        word_count,
        errors,
        warnings,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchAnswerCheck {
    pub all_valid: bool,
    pub results: Vec<AnswerCheck>,
    pub total_errors: usize,
    pub total_warnings: usize,
}

pub fn check_answers<'a, I>(answers: I) -> BatchAnswerCheck
where
    I: IntoIterator<Item = (&'a str, Option<usize>)>,
{
    let results: Vec<AnswerCheck> = answers
        .into_iter()
        .map(|(text, limit)| check_answer(text, limit))
        .collect();
    let total_errors = results.iter().map(|r| r.errors.len()).sum();
    let total_warnings = results.iter().map(|r| r.warnings.len()).sum();
    BatchAnswerCheck {
        all_valid: total_errors == 0,
        results,
        total_errors,
        total_warnings,
    }
}
