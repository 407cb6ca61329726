use super::group::OPTIONS_PER_QUESTION;
use crate::model::{ParsedQuestion, ValidationReport};

/// Collects every structural violation across `questions`.
///
/// Accepts unrepaired records. Numbering in messages is 1-based.
pub fn validate(questions: &[ParsedQuestion]) -> ValidationReport {
    let mut errors = Vec::new();
    for (idx, q) in questions.iter().enumerate() {
        let n = idx + 1;
        if q.stem.trim().is_empty() {
            errors.push(format!("Question {}: stem is empty", n));
        }
        if q.options.len() != OPTIONS_PER_QUESTION {
            errors.push(format!(
                "Question {}: expected {} options, found {}",
                n,
                OPTIONS_PER_QUESTION,
                q.options.len()
            ));
        }
        let correct = q.correct_count();
        if correct != 1 {
            errors.push(format!(
                "Question {}: expected exactly 1 correct option, found {}",
                n, correct
            ));
        }
        for (opt_idx, opt) in q.options.iter().enumerate() {
            if opt.text.trim().is_empty() {
                errors.push(format!("Question {}, option {}: text is empty", n, opt_idx + 1));
            }
        }
    }
    ValidationReport::from_errors(errors)
}
