use super::classify::{classify_source, LineKind, CORRECT_MARKER};
use super::normalize::normalize_line;
use crate::model::{AnswerOption, ParsedQuestion};
use serde::Serialize;

pub const OPTIONS_PER_QUESTION: usize = 4;

/// Candidate record discarded during extraction, kept for previews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedRecord {
    pub stem: String,
    pub reason: String,
}

/// Everything a single pass over a document produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionOutcome {
    pub questions: Vec<ParsedQuestion>,
    pub dropped: Vec<DroppedRecord>,
    /// Non-empty normalized lines read.
    pub lines_seen: usize,
    /// Lines that belonged to no record.
    pub orphan_lines: usize,
}

/// Splits a trailing correctness marker off an option line.
fn split_marker(line: &str) -> (String, bool) {
    let trimmed = line.trim_end();
    match trimmed.strip_suffix(CORRECT_MARKER) {
        Some(rest) => (rest.trim_end().to_string(), true),
        None => (trimmed.to_string(), false),
    }
}

fn placeholder_label(position: usize) -> String {
    if position < 26 {
        format!("Option {}", (b'A' + position as u8) as char)
    } else {
        format!("Option {}", position + 1)
    }
}

/// Best-effort structural repair to four options with one correct.
///
/// Applied in order:
/// 1. more than one correct: only the first stays correct;
/// 2. more than four options: the first correct one plus the first three
///    others, in original order (or simply the first four);
/// 3. fewer than four: padded with incorrect placeholders;
/// 4. none correct but the source had at least four real options: the first
///    option is marked correct.
///
/// Rule 4 is a fixed policy, not an inference about the author's intent.
/// Returns the reason when the result still breaks the invariant.
pub fn repair(question: ParsedQuestion) -> Result<ParsedQuestion, String> {
    let ParsedQuestion { stem, options } = question;
    let stem = stem.trim().to_string();
    if stem.is_empty() {
        return Err("question stem is empty".to_string());
    }

    let mut options: Vec<AnswerOption> = options
        .into_iter()
        .map(|o| AnswerOption::new(o.text.trim(), o.is_correct))
        .filter(|o| !o.text.is_empty())
        .collect();
    let real_options = options.len();

    let mut seen_correct = false;
    for opt in options.iter_mut() {
        if opt.is_correct {
            if seen_correct {
                opt.is_correct = false;
            }
            seen_correct = true;
        }
    }

    if options.len() > OPTIONS_PER_QUESTION {
        options = match options.iter().position(|o| o.is_correct) {
            Some(correct_idx) => {
                let mut others = 0;
                options
                    .into_iter()
                    .enumerate()
                    .filter(|(idx, _)| {
                        if *idx == correct_idx {
                            true
                        } else if others < OPTIONS_PER_QUESTION - 1 {
                            others += 1;
                            true
                        } else {
                            false
                        }
                    })
                    .map(|(_, o)| o)
                    .collect()
            }
            None => options.into_iter().take(OPTIONS_PER_QUESTION).collect(),
        };
    }

    while options.len() < OPTIONS_PER_QUESTION {
        let label = placeholder_label(options.len());
        options.push(AnswerOption::new(label, false));
    }

    if !seen_correct && real_options >= OPTIONS_PER_QUESTION {
        options[0].is_correct = true;
    }

    let repaired = ParsedQuestion { stem, options };
    let correct = repaired.correct_count();
    if repaired.options.len() != OPTIONS_PER_QUESTION || correct != 1 {
        return Err(format!(
            "{} options with {} marked correct after repair",
            repaired.options.len(),
            correct
        ));
    }
    Ok(repaired)
}

#[derive(Debug)]
struct Draft {
    stem: String,
    options: Vec<AnswerOption>,
}

impl Draft {
    fn new(stem: String) -> Self {
        Self {
            stem,
            options: Vec::new(),
        }
    }

    fn push_option(&mut self, line: &str) -> bool {
        let (text, is_correct) = split_marker(line);
        if text.is_empty() {
            return false;
        }
        self.options.push(AnswerOption::new(text, is_correct));
        true
    }

    fn is_full(&self) -> bool {
        self.options.len() >= OPTIONS_PER_QUESTION
    }
}

fn finish(draft: Draft, outcome: &mut ExtractionOutcome) {
    let stem = draft.stem.clone();
    match repair(ParsedQuestion::new(draft.stem, draft.options)) {
        Ok(q) => outcome.questions.push(q),
        Err(reason) => {
            tracing::debug!(stem = %stem, reason = %reason, "dropping question record");
            outcome.dropped.push(DroppedRecord { stem, reason });
        }
    }
}

/// Groups document lines into repaired question records.
///
/// A stem opens a record; following lines are collected greedily as options
/// until four are held or another stem appears. A stem only closes a record
/// that already has at least one option, so two stems in a row do not yield
/// a question without options.
pub fn group_lines<I, S>(lines: I) -> ExtractionOutcome
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut outcome = ExtractionOutcome::default();
    let mut current: Option<Draft> = None;

    for raw in lines {
        let raw = raw.as_ref();
        let line = normalize_line(raw);
        if line.is_empty() {
            continue;
        }
        outcome.lines_seen += 1;
        let kind = classify_source(raw, &line);

        current = match (current.take(), kind) {
            (None, LineKind::Question) => Some(Draft::new(line)),
            (None, _) => {
                outcome.orphan_lines += 1;
                None
            }
            (Some(draft), LineKind::Question) if !draft.options.is_empty() => {
                finish(draft, &mut outcome);
                Some(Draft::new(line))
            }
            (Some(mut draft), LineKind::Question | LineKind::Option) => {
                if !draft.push_option(&line) {
                    outcome.orphan_lines += 1;
                }
                if draft.is_full() {
                    finish(draft, &mut outcome);
                    None
                } else {
                    Some(draft)
                }
            }
            (Some(draft), LineKind::Unknown) => {
                outcome.orphan_lines += 1;
                Some(draft)
            }
        };
    }

    if let Some(draft) = current {
        finish(draft, &mut outcome);
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(spec: &[(&str, bool)]) -> Vec<AnswerOption> {
        spec.iter().map(|(t, c)| AnswerOption::new(*t, *c)).collect()
    }

    #[test]
    fn marked_option_becomes_correct() {
        let out = group_lines(["What is 2+2?", "3", "4*", "5", "6"]);
        assert_eq!(out.questions.len(), 1);
        let q = &out.questions[0];
        assert_eq!(q.stem, "What is 2+2?");
        let texts: Vec<_> = q.options.iter().map(|o| o.text.as_str()).collect();
        assert_eq!(texts, vec!["3", "4", "5", "6"]);
        assert!(q.options[1].is_correct);
        assert_eq!(q.correct_count(), 1);
    }

    #[test]
    fn numbered_document_with_letter_markers() {
        let doc = [
            "1. Which gas do plants absorb?",
            "a) Oxygen",
            "b) Carbon dioxide *",
            "c) Nitrogen",
            "d) Helium",
            "",
            "2. What is the boiling point of water at sea level?",
            "A. 50 C",
            "B. 90 C",
            "C. 100 C*",
            "D. 120 C",
        ];
        let out = group_lines(doc);
        assert_eq!(out.questions.len(), 2);
        assert_eq!(out.questions[0].options[1].text, "Carbon dioxide");
        assert_eq!(out.questions[0].correct_letter(), Some('B'));
        assert_eq!(out.questions[1].correct_letter(), Some('C'));
        assert!(out.dropped.is_empty());
    }

    #[test]
    fn bracketed_and_long_enumerated_options_are_kept() {
        let long = format!("a) {}", "a very long explanatory option ".repeat(4));
        let doc = [
            "Which organ pumps blood?".to_string(),
            long,
            "(b) Heart*".to_string(),
            "(c) Define the liver.".to_string(),
            "[d] Kidney".to_string(),
        ];
        let out = group_lines(&doc);
        assert_eq!(out.orphan_lines, 0);
        assert_eq!(out.questions.len(), 1);
        let q = &out.questions[0];
        assert!(q.options[0].text.starts_with("a very long"));
        assert_eq!(q.options[1].text, "Heart");
        assert_eq!(q.options[2].text, "Define the liver.");
        assert_eq!(q.options[3].text, "Kidney");
        assert_eq!(q.correct_letter(), Some('B'));
    }

    #[test]
    fn stem_does_not_close_empty_record() {
        let out = group_lines(["What is 2+2?", "Pick the right value.", "3", "4*", "5"]);
        assert_eq!(out.questions.len(), 1);
        assert_eq!(out.questions[0].options[0].text, "Pick the right value.");
        assert_eq!(out.questions[0].correct_letter(), Some('C'));
    }

    #[test]
    fn short_record_is_padded_when_correct_known() {
        let out = group_lines(["Capital of France?", "Paris*", "Rome", "Which planet is red?", "Mars*"]);
        assert_eq!(out.questions.len(), 2);
        let q = &out.questions[0];
        assert_eq!(q.options.len(), 4);
        assert_eq!(q.options[2].text, "Option C");
        assert!(!q.options[2].is_correct);
        assert!(q.options[0].is_correct);
    }

    #[test]
    fn short_record_without_correct_is_dropped() {
        let out = group_lines(["Capital of France?", "Paris", "Rome"]);
        assert!(out.questions.is_empty());
        assert_eq!(out.dropped.len(), 1);
        assert!(out.dropped[0].reason.contains("0 marked correct"));
    }

    #[test]
    fn four_unmarked_options_mark_first() {
        let out = group_lines(["Capital of France?", "Paris", "Rome", "Berlin", "Madrid"]);
        assert_eq!(out.questions[0].correct_index(), Some(0));
    }

    #[test]
    fn orphan_lines_before_first_stem_are_counted() {
        let out = group_lines(["intro", "notes", "Capital of France?", "Paris*", "Rome", "Oslo", "Bern"]);
        assert_eq!(out.orphan_lines, 2);
        assert_eq!(out.questions.len(), 1);
    }

    #[test]
    fn repair_demotes_extra_correct() {
        let q = ParsedQuestion::new(
            "Pick one.",
            opts(&[("a", false), ("b", true), ("c", true), ("d", false)]),
        );
        let r = repair(q).unwrap();
        assert_eq!(r.correct_index(), Some(1));
        assert_eq!(r.correct_count(), 1);
    }

    #[test]
    fn repair_trims_extra_options_keeping_correct() {
        let q = ParsedQuestion::new(
            "Pick one.",
            opts(&[
                ("a", false),
                ("b", false),
                ("c", false),
                ("d", false),
                ("e", true),
                ("f", false),
            ]),
        );
        let r = repair(q).unwrap();
        let texts: Vec<_> = r.options.iter().map(|o| o.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c", "e"]);
        assert_eq!(r.correct_letter(), Some('D'));
    }

    #[test]
    fn repair_trims_extra_options_without_correct() {
        let q = ParsedQuestion::new(
            "Pick one.",
            opts(&[("a", false), ("b", false), ("c", false), ("d", false), ("e", false)]),
        );
        let r = repair(q).unwrap();
        let texts: Vec<_> = r.options.iter().map(|o| o.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c", "d"]);
        assert!(r.options[0].is_correct);
    }

    #[test]
    fn repair_rejects_empty_stem() {
        let q = ParsedQuestion::new("  ", opts(&[("a", true)]));
        assert!(repair(q).is_err());
    }

    #[test]
    fn repair_is_identity_on_valid_records() {
        let q = ParsedQuestion::new(
            "Pick one.",
            opts(&[("a", false), ("b", false), ("c", true), ("d", false)]),
        );
        assert_eq!(repair(q.clone()).unwrap(), q);
    }
}
