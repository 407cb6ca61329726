use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

/// Marker appended to the correct option in source documents.
pub const CORRECT_MARKER: char = '*';

const MIN_QUESTION_CHARS: usize = 5;
const MIN_INTERROGATIVE_CHARS: usize = 10;
const MAX_OPTION_CHARS: usize = 100;

const INTERROGATIVES: &[&str] = &[
    "what", "which", "who", "whom", "whose", "when", "where", "why", "how", "is", "are", "was",
    "were", "do", "does", "did", "can", "could", "will", "would", "should", "shall", "may",
    "might", "has", "have", "had",
];

lazy_static! {
    static ref OPTION_MARKER: Regex = Regex::new(r"^[(\[]?[a-dA-D][)\]:\-\s]").unwrap();
    /// Source-level letter enumerator: `a)`, `B.`, `(c)`, `[d]`.
    static ref LETTER_ENUMERATOR: Regex =
        Regex::new(r"^(?:[(\[][a-dA-D][)\]]|[a-dA-D][.)])(?:\s+|$)").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    Question,
    Option,
    Unknown,
}

fn char_len(line: &str) -> usize {
    line.chars().count()
}

fn first_word_is_interrogative(line: &str) -> bool {
    line.split_whitespace()
        .next()
        .map(|w| {
            let w = w
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase();
            INTERROGATIVES.contains(&w.as_str())
        })
        .unwrap_or(false)
}

/// A stem ends in `?`, `.` or `:`, or opens with an interrogative/auxiliary word.
pub fn is_question(line: &str) -> bool {
    let len = char_len(line);
    if len < MIN_QUESTION_CHARS {
        return false;
    }
    let terminal = line.ends_with('?') || line.ends_with('.') || line.ends_with(':');
    terminal || (first_word_is_interrogative(line) && len > MIN_INTERROGATIVE_CHARS)
}

/// A leading letter marker (`a)`, `(b)`, `[c]`, `D:`), or any short line that
/// is not a stem.
pub fn is_option(line: &str) -> bool {
    OPTION_MARKER.is_match(line) || (char_len(line) < MAX_OPTION_CHARS && !is_question(line))
}

pub fn has_correct_marker(line: &str) -> bool {
    line.trim_end().ends_with(CORRECT_MARKER)
}

/// Tags a normalized line.
///
/// A trailing correctness marker wins over the stem heuristics: option text
/// such as `The mitochondria.*` ends in a period but is never a stem.
pub fn classify(line: &str) -> LineKind {
    if has_correct_marker(line) {
        LineKind::Option
    } else if is_question(line) {
        LineKind::Question
    } else if is_option(line) {
        LineKind::Option
    } else {
        LineKind::Unknown
    }
}

/// True when the raw source line opens with an option letter enumerator.
pub fn has_letter_enumerator(raw: &str) -> bool {
    LETTER_ENUMERATOR.is_match(raw.trim_start())
}

/// Tags a source line from both its raw and normalized forms.
///
/// Normalization removes the letter enumerator, so it is checked on the raw
/// line first: an enumerated line is an option however long it is or however
/// its text ends.
pub fn classify_source(raw: &str, normalized: &str) -> LineKind {
    if has_letter_enumerator(raw) {
        LineKind::Option
    } else {
        classify(normalized)
    }
}
