use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Leading enumerators: `Question 3:`, `Q3.`, `12.`, `4)`, `b.`, `C)`,
    /// `(a)`, `[d]`.
    /// Single letters and digits must be followed by whitespace (or end the
    /// line) so `e.g.` or `3.14` are left alone.
    static ref ENUMERATOR: Regex = Regex::new(
        r"^(?:(?i:question)\s*\d+\s*[:.)\-]\s*|[Qq]\d+\s*[:.)]\s*|\d+[.)](?:\s+|$)|[A-Za-z][.)](?:\s+|$)|[(\[][A-Za-z][)\]](?:\s+|$))"
    )
    .unwrap();
}

/// Trims a raw document line and strips one leading enumerator.
///
/// Returns an empty string for blank lines; callers skip those.
pub fn normalize_line(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let stripped = ENUMERATOR.replace(trimmed, "");
    stripped.trim().to_string()
}

/// Normalizes every line and drops the ones that end up empty.
pub fn normalize_lines<I, S>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .map(|l| normalize_line(l.as_ref()))
        .filter(|l| !l.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_numeric_and_question_prefixes() {
        assert_eq!(normalize_line("1. What is 2+2?"), "What is 2+2?");
        assert_eq!(normalize_line("  12) Name the capital:"), "Name the capital:");
        assert_eq!(normalize_line("Q3. Define osmosis."), "Define osmosis.");
        assert_eq!(normalize_line("q10: Why?"), "Why?");
        assert_eq!(normalize_line("Question 4: What is DNA?"), "What is DNA?");
        assert_eq!(normalize_line("QUESTION 5. Explain."), "Explain.");
    }

    #[test]
    fn strips_letter_markers() {
        assert_eq!(normalize_line("a. Paris"), "Paris");
        assert_eq!(normalize_line("B) London*"), "London*");
        assert_eq!(normalize_line("(c) Rome"), "Rome");
        assert_eq!(normalize_line("[d] Madrid*"), "Madrid*");
        assert_eq!(normalize_line("(a)"), "");
    }

    #[test]
    fn leaves_decimals_and_abbreviations() {
        assert_eq!(normalize_line("3.14"), "3.14");
        assert_eq!(normalize_line("e.g. something"), "e.g. something");
        assert_eq!(normalize_line("A cell wall"), "A cell wall");
        assert_eq!(normalize_line("4*"), "4*");
        assert_eq!(normalize_line("(ab) pair"), "(ab) pair");
    }

    #[test]
    fn strips_only_one_enumerator() {
        assert_eq!(normalize_line("1. a. Paris"), "a. Paris");
        assert_eq!(normalize_line("a) E. coli*"), "E. coli*");
    }

    #[test]
    fn blank_lines_become_empty() {
        assert_eq!(normalize_line("   \t "), "");
        assert_eq!(normalize_lines(["", "  x  ", "2. "]), vec!["x".to_string()]);
    }
}
