//! Template feedback, strengths and suggestions derived from an analysis.

use crate::config::ScoringConfig;
use crate::model::{AnswerAnalysis, Rating};

fn format_percent(p: f64) -> String {
    if p.fract() == 0.0 {
        format!("{}", p as i64)
    } else {
        format!("{:.1}", p)
    }
}

pub fn feedback(
    analysis: &AnswerAnalysis,
    contradictions: &[String],
    rating: Rating,
    cfg: &ScoringConfig,
) -> String {
    let mut parts = vec![format!("Rating: {}.", rating)];

    let missing = analysis.missing_points.value();
    if !missing.is_empty() {
        parts.push(format!("Missing {} key point(s).", missing.len()));
    }
    let errors = analysis.factual_errors.value();
    if !errors.is_empty() {
        parts.push(format!("Contains {} factual error(s).", errors.len()));
    }
    if !contradictions.is_empty() {
        parts.push(format!("Contains {} contradiction(s).", contradictions.len()));
    }
    let fluff = *analysis.fluff_percent.value();
    if fluff > cfg.fluff_warning_percent {
        parts.push(format!(
            "Reduce irrelevant content ({}% fluff).",
            format_percent(fluff)
        ));
    }
    if *analysis.grammar_score.value() < cfg.grammar_warning_below {
        parts.push("Improve grammar and sentence structure.".to_string());
    }
    parts.join(" ")
}

pub fn strengths(analysis: &AnswerAnalysis, cfg: &ScoringConfig) -> Vec<String> {
    let mut out = Vec::new();
    if *analysis.relevance_score.value() >= cfg.strength_min_score {
        out.push("Highly relevant answer".to_string());
    }
    if *analysis.grammar_score.value() >= cfg.strength_min_score {
        out.push("Good grammar and structure".to_string());
    }
    if *analysis.clarity_score.value() >= cfg.strength_min_score {
        out.push("Clear explanation".to_string());
    }
    let covered = analysis.covered_essential.value().len();
    if covered > 0 {
        out.push(format!("Covered {} essential points", covered));
    }
    if *analysis.fluff_percent.value() < cfg.concise_below_percent {
        out.push("Concise and focused".to_string());
    }
    if out.is_empty() {
        out.push("Answer submitted".to_string());
    }
    out
}

pub fn suggestions(
    analysis: &AnswerAnalysis,
    contradictions: &[String],
    cfg: &ScoringConfig,
) -> Vec<String> {
    let mut out = Vec::new();
    let missing = analysis.missing_points.value();
    if !missing.is_empty() {
        let listed: Vec<&str> = missing
            .iter()
            .take(cfg.max_listed_missing)
            .map(String::as_str)
            .collect();
        out.push(format!("Add coverage of: {}", listed.join(", ")));
    }
    if !contradictions.is_empty() {
        out.push("Verify and correct factual contradictions".to_string());
    }
    if *analysis.fluff_percent.value() > cfg.focus_suggestion_above_percent {
        out.push("Focus on essential information, reduce filler".to_string());
    }
    if *analysis.clarity_score.value() < cfg.review_suggestion_below {
        out.push("Improve organization and clarity of explanation".to_string());
    }
    if *analysis.grammar_score.value() < cfg.review_suggestion_below {
        out.push("Review grammar and sentence construction".to_string());
    }
    if out.is_empty() {
        out.push("Good work! Minor refinements suggested.".to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Field;

    fn clean() -> AnswerAnalysis {
        AnswerAnalysis {
            covered_essential: Field::Present(vec!["a".into(), "b".into()]),
            covered_supporting: Field::Present(Vec::new()),
            keywords_found: Field::Present(Vec::new()),
            missing_points: Field::Present(Vec::new()),
            factual_errors: Field::Present(Vec::new()),
            irrelevant_segments: Field::Present(Vec::new()),
            fluff_percent: Field::Present(10.0),
            grammar_score: Field::Present(9.0),
            clarity_score: Field::Present(8.5),
            relevance_score: Field::Present(9.0),
            degraded: false,
        }
    }

    #[test]
    fn clean_answer_gets_praise() {
        let a = clean();
        let cfg = ScoringConfig::default();
        assert_eq!(
            feedback(&a, &[], Rating::Excellent, &ScoringConfig::default()),
            "Rating: Excellent."
        );
        assert_eq!(
            strengths(&a, &cfg),
            vec![
                "Highly relevant answer",
                "Good grammar and structure",
                "Clear explanation",
                "Covered 2 essential points",
                "Concise and focused",
            ]
        );
        assert_eq!(
            suggestions(&a, &[], &cfg),
            vec!["Good work! Minor refinements suggested."]
        );
    }

    #[test]
    fn weak_answer_collects_warnings() {
        let mut a = clean();
        a.missing_points = Field::Present(vec!["p1".into(), "p2".into(), "p3".into(), "p4".into()]);
        a.factual_errors = Field::Present(vec!["wrong".into()]);
        a.fluff_percent = Field::Present(45.0);
        a.grammar_score = Field::Present(5.0);
        a.clarity_score = Field::Present(6.0);
        a.relevance_score = Field::Present(4.0);
        a.covered_essential = Field::Present(Vec::new());
        let contradictions = vec!["c".to_string()];

        assert_eq!(
            feedback(&a, &contradictions, Rating::Poor, &ScoringConfig::default()),
            "Rating: Poor. Missing 4 key point(s). Contains 1 factual error(s). \
             Contains 1 contradiction(s). Reduce irrelevant content (45% fluff). \
             Improve grammar and sentence structure."
        );
        assert_eq!(strengths(&a, &ScoringConfig::default()), vec!["Answer submitted"]);
        assert_eq!(
            suggestions(&a, &contradictions, &ScoringConfig::default()),
            vec![
                "Add coverage of: p1, p2, p3",
                "Verify and correct factual contradictions",
                "Focus on essential information, reduce filler",
                "Improve organization and clarity of explanation",
                "Review grammar and sentence construction",
            ]
        );
    }

    #[test]
    fn fractional_fluff_is_shown_with_one_decimal() {
        let mut a = clean();
        a.fluff_percent = Field::Present(32.5);
        let text = feedback(&a, &[], Rating::Good, &ScoringConfig::default());
        assert!(text.ends_with("Reduce irrelevant content (32.5% fluff)."));
    }

    #[test]
    fn thresholds_come_from_config() {
        let mut a = clean();
        a.missing_points = Field::Present(vec!["p1".into(), "p2".into(), "p3".into()]);
        let cfg = ScoringConfig {
            strength_min_score: 9.5,
            concise_below_percent: 5.0,
            focus_suggestion_above_percent: 5.0,
            review_suggestion_below: 9.0,
            max_listed_missing: 1,
            ..ScoringConfig::default()
        };
        assert_eq!(strengths(&a, &cfg), vec!["Covered 2 essential points"]);
        assert_eq!(
            suggestions(&a, &[], &cfg),
            vec![
                "Add coverage of: p1",
                "Focus on essential information, reduce filler",
                "Improve organization and clarity of explanation",
            ]
        );
    }
}
