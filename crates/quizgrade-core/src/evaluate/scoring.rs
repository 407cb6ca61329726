//! Final-score arithmetic. No generation calls happen here.

use crate::config::ScoringConfig;
use crate::model::{AnswerAnalysis, Rating, Rubric};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreOutcome {
    pub overall_score: f64,
    pub percentage: f64,
    pub rating: Rating,
    pub multiplier: f64,
    /// Content score after penalties, on the 0-10 scale.
    pub adjusted_score: f64,
    pub breakdown: BTreeMap<String, f64>,
}

pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Clamps into `[lo, hi]`; NaN becomes `lo`.
fn bounded(x: f64, lo: f64, hi: f64) -> f64 {
    if x.is_nan() {
        lo
    } else {
        x.clamp(lo, hi)
    }
}

/// Coverage ratio on the 0-10 scale. An empty checklist counts as one item,
/// so covering nothing of nothing scores zero.
pub fn coverage_score(covered: usize, total: usize) -> f64 {
    let ratio = covered as f64 / total.max(1) as f64;
    bounded(ratio, 0.0, 1.0) * 10.0
}

pub fn aggregate(
    analysis: &AnswerAnalysis,
    contradictions: &[String],
    rubric: &Rubric,
    max_score: f64,
    cfg: &ScoringConfig,
) -> ScoreOutcome {
    let weights = &rubric.weights;

    let essential = coverage_score(
        analysis.covered_essential.value().len(),
        rubric.essential_points.len(),
    );
    let supporting = coverage_score(
        analysis.covered_supporting.value().len(),
        rubric.supporting_points.len(),
    );
    let keywords = coverage_score(
        analysis.keywords_found.value().len(),
        rubric.required_keywords.len(),
    );
    let clarity = bounded(*analysis.clarity_score.value(), 0.0, 10.0);
    let grammar = bounded(*analysis.grammar_score.value(), 0.0, 10.0);

    let content = essential * weights.essential
        + supporting * weights.supporting
        + keywords * weights.keywords
        + clarity * weights.clarity
        + grammar * weights.grammar;

    let fluff = bounded(*analysis.fluff_percent.value(), 0.0, 100.0);
    let fluff_penalty = fluff / 100.0 * cfg.fluff_max_penalty;
    let contradiction_penalty = contradictions.len() as f64 * cfg.contradiction_penalty;
    let error_penalty = analysis.factual_errors.value().len() as f64 * cfg.error_penalty;

    let adjusted = bounded(
        content - fluff_penalty - contradiction_penalty - error_penalty,
        0.0,
        f64::MAX,
    );
    let (rating, multiplier) = cfg.rating_for(adjusted);

    let max_score = if max_score.is_finite() && max_score > 0.0 {
        max_score
    } else {
        0.0
    };
    let overall = bounded(
        round2(adjusted / 10.0 * max_score * multiplier),
        0.0,
        max_score,
    );
    let percentage = if max_score > 0.0 {
        bounded(round2(overall / max_score * 100.0), 0.0, 100.0)
    } else {
        0.0
    };

    let breakdown = [
        ("essential_points_score", essential),
        ("supporting_points_score", supporting),
        ("keywords_score", keywords),
        ("clarity_score", clarity),
        ("grammar_score", grammar),
        ("content_score_raw", content),
        ("fluff_penalty", fluff_penalty),
        ("contradiction_penalty", contradiction_penalty),
        ("error_penalty", error_penalty),
        ("adjusted_score", adjusted),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), round2(v)))
    .collect();

    ScoreOutcome {
        overall_score: overall,
        percentage,
        rating,
        multiplier,
        adjusted_score: adjusted,
        breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Field, RubricWeights};

    fn strings(n: usize, prefix: &str) -> Vec<String> {
        (0..n).map(|i| format!("{} {}", prefix, i)).collect()
    }

    fn analysis(essential: usize, supporting: usize, keywords: usize) -> AnswerAnalysis {
        AnswerAnalysis {
            covered_essential: Field::Present(strings(essential, "e")),
            covered_supporting: Field::Present(strings(supporting, "s")),
            keywords_found: Field::Present(strings(keywords, "k")),
            missing_points: Field::Present(Vec::new()),
            factual_errors: Field::Present(Vec::new()),
            irrelevant_segments: Field::Present(Vec::new()),
            fluff_percent: Field::Present(0.0),
            grammar_score: Field::Present(8.0),
            clarity_score: Field::Present(8.0),
            relevance_score: Field::Present(8.0),
            degraded: false,
        }
    }

    fn rubric(essential: usize, supporting: usize, keywords: usize) -> Rubric {
        Rubric {
            essential_points: strings(essential, "e"),
            supporting_points: strings(supporting, "s"),
            required_keywords: strings(keywords, "k"),
            weights: RubricWeights::default(),
            is_fallback: false,
        }
    }

    #[test]
    fn average_band_worked_example() {
        let out = aggregate(
            &analysis(2, 0, 0),
            &[],
            &rubric(2, 1, 0),
            100.0,
            &ScoringConfig::default(),
        );
        assert_eq!(out.breakdown["content_score_raw"], 5.6);
        assert_eq!(out.rating, Rating::Average);
        assert_eq!(out.multiplier, 0.85);
        assert_eq!(out.overall_score, 47.6);
        assert_eq!(out.percentage, 47.6);
        assert_eq!(out.breakdown["keywords_score"], 0.0);
    }

    #[test]
    fn full_coverage_is_excellent() {
        let mut a = analysis(3, 2, 4);
        a.grammar_score = Field::Present(10.0);
        a.clarity_score = Field::Present(10.0);
        let out = aggregate(&a, &[], &rubric(3, 2, 4), 20.0, &ScoringConfig::default());
        assert_eq!(out.rating, Rating::Excellent);
        assert_eq!(out.overall_score, 20.0);
        assert_eq!(out.percentage, 100.0);
    }

    #[test]
    fn penalties_are_additive_and_floor_at_zero() {
        let mut a = analysis(2, 1, 1);
        a.fluff_percent = Field::Present(50.0);
        a.factual_errors = Field::Present(strings(2, "err"));
        let contradictions = strings(1, "c");
        let out = aggregate(&a, &contradictions, &rubric(2, 1, 1), 100.0, &ScoringConfig::default());
        assert_eq!(out.breakdown["fluff_penalty"], 1.0);
        assert_eq!(out.breakdown["contradiction_penalty"], 1.5);
        assert_eq!(out.breakdown["error_penalty"], 2.0);
        assert_eq!(out.breakdown["content_score_raw"], 9.6);
        assert_eq!(out.breakdown["adjusted_score"], 5.1);
        assert_eq!(out.rating, Rating::Average);

        a.factual_errors = Field::Present(strings(20, "err"));
        let out = aggregate(&a, &contradictions, &rubric(2, 1, 1), 100.0, &ScoringConfig::default());
        assert_eq!(out.adjusted_score, 0.0);
        assert_eq!(out.overall_score, 0.0);
    }

    #[test]
    fn adversarial_values_are_clamped() {
        let mut a = analysis(9, 9, 9);
        a.grammar_score = Field::Present(f64::NAN);
        a.clarity_score = Field::Present(1e9);
        a.fluff_percent = Field::Present(-40.0);
        let out = aggregate(&a, &[], &rubric(1, 1, 1), 50.0, &ScoringConfig::default());
        assert_eq!(out.breakdown["essential_points_score"], 10.0);
        assert_eq!(out.breakdown["grammar_score"], 0.0);
        assert_eq!(out.breakdown["clarity_score"], 10.0);
        assert_eq!(out.breakdown["fluff_penalty"], 0.0);
        assert!(out.overall_score <= 50.0);
        assert!(out.percentage <= 100.0);
    }

    #[test]
    fn non_positive_max_score_yields_zero() {
        let out = aggregate(&analysis(1, 1, 1), &[], &rubric(1, 1, 1), 0.0, &ScoringConfig::default());
        assert_eq!(out.overall_score, 0.0);
        assert_eq!(out.percentage, 0.0);
    }

    #[test]
    fn coverage_of_empty_checklist() {
        assert_eq!(coverage_score(0, 0), 0.0);
        assert_eq!(coverage_score(1, 0), 10.0);
        assert_eq!(coverage_score(1, 4), 2.5);
    }
}
