use crate::errors::ConfigError;
use crate::model::{Rating, RubricWeights};
use serde::{Deserialize, Serialize};

/// Lower bound (inclusive) of a rating band on the 0-10 adjusted scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingBand {
    pub min_score: f64,
    pub rating: Rating,
    pub multiplier: f64,
}

/// Every constant the score aggregator and feedback templates use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: RubricWeights,
    /// Penalty at 100% fluff; scales linearly.
    pub fluff_max_penalty: f64,
    /// Subtracted per detected contradiction.
    pub contradiction_penalty: f64,
    /// Subtracted per factual error reported by the analysis.
    pub error_penalty: f64,
    /// Ordered from highest `min_score` down.
    pub bands: Vec<RatingBand>,
    /// Multiplier for anything below the last band (rated Poor).
    pub floor_multiplier: f64,
    /// Feedback warns about filler above this percentage.
    pub fluff_warning_percent: f64,
    /// Feedback warns about grammar below this score.
    pub grammar_warning_below: f64,
    /// Relevance, grammar or clarity at or above this is listed as a strength.
    pub strength_min_score: f64,
    /// Fluff below this percentage is listed as a strength.
    pub concise_below_percent: f64,
    /// Fluff above this percentage suggests cutting filler.
    pub focus_suggestion_above_percent: f64,
    /// Clarity or grammar below this suggests a rewrite.
    pub review_suggestion_below: f64,
    /// Missing points named in the coverage suggestion.
    pub max_listed_missing: usize,
    /// Share of `max_score` awarded by the fallback result.
    pub fallback_share: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: RubricWeights::default(),
            fluff_max_penalty: 2.0,
            contradiction_penalty: 1.5,
            error_penalty: 1.0,
            bands: vec![
                RatingBand {
                    min_score: 8.5,
                    rating: Rating::Excellent,
                    multiplier: 1.00,
                },
                RatingBand {
                    min_score: 7.0,
                    rating: Rating::Good,
                    multiplier: 0.95,
                },
                RatingBand {
                    min_score: 5.0,
                    rating: Rating::Average,
                    multiplier: 0.85,
                },
            ],
            floor_multiplier: 0.75,
            fluff_warning_percent: 30.0,
            grammar_warning_below: 6.0,
            strength_min_score: 8.0,
            concise_below_percent: 20.0,
            focus_suggestion_above_percent: 25.0,
            review_suggestion_below: 7.0,
            max_listed_missing: 3,
            fallback_share: 0.5,
        }
    }
}

impl ScoringConfig {
    /// Maps an adjusted 0-10 score onto its rating and score multiplier.
    pub fn rating_for(&self, adjusted: f64) -> (Rating, f64) {
        for band in &self.bands {
            if adjusted >= band.min_score {
                return (band.rating, band.multiplier);
            }
        }
        (Rating::Poor, self.floor_multiplier)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let sum = self.weights.sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(ConfigError::Invalid(format!(
                "scoring.weights must sum to 1.0 (got {:.4})",
                sum
            )));
        }
        let weights = [
            self.weights.essential,
            self.weights.supporting,
            self.weights.keywords,
            self.weights.clarity,
            self.weights.grammar,
        ];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(ConfigError::Invalid(
                "scoring.weights must be non-negative".to_string(),
            ));
        }
        for pair in self.bands.windows(2) {
            if pair[0].min_score <= pair[1].min_score {
                return Err(ConfigError::Invalid(format!(
                    "scoring.bands must be strictly descending ({} then {})",
                    pair[0].min_score, pair[1].min_score
                )));
            }
        }
        let multipliers = self
            .bands
            .iter()
            .map(|b| b.multiplier)
            .chain(std::iter::once(self.floor_multiplier));
        for m in multipliers {
            if !(0.0..=1.0).contains(&m) {
                return Err(ConfigError::Invalid(format!(
                    "scoring multipliers must lie in [0, 1] (got {})",
                    m
                )));
            }
        }
        for (name, v) in [
            ("fluff_max_penalty", self.fluff_max_penalty),
            ("contradiction_penalty", self.contradiction_penalty),
            ("error_penalty", self.error_penalty),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "scoring.{} must be non-negative",
                    name
                )));
            }
        }
        for (name, v) in [
            ("fluff_warning_percent", self.fluff_warning_percent),
            ("concise_below_percent", self.concise_below_percent),
            ("focus_suggestion_above_percent", self.focus_suggestion_above_percent),
        ] {
            if !(0.0..=100.0).contains(&v) {
                return Err(ConfigError::Invalid(format!(
                    "scoring.{} must lie in [0, 100] (got {})",
                    name, v
                )));
            }
        }
        for (name, v) in [
            ("grammar_warning_below", self.grammar_warning_below),
            ("strength_min_score", self.strength_min_score),
            ("review_suggestion_below", self.review_suggestion_below),
        ] {
            if !(0.0..=10.0).contains(&v) {
                return Err(ConfigError::Invalid(format!(
                    "scoring.{} must lie in [0, 10] (got {})",
                    name, v
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.fallback_share) {
            return Err(ConfigError::Invalid(
                "scoring.fallback_share must lie in [0, 1]".to_string(),
            ));
        }
        Ok(())
    }
}
