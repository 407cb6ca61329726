use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Raw completion returned by a generation provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmResponse {
    pub text: String,
    pub provider: String,
    pub model: String,
    pub cached: bool,
    #[serde(default)]
    pub meta: serde_json::Value,
}

/// One answer choice of a multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

impl AnswerOption {
    pub fn new(text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            text: text.into(),
            is_correct,
        }
    }
}

/// A multiple-choice question as recovered from a document.
///
/// Records emitted by the extractor always hold exactly four options with
/// exactly one marked correct. The same shape is accepted by the validator
/// for records that have not been repaired yet, so the fields stay public.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedQuestion {
    pub stem: String,
    #[serde(default)]
    pub options: Vec<AnswerOption>,
}

impl ParsedQuestion {
    pub fn new(stem: impl Into<String>, options: Vec<AnswerOption>) -> Self {
        Self {
            stem: stem.into(),
            options,
        }
    }

    pub fn correct_count(&self) -> usize {
        self.options.iter().filter(|o| o.is_correct).count()
    }

    pub fn correct_index(&self) -> Option<usize> {
        self.options.iter().position(|o| o.is_correct)
    }

    /// Answer-key letter (`A`..`D`) of the first correct option.
    pub fn correct_letter(&self) -> Option<char> {
        self.correct_index()
            .filter(|&idx| idx < 26)
            .map(|idx| (b'A' + idx as u8) as char)
    }
}

/// Outcome of structural validation. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Weights applied to the five rubric components. Sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RubricWeights {
    pub essential: f64,
    pub supporting: f64,
    pub keywords: f64,
    pub clarity: f64,
    pub grammar: f64,
}

impl Default for RubricWeights {
    fn default() -> Self {
        Self {
            essential: 0.40,
            supporting: 0.20,
            keywords: 0.20,
            clarity: 0.10,
            grammar: 0.10,
        }
    }
}

impl RubricWeights {
    pub fn sum(&self) -> f64 {
        self.essential + self.supporting + self.keywords + self.clarity + self.grammar
    }
}

/// Weighted checklist derived from the gold answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rubric {
    pub essential_points: Vec<String>,
    pub supporting_points: Vec<String>,
    pub required_keywords: Vec<String>,
    pub weights: RubricWeights,
    /// True when derivation failed and the generic rubric was substituted.
    #[serde(default)]
    pub is_fallback: bool,
}

impl Rubric {
    /// Minimal rubric used whenever derivation from the gold answer fails.
    pub fn fallback(weights: RubricWeights) -> Self {
        Self {
            essential_points: vec!["Core concept explanation".to_string()],
            supporting_points: vec!["Additional details".to_string()],
            required_keywords: Vec::new(),
            weights,
            is_fallback: true,
        }
    }
}

/// A value read from generated output, tagged with whether the generator
/// actually supplied it or a documented default was substituted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", content = "value", rename_all = "snake_case")]
pub enum Field<T> {
    Present(T),
    Defaulted(T),
}

impl<T> Field<T> {
    pub fn value(&self) -> &T {
        match self {
            Field::Present(v) | Field::Defaulted(v) => v,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Field::Present(v) | Field::Defaulted(v) => v,
        }
    }

    pub fn is_defaulted(&self) -> bool {
        matches!(self, Field::Defaulted(_))
    }
}

/// Per-axis judgement of one submission against a rubric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerAnalysis {
    pub covered_essential: Field<Vec<String>>,
    pub covered_supporting: Field<Vec<String>>,
    pub keywords_found: Field<Vec<String>>,
    pub missing_points: Field<Vec<String>>,
    pub factual_errors: Field<Vec<String>>,
    pub irrelevant_segments: Field<Vec<String>>,
    /// 0..=100
    pub fluff_percent: Field<f64>,
    /// 0..=10
    pub grammar_score: Field<f64>,
    /// 0..=10
    pub clarity_score: Field<f64>,
    /// 0..=10
    pub relevance_score: Field<f64>,
    /// Set when no parseable response was obtained at all.
    #[serde(default)]
    pub degraded: bool,
}

pub const MISSING_FIELD_SCORE: f64 = 7.0;
pub const FAILED_ANALYSIS_SCORE: f64 = 5.0;

impl AnswerAnalysis {
    /// Analysis substituted when the generator produced nothing usable.
    pub fn failed() -> Self {
        Self {
            covered_essential: Field::Defaulted(Vec::new()),
            covered_supporting: Field::Defaulted(Vec::new()),
            keywords_found: Field::Defaulted(Vec::new()),
            missing_points: Field::Defaulted(vec!["Analysis failed".to_string()]),
            factual_errors: Field::Defaulted(Vec::new()),
            irrelevant_segments: Field::Defaulted(Vec::new()),
            fluff_percent: Field::Defaulted(0.0),
            grammar_score: Field::Defaulted(FAILED_ANALYSIS_SCORE),
            clarity_score: Field::Defaulted(FAILED_ANALYSIS_SCORE),
            relevance_score: Field::Defaulted(FAILED_ANALYSIS_SCORE),
            degraded: true,
        }
    }

    pub fn defaulted_fields(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        let lists = [
            ("covered_essential", self.covered_essential.is_defaulted()),
            ("covered_supporting", self.covered_supporting.is_defaulted()),
            ("keywords_found", self.keywords_found.is_defaulted()),
            ("missing_points", self.missing_points.is_defaulted()),
            ("factual_errors", self.factual_errors.is_defaulted()),
            ("irrelevant_segments", self.irrelevant_segments.is_defaulted()),
            ("fluff_percent", self.fluff_percent.is_defaulted()),
            ("grammar_score", self.grammar_score.is_defaulted()),
            ("clarity_score", self.clarity_score.is_defaulted()),
            ("relevance_score", self.relevance_score.is_defaulted()),
        ];
        for (name, defaulted) in lists {
            if defaulted {
                out.push(name);
            }
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rating {
    Excellent,
    Good,
    Average,
    Poor,
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Rating::Excellent => "Excellent",
            Rating::Good => "Good",
            Rating::Average => "Average",
            Rating::Poor => "Poor",
        };
        f.write_str(s)
    }
}

/// Final grade handed back to the caller. Either fully populated by the
/// pipeline or replaced wholesale by [`EvaluationResult::fallback`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub evaluation_id: String,
    pub overall_score: f64,
    pub max_score: f64,
    pub percentage: f64,
    pub rating: Rating,
    pub detailed_breakdown: BTreeMap<String, f64>,
    pub missing_details: Vec<String>,
    pub wrong_facts: Vec<String>,
    pub contradictions: Vec<String>,
    pub strengths: Vec<String>,
    pub fluff_percent: f64,
    pub irrelevant_segments: Vec<String>,
    pub feedback: String,
    pub suggested_improvement: Vec<String>,
    /// Wall-clock seconds, rounded to two decimals.
    pub execution_time: f64,
    pub model_identifier: String,
    pub gold_answer: Option<String>,
    pub rubric: Option<Rubric>,
    pub evaluated_at: DateTime<Utc>,
    pub error: Option<String>,
}

impl EvaluationResult {
    /// Guaranteed-valid result used when the pipeline cannot complete.
    pub fn fallback(
        evaluation_id: String,
        max_score: f64,
        share: f64,
        model_identifier: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        let max_score = if max_score.is_finite() && max_score > 0.0 {
            max_score
        } else {
            0.0
        };
        let share = share.clamp(0.0, 1.0);
        Self {
            evaluation_id,
            overall_score: max_score * share,
            max_score,
            percentage: if max_score > 0.0 { share * 100.0 } else { 0.0 },
            rating: Rating::Average,
            detailed_breakdown: BTreeMap::new(),
            missing_details: vec!["Evaluation system error".to_string()],
            wrong_facts: Vec::new(),
            contradictions: Vec::new(),
            strengths: Vec::new(),
            fluff_percent: 0.0,
            irrelevant_segments: Vec::new(),
            feedback: "Automatic evaluation unavailable. Manual review required.".to_string(),
            suggested_improvement: vec!["System error - manual grading recommended".to_string()],
            execution_time: 0.0,
            model_identifier: model_identifier.into(),
            gold_answer: None,
            rubric: None,
            evaluated_at: Utc::now(),
            error: Some(error.into()),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.error.is_some()
    }
}
