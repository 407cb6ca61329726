//! Question extraction and rubric-driven grading of descriptive answers.
//!
//! Two independent pipelines:
//! - [`extract`]: document lines to validated four-option questions;
//! - [`Evaluator`]: gold answer, rubric, analysis and contradiction stages
//!   combined into one [`model::EvaluationResult`].

pub mod answer_check;
pub mod config;
pub mod errors;
pub mod evaluate;
pub mod extract;
pub mod json_extract;
pub mod model;
pub mod providers;

pub use config::{load_config, EvaluatorConfig};
pub use evaluate::{EvaluationRequest, Evaluator};
pub use extract::{extract, validate};
