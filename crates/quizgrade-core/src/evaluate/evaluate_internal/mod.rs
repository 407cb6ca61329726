//! Stage split for the evaluator.
//!
//! - run.rs: orchestration, timing, fallback
//! - prompt.rs: prompt builders/constants only
//! - client.rs: generation call + JSON recovery boundary
//! - gold.rs, rubric.rs, analysis.rs, contradiction.rs: one stage each

pub(crate) mod analysis;
pub(crate) mod client;
pub(crate) mod contradiction;
pub(crate) mod gold;
pub(crate) mod prompt;
pub(crate) mod rubric;
pub(crate) mod run;


use client::StageError;

/// A stage's value plus the error it absorbed, if any.
pub(crate) struct StageOutput<T> {
    pub(crate) value: T,
    pub(crate) error: Option<StageError>,
}

impl<T> StageOutput<T> {
    pub(crate) fn ok(value: T) -> Self {
        Self { value, error: None }
    }

    pub(crate) fn degraded(value: T, error: StageError) -> Self {
        Self {
            value,
            error: Some(error),
        }
    }

    pub(crate) fn unreachable(&self) -> bool {
        self.error.as_ref().is_some_and(StageError::is_unreachable)
    }
}
