use std::path::PathBuf;
use thiserror::Error;

/// No usable question survived extraction and repair.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ExtractionError {
    pub message: String,
}

impl ExtractionError {
    pub fn no_questions(lines_seen: usize, dropped: usize) -> Self {
        Self {
            message: format!(
                "no valid questions found; check format ({} non-empty lines read, {} candidate records dropped). \
                 Expected a question line ending with '?', ':' or '.', followed by four options with the correct one marked '*'",
                lines_seen, dropped
            ),
        }
    }
}

/// Generated text could not be turned into the structured data a stage expects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedResponseError {
    #[error("no JSON object found in generated text")]
    NoObject,

    #[error("invalid JSON object: {0}")]
    InvalidJson(String),

    #[error("missing required field '{0}'")]
    MissingField(String),

    #[error("generated text is empty")]
    Empty,
}

/// Failure of a single call to the generation capability.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("{provider} request failed: {detail}")]
    Transport { provider: String, detail: String },

    #[error("{provider} returned status {status}: {body}")]
    Status {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("{provider} response missing generated text")]
    EmptyResponse { provider: String },

    #[error("{provider} model still unavailable after {attempts} attempts")]
    RetriesExhausted { provider: String, attempts: u32 },
}

/// A pipeline stage failed in a way no stage-local default can absorb.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("pipeline stage '{stage}' failed: {cause}")]
pub struct PipelineFailure {
    pub stage: String,
    pub cause: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {detail}")]
    Parse { path: PathBuf, detail: String },

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("environment variable {0} is not set (required for provider '{1}')")]
    MissingApiKey(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_error_carries_format_hint() {
        let err = ExtractionError::no_questions(3, 1);
        let msg = err.to_string();
        assert!(msg.starts_with("no valid questions found; check format"));
        assert!(msg.contains("3 non-empty lines"));
    }

    #[test]
    fn pipeline_failure_names_stage() {
        let err = PipelineFailure {
            stage: "gold_answer".into(),
            cause: "unreachable".into(),
        };
        assert_eq!(
            err.to_string(),
            "pipeline stage 'gold_answer' failed: unreachable"
        );
    }
}
