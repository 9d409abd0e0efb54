use thiserror::Error;

/// Crate-wide error type.
///
/// Construction-time errors (malformed shapes, mismatched batches) abort
/// the run; per-row CSV errors are handled where they occur and never
/// reach this type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed membership function `{label}`: {reason}")]
    MalformedMf { label: String, reason: String },

    #[error("unknown term `{term}` on variable `{variable}`")]
    UnknownTerm { variable: String, term: String },

    #[error("no input value for variable `{variable}`")]
    MissingInput { variable: String },

    #[error("batch shape mismatch: {inputs} inputs vs {labels} labels")]
    ShapeMismatch { inputs: usize, labels: usize },

    #[error("cannot work with an empty batch")]
    EmptyBatch,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    pub fn malformed_mf(label: &str, reason: impl Into<String>) -> Self {
        Self::MalformedMf {
            label: label.to_string(),
            reason: reason.into(),
        }
    }

    pub fn unknown_term(variable: &str, term: &str) -> Self {
        Self::UnknownTerm {
            variable: variable.to_string(),
            term: term.to_string(),
        }
    }

    pub fn missing_input(variable: &str) -> Self {
        Self::MissingInput {
            variable: variable.to_string(),
        }
    }
}
