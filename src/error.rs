use thiserror::Error;

#[derive(Debug, Error)]
pub enum UnitSelectionError {
    #[error("empty input: {context}")]
    EmptyInput { context: &'static str },
    #[error("dimension mismatch in {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("non-finite feature value at row {row}, dimension {dim}")]
    NonFiniteFeature { row: usize, dim: usize },
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },
    #[error(
        "no finite-cost path through {states} corpus state(s) for {observations} target frame(s); \
         at least two distinct corpus states are required"
    )]
    NoValidPath { observations: usize, states: usize },
    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON parse error while {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl UnitSelectionError {
    pub(crate) fn empty_input(context: &'static str) -> Self {
        Self::EmptyInput { context }
    }

    pub(crate) fn dimension_mismatch(context: &'static str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            context,
            expected,
            actual,
        }
    }

    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }
}
