use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("invalid input for {field}: {value} (expected {expected})")]
    InvalidInput {
        field: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("invalid calibration: {0}")]
    InvalidConfig(String),

    #[error("module hours sum {declared} does not match estimated hours {expected} (tolerance {tolerance})")]
    InconsistentModuleHours {
        declared: f64,
        expected: f64,
        tolerance: f64,
    },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            EngineError::Deserialization(err.to_string())
        } else {
            EngineError::Serialization(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
