//! Error types for the tabular view engine.

use thiserror::Error;

/// Errors raised while resolving columns or building edit plans.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Column position {0} is outside the single-letter range A-Z")]
    OutOfRange(usize),

    #[error("Invalid column letter: {0}")]
    InvalidLetter(char),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("No columns to append")]
    NoColumns,
}

pub type Result<T> = std::result::Result<T, EngineError>;
