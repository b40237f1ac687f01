// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    /// A submitted file held fewer than the two mandatory lines
    /// (source + MT output). Carries the lines that were present so
    /// the skip record can preserve them.
    #[error("Insufficient lines: need at least source + MT output, got {}", lines.len())]
    InsufficientLines { lines: Vec<String> },

    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
