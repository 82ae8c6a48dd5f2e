use crate::Frequency;
use thiserror::Error;

/// Malformed or incomplete rule text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("rule text is empty")]
    Empty,

    #[error("rule has no FREQ part")]
    MissingFrequency,

    #[error("unknown frequency: {0}")]
    InvalidFrequency(String),

    #[error("{key} must be an integer, got {value:?}")]
    InvalidInteger { key: &'static str, value: String },

    #[error("invalid UNTIL value: {0}")]
    InvalidUntil(String),
}

/// Failure while expanding a parsed rule into occurrences.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("interval must be positive, got {0}")]
    InvalidInterval(i64),

    #[error("count must be positive, got {0}")]
    InvalidCount(i64),

    #[error("invalid BYDAY token: {0:?}")]
    InvalidByDay(String),

    #[error("{part} is not supported for {frequency} rules")]
    Unsupported {
        frequency: Frequency,
        part: &'static str,
    },

    #[error("date arithmetic overflowed")]
    DateOverflow,
}
