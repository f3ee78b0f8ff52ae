//! Error types for RedactLab.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Input too large: {len} characters (max {max})")]
    InputTooLarge { len: usize, max: usize },

    #[error("Alignment too large: {cells} table cells (max {max})")]
    AlignmentTooLarge { cells: usize, max: usize },

    #[error("Unknown entity category: {0}")]
    UnknownCategory(String),

    #[error("Extractor error: {0}")]
    Extractor(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
