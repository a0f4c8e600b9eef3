use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Timed out after {timeout:?} waiting for selector: {selector}")]
    Timeout { selector: String, timeout: Duration },

    #[error("Could not find required element on the page: {0}")]
    ElementNotFound(String),

    #[error("Page interaction failed: {0}")]
    Page(String),

    #[error("Page script returned an unexpected value: {0}")]
    Script(String),

    #[error("Failed to parse value: {0}")]
    ParsingError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ExtractError>;
