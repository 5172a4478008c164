use std::result;

use thiserror::Error;

/// Error types for identifier resolution, article retrieval and persistence
///
/// The HTML extraction engine itself never fails; these errors only come from
/// the collaborators around it.
#[derive(Error, Debug)]
pub enum PmcError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),

    /// CSV reading or writing failed
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Invalid PMID format
    #[error("Invalid PMID format: {pmid}")]
    InvalidPmid { pmid: String },

    /// Invalid PMCID format
    #[error("Invalid PMCID format: {pmcid}")]
    InvalidPmcid { pmcid: String },

    /// The article page came back without content
    #[error("Empty response for PMCID {pmcid}")]
    EmptyResponse { pmcid: String },

    /// Generic API error with HTTP status code
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    /// IO error for file operations
    #[error("IO error: {message}")]
    IoError { message: String },
}

pub type Result<T> = result::Result<T, PmcError>;

impl From<std::io::Error> for PmcError {
    fn from(err: std::io::Error) -> Self {
        PmcError::IoError {
            message: err.to_string(),
        }
    }
}

impl PmcError {
    /// Whether the error concerns a single item and a batch may carry on past it
    pub fn is_item_level(&self) -> bool {
        match self {
            PmcError::RequestError(_)
            | PmcError::JsonError(_)
            | PmcError::InvalidPmid { .. }
            | PmcError::InvalidPmcid { .. }
            | PmcError::EmptyResponse { .. }
            | PmcError::ApiError { .. } => true,
            PmcError::CsvError(_) | PmcError::IoError { .. } => false,
        }
    }
}
