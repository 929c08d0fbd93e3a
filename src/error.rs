//! Error handling for talentmatch

use crate::extract::ExtractionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TalentMatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Model API error (status {status}): {message}")]
    Llm { status: u16, message: String },

    #[error("Model returned no usable text: {0}")]
    EmptyResponse(String),

    /// Structured extraction failed; `raw` is the full model response for inspection.
    #[error("Could not parse JSON from model response: {source}")]
    Extraction {
        #[source]
        source: ExtractionError,
        raw: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, TalentMatchError>;

impl TalentMatchError {
    /// Raw model text attached to the error, if any.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            TalentMatchError::Extraction { raw, .. } if !raw.is_empty() => Some(raw),
            _ => None,
        }
    }
}

/// Convert anyhow errors to our custom error type
impl From<anyhow::Error> for TalentMatchError {
    fn from(err: anyhow::Error) -> Self {
        TalentMatchError::AnalysisFailed(err.to_string())
    }
}

impl From<ExtractionError> for TalentMatchError {
    fn from(err: ExtractionError) -> Self {
        let raw = match &err {
            ExtractionError::UnparseableJson { candidate, .. } => candidate.clone(),
            ExtractionError::NoCandidateFound => String::new(),
        };
        TalentMatchError::Extraction { source: err, raw }
    }
}

impl From<askama::Error> for TalentMatchError {
    fn from(err: askama::Error) -> Self {
        TalentMatchError::OutputFormatting(err.to_string())
    }
}
