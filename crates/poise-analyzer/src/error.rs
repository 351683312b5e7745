//! Analyzer error types.

use poise_media::MediaError;
use poise_ml_client::MlError;
use thiserror::Error;

pub type AnalyzerResult<T> = Result<T, AnalyzerError>;

/// Request-level failures. Anything here aborts the analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("Transcription unavailable: {0}")]
    TranscriptionUnavailable(String),

    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnalyzerError {
    pub fn transcription_unavailable(msg: impl Into<String>) -> Self {
        Self::TranscriptionUnavailable(msg.into())
    }

    pub fn transcription_failed(msg: impl Into<String>) -> Self {
        Self::TranscriptionFailed(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Whether the failure is caused by a missing or unhealthy collaborator
    /// rather than the request itself.
    pub fn is_unavailable(&self) -> bool {
        match self {
            AnalyzerError::TranscriptionUnavailable(_) | AnalyzerError::TranscriptionFailed(_) => {
                true
            }
            AnalyzerError::Media(e) => e.is_missing_tool(),
            _ => false,
        }
    }
}

pub type CapabilityResult<T> = Result<T, CapabilityError>;

/// Failure of a single model invocation.
#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("ML service error: {0}")]
    Ml(#[from] MlError),

    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid model output: {0}")]
    InvalidOutput(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_classification() {
        assert!(AnalyzerError::transcription_unavailable("no engine").is_unavailable());
        assert!(AnalyzerError::Media(MediaError::FfmpegNotFound).is_unavailable());
        assert!(!AnalyzerError::Media(MediaError::invalid_video("x")).is_unavailable());
        assert!(!AnalyzerError::config_error("every_nth").is_unavailable());
    }
}
