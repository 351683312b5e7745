//! Structured analysis logging.
//!
//! Carries the request id through the pipeline stages so every log line of
//! one analysis can be correlated.

use tracing::{info, warn, Span};

/// Request-scoped logger for pipeline stages.
#[derive(Debug, Clone)]
pub struct AnalysisLogger {
    request_id: String,
}

impl AnalysisLogger {
    /// Create a logger for one request.
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
        }
    }

    /// Log the start of an analysis.
    pub fn log_start(&self, upload_bytes: usize) {
        info!(
            request_id = %self.request_id,
            upload_bytes,
            "Analysis started"
        );
    }

    /// Log a finished pipeline stage.
    pub fn log_stage(&self, stage: &str, message: &str) {
        info!(
            request_id = %self.request_id,
            stage,
            "Analysis stage: {}", message
        );
    }

    /// Log a recoverable problem.
    pub fn log_warning(&self, stage: &str, message: &str) {
        warn!(
            request_id = %self.request_id,
            stage,
            "Analysis warning: {}", message
        );
    }

    /// Log the completion of an analysis.
    pub fn log_completion(&self, frames: usize, faces: usize, overall: f64, duration_ms: u128) {
        info!(
            request_id = %self.request_id,
            frames,
            total_faces_detected = faces,
            overall,
            duration_ms = duration_ms as u64,
            "Analysis completed"
        );
    }

    /// Get the request ID.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Create a tracing span for this analysis.
    pub fn create_span(&self) -> Span {
        tracing::info_span!("analysis", request_id = %self.request_id)
    }
}
