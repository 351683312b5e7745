//! Transcript branch: audio extraction, speech-to-text and sentiment.

use std::sync::Arc;
use std::time::Duration;

use poise_media::{extract_audio_wav, ScratchVideo};
use poise_models::SentimentUtterance;

use crate::capabilities::{SentimentClassifier, Transcriber};
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::logging::AnalysisLogger;
use crate::metrics;
use crate::sentiment::score_sentiment;

/// Spoken-content signals of one request.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptSignals {
    pub transcript: String,
    pub sentiment_series: Vec<SentimentUtterance>,
    /// Sentiment sub-score in [0, 100]
    pub sentiment_score: f64,
}

/// Produces transcript and sentiment for a scratch video.
#[derive(Clone)]
pub struct TranscriptProvider {
    transcriber: Arc<dyn Transcriber>,
    classifier: Arc<dyn SentimentClassifier>,
    media_timeout: Duration,
}

impl TranscriptProvider {
    pub fn new(
        transcriber: Arc<dyn Transcriber>,
        classifier: Arc<dyn SentimentClassifier>,
        media_timeout: Duration,
    ) -> Self {
        Self {
            transcriber,
            classifier,
            media_timeout,
        }
    }

    /// Run the whole branch. `None` stands for an empty upload.
    pub async fn run(
        &self,
        scratch: Option<&ScratchVideo>,
        logger: &AnalysisLogger,
    ) -> AnalyzerResult<TranscriptSignals> {
        let transcript = match scratch {
            Some(scratch) => self.transcribe(scratch, logger).await?,
            None => String::new(),
        };

        let sentiment_series = self.classify(&transcript, logger).await;
        let sentiment_score = score_sentiment(&sentiment_series);

        Ok(TranscriptSignals {
            transcript,
            sentiment_series,
            sentiment_score,
        })
    }

    /// Extract audio and transcribe it.
    ///
    /// Audio that cannot be extracted (no audio stream, undecodable input)
    /// yields an empty transcript. A failing speech-to-text engine is fatal.
    pub async fn transcribe(
        &self,
        scratch: &ScratchVideo,
        logger: &AnalysisLogger,
    ) -> AnalyzerResult<String> {
        let wav_path = match extract_audio_wav(scratch, self.media_timeout).await {
            Ok(path) => path,
            Err(e) if e.is_missing_tool() => return Err(e.into()),
            Err(e) => {
                metrics::record_audio_extraction_failure();
                logger.log_warning(
                    "audio",
                    &format!("audio extraction failed, continuing without transcript: {}", e),
                );
                return Ok(String::new());
            }
        };

        let transcript = self
            .transcriber
            .transcribe(&wav_path)
            .await
            .map_err(|e| {
                AnalyzerError::transcription_failed(format!("{}: {}", self.transcriber.name(), e))
            })?
            .trim()
            .to_string();

        logger.log_stage(
            "transcription",
            &format!("transcribed {} characters", transcript.len()),
        );
        Ok(transcript)
    }

    /// Classify transcript sentiment.
    ///
    /// An empty transcript skips the classifier. Classifier failures give an
    /// empty series.
    pub async fn classify(&self, transcript: &str, logger: &AnalysisLogger) -> Vec<SentimentUtterance> {
        if transcript.trim().is_empty() {
            return Vec::new();
        }

        match self.classifier.classify(transcript).await {
            Ok(series) => series,
            Err(e) => {
                logger.log_warning(
                    "sentiment",
                    &format!("{} failed, using neutral sentiment: {}", self.classifier.name(), e),
                );
                Vec::new()
            }
        }
    }
}
