//! Analysis pipeline orchestration.
//!
//! The transcript branch and the visual branch are polled concurrently on the
//! calling task and joined by the scoring engine. A fatal error in either
//! branch drops the other one immediately. Frames are analyzed one at
//! a time. The upload lives in a scratch directory for the duration of the
//! call and is removed on every exit path.

use std::sync::Arc;
use std::time::Instant;

use poise_media::{FrameSampler, ScratchVideo};
use poise_models::AnalysisResult;
use tracing::Instrument;

use crate::affect::AffectAnalyzer;
use crate::config::AnalyzerConfig;
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::gaze::GazeEstimator;
use crate::logging::AnalysisLogger;
use crate::metrics;
use crate::registry::ModelRegistry;
use crate::scoring::{build_scores, score_emotion};
use crate::timeline::{FrameTimeline, TimelineBuilder};
use crate::transcript::TranscriptProvider;

/// Pipeline output: the public result plus diagnostics that are not part of
/// the response contract.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub result: AnalysisResult,
    /// Sampled frames with at least one face
    pub total_faces_detected: usize,
    /// Number of sampled frames
    pub frames_sampled: usize,
}

/// Multimodal analysis pipeline.
#[derive(Clone)]
pub struct AnalysisPipeline {
    config: AnalyzerConfig,
    registry: Arc<ModelRegistry>,
    sampler: FrameSampler,
    timeline: TimelineBuilder,
}

impl AnalysisPipeline {
    /// Create a pipeline. Fails on invalid configuration.
    pub fn new(config: AnalyzerConfig, registry: Arc<ModelRegistry>) -> AnalyzerResult<Self> {
        config.validate()?;

        let timeline = TimelineBuilder::new(
            AffectAnalyzer::new(registry.emotions().clone(), config.frame_timeout),
            GazeEstimator::new(
                registry.landmarks().clone(),
                config.gaze_tolerance,
                config.frame_timeout,
            ),
        );

        Ok(Self {
            sampler: FrameSampler::new(config.sampler_config()),
            timeline,
            registry,
            config,
        })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<ModelRegistry> {
        &self.registry
    }

    /// Analyze one uploaded recording.
    pub async fn analyze(&self, bytes: &[u8], logger: &AnalysisLogger) -> AnalyzerResult<PipelineOutput> {
        let start = Instant::now();
        let result = self.run(bytes, logger).instrument(logger.create_span()).await;

        let outcome = match &result {
            Ok(_) => "success",
            Err(e) if e.is_unavailable() => "unavailable",
            Err(_) => "error",
        };
        metrics::record_analysis(outcome, start.elapsed().as_secs_f64());

        if let Ok(output) = &result {
            logger.log_completion(
                output.frames_sampled,
                output.total_faces_detected,
                output.result.scores.overall,
                start.elapsed().as_millis(),
            );
        }

        result
    }

    async fn run(&self, bytes: &[u8], logger: &AnalysisLogger) -> AnalyzerResult<PipelineOutput> {
        let transcriber = self.registry.transcriber().cloned().ok_or_else(|| {
            AnalyzerError::transcription_unavailable("no speech-to-text engine is configured")
        })?;
        let transcripts = TranscriptProvider::new(
            transcriber,
            self.registry.sentiment().clone(),
            self.config.media_timeout,
        );

        logger.log_start(bytes.len());

        let scratch = if bytes.is_empty() {
            None
        } else {
            Some(ScratchVideo::write(bytes, self.config.work_dir.as_deref()).await?)
        };

        let (spoken, (visual, frames_sampled)) = tokio::try_join!(
            transcripts.run(scratch.as_ref(), logger),
            self.visual(scratch.as_ref(), logger)
        )?;

        let emotion_score = score_emotion(&visual.emotion_timeline);
        let scores = build_scores(
            &self.config.weights,
            spoken.sentiment_score,
            visual.eye_contact_pct,
            emotion_score,
        )
        .rounded();

        Ok(PipelineOutput {
            result: AnalysisResult {
                transcript: spoken.transcript,
                sentiment_series: spoken.sentiment_series,
                emotion_timeline: visual.emotion_timeline,
                eye_contact_pct: visual.eye_contact_pct,
                scores,
            },
            total_faces_detected: visual.total_faces_detected,
            frames_sampled,
        })
    }

    async fn visual(
        &self,
        scratch: Option<&ScratchVideo>,
        logger: &AnalysisLogger,
    ) -> AnalyzerResult<(FrameTimeline, usize)> {
        let frames = match scratch {
            Some(scratch) => self.sampler.sample_file(scratch.video_path()).await?,
            None => Vec::new(),
        };
        metrics::record_frames_sampled(frames.len());
        logger.log_stage(
            "sampling",
            &format!("sampled {} frames every {}", frames.len(), self.config.every_nth),
        );

        let timeline = self.timeline.build(&frames).await;
        Ok((timeline, frames.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_rejected() {
        let config = AnalyzerConfig {
            every_nth: 0,
            ..Default::default()
        };
        let result = AnalysisPipeline::new(config, Arc::new(ModelRegistry::stubbed()));
        assert!(matches!(result, Err(AnalyzerError::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_missing_transcriber_is_fatal() {
        let pipeline =
            AnalysisPipeline::new(AnalyzerConfig::default(), Arc::new(ModelRegistry::stubbed()))
                .unwrap();
        let err = pipeline
            .analyze(&[], &AnalysisLogger::new("test"))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyzerError::TranscriptionUnavailable(_)));
        assert!(err.is_unavailable());
    }
}
