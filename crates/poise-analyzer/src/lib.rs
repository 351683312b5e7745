//! Multimodal behavioral analysis for recorded answers.
//!
//! This crate contains the core of the service:
//! - Capability traits over the ML models, with ML-service adapters and stubs
//! - A process-wide `ModelRegistry`
//! - Gaze estimation and per-frame affect analysis with failure isolation
//! - Timeline construction, sentiment aggregation and scoring
//! - `AnalysisPipeline`, which runs all of the above for one upload

pub mod affect;
pub mod capabilities;
pub mod config;
pub mod error;
pub mod gaze;
pub mod logging;
pub mod metrics;
pub mod ml_adapter;
pub mod outcome;
pub mod pipeline;
pub mod registry;
pub mod scoring;
pub mod sentiment;
pub mod timeline;
pub mod transcript;

pub use affect::{primary_face, AffectAnalyzer, FrameAffect};
pub use capabilities::{EmotionDetector, LandmarkDetector, SentimentClassifier, Transcriber};
pub use config::AnalyzerConfig;
pub use error::{AnalyzerError, AnalyzerResult, CapabilityError, CapabilityResult};
pub use gaze::{looks_at_camera, GazeEstimator};
pub use logging::AnalysisLogger;
pub use outcome::Unavailable;
pub use pipeline::{AnalysisPipeline, PipelineOutput};
pub use registry::ModelRegistry;
pub use scoring::{overall_score, score_emotion, ScoreWeights};
pub use sentiment::score_sentiment;
pub use timeline::{eye_contact_pct, FrameTimeline, TimelineBuilder};
pub use transcript::{TranscriptProvider, TranscriptSignals};
