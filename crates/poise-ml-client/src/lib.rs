//! Client for the Python ML inference service.
//!
//! The service hosts the models Poise does not run natively: speech-to-text,
//! transcript sentiment classification, face/emotion detection and the
//! face-mesh landmark detector. Images travel as JPEG and audio as WAV in
//! multipart bodies; everything else is JSON.

pub mod client;
pub mod error;
pub mod types;

pub use client::{MlClient, MlClientConfig};
pub use error::{MlError, MlResult};
pub use types::{
    EmotionsResponse, HealthResponse, LandmarksResponse, SentimentRequest, SentimentResponse,
    TranscriptionResponse,
};
