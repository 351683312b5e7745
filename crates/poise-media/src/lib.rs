//! FFmpeg CLI wrapper for the analysis pipeline.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building with timeouts
//! - FFprobe stream inspection
//! - Request-scoped scratch space that is removed on every exit path
//! - Strided frame sampling over a rawvideo pipe
//! - 16 kHz mono audio extraction for speech-to-text

pub mod audio;
pub mod command;
pub mod error;
pub mod frame;
pub mod probe;
pub mod sampler;
pub mod scratch;

pub use audio::extract_audio_wav;
pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
pub use error::{MediaError, MediaResult};
pub use frame::Frame;
pub use probe::{probe_video, VideoInfo};
pub use sampler::{
    expected_sample_count, FrameSampler, SamplerConfig, StrideSelector, DEFAULT_MAX_FRAME_WIDTH,
};
pub use scratch::ScratchVideo;
