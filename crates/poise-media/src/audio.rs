//! Audio track extraction.

use std::path::PathBuf;
use std::time::Duration;

use tracing::debug;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::scratch::ScratchVideo;

/// Extract the first audio track of a scratch video as 16 kHz mono PCM WAV.
///
/// The WAV is written next to the video and removed with the scratch
/// directory. Fails when FFmpeg exits non-zero (no audio stream, corrupt
/// input) or produces no output.
pub async fn extract_audio_wav(scratch: &ScratchVideo, timeout: Duration) -> MediaResult<PathBuf> {
    let audio_path = scratch.audio_path();
    let cmd = FfmpegCommand::new(scratch.video_path(), &audio_path).mono_wav_16k();

    FfmpegRunner::new().with_timeout(timeout).run(&cmd).await?;

    let size = tokio::fs::metadata(&audio_path)
        .await
        .map(|m| m.len())
        .unwrap_or(0);
    if size == 0 {
        return Err(MediaError::ffmpeg_failed(
            "FFmpeg produced no audio output",
            None,
            None,
        ));
    }

    debug!(path = %audio_path.display(), bytes = size, "Extracted audio track");
    Ok(audio_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_extract_audio_from_garbage_fails() {
        if crate::command::check_ffmpeg().is_err() {
            return;
        }

        let scratch = ScratchVideo::write(b"definitely not a video", None)
            .await
            .unwrap();
        let result = extract_audio_wav(&scratch, Duration::from_secs(30)).await;
        assert!(matches!(result, Err(MediaError::FfmpegFailed { .. })));
    }
}
