//! Strided frame sampling.
//!
//! FFmpeg decodes every frame to packed RGB24 on stdout; the sampler keeps
//! frames whose zero-based decode index is a multiple of `every_nth`. Decoding
//! is best-effort: input FFprobe cannot read yields no frames, and a decoder
//! that stops early keeps whatever was decoded before the failure.

use std::path::Path;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::command::{collect_stderr, drain_stderr, FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::frame::Frame;
use crate::probe::{probe_video, VideoInfo};
use crate::scratch::ScratchVideo;

/// Default frame width limit. Keeps one buffered RGB24 frame under 1 MB.
pub const DEFAULT_MAX_FRAME_WIDTH: u32 = 640;

/// Frame sampler configuration.
#[derive(Debug, Clone)]
pub struct SamplerConfig {
    /// Keep every n-th decoded frame (must be at least 1)
    pub every_nth: usize,
    /// Stop after this many sampled frames
    pub max_frames: Option<usize>,
    /// Downscale wider frames to this width before they leave FFmpeg
    pub max_width: Option<u32>,
    /// Upper bound on total decode time
    pub decode_timeout: Duration,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            every_nth: 5,
            max_frames: None,
            max_width: Some(DEFAULT_MAX_FRAME_WIDTH),
            decode_timeout: Duration::from_secs(300),
        }
    }
}

/// Selects decode indices 0, n, 2n, ...
#[derive(Debug, Clone)]
pub struct StrideSelector {
    every_nth: usize,
    next_index: usize,
}

impl StrideSelector {
    /// Create a selector. A stride of 0 is treated as 1.
    pub fn new(every_nth: usize) -> Self {
        Self {
            every_nth: every_nth.max(1),
            next_index: 0,
        }
    }

    /// Register the next decoded frame, returning its decode index if it is
    /// kept.
    pub fn admit(&mut self) -> Option<usize> {
        let index = self.next_index;
        self.next_index += 1;
        (index % self.every_nth == 0).then_some(index)
    }

    /// Number of frames registered so far.
    pub fn decoded(&self) -> usize {
        self.next_index
    }
}

/// Number of frames sampled from a video of `total_frames` frames.
pub fn expected_sample_count(total_frames: usize, every_nth: usize) -> usize {
    total_frames.div_ceil(every_nth.max(1))
}

/// Decodes videos into strided frame sequences.
#[derive(Debug, Clone, Default)]
pub struct FrameSampler {
    config: SamplerConfig,
    runner: FfmpegRunner,
}

impl FrameSampler {
    pub fn new(config: SamplerConfig) -> Self {
        Self {
            config,
            runner: FfmpegRunner::new(),
        }
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Sample frames from raw video bytes.
    ///
    /// The bytes are staged in a scratch directory that is removed before
    /// this returns.
    pub async fn sample_bytes(&self, bytes: &[u8], work_dir: Option<&Path>) -> MediaResult<Vec<Frame>> {
        if bytes.is_empty() {
            return Ok(Vec::new());
        }

        let scratch = ScratchVideo::write(bytes, work_dir).await?;
        self.sample_file(scratch.video_path()).await
    }

    /// Sample frames from a video file.
    ///
    /// Only a missing FFmpeg/FFprobe installation or local IO failures are
    /// errors; undecodable content yields an empty sequence.
    pub async fn sample_file(&self, path: &Path) -> MediaResult<Vec<Frame>> {
        let info = match probe_video(path).await {
            Ok(info) => info,
            Err(e) if e.is_missing_tool() => return Err(e),
            Err(e) => {
                warn!(error = %e, "Video could not be probed, no frames sampled");
                return Ok(Vec::new());
            }
        };

        self.decode(path, &info).await
    }

    async fn decode(&self, path: &Path, info: &VideoInfo) -> MediaResult<Vec<Frame>> {
        let (width, height) = info.output_dimensions(self.config.max_width);
        let mut cmd = FfmpegCommand::to_stdout(path).raw_rgb_frames();
        if (width, height) != (info.width, info.height) {
            cmd = cmd.scale_to(width, height);
        }

        let mut child = self.runner.spawn_piped(&cmd)?;
        let stderr_task = drain_stderr(&mut child);
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| MediaError::internal("FFmpeg stdout not captured"))?;

        let frame_len = width as usize * height as usize * 3;
        let deadline = Instant::now() + self.config.decode_timeout;
        let mut selector = StrideSelector::new(self.config.every_nth);
        let mut frames = Vec::new();
        let mut buf = vec![0u8; frame_len];
        let mut stopped_early = false;

        loop {
            if self
                .config
                .max_frames
                .is_some_and(|max| frames.len() >= max)
            {
                debug!(max_frames = frames.len(), "Frame cap reached");
                stopped_early = true;
                break;
            }

            match tokio::time::timeout_at(deadline, read_frame(&mut stdout, &mut buf)).await {
                Ok(Ok(true)) => {}
                Ok(Ok(false)) => break,
                Ok(Err(e)) => {
                    warn!(error = %e, "Failed reading decoded frames");
                    stopped_early = true;
                    break;
                }
                Err(_) => {
                    warn!(
                        timeout_secs = self.config.decode_timeout.as_secs(),
                        sampled = frames.len(),
                        "Frame decoding timed out, keeping frames decoded so far"
                    );
                    stopped_early = true;
                    break;
                }
            }

            if let Some(index) = selector.admit() {
                let pixels = std::mem::replace(&mut buf, vec![0u8; frame_len]);
                frames.push(Frame::from_rgb24(index, width, height, pixels)?);
            }
        }

        drop(stdout);
        if stopped_early {
            let _ = child.kill().await;
        }
        let status = child.wait().await?;
        let stderr = collect_stderr(stderr_task).await;

        if !stopped_early && !status.success() {
            warn!(
                exit_code = ?status.code(),
                stderr = stderr.as_deref().unwrap_or(""),
                decoded = selector.decoded(),
                "FFmpeg stopped before end of stream, keeping decoded frames"
            );
        }

        debug!(
            decoded = selector.decoded(),
            sampled = frames.len(),
            every_nth = self.config.every_nth,
            width,
            height,
            "Sampled video frames"
        );

        Ok(frames)
    }
}

/// Fill `buf` with one frame. Returns `false` at end of stream; a trailing
/// partial frame is discarded.
async fn read_frame<R: AsyncRead + Unpin>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<bool> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..]).await?;
        if n == 0 {
            return Ok(false);
        }
        filled += n;
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stride_selector_hundred_frames_every_fifth() {
        let mut selector = StrideSelector::new(5);
        let kept: Vec<usize> = (0..100).filter_map(|_| selector.admit()).collect();

        assert_eq!(kept.len(), 20);
        assert_eq!(kept, (0..100).step_by(5).collect::<Vec<_>>());
        assert_eq!(kept.last(), Some(&95));
        assert_eq!(selector.decoded(), 100);
    }

    #[test]
    fn test_stride_selector_every_frame() {
        let mut selector = StrideSelector::new(1);
        let kept: Vec<usize> = (0..7).filter_map(|_| selector.admit()).collect();
        assert_eq!(kept, vec![0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_stride_selector_zero_is_one() {
        let mut selector = StrideSelector::new(0);
        assert_eq!(selector.admit(), Some(0));
        assert_eq!(selector.admit(), Some(1));
    }

    #[test]
    fn test_expected_sample_count_is_ceiling() {
        assert_eq!(expected_sample_count(100, 5), 20);
        assert_eq!(expected_sample_count(101, 5), 21);
        assert_eq!(expected_sample_count(4, 5), 1);
        assert_eq!(expected_sample_count(0, 5), 0);

        for total in 0..60 {
            for n in 1..8 {
                let mut selector = StrideSelector::new(n);
                let kept = (0..total).filter_map(|_| selector.admit()).count();
                assert_eq!(kept, expected_sample_count(total, n), "total={total} n={n}");
            }
        }
    }

    #[tokio::test]
    async fn test_read_frame_discards_partial_tail() {
        let data = vec![7u8; 10];
        let mut reader: &[u8] = &data;
        let mut buf = [0u8; 4];

        assert!(read_frame(&mut reader, &mut buf).await.unwrap());
        assert!(read_frame(&mut reader, &mut buf).await.unwrap());
        assert!(!read_frame(&mut reader, &mut buf).await.unwrap());
    }

    #[tokio::test]
    async fn test_empty_bytes_yield_no_frames() {
        let sampler = FrameSampler::new(SamplerConfig::default());
        let frames = sampler.sample_bytes(&[], None).await.unwrap();
        assert!(frames.is_empty());
    }
}
