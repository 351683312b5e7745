//! Frame sampler tests against real FFmpeg output.
//!
//! Skipped when FFmpeg/FFprobe are not installed.

use std::path::{Path, PathBuf};
use std::time::Duration;

use poise_media::{
    check_ffmpeg, check_ffprobe, extract_audio_wav, probe_video, FrameSampler, SamplerConfig,
    ScratchVideo,
};

fn tools_available() -> bool {
    check_ffmpeg().is_ok() && check_ffprobe().is_ok()
}

/// Encode a 100-frame 64x48 test pattern without audio.
async fn test_pattern(dir: &Path) -> PathBuf {
    let path = dir.join("pattern.mkv");
    let status = tokio::process::Command::new("ffmpeg")
        .args([
            "-y",
            "-v",
            "error",
            "-f",
            "lavfi",
            "-i",
            "testsrc=size=64x48:rate=25",
            "-frames:v",
            "100",
            "-c:v",
            "ffv1",
            "-pix_fmt",
            "yuv420p",
        ])
        .arg(&path)
        .status()
        .await
        .unwrap();
    assert!(status.success());
    path
}

#[tokio::test]
async fn test_hundred_frames_every_fifth() {
    if !tools_available() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let video = test_pattern(dir.path()).await;

    let info = probe_video(&video).await.unwrap();
    assert_eq!((info.width, info.height), (64, 48));
    assert!(!info.has_audio);

    let sampler = FrameSampler::new(SamplerConfig {
        every_nth: 5,
        ..Default::default()
    });
    let frames = sampler.sample_file(&video).await.unwrap();

    let indices: Vec<usize> = frames.iter().map(|f| f.index).collect();
    assert_eq!(indices, (0..100).step_by(5).collect::<Vec<_>>());
    assert!(frames.iter().all(|f| f.width() == 64 && f.height() == 48));
}

#[tokio::test]
async fn test_max_frames_cap() {
    if !tools_available() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let video = test_pattern(dir.path()).await;

    let sampler = FrameSampler::new(SamplerConfig {
        every_nth: 10,
        max_frames: Some(3),
        ..Default::default()
    });
    let frames = sampler.sample_file(&video).await.unwrap();

    let indices: Vec<usize> = frames.iter().map(|f| f.index).collect();
    assert_eq!(indices, vec![0, 10, 20]);
}

#[tokio::test]
async fn test_wide_frames_are_downscaled() {
    if !tools_available() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let video = test_pattern(dir.path()).await;

    let sampler = FrameSampler::new(SamplerConfig {
        every_nth: 25,
        max_width: Some(32),
        ..Default::default()
    });
    let frames = sampler.sample_file(&video).await.unwrap();

    let indices: Vec<usize> = frames.iter().map(|f| f.index).collect();
    assert_eq!(indices, vec![0, 25, 50, 75]);
    assert!(frames.iter().all(|f| f.width() == 32 && f.height() == 24));
}

#[tokio::test]
async fn test_undecodable_bytes_yield_no_frames() {
    if !tools_available() {
        return;
    }
    let sampler = FrameSampler::new(SamplerConfig::default());
    let frames = sampler
        .sample_bytes(b"\x00\x01garbage that is not a container", None)
        .await
        .unwrap();
    assert!(frames.is_empty());
}

#[tokio::test]
async fn test_silent_video_has_no_audio_track() {
    if !tools_available() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let video = test_pattern(dir.path()).await;
    let bytes = tokio::fs::read(&video).await.unwrap();

    let scratch = ScratchVideo::write(&bytes, None).await.unwrap();
    assert!(extract_audio_wav(&scratch, Duration::from_secs(60)).await.is_err());
}
