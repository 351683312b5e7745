//! Request-scoped scratch space.
//!
//! An uploaded recording is written into a private temporary directory that
//! also receives derived files (extracted audio). The directory is removed
//! when the `ScratchVideo` is dropped, which covers early returns, errors and
//! unwinding panics alike.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;

use crate::error::MediaResult;

const VIDEO_FILE_NAME: &str = "upload.video";
const AUDIO_FILE_NAME: &str = "audio.wav";

/// Temporary on-disk copy of an uploaded video.
#[derive(Debug)]
pub struct ScratchVideo {
    dir: TempDir,
    video_path: PathBuf,
    len: usize,
}

impl ScratchVideo {
    /// Write `bytes` into a fresh scratch directory.
    ///
    /// When `work_dir` is given the scratch directory is created inside it,
    /// otherwise inside the system temp directory.
    pub async fn write(bytes: &[u8], work_dir: Option<&Path>) -> MediaResult<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("poise-");

        let dir = match work_dir {
            Some(root) => {
                tokio::fs::create_dir_all(root).await?;
                builder.tempdir_in(root)?
            }
            None => builder.tempdir()?,
        };

        let video_path = dir.path().join(VIDEO_FILE_NAME);
        tokio::fs::write(&video_path, bytes).await?;

        debug!(
            dir = %dir.path().display(),
            bytes = bytes.len(),
            "Created scratch video"
        );

        Ok(Self {
            dir,
            video_path,
            len: bytes.len(),
        })
    }

    /// Path of the uploaded video.
    pub fn video_path(&self) -> &Path {
        &self.video_path
    }

    /// Path where extracted audio is written.
    pub fn audio_path(&self) -> PathBuf {
        self.dir.path().join(AUDIO_FILE_NAME)
    }

    /// Scratch directory root.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Size of the uploaded bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the upload was empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scratch_removed_on_drop() {
        let scratch = ScratchVideo::write(b"not really a video", None).await.unwrap();
        let dir = scratch.dir().to_path_buf();
        let video = scratch.video_path().to_path_buf();

        assert!(video.exists());
        assert_eq!(tokio::fs::read(&video).await.unwrap(), b"not really a video");
        assert_eq!(scratch.len(), 18);

        drop(scratch);
        assert!(!dir.exists(), "scratch directory should be removed");
    }

    #[tokio::test]
    async fn test_scratch_removed_with_derived_files() {
        let scratch = ScratchVideo::write(b"x", None).await.unwrap();
        tokio::fs::write(scratch.audio_path(), b"wav").await.unwrap();
        let dir = scratch.dir().to_path_buf();

        drop(scratch);
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn test_scratch_removed_on_error_path() {
        async fn failing_stage(scratch: &ScratchVideo) -> MediaResult<()> {
            assert!(scratch.video_path().exists());
            Err(crate::error::MediaError::internal("boom"))
        }

        let dir = {
            let scratch = ScratchVideo::write(b"abc", None).await.unwrap();
            let dir = scratch.dir().to_path_buf();
            assert!(failing_stage(&scratch).await.is_err());
            dir
        };
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn test_scratch_in_work_dir() {
        let root = tempfile::tempdir().unwrap();
        let work = root.path().join("nested").join("work");

        let scratch = ScratchVideo::write(b"", Some(&work)).await.unwrap();
        assert!(scratch.dir().starts_with(&work));
        assert!(scratch.is_empty());
    }
}
