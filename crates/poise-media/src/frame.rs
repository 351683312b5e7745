//! Decoded video frames.

use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, RgbImage};

use crate::error::{MediaError, MediaResult};

/// JPEG quality used when frames are shipped to remote detectors.
const JPEG_QUALITY: u8 = 90;

/// A sampled still image.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Zero-based decode index in the source video
    pub index: usize,
    /// Packed RGB pixels
    pub image: RgbImage,
}

impl Frame {
    pub fn new(index: usize, image: RgbImage) -> Self {
        Self { index, image }
    }

    /// Build a frame from a packed RGB24 buffer.
    pub fn from_rgb24(index: usize, width: u32, height: u32, pixels: Vec<u8>) -> MediaResult<Self> {
        let image = RgbImage::from_raw(width, height, pixels).ok_or_else(|| {
            MediaError::internal(format!(
                "RGB buffer does not match {}x{} frame size",
                width, height
            ))
        })?;
        Ok(Self { index, image })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Encode the frame as JPEG.
    pub fn encode_jpeg(&self) -> MediaResult<Vec<u8>> {
        let mut buf = Vec::new();
        JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY).encode(
            self.image.as_raw(),
            self.width(),
            self.height(),
            ColorType::Rgb8,
        )?;
        Ok(buf)
    }
}
