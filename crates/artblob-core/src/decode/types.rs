//! Core types for upload decoding.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for decoding an uploaded image.
///
/// Any of these aborts the whole pipeline: no artifacts are produced.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The content does not start with a JPEG, PNG or GIF signature.
    #[error("Invalid or unsupported image format")]
    UnsupportedFormat,

    /// The image data is corrupted, truncated or otherwise unparsable.
    #[error("Corrupted or incomplete image file: {0}")]
    Corrupted(String),

    /// The image header describes an image with no pixels.
    #[error("Degenerate image geometry: {width}x{height}")]
    DegenerateGeometry { width: u32, height: u32 },

    /// I/O error while reading the upload stream.
    #[error("I/O error: {0}")]
    Io(String),
}

/// Container format detected from the upload's leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Jpeg,
    Png,
    Gif,
    /// No supported signature matched.
    Unknown,
}

impl SourceFormat {
    /// The `image` crate format used to decode this container, if supported.
    pub fn to_image_format(self) -> Option<image::ImageFormat> {
        match self {
            SourceFormat::Jpeg => Some(image::ImageFormat::Jpeg),
            SourceFormat::Png => Some(image::ImageFormat::Png),
            SourceFormat::Gif => Some(image::ImageFormat::Gif),
            SourceFormat::Unknown => None,
        }
    }

    /// MIME type recorded as upload metadata.
    pub fn mime_type(self) -> &'static str {
        match self {
            SourceFormat::Jpeg => "image/jpeg",
            SourceFormat::Png => "image/png",
            SourceFormat::Gif => "image/gif",
            SourceFormat::Unknown => "application/octet-stream",
        }
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SourceFormat::Jpeg => "JPEG",
            SourceFormat::Png => "PNG",
            SourceFormat::Gif => "GIF",
            SourceFormat::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Filter type for resampling operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    #[default]
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Orientation {
    /// Normal (no transformation needed).
    #[default]
    Normal = 1,
    /// Horizontal flip.
    FlipHorizontal = 2,
    /// Rotate 180 degrees.
    Rotate180 = 3,
    /// Vertical flip.
    FlipVertical = 4,
    /// Transpose (flip horizontal + rotate 270 CW).
    Transpose = 5,
    /// Rotate 90 degrees clockwise.
    Rotate90CW = 6,
    /// Transverse (flip horizontal + rotate 90 CW).
    Transverse = 7,
    /// Rotate 270 degrees clockwise (90 CCW).
    Rotate270CW = 8,
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// An owned RGB8 pixel buffer.
///
/// Every resampled buffer is a fresh allocation; nothing in the pipeline
/// writes into a buffer it did not create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    image: image::RgbImage,
}

impl PixelBuffer {
    /// Build a buffer from raw row-major RGB samples.
    ///
    /// Returns `None` when `pixels.len() != width * height * 3`.
    pub fn from_raw(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        image::RgbImage::from_raw(width, height, pixels).map(Self::from_rgb_image)
    }

    /// Wrap an `image::RgbImage`.
    pub fn from_rgb_image(image: image::RgbImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Row-major RGB samples, 3 bytes per pixel.
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Borrow as an `image::RgbImage` for use with `imageops`.
    pub fn as_rgb_image(&self) -> &image::RgbImage {
        &self.image
    }
}

/// A decoded upload: pixels plus the detected container format.
///
/// Produced once per upload and only read afterwards. Fields are private so
/// the pixels cannot be changed once decoding has finished; profile runs
/// borrow it immutably, possibly from several threads.
#[derive(Debug, Clone)]
pub struct SourceImage {
    buffer: PixelBuffer,
    format: SourceFormat,
}

impl SourceImage {
    pub(crate) fn new(buffer: PixelBuffer, format: SourceFormat) -> Self {
        Self { buffer, format }
    }

    pub fn format(&self) -> SourceFormat {
        self.format
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_type_conversion() {
        assert!(matches!(
            FilterType::Nearest.to_image_filter(),
            image::imageops::FilterType::Nearest
        ));
        assert!(matches!(
            FilterType::Bilinear.to_image_filter(),
            image::imageops::FilterType::Triangle
        ));
        assert!(matches!(
            FilterType::Lanczos3.to_image_filter(),
            image::imageops::FilterType::Lanczos3
        ));
    }

    #[test]
    fn test_default_filter_is_bilinear() {
        assert_eq!(FilterType::default(), FilterType::Bilinear);
    }

    #[test]
    fn test_orientation_from_u32() {
        assert_eq!(Orientation::from(1), Orientation::Normal);
        assert_eq!(Orientation::from(6), Orientation::Rotate90CW);
        assert_eq!(Orientation::from(99), Orientation::Normal);
    }

    #[test]
    fn test_source_format_mapping() {
        assert_eq!(
            SourceFormat::Png.to_image_format(),
            Some(image::ImageFormat::Png)
        );
        assert_eq!(SourceFormat::Unknown.to_image_format(), None);
        assert_eq!(SourceFormat::Gif.mime_type(), "image/gif");
        assert_eq!(SourceFormat::Jpeg.to_string(), "JPEG");
    }

    #[test]
    fn test_pixel_buffer_from_raw() {
        let buffer = PixelBuffer::from_raw(100, 50, vec![0u8; 100 * 50 * 3]).unwrap();

        assert_eq!(buffer.dimensions(), (100, 50));
        assert_eq!(buffer.as_raw().len(), 15000);
    }

    #[test]
    fn test_pixel_buffer_rejects_short_data() {
        assert!(PixelBuffer::from_raw(10, 10, vec![0u8; 299]).is_none());
    }

    #[test]
    fn test_decode_error_display() {
        let err = DecodeError::DegenerateGeometry {
            width: 0,
            height: 12,
        };
        assert_eq!(err.to_string(), "Degenerate image geometry: 0x12");

        let err = DecodeError::UnsupportedFormat;
        assert_eq!(err.to_string(), "Invalid or unsupported image format");
    }
}
