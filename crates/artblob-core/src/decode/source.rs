//! Upload decoding with content sniffing and EXIF orientation handling.

use std::io::{Cursor, Read};

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageError};
use log::debug;

use super::{sniff_format, DecodeError, Orientation, PixelBuffer, SourceImage};

/// Decode an uploaded image from bytes.
///
/// The format is chosen by [`sniff_format`], then the matching decoder from
/// the `image` crate runs. GIF uploads yield their first frame. Alpha is
/// discarded and the result is always RGB8, upright according to any EXIF
/// orientation tag.
///
/// # Errors
///
/// Returns `DecodeError::UnsupportedFormat` if no supported signature matches.
/// Returns `DecodeError::Corrupted` if the data cannot be decoded.
/// Returns `DecodeError::DegenerateGeometry` for images without pixels.
pub fn decode(bytes: &[u8]) -> Result<SourceImage, DecodeError> {
    let format = sniff_format(bytes);
    let image_format = format
        .to_image_format()
        .ok_or(DecodeError::UnsupportedFormat)?;

    let img = image::load_from_memory_with_format(bytes, image_format).map_err(map_image_error)?;
    check_geometry(img.width(), img.height())?;

    let orientation = extract_orientation(bytes);
    let rgb_img = apply_orientation(img, orientation).into_rgb8();

    debug!(
        "decoded {} upload: {}x{} ({:?})",
        format,
        rgb_img.width(),
        rgb_img.height(),
        orientation
    );

    Ok(SourceImage::new(PixelBuffer::from_rgb_image(rgb_img), format))
}

/// Read a stream to its end and decode it.
///
/// No size limit is applied here; callers cap the stream first.
pub fn decode_from_reader<R: Read>(mut reader: R) -> Result<SourceImage, DecodeError> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| DecodeError::Io(e.to_string()))?;
    decode(&bytes)
}

fn map_image_error(error: ImageError) -> DecodeError {
    match error {
        ImageError::Unsupported(_) => DecodeError::UnsupportedFormat,
        other => DecodeError::Corrupted(other.to_string()),
    }
}

fn check_geometry(width: u32, height: u32) -> Result<(), DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::DegenerateGeometry { width, height });
    }
    Ok(())
}

/// Extract EXIF orientation from the container.
///
/// Returns `Orientation::Normal` if no EXIF data is found or orientation
/// cannot be determined.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

/// Apply EXIF orientation transformation to an image.
fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
