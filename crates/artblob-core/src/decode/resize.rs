//! Resampling into a bounded output size.
//!
//! All functions return new `PixelBuffer` instances without modifying the input.

use std::num::NonZeroU32;

use super::{FilterType, PixelBuffer};

/// Compute output dimensions that fit within `max_dimension`.
///
/// If both sides already fit, the source dimensions are returned unchanged
/// (no upscaling). Otherwise the longer side becomes `max_dimension` and the
/// shorter side is scaled by the same ratio, rounded to the nearest pixel and
/// never less than 1.
pub fn fit_dimensions(width: u32, height: u32, max_dimension: NonZeroU32) -> (u32, u32) {
    let max_edge = max_dimension.get();

    if width <= max_edge && height <= max_edge {
        return (width, height);
    }

    let scale = |side: u32, longest: u32| -> u32 {
        let scaled = (f64::from(side) * f64::from(max_edge) / f64::from(longest)).round() as u32;
        scaled.max(1)
    };

    if width >= height {
        // Landscape or square: constrain by width
        (max_edge, scale(height, width))
    } else {
        // Portrait: constrain by height
        (scale(width, height), max_edge)
    }
}

/// Resample an image so that it fits within `max_dimension`.
///
/// Always allocates a new buffer, also on the pass-through path. For a given
/// filter the output is a pure function of the input: the same image and
/// bound produce bit-identical pixels.
pub fn resample(image: &PixelBuffer, max_dimension: NonZeroU32, filter: FilterType) -> PixelBuffer {
    let (width, height) = fit_dimensions(image.width(), image.height(), max_dimension);

    if (width, height) == image.dimensions() {
        return image.clone();
    }

    let resized = image::imageops::resize(
        image.as_rgb_image(),
        width,
        height,
        filter.to_image_filter(),
    );

    PixelBuffer::from_rgb_image(resized)
}
