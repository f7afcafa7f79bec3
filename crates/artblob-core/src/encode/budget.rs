//! Quality-ladder search for a JPEG that fits a byte budget.
//!
//! Qualities are tried from the ceiling downwards in fixed steps rather than
//! by bisection: encoded size is not strictly monotonic in quality, and a
//! short ladder bounds the cost at a handful of encode passes.

use std::num::{NonZeroU8, NonZeroUsize};

use log::{debug, trace};
use thiserror::Error;

use super::{encode_jpeg, EncodeError};
use crate::decode::PixelBuffer;

/// Highest quality the JPEG encoder accepts.
pub const MAX_QUALITY: u8 = 100;

/// Lowest quality the JPEG encoder accepts; lower requests are raised to it.
const MIN_QUALITY: u8 = 1;

/// A quality ladder whose bounds are out of order or out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid quality ladder: floor {floor} must not exceed ceiling {ceiling}, and ceiling must be at most 100")]
pub struct InvalidLadder {
    pub ceiling: u8,
    pub floor: u8,
}

/// Descending sequence of candidate JPEG qualities.
///
/// Starts at `ceiling` and steps down by `step`. The floor is always the
/// last candidate, even when the step does not land on it exactly
/// (90/40/15 yields 90, 75, 60, 45, 40). Candidates below 1 are raised to
/// 1, so 10/0/10 yields 10, 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityLadder {
    ceiling: u8,
    floor: u8,
    step: u8,
}

impl QualityLadder {
    /// 90, 80, 70, 60, 50, 40.
    pub const STANDARD: QualityLadder = QualityLadder {
        ceiling: 90,
        floor: 40,
        step: 10,
    };

    pub fn new(ceiling: u8, floor: u8, step: NonZeroU8) -> Result<Self, InvalidLadder> {
        if ceiling > MAX_QUALITY || floor > ceiling {
            return Err(InvalidLadder { ceiling, floor });
        }
        Ok(Self {
            ceiling,
            floor,
            step: step.get(),
        })
    }

    pub fn ceiling(&self) -> u8 {
        self.ceiling
    }

    pub fn floor(&self) -> u8 {
        self.floor
    }

    /// Iterate candidate qualities, highest first, without repeats.
    pub fn qualities(&self) -> impl Iterator<Item = u8> {
        let step = self.step;
        let floor = self.floor.max(MIN_QUALITY);
        let mut next = Some(self.ceiling.max(MIN_QUALITY));

        std::iter::from_fn(move || {
            let current = next?;
            next = (current > floor).then(|| current.saturating_sub(step).max(floor));
            Some(current)
        })
    }
}

impl Default for QualityLadder {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// A JPEG produced for one output profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedArtifact {
    /// Encoded JPEG bytes. Always a complete JPEG, even when over budget.
    pub bytes: Vec<u8>,
    /// Whether `bytes.len()` fits the requested budget.
    pub within_budget: bool,
    /// Quality the bytes were encoded at.
    pub quality: u8,
    /// Pixel width of the encoded image.
    pub width: u32,
    /// Pixel height of the encoded image.
    pub height: u32,
}

impl EncodedArtifact {
    /// Encoded size in bytes.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Encode `image` at the highest ladder quality whose output fits `max_bytes`.
///
/// When no candidate fits, the floor encoding is returned with
/// `within_budget = false`. Budget failure is never an `Err`.
///
/// # Errors
///
/// Returns an `EncodeError` only if the encoder cannot serialize the buffer.
pub fn encode_within_budget(
    image: &PixelBuffer,
    max_bytes: NonZeroUsize,
    ladder: &QualityLadder,
) -> Result<EncodedArtifact, EncodeError> {
    let (width, height) = image.dimensions();
    let mut floor_encoding = None;

    for quality in ladder.qualities() {
        let bytes = encode_jpeg(image.as_raw(), width, height, quality)?;

        if bytes.len() <= max_bytes.get() {
            debug!(
                "{}x{} fits {} bytes at quality {} ({} bytes)",
                width,
                height,
                max_bytes,
                quality,
                bytes.len()
            );
            return Ok(EncodedArtifact {
                bytes,
                within_budget: true,
                quality,
                width,
                height,
            });
        }

        trace!("quality {} gave {} bytes, over {}", quality, bytes.len(), max_bytes);
        floor_encoding = Some((quality, bytes));
    }

    // The ladder always yields its floor last
    let (quality, bytes) = floor_encoding.ok_or_else(|| {
        EncodeError::EncodingFailed("quality ladder yielded no candidates".to_string())
    })?;

    Ok(EncodedArtifact {
        bytes,
        within_budget: false,
        quality,
        width,
        height,
    })
}
