//! Output profiles: the size constraints for each derived artifact.

use std::fmt;
use std::num::{NonZeroU32, NonZeroU8, NonZeroUsize};

use serde::{Deserialize, Serialize};

use crate::encode::{InvalidLadder, QualityLadder};

/// Which of the two derived artifacts a profile produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileKind {
    Thumbnail,
    FullImage,
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileKind::Thumbnail => f.write_str("thumbnail"),
            ProfileKind::FullImage => f.write_str("full image"),
        }
    }
}

/// Dimension and byte constraints for one derived JPEG.
///
/// Only `max_dimension` and `max_bytes` are required when deserializing;
/// the quality fields default to the standard 90 → 40 ladder in steps of 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputProfile {
    /// Longest allowed side of the output, in pixels.
    pub max_dimension: NonZeroU32,
    /// Largest allowed encoded size, in bytes.
    pub max_bytes: NonZeroUsize,
    /// Lowest quality tried before giving up on the budget.
    #[serde(default = "default_quality_floor")]
    pub quality_floor: u8,
    /// First quality tried.
    #[serde(default = "default_quality_ceiling")]
    pub quality_ceiling: u8,
    /// Distance between successive qualities.
    #[serde(default = "default_quality_step")]
    pub quality_step: NonZeroU8,
}

fn default_quality_floor() -> u8 {
    QualityLadder::STANDARD.floor()
}

fn default_quality_ceiling() -> u8 {
    QualityLadder::STANDARD.ceiling()
}

fn default_quality_step() -> NonZeroU8 {
    NonZeroU8::new(10).unwrap_or(NonZeroU8::MIN)
}

impl OutputProfile {
    /// Grid thumbnail: at most 200px on a side and 64 KiB.
    pub fn thumbnail() -> Self {
        Self::standard(200, 64 * 1024)
    }

    /// Display image: at most 400px on a side and 200 KiB.
    pub fn full_image() -> Self {
        Self::standard(400, 200 * 1024)
    }

    /// Default profile for `kind`.
    pub fn for_kind(kind: ProfileKind) -> Self {
        match kind {
            ProfileKind::Thumbnail => Self::thumbnail(),
            ProfileKind::FullImage => Self::full_image(),
        }
    }

    fn standard(max_dimension: u32, max_bytes: usize) -> Self {
        Self {
            max_dimension: NonZeroU32::new(max_dimension).unwrap_or(NonZeroU32::MIN),
            max_bytes: NonZeroUsize::new(max_bytes).unwrap_or(NonZeroUsize::MIN),
            quality_floor: default_quality_floor(),
            quality_ceiling: default_quality_ceiling(),
            quality_step: default_quality_step(),
        }
    }

    /// The quality ladder described by this profile.
    ///
    /// # Errors
    ///
    /// Returns `InvalidLadder` if the floor exceeds the ceiling or the
    /// ceiling exceeds 100.
    pub fn ladder(&self) -> Result<QualityLadder, InvalidLadder> {
        QualityLadder::new(self.quality_ceiling, self.quality_floor, self.quality_step)
    }
}
