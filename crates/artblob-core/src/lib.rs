//! Artblob Core - upload image pipeline
//!
//! Turns an uploaded JPEG, PNG or GIF into two JPEG blobs suitable for a
//! database column: a grid thumbnail and a display-size image, each bounded
//! by a maximum pixel dimension and a maximum encoded size.
//!
//! # Pipeline
//!
//! 1. [`decode`] sniffs the format from content and decodes once.
//! 2. [`decode::resample`] scales each profile's copy to fit its bound.
//! 3. [`encode::encode_within_budget`] walks a descending quality ladder
//!    until the JPEG fits, or returns the floor encoding flagged as over budget.
//!
//! ```ignore
//! let file = std::fs::File::open("upload.png")?;
//! let processed = artblob_core::process_image(file)?;
//! store(&processed.thumbnail.bytes, &processed.full_image.bytes, artblob_core::OUTPUT_CONTENT_TYPE);
//! ```

pub mod config;
pub mod decode;
pub mod encode;
pub mod pipeline;
pub mod profile;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{ConfigError, OverBudgetPolicy, PipelineConfig, DEFAULT_MAX_INPUT_BYTES};
pub use decode::{DecodeError, FilterType, PixelBuffer, SourceFormat, SourceImage};
pub use encode::{EncodeError, EncodedArtifact, QualityLadder};
pub use pipeline::{
    process_image, render_profile, Pipeline, ProcessError, ProcessedImage, OUTPUT_CONTENT_TYPE,
};
pub use profile::{OutputProfile, ProfileKind};
