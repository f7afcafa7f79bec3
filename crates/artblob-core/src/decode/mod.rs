//! Decoding and resampling of uploaded images.
//!
//! This module provides functionality for:
//! - Detecting the upload's container format from its content
//! - Decoding JPEG, PNG and GIF (first frame) into an RGB8 buffer
//! - Resampling a decoded buffer to fit a maximum dimension
//!
//! # Architecture
//!
//! Decoding happens once per upload and produces an immutable
//! [`SourceImage`]. Each output profile then resamples its own copy, so the
//! two profile runs only ever share read-only data.
//!
//! # Examples
//!
//! ```ignore
//! use std::num::NonZeroU32;
//! use artblob_core::decode::{decode, resample, FilterType};
//!
//! let bytes = std::fs::read("upload.png").unwrap();
//! let source = decode(&bytes).unwrap();
//! let thumb = resample(source.buffer(), NonZeroU32::new(200).unwrap(), FilterType::Bilinear);
//! println!("{} -> {}x{}", source.format(), thumb.width(), thumb.height());
//! ```

mod resize;
mod sniff;
mod source;
mod types;

pub use resize::{fit_dimensions, resample};
pub use sniff::sniff_format;
pub use source::{decode, decode_from_reader};
pub use types::{DecodeError, FilterType, Orientation, PixelBuffer, SourceFormat, SourceImage};
