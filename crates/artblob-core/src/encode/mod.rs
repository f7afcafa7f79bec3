//! JPEG encoding under a byte budget.
//!
//! This module provides functionality for:
//! - Encoding RGB buffers to baseline JPEG at a given quality
//! - Searching a descending quality ladder for the best encoding that fits
//!   a maximum byte size
//!
//! # Examples
//!
//! ```ignore
//! use std::num::NonZeroUsize;
//! use artblob_core::encode::{encode_within_budget, QualityLadder};
//!
//! let artifact = encode_within_budget(&buffer, NonZeroUsize::new(65536).unwrap(), &QualityLadder::STANDARD)?;
//! if !artifact.within_budget {
//!     println!("best effort: {} bytes at quality {}", artifact.size(), artifact.quality);
//! }
//! ```

mod budget;
mod jpeg;

pub use budget::{encode_within_budget, EncodedArtifact, InvalidLadder, QualityLadder, MAX_QUALITY};
pub use jpeg::{encode_jpeg, EncodeError};
