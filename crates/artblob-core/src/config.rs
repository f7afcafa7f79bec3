//! Pipeline configuration.
//!
//! Every field has a default, so an empty TOML document (or no file at all)
//! yields the production settings. Example:
//!
//! ```toml
//! max_input_bytes = 10485760
//! filter = "bilinear"
//! over_budget = "accept"
//! parallel = false
//!
//! [thumbnail]
//! max_dimension = 200
//! max_bytes = 65536
//!
//! [full_image]
//! max_dimension = 400
//! max_bytes = 204800
//! quality_ceiling = 90
//! quality_floor = 40
//! quality_step = 10
//! ```

use std::num::NonZeroUsize;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::FilterType;
use crate::encode::InvalidLadder;
use crate::profile::{OutputProfile, ProfileKind};

/// Upload size cap applied before decoding (10 MiB).
pub const DEFAULT_MAX_INPUT_BYTES: usize = 10 << 20;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid {profile} profile: {source}")]
    InvalidProfile {
        profile: ProfileKind,
        source: InvalidLadder,
    },
}

/// What to do with an artifact that could not be squeezed under its budget.
///
/// The best-effort encoding is always produced; this only decides whether
/// the caller sees it as a success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverBudgetPolicy {
    /// Return the floor-quality encoding and log a warning.
    #[default]
    Accept,
    /// Fail the upload with `ProcessError::OverBudget`.
    Reject,
}

/// Settings for one [`Pipeline`](crate::Pipeline).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Largest upload accepted before decoding, in bytes.
    pub max_input_bytes: NonZeroUsize,
    /// Interpolation used when downscaling.
    pub filter: FilterType,
    pub over_budget: OverBudgetPolicy,
    /// Run the two profiles on the rayon pool instead of back to back.
    pub parallel: bool,
    pub thumbnail: OutputProfile,
    pub full_image: OutputProfile,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: NonZeroUsize::new(DEFAULT_MAX_INPUT_BYTES)
                .unwrap_or(NonZeroUsize::MIN),
            filter: FilterType::default(),
            over_budget: OverBudgetPolicy::default(),
            parallel: false,
            thumbnail: OutputProfile::thumbnail(),
            full_image: OutputProfile::full_image(),
        }
    }
}

impl PipelineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// The profile for `kind`.
    pub fn profile(&self, kind: ProfileKind) -> &OutputProfile {
        match kind {
            ProfileKind::Thumbnail => &self.thumbnail,
            ProfileKind::FullImage => &self.full_image,
        }
    }

    /// Check that both profiles describe a usable quality ladder.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for kind in [ProfileKind::Thumbnail, ProfileKind::FullImage] {
            self.profile(kind)
                .ladder()
                .map_err(|source| ConfigError::InvalidProfile {
                    profile: kind,
                    source,
                })?;
        }
        Ok(())
    }
}
