//! Upload orchestration: decode once, then render each output profile.

use std::io::Read;

use log::debug;
use thiserror::Error;

use crate::config::{OverBudgetPolicy, PipelineConfig};
use crate::decode::{decode, resample, DecodeError, FilterType, SourceFormat, SourceImage};
use crate::encode::{encode_within_budget, EncodeError, EncodedArtifact, QualityLadder};
use crate::profile::{OutputProfile, ProfileKind};
use crate::ConfigError;

/// Content type of every stored artifact, whatever the upload's format.
pub const OUTPUT_CONTENT_TYPE: &str = "image/jpeg";

/// Errors returned by [`Pipeline::process`].
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The upload exceeded the configured size cap; nothing was decoded.
    #[error("upload exceeds the {limit} byte limit")]
    InputTooLarge { limit: usize },

    /// The upload could not be decoded; no artifacts were produced.
    #[error("failed to decode upload: {0}")]
    Decode(#[from] DecodeError),

    /// The encoder could not serialize a profile's buffer.
    #[error("failed to encode {profile}: {source}")]
    Encode {
        profile: ProfileKind,
        source: EncodeError,
    },

    /// An artifact missed its budget and the policy is `Reject`.
    #[error("{profile} is {size} bytes, over the {max_bytes} byte budget")]
    OverBudget {
        profile: ProfileKind,
        size: usize,
        max_bytes: usize,
    },
}

/// Both artifacts derived from one upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedImage {
    pub thumbnail: EncodedArtifact,
    pub full_image: EncodedArtifact,
    /// Format detected from the upload's content.
    pub source_format: SourceFormat,
    pub source_width: u32,
    pub source_height: u32,
}

impl ProcessedImage {
    /// The artifact for `kind`.
    pub fn artifact(&self, kind: ProfileKind) -> &EncodedArtifact {
        match kind {
            ProfileKind::Thumbnail => &self.thumbnail,
            ProfileKind::FullImage => &self.full_image,
        }
    }

    /// True when neither artifact had to fall back to the quality floor
    /// without meeting its budget.
    pub fn all_within_budget(&self) -> bool {
        self.thumbnail.within_budget && self.full_image.within_budget
    }
}

/// Resample and encode one profile against an already-decoded source.
///
/// Pure with respect to `source`: the resampled buffer is freshly allocated
/// and dropped before returning.
pub fn render_profile(
    source: &SourceImage,
    profile: &OutputProfile,
    ladder: &QualityLadder,
    filter: FilterType,
) -> Result<EncodedArtifact, EncodeError> {
    let resized = resample(source.buffer(), profile.max_dimension, filter);
    encode_within_budget(&resized, profile.max_bytes, ladder)
}

/// A configured upload pipeline.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    thumbnail_ladder: QualityLadder,
    full_image_ladder: QualityLadder,
}

impl Default for Pipeline {
    fn default() -> Self {
        let config = PipelineConfig::default();
        // The default profiles always form valid ladders
        let ladder = |kind| profile_ladder(&config, kind).unwrap_or_default();

        Self {
            thumbnail_ladder: ladder(ProfileKind::Thumbnail),
            full_image_ladder: ladder(ProfileKind::FullImage),
            config,
        }
    }
}

impl Pipeline {
    /// Build a pipeline, validating both profiles.
    pub fn new(config: PipelineConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            thumbnail_ladder: profile_ladder(&config, ProfileKind::Thumbnail)?,
            full_image_ladder: profile_ladder(&config, ProfileKind::FullImage)?,
            config,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Read an upload stream (up to `max_input_bytes`) and process it.
    pub fn process<R: Read>(&self, reader: R) -> Result<ProcessedImage, ProcessError> {
        let bytes = read_limited(reader, self.config.max_input_bytes.get())?;
        self.process_bytes(&bytes)
    }

    /// Process an upload that is already in memory.
    ///
    /// Decoding failure aborts with no artifacts. Otherwise both profiles
    /// are always rendered before the over-budget policy is applied, so one
    /// profile missing its budget never stops the other.
    pub fn process_bytes(&self, bytes: &[u8]) -> Result<ProcessedImage, ProcessError> {
        let limit = self.config.max_input_bytes.get();
        if bytes.len() > limit {
            return Err(ProcessError::InputTooLarge { limit });
        }

        let source = decode(bytes)?;

        let (thumbnail, full_image) = if self.config.parallel {
            rayon::join(
                || self.render(&source, ProfileKind::Thumbnail),
                || self.render(&source, ProfileKind::FullImage),
            )
        } else {
            (
                self.render(&source, ProfileKind::Thumbnail),
                self.render(&source, ProfileKind::FullImage),
            )
        };

        let processed = ProcessedImage {
            thumbnail: thumbnail?,
            full_image: full_image?,
            source_format: source.format(),
            source_width: source.width(),
            source_height: source.height(),
        };

        for kind in [ProfileKind::Thumbnail, ProfileKind::FullImage] {
            self.check_budget(kind, processed.artifact(kind))?;
        }

        Ok(processed)
    }

    fn render(
        &self,
        source: &SourceImage,
        kind: ProfileKind,
    ) -> Result<EncodedArtifact, ProcessError> {
        let (profile, ladder) = match kind {
            ProfileKind::Thumbnail => (&self.config.thumbnail, &self.thumbnail_ladder),
            ProfileKind::FullImage => (&self.config.full_image, &self.full_image_ladder),
        };

        let artifact = render_profile(source, profile, ladder, self.config.filter)
            .map_err(|error| ProcessError::Encode {
                profile: kind,
                source: error,
            })?;

        debug!(
            "{}: {}x{}, {} bytes at quality {}",
            kind,
            artifact.width,
            artifact.height,
            artifact.size(),
            artifact.quality
        );
        Ok(artifact)
    }

    fn check_budget(
        &self,
        kind: ProfileKind,
        artifact: &EncodedArtifact,
    ) -> Result<(), ProcessError> {
        if artifact.within_budget {
            return Ok(());
        }

        let max_bytes = self.config.profile(kind).max_bytes.get();
        match self.config.over_budget {
            OverBudgetPolicy::Accept => {
                debug!(
                    "{} is {} bytes at quality {}, over the {} byte budget; keeping best effort",
                    kind,
                    artifact.size(),
                    artifact.quality,
                    max_bytes
                );
                Ok(())
            }
            OverBudgetPolicy::Reject => Err(ProcessError::OverBudget {
                profile: kind,
                size: artifact.size(),
                max_bytes,
            }),
        }
    }
}

fn profile_ladder(
    config: &PipelineConfig,
    kind: ProfileKind,
) -> Result<QualityLadder, ConfigError> {
    config
        .profile(kind)
        .ladder()
        .map_err(|source| ConfigError::InvalidProfile {
            profile: kind,
            source,
        })
}

/// Process an upload with the default configuration.
///
/// Decodes once, then derives a thumbnail (200px, 64 KiB) and a display
/// image (400px, 200 KiB). Over-budget artifacts are returned with
/// `within_budget = false`.
pub fn process_image<R: Read>(reader: R) -> Result<ProcessedImage, ProcessError> {
    Pipeline::default().process(reader)
}

/// Read at most `limit` bytes, failing if the stream holds more.
fn read_limited<R: Read>(reader: R, limit: usize) -> Result<Vec<u8>, ProcessError> {
    let mut bytes = Vec::new();
    reader
        .take((limit as u64).saturating_add(1))
        .read_to_end(&mut bytes)
        .map_err(|e| DecodeError::Io(e.to_string()))?;

    if bytes.len() > limit {
        return Err(ProcessError::InputTooLarge { limit });
    }
    Ok(bytes)
}
