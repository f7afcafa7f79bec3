//! Human-readable reporting for the `process` command.

use artblob_core::{EncodedArtifact, ProcessedImage, ProfileKind};

/// One line describing an artifact, e.g.
/// `thumbnail: 200x150, 12034 bytes, quality 90 (within budget)`.
pub fn artifact_line(kind: ProfileKind, artifact: &EncodedArtifact) -> String {
    let status = if artifact.within_budget {
        "within budget"
    } else {
        "OVER BUDGET"
    };
    format!(
        "{}: {}x{}, {} bytes, quality {} ({})",
        kind,
        artifact.width,
        artifact.height,
        artifact.size(),
        artifact.quality,
        status
    )
}

/// Full summary printed after a successful run.
pub fn summary(processed: &ProcessedImage) -> String {
    let mut lines = vec![format!(
        "source: {} {}x{}",
        processed.source_format, processed.source_width, processed.source_height
    )];
    for kind in [ProfileKind::Thumbnail, ProfileKind::FullImage] {
        lines.push(artifact_line(kind, processed.artifact(kind)));
    }
    lines.join("\n")
}

/// Strip the line terminator from a password read on stdin.
pub fn trim_line_ending(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}
