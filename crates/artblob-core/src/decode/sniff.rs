//! Content-based format detection.
//!
//! The caller's declared MIME type is never consulted; only the leading
//! bytes of the upload decide which decoder runs.

use super::SourceFormat;

const JPEG_SIGNATURE: &[u8] = &[0xFF, 0xD8, 0xFF];
const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const GIF87_SIGNATURE: &[u8] = b"GIF87a";
const GIF89_SIGNATURE: &[u8] = b"GIF89a";

/// Signatures checked in order; the first match wins.
const SIGNATURES: &[(&[u8], SourceFormat)] = &[
    (JPEG_SIGNATURE, SourceFormat::Jpeg),
    (PNG_SIGNATURE, SourceFormat::Png),
    (GIF87_SIGNATURE, SourceFormat::Gif),
    (GIF89_SIGNATURE, SourceFormat::Gif),
];

/// Detect the container format from magic bytes.
///
/// Returns `SourceFormat::Unknown` for anything outside the supported set,
/// including empty input.
pub fn sniff_format(bytes: &[u8]) -> SourceFormat {
    SIGNATURES
        .iter()
        .find(|(signature, _)| bytes.starts_with(signature))
        .map(|&(_, format)| format)
        .unwrap_or(SourceFormat::Unknown)
}
