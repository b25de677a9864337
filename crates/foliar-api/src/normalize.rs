//! Image normalization.
//!
//! Decodes the validated upload and bounds its dimensions so the payload
//! sent to the vision provider stays small. This is purely a transport
//! size control: no cropping, color correction, or feature extraction.
//! Deterministic for a given input and policy.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use tracing::debug;

use foliar_core::{Error, ImagePolicy, NormalizedImage, Result, UploadedFile};

/// Decode the upload and downscale/re-encode it if it exceeds the policy's
/// dimension bound.
///
/// Fails with `CorruptImage` when the bytes do not decode as an image —
/// distinct from a wrong-but-parseable declared type, which the validator
/// catches earlier. Images already within bounds pass through
/// byte-identical with their original MIME type.
pub fn normalize(policy: &ImagePolicy, file: &UploadedFile) -> Result<NormalizedImage> {
    let decoded = image::load_from_memory(&file.data)
        .map_err(|e| Error::CorruptImage(format!("failed to decode image: {}", e)))?;

    let (width, height) = (decoded.width(), decoded.height());

    if width.max(height) <= policy.max_dimension {
        return Ok(NormalizedImage {
            data: file.data.clone(),
            mime_type: file.content_type.clone(),
            width,
            height,
        });
    }

    let resized = decoded.resize(policy.max_dimension, policy.max_dimension, FilterType::Lanczos3);
    let (new_width, new_height) = (resized.width(), resized.height());

    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut buf), policy.jpeg_quality);
    resized
        .to_rgb8()
        .write_with_encoder(encoder)
        .map_err(|e| Error::Internal(format!("failed to re-encode image: {}", e)))?;

    debug!(
        from = format!("{}x{}", width, height),
        to = format!("{}x{}", new_width, new_height),
        bytes = buf.len(),
        "Downscaled oversized image"
    );

    Ok(NormalizedImage {
        data: buf,
        mime_type: "image/jpeg".to_string(),
        width: new_width,
        height: new_height,
    })
}
