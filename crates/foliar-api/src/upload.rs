//! Upload validation.
//!
//! First gate of the pipeline: cheap checks on the declared media type and
//! byte size before any decoding happens. No side effects; policy values
//! come from configuration, not constants.

use foliar_core::{Error, Result, UploadPolicy, UploadedFile};

/// Validate an upload against policy.
///
/// Checks in order: declared content type against the allow-set, then byte
/// size against the limit. Fails with `InvalidMediaType` or
/// `PayloadTooLarge` respectively.
pub fn validate_upload(policy: &UploadPolicy, file: &UploadedFile) -> Result<()> {
    if !policy.allows_mime(&file.content_type) {
        return Err(Error::InvalidMediaType(file.content_type.clone()));
    }

    if file.data.len() > policy.max_file_size {
        return Err(Error::PayloadTooLarge {
            size: file.data.len(),
            limit: policy.max_file_size,
        });
    }

    Ok(())
}
