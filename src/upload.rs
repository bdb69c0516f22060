//! Decoding the uploaded photo.
//!
//! The file picker hands over a `data:` URI. Only the MIME prefix is checked
//! here; whether the bytes really are an image is left to the decoder.

#[cfg(test)]
#[path = "upload_test.rs"]
mod upload_test;

use base64::{Engine as _, engine::general_purpose};
use image::DynamicImage;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("upload is not a data URI")]
    NotDataUri,
    #[error("upload is not an image: {0}")]
    NotAnImage(String),
    #[error("upload data URI is not base64-encoded")]
    NotBase64,
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("failed to load image: {0}")]
    Decode(#[from] image::ImageError),
}

/// The parts of a `data:<mime>;base64,<payload>` URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataUri<'a> {
    pub mime: &'a str,
    pub payload: &'a str,
}

/// Split a data URI into MIME type and base64 payload.
///
/// # Errors
///
/// Returns `NotDataUri` without a `data:` prefix or comma, `NotAnImage` for a
/// non-`image/*` MIME type, and `NotBase64` for percent-encoded payloads.
pub fn parse_data_uri(raw: &str) -> Result<DataUri<'_>, UploadError> {
    let rest = raw.trim().strip_prefix("data:").ok_or(UploadError::NotDataUri)?;
    let (header, payload) = rest.split_once(',').ok_or(UploadError::NotDataUri)?;
    let mut params = header.split(';');
    let mime = params.next().unwrap_or_default();
    if !mime.starts_with("image/") {
        return Err(UploadError::NotAnImage(mime.to_string()));
    }
    if !params.any(|p| p.eq_ignore_ascii_case("base64")) {
        return Err(UploadError::NotBase64);
    }
    Ok(DataUri { mime, payload })
}

/// Decode the raw bytes carried by an image data URI.
///
/// # Errors
///
/// See [`parse_data_uri`]; also returns `Base64` for a corrupt payload.
pub fn decode_data_uri(raw: &str) -> Result<Vec<u8>, UploadError> {
    let uri = parse_data_uri(raw)?;
    Ok(general_purpose::STANDARD.decode(uri.payload.trim())?)
}

/// Decode image bytes at native resolution.
///
/// # Errors
///
/// Returns `Decode` when the format is unsupported or the data is corrupt.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, UploadError> {
    Ok(image::load_from_memory(bytes)?)
}

/// Parse and decode an uploaded data URI.
///
/// # Errors
///
/// Any [`UploadError`]; the caller stays on the upload screen.
pub fn load_data_uri(raw: &str) -> Result<DynamicImage, UploadError> {
    let bytes = decode_data_uri(raw)?;
    decode_image(&bytes)
}
