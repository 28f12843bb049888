//! Frame decoding - data-URI base64 text to pixels

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::DynamicImage;
use poise_core::PoiseError;
use thiserror::Error;

/// Frame decode failure
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("empty image payload")]
    EmptyPayload,

    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("unreadable image: {0}")]
    Image(#[from] image::ImageError),
}

impl From<DecodeError> for PoiseError {
    fn from(err: DecodeError) -> Self {
        PoiseError::Decode(err.to_string())
    }
}

/// Remove a `data:<mime>;base64,` header if present
pub fn strip_data_uri(payload: &str) -> &str {
    let trimmed = payload.trim();
    if trimmed.starts_with("data:") {
        if let Some((_, body)) = trimmed.split_once(',') {
            return body;
        }
    }
    trimmed
}

/// Decode a (possibly data-URI prefixed) base64 image
pub fn decode_base64_image(payload: &str) -> Result<DynamicImage, DecodeError> {
    let body = strip_data_uri(payload);
    if body.is_empty() {
        return Err(DecodeError::EmptyPayload);
    }

    let bytes = STANDARD.decode(body)?;
    let image = image::load_from_memory(&bytes)?;
    Ok(image)
}
