//! Recipe images arrive inline as `data:image/<type>;base64,<payload>` URLs.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

use crate::models::RecipeImage;

/// Errors that can occur when decoding an inline image.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("image must be a base64 data URL (data:image/<type>;base64,...)")]
    NotDataUrl,

    #[error("unsupported image type: {0}")]
    UnsupportedType(String),

    #[error("image payload is not valid base64")]
    Base64(#[from] base64::DecodeError),

    #[error("image payload is empty")]
    Empty,

    #[error("image exceeds {max} bytes")]
    TooLarge { max: usize },
}

/// Accepted subtypes and the content type each is served with.
const SUPPORTED: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpeg", "image/jpeg"),
    ("jpg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
];

/// Decode a `data:` URL into image bytes and a normalized content type.
///
/// # Errors
///
/// Returns an [`ImageError`] for malformed URLs, unsupported types, invalid
/// base64, empty payloads, or payloads larger than `max_bytes` once decoded.
pub fn decode_data_url(input: &str, max_bytes: usize) -> Result<RecipeImage, ImageError> {
    let rest = input
        .trim()
        .strip_prefix("data:image/")
        .ok_or(ImageError::NotDataUrl)?;
    let (subtype, payload) = rest.split_once(";base64,").ok_or(ImageError::NotDataUrl)?;

    let subtype = subtype.to_ascii_lowercase();
    let content_type = SUPPORTED
        .iter()
        .find(|(name, _)| *name == subtype)
        .map(|(_, content_type)| *content_type)
        .ok_or_else(|| ImageError::UnsupportedType(subtype.clone()))?;

    // Reject obviously oversized payloads before allocating for them.
    if payload.len() / 4 * 3 > max_bytes.saturating_add(3) {
        return Err(ImageError::TooLarge { max: max_bytes });
    }

    let bytes = STANDARD.decode(payload)?;
    if bytes.is_empty() {
        return Err(ImageError::Empty);
    }
    if bytes.len() > max_bytes {
        return Err(ImageError::TooLarge { max: max_bytes });
    }

    Ok(RecipeImage {
        content_type: content_type.to_owned(),
        bytes,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    // 1x1 transparent GIF
    const GIF: &str = "R0lGODlhAQABAIAAAAAAAP///yH5BAEAAAAALAAAAAABAAEAAAIBRAA7";

    #[test]
    fn test_decodes_supported_type() {
        let image = decode_data_url(&format!("data:image/gif;base64,{GIF}"), 1024).unwrap();
        assert_eq!(image.content_type, "image/gif");
        assert!(image.bytes.starts_with(b"GIF89a"));
    }

    #[test]
    fn test_jpg_normalizes_to_jpeg() {
        let image = decode_data_url(&format!("data:image/JPG;base64,{GIF}"), 1024).unwrap();
        assert_eq!(image.content_type, "image/jpeg");
    }

    #[test]
    fn test_rejects_non_data_urls() {
        assert!(matches!(
            decode_data_url("https://example.com/cat.png", 1024),
            Err(ImageError::NotDataUrl)
        ));
        assert!(matches!(
            decode_data_url("data:image/png,rawbytes", 1024),
            Err(ImageError::NotDataUrl)
        ));
    }

    #[test]
    fn test_rejects_unsupported_type() {
        assert!(matches!(
            decode_data_url(&format!("data:image/svg+xml;base64,{GIF}"), 1024),
            Err(ImageError::UnsupportedType(t)) if t == "svg+xml"
        ));
    }

    #[test]
    fn test_rejects_bad_base64_and_empty_payload() {
        assert!(matches!(
            decode_data_url("data:image/png;base64,@@@@", 1024),
            Err(ImageError::Base64(_))
        ));
        assert!(matches!(
            decode_data_url("data:image/png;base64,", 1024),
            Err(ImageError::Empty)
        ));
    }

    #[test]
    fn test_enforces_size_limit() {
        assert!(matches!(
            decode_data_url(&format!("data:image/gif;base64,{GIF}"), 10),
            Err(ImageError::TooLarge { max: 10 })
        ));
    }
}
