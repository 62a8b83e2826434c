//! Decoding of the data URIs recipe photos are stored as.

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl DecodedImage {
    /// File extension matching the MIME type, "bin" if unknown.
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/png" => "png",
            "image/jpeg" | "image/jpg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "bin",
        }
    }
}

pub fn decode_data_uri(uri: &str) -> Result<DecodedImage> {
    let rest = uri
        .strip_prefix("data:")
        .context("Image is not a data URI")?;
    let (mime_type, payload) = rest
        .split_once(";base64,")
        .context("Image data URI is not base64 encoded")?;
    let bytes = STANDARD
        .decode(payload.trim())
        .context("Image data is not valid base64")?;

    Ok(DecodedImage {
        mime_type: mime_type.to_string(),
        bytes,
    })
}

/// Approximate decoded size in bytes, without decoding.
pub fn approximate_size(uri: &str) -> usize {
    let payload = uri.split_once(',').map(|(_, p)| p).unwrap_or(uri);
    payload.len() * 3 / 4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_png() {
        let image = decode_data_uri("data:image/png;base64,iVBORw0K").unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.bytes, b"\x89PNG\r\n");
        assert_eq!(image.extension(), "png");
    }

    #[test]
    fn test_rejects_other_uris() {
        assert!(decode_data_uri("https://example.com/a.png").is_err());
        assert!(decode_data_uri("data:image/png,rawbytes").is_err());
        assert!(decode_data_uri("data:image/png;base64,@@@").is_err());
    }

    #[test]
    fn test_approximate_size() {
        assert_eq!(approximate_size("data:image/png;base64,AAAAAAAA"), 6);
    }
}
