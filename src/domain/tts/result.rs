use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::error::SynthesisError;

/// Outcome of a synthesis call. A response carries either a reference to
/// audio hosted elsewhere or the audio bytes themselves, never both.
#[derive(Debug, Clone, PartialEq)]
pub enum SynthesisResult {
    Url { url: String },
    Inline { bytes: Vec<u8>, mime_type: String },
}

impl SynthesisResult {
    pub fn inline(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        SynthesisResult::Inline {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    pub fn url(url: impl Into<String>) -> Self {
        SynthesisResult::Url { url: url.into() }
    }

    pub fn mime_type(&self) -> Option<&str> {
        match self {
            SynthesisResult::Inline { mime_type, .. } => Some(mime_type),
            SynthesisResult::Url { .. } => None,
        }
    }
}

pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn decode_base64(payload: &str) -> Result<Vec<u8>, SynthesisError> {
    STANDARD
        .decode(payload.trim())
        .map_err(|e| SynthesisError::Decode(format!("Invalid Base64 audio payload: {}", e)))
}

/// `data:<mime>;base64,<payload>`
pub fn to_data_url(bytes: &[u8], mime_type: &str) -> String {
    format!("data:{};base64,{}", mime_type, encode_base64(bytes))
}

pub fn is_data_url(s: &str) -> bool {
    s.starts_with("data:")
}

/// Split a Base64 data URL into its mime type and decoded bytes
pub fn parse_data_url(url: &str) -> Result<(String, Vec<u8>), SynthesisError> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| SynthesisError::Decode("Not a data URL".to_string()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| SynthesisError::Decode("Data URL has no payload".to_string()))?;
    let mime_type = meta
        .strip_suffix(";base64")
        .ok_or_else(|| SynthesisError::Decode("Data URL is not Base64 encoded".to_string()))?;

    Ok((mime_type.to_string(), decode_base64(payload)?))
}
