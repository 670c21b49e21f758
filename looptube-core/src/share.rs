//! Shareable-state codec: section collections to and from URL-safe tokens.
//!
//! The wire form is a JSON array of `{id, name, startTime, endTime}` objects
//! (camelCase field names are part of the format), base64 URL-safe encoded
//! without padding. Decode failures are typed so callers can fall back to
//! the documented defaults instead of crashing.

use crate::section::{Section, SectionId};
use base64::engine::general_purpose::URL_SAFE_NO_PAD as BASE64;
use base64::Engine as _;
use thiserror::Error;
use tracing::warn;
use url::Url;

/// Video adopted when neither a video nor a sections parameter hydrates.
pub const DEFAULT_VIDEO_ID: &str = "DYHng61lftA";

/// Query parameter carrying the video identifier.
pub const VIDEO_PARAM: &str = "v";

/// Query parameter carrying the encoded section collection.
pub const SECTIONS_PARAM: &str = "s";

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("Token is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("Token payload is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Token payload is not a sequence of sections")]
    NotASequence,
}

/// Sections adopted when the URL carries no usable state.
#[must_use]
pub fn default_sections() -> Vec<Section> {
    vec![
        Section {
            id: SectionId::generate(),
            name: "Solo 1".to_string(),
            start_time: Some(164.0),
            end_time: Some(237.0),
        },
        Section {
            id: SectionId::generate(),
            name: "Run 1".to_string(),
            start_time: Some(241.0),
            end_time: Some(261.0),
        },
        Section {
            id: SectionId::generate(),
            name: "Run 2".to_string(),
            start_time: Some(262.0),
            end_time: Some(269.3),
        },
    ]
}

/// Encode a section collection into a URL-safe token.
#[must_use]
pub fn encode_sections(sections: &[Section]) -> String {
    let json = serde_json::to_vec(sections).unwrap_or_else(|_| b"[]".to_vec());
    BASE64.encode(json)
}

/// Decode a token back into a section collection.
///
/// # Errors
///
/// Returns a [`ShareError`] when the base64 layer, the JSON layer, or the
/// top-level shape is invalid. Callers recover by substituting defaults.
pub fn decode_sections(token: &str) -> Result<Vec<Section>, ShareError> {
    let json = BASE64.decode(token.trim())?;
    let value: serde_json::Value = serde_json::from_slice(&json)?;
    if !value.is_array() {
        return Err(ShareError::NotASequence);
    }
    Ok(serde_json::from_value(value)?)
}

/// Decode a sections parameter, falling back to the default collection on
/// any failure (or absence). Never panics.
#[must_use]
pub fn sections_or_default(param: Option<&str>) -> Vec<Section> {
    match param {
        Some(token) => match decode_sections(token) {
            Ok(sections) => sections,
            Err(e) => {
                warn!("Ignoring unusable sections parameter: {e}");
                default_sections()
            }
        },
        None => default_sections(),
    }
}

/// Compose a full shareable URL carrying the video and sections parameters.
///
/// # Errors
///
/// Returns `url::ParseError` when the base URL is not parseable.
pub fn share_url(
    base: &str,
    video_id: &str,
    sections: &[Section],
) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(base)?;
    url.query_pairs_mut()
        .clear()
        .append_pair(VIDEO_PARAM, video_id)
        .append_pair(SECTIONS_PARAM, &encode_sections(sections));
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_sections() -> Vec<Section> {
        vec![
            Section {
                id: SectionId::from("abc123"),
                name: "Intro".to_string(),
                start_time: Some(0.0),
                end_time: Some(12.5),
            },
            Section {
                id: SectionId::from("def456"),
                name: String::new(),
                start_time: None,
                end_time: Some(30.0),
            },
        ]
    }

    #[test]
    fn test_round_trip_preserves_sections() {
        let sections = sample_sections();
        let token = encode_sections(&sections);
        let decoded = decode_sections(&token).ok();
        assert_eq!(decoded, Some(sections));
    }

    #[test]
    fn test_round_trip_empty_collection() {
        let token = encode_sections(&[]);
        let decoded = decode_sections(&token).ok();
        assert_eq!(decoded, Some(Vec::new()));
    }

    #[test]
    fn test_token_is_url_safe() {
        let token = encode_sections(&sample_sections());
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_wire_field_names_are_camel_case() {
        let json = BASE64
            .decode(encode_sections(&sample_sections()))
            .unwrap_or_default();
        let text = String::from_utf8(json).unwrap_or_default();
        assert!(text.contains("\"startTime\""));
        assert!(text.contains("\"endTime\""));
    }

    #[test]
    fn test_corrupt_base64_is_error() {
        assert!(matches!(
            decode_sections("!!not-base64!!"),
            Err(ShareError::Encoding(_))
        ));
    }

    #[test]
    fn test_malformed_json_is_error() {
        let token = BASE64.encode(b"{not json");
        assert!(matches!(
            decode_sections(&token),
            Err(ShareError::Malformed(_))
        ));
    }

    #[test]
    fn test_non_sequence_is_error() {
        let token = BASE64.encode(br#"{"id":"x"}"#);
        assert!(matches!(
            decode_sections(&token),
            Err(ShareError::NotASequence)
        ));
    }

    #[test]
    fn test_fallback_to_defaults() {
        let fallback = sections_or_default(Some("corrupted"));
        assert_eq!(fallback.len(), 3);
        assert_eq!(fallback[0].name, "Solo 1");
        assert_eq!(fallback[0].start_time, Some(164.0));
        assert_eq!(fallback[2].end_time, Some(269.3));

        let absent = sections_or_default(None);
        assert_eq!(absent.len(), 3);
    }

    #[test]
    fn test_share_url_carries_both_params() {
        let url = share_url("https://looptube.app/", "DYHng61lftA", &sample_sections()).ok();
        let url = url.map(|u| u.to_string()).unwrap_or_default();
        assert!(url.contains("v=DYHng61lftA"));
        assert!(url.contains("s="));
    }
}
