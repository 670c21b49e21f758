//! Video identifier extraction and URL composition.

use crate::error::YouTubeError;
use regex::Regex;
use std::sync::OnceLock;

/// Length of a YouTube video identifier.
const VIDEO_ID_LEN: usize = 11;

/// Pattern recognizing the id in watch/share/embed/`v`/`e` URL shapes.
const URL_PATTERN: &str = r"(?:https?://)?(?:www\.)?(?:youtube\.com/(?:[^/\s]+/\S+/|(?:v|e(?:mbed)?)/|\S*?[?&]v=)|youtu\.be/)([A-Za-z0-9_-]{11})";

fn url_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(URL_PATTERN).ok()).as_ref()
}

/// An 11-character YouTube video identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    /// Extract a video id from user input: a recognized YouTube URL shape
    /// or a bare 11-character id.
    ///
    /// # Errors
    ///
    /// Returns `InvalidVideoUrl` when no id can be recognized.
    pub fn extract(input: &str) -> Result<Self, YouTubeError> {
        let input = input.trim();

        if is_raw_id(input) {
            return Ok(Self(input.to_string()));
        }

        url_pattern()
            .and_then(|pattern| pattern.captures(input))
            .and_then(|captures| captures.get(1))
            .map(|m| Self(m.as_str().to_string()))
            .ok_or_else(|| YouTubeError::InvalidVideoUrl {
                input: input.to_string(),
            })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical watch URL for this video.
    #[must_use]
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }

    /// Embed URL with the JS messaging API enabled, suitable for hosting
    /// the player in an iframe the shell can control.
    #[must_use]
    pub fn embed_url(&self) -> String {
        format!(
            "https://www.youtube.com/embed/{}?enablejsapi=1&autoplay=0",
            self.0
        )
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_raw_id(input: &str) -> bool {
    input.len() == VIDEO_ID_LEN
        && input
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
