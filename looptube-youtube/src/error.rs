use thiserror::Error;

/// Errors from the YouTube player integration.
#[derive(Debug, Error)]
pub enum YouTubeError {
    /// The input did not contain a recognizable video identifier.
    #[error("No YouTube video id found in: {input}")]
    InvalidVideoUrl { input: String },

    /// A status message from the embedded player was not parseable.
    #[error("Failed to parse player status: {0}")]
    StatusParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, YouTubeError>;
