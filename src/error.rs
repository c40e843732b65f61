//! Error types for the recycling guide service

use thiserror::Error;

/// Result type alias for recycling guide operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while producing recycling guidance
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// A service credential is absent, so the feature backed by it is off
    #[error("{service} API key not configured")]
    MissingApiKey { service: &'static str },

    /// Missing or malformed client input
    #[error("{0}")]
    InvalidInput(String),

    /// Upload could not be decoded or re-encoded
    #[error("image error: {0}")]
    Image(String),

    /// Reasoning service error
    #[error("guidance error: {0}")]
    Guidance(String),

    /// Voice catalog came back empty
    #[error("No voices available")]
    NoVoices,

    /// Voice catalog had entries but none carried a usable identifier
    #[error("No suitable voice found")]
    NoSuitableVoice,

    /// Text-to-speech error
    #[error("TTS error: {0}")]
    Tts(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Whether the error was caused by the caller rather than the server
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::Image(_))
    }
}
