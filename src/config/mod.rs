//! Configuration management for the recycling guide service

pub mod file;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use secrecy::SecretString;

use crate::summary::SummaryStrategyKind;
use crate::{Error, Result};

pub use file::ConfigFile;

/// Default Gemini model
pub const DEFAULT_GUIDANCE_MODEL: &str = "gemini-2.0-flash";

/// Default `ElevenLabs` synthesis model
pub const DEFAULT_TTS_MODEL: &str = "eleven_monolingual_v1";

/// Voices tried in order before falling back to the first catalog entry
pub const DEFAULT_PREFERRED_VOICES: [&str; 3] = ["Bella", "Antoni", "Sam"];

/// Default listen port
pub const DEFAULT_PORT: u16 = 5000;

/// Photos from phones easily exceed axum's 2MB default
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Recycling guide configuration
#[derive(Debug, Default)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Reasoning service (Gemini) configuration
    pub guidance: GuidanceConfig,

    /// Speech service (`ElevenLabs`) configuration
    pub speech: SpeechConfig,

    /// How voice summaries are produced
    pub summary_strategy: SummaryStrategyKind,

    /// Whether audio is generated inside `/api/recycle` or on demand
    pub audio_mode: AudioMode,
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,

    /// Directory holding `index.html` and the `/static` assets
    pub static_dir: PathBuf,

    /// Largest accepted request body in bytes
    pub max_upload_bytes: usize,
}

/// Reasoning service configuration
#[derive(Debug)]
pub struct GuidanceConfig {
    /// API key (from `GEMINI_API_KEY`); absent disables analysis
    pub api_key: Option<SecretString>,

    /// Model identifier
    pub model: String,

    /// Override for the API base URL
    pub base_url: Option<String>,
}

/// Speech service configuration
#[derive(Debug)]
pub struct SpeechConfig {
    /// API key (from `ELEVENLABS_API_KEY`); absent disables audio only
    pub api_key: Option<SecretString>,

    /// Synthesis model identifier
    pub model_id: String,

    /// Voice display names to try, in order
    pub preferred_voices: Vec<String>,

    /// Override for the API base URL
    pub base_url: Option<String>,
}

/// Where audio generation happens
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AudioMode {
    /// `/api/recycle` returns guidance and audio together
    #[default]
    Inline,
    /// `/api/recycle` returns guidance only; `/api/generate-audio` makes audio on request
    Split,
}

impl AudioMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inline => "inline",
            Self::Split => "split",
        }
    }
}

impl fmt::Display for AudioMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AudioMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inline" | "combined" => Ok(Self::Inline),
            "split" => Ok(Self::Split),
            other => Err(Error::Config(format!(
                "unknown audio mode \"{other}\" (expected \"inline\" or \"split\")"
            ))),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            static_dir: PathBuf::from("static"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Default for GuidanceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GUIDANCE_MODEL.to_string(),
            base_url: None,
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model_id: DEFAULT_TTS_MODEL.to_string(),
            preferred_voices: Vec::from(DEFAULT_PREFERRED_VOICES.map(String::from)),
            base_url: None,
        }
    }
}

impl Config {
    /// Load configuration from the environment and the TOML file
    ///
    /// # Errors
    ///
    /// Returns error if an explicit config file is unreadable or a value is invalid
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let fc = file::load_config_file(config_path)?;
        Self::from_sources(fc, |key| std::env::var(key).ok())
    }

    /// Merge a parsed config file with an environment lookup (env > toml > default)
    ///
    /// # Errors
    ///
    /// Returns error if a strategy, mode or port value cannot be parsed
    pub fn from_sources<F>(fc: ConfigFile, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("invalid PORT \"{raw}\"")))?,
            None => fc.server.port.unwrap_or(DEFAULT_PORT),
        };

        let server = ServerConfig {
            port,
            static_dir: lookup("RECYCLE_STATIC_DIR")
                .or(fc.server.static_dir)
                .map_or_else(|| PathBuf::from("static"), PathBuf::from),
            max_upload_bytes: fc
                .server
                .max_upload_bytes
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        };

        let guidance = GuidanceConfig {
            api_key: lookup("GEMINI_API_KEY")
                .or(fc.guidance.api_key)
                .map(SecretString::from),
            model: lookup("RECYCLE_GEMINI_MODEL")
                .or(fc.guidance.model)
                .unwrap_or_else(|| DEFAULT_GUIDANCE_MODEL.to_string()),
            base_url: fc.guidance.base_url,
        };

        let speech = SpeechConfig {
            api_key: lookup("ELEVENLABS_API_KEY")
                .or(fc.speech.api_key)
                .map(SecretString::from),
            model_id: lookup("RECYCLE_TTS_MODEL")
                .or(fc.speech.model_id)
                .unwrap_or_else(|| DEFAULT_TTS_MODEL.to_string()),
            preferred_voices: fc
                .speech
                .preferred_voices
                .unwrap_or_else(|| Vec::from(DEFAULT_PREFERRED_VOICES.map(String::from))),
            base_url: fc.speech.base_url,
        };

        let summary_strategy = lookup("RECYCLE_SUMMARY_STRATEGY")
            .or(fc.summary_strategy)
            .map(|s| s.parse::<SummaryStrategyKind>())
            .transpose()?
            .unwrap_or_default();

        let audio_mode = lookup("RECYCLE_AUDIO_MODE")
            .or(fc.audio_mode)
            .map(|s| s.parse::<AudioMode>())
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            server,
            guidance,
            speech,
            summary_strategy,
            audio_mode,
        })
    }
}
