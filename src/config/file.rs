//! TOML configuration file loading
//!
//! Supports `~/.config/recycle-guide/config.toml` as a persistent config source.
//! All fields are optional; the file is a partial overlay on top of defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{Error, Result};

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    /// Voice summary strategy ("model" or "extract")
    #[serde(default)]
    pub summary_strategy: Option<String>,

    /// Audio delivery mode ("inline" or "split")
    #[serde(default)]
    pub audio_mode: Option<String>,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerFileConfig,

    /// Reasoning service configuration
    #[serde(default)]
    pub guidance: GuidanceFileConfig,

    /// Speech service configuration
    #[serde(default)]
    pub speech: SpeechFileConfig,
}

/// Server/runtime configuration
#[derive(Debug, Default, Deserialize)]
pub struct ServerFileConfig {
    /// Port to listen on
    pub port: Option<u16>,

    /// Directory holding `index.html` and static assets
    pub static_dir: Option<String>,

    /// Largest accepted request body in bytes
    pub max_upload_bytes: Option<usize>,
}

/// Gemini configuration
#[derive(Debug, Default, Deserialize)]
pub struct GuidanceFileConfig {
    pub api_key: Option<String>,

    /// Model identifier (e.g. "gemini-2.0-flash")
    pub model: Option<String>,

    pub base_url: Option<String>,
}

/// `ElevenLabs` configuration
#[derive(Debug, Default, Deserialize)]
pub struct SpeechFileConfig {
    pub api_key: Option<String>,

    /// Synthesis model (e.g. `eleven_monolingual_v1`)
    pub model_id: Option<String>,

    /// Voice display names to try, in order
    pub preferred_voices: Option<Vec<String>>,

    pub base_url: Option<String>,
}

/// Load the TOML config file
///
/// With an explicit path the file must exist and parse. Without one the
/// standard path is tried and any problem falls back to
/// `ConfigFile::default()`.
///
/// # Errors
///
/// Returns error if an explicitly requested file cannot be read or parsed
pub fn load_config_file(explicit: Option<&Path>) -> Result<ConfigFile> {
    if let Some(path) = explicit {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        let config = toml::from_str(&content)?;
        tracing::info!(path = %path.display(), "loaded config file");
        return Ok(config);
    }

    let Some(path) = config_file_path() else {
        return Ok(ConfigFile::default());
    };

    if !path.exists() {
        return Ok(ConfigFile::default());
    }

    let config = match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                ConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            ConfigFile::default()
        }
    };

    Ok(config)
}

/// Return the config file path: `~/.config/recycle-guide/config.toml`
#[must_use]
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("recycle-guide").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn explicit_file_is_parsed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
summary_strategy = "model"

[server]
port = 8080

[speech]
preferred_voices = ["Sam"]
"#
        )
        .unwrap();

        let config = load_config_file(Some(file.path())).unwrap();
        assert_eq!(config.summary_strategy.as_deref(), Some("model"));
        assert_eq!(config.server.port, Some(8080));
        assert_eq!(config.speech.preferred_voices, Some(vec!["Sam".to_string()]));
        assert!(config.guidance.api_key.is_none());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config_file(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn explicit_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nport = ").unwrap();
        assert!(matches!(
            load_config_file(Some(file.path())),
            Err(Error::Toml(_))
        ));
    }
}
