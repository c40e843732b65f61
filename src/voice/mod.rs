//! Speech synthesis for voice summaries
//!
//! The speech backend is reached through [`SpeechService`]; [`SpeechSynthesizer`]
//! adds voice selection and the error taxonomy callers rely on.

mod tts;

pub use tts::ElevenLabsClient;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_PREFERRED_VOICES;
use crate::{Error, Result};

/// A selectable synthetic voice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    pub voice_id: String,
    #[serde(default)]
    pub name: String,
}

/// Text-to-speech backend with a voice catalog
#[async_trait]
pub trait SpeechService: Send + Sync {
    /// List the voices available to the caller's account
    ///
    /// # Errors
    ///
    /// Returns error if the catalog cannot be fetched
    async fn voices(&self) -> Result<Vec<Voice>>;

    /// Synthesize text with a voice, returning encoded audio
    ///
    /// # Errors
    ///
    /// Returns error if synthesis fails
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Vec<u8>>;
}

/// Pick a voice identifier from a catalog
///
/// The first catalog entry whose name is in `preferred` wins; if there is none,
/// or it has no identifier, the first entry is used.
///
/// # Errors
///
/// Returns `NoVoices` for an empty catalog and `NoSuitableVoice` if no
/// identifier remains after the fallback
pub fn select_voice<'a>(catalog: &'a [Voice], preferred: &[String]) -> Result<&'a str> {
    let first = catalog.first().ok_or(Error::NoVoices)?;

    let voice_id = catalog
        .iter()
        .find(|voice| preferred.iter().any(|name| *name == voice.name))
        .map(|voice| voice.voice_id.as_str())
        .filter(|id| !id.trim().is_empty())
        .unwrap_or(&first.voice_id);

    if voice_id.trim().is_empty() {
        return Err(Error::NoSuitableVoice);
    }

    Ok(voice_id)
}

/// Turns summary text into audio via an optional speech backend
#[derive(Clone)]
pub struct SpeechSynthesizer {
    service: Option<Arc<dyn SpeechService>>,
    preferred_voices: Vec<String>,
}

impl SpeechSynthesizer {
    /// Create a synthesizer; `None` means audio is not configured
    #[must_use]
    pub fn new(service: Option<Arc<dyn SpeechService>>, preferred_voices: Vec<String>) -> Self {
        Self {
            service,
            preferred_voices,
        }
    }

    /// Create a synthesizer with the default voice preferences
    #[must_use]
    pub fn with_default_voices(service: Option<Arc<dyn SpeechService>>) -> Self {
        Self::new(service, Vec::from(DEFAULT_PREFERRED_VOICES.map(String::from)))
    }

    /// Whether a speech backend is configured
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.service.is_some()
    }

    /// Voice preference order
    #[must_use]
    pub fn preferred_voices(&self) -> &[String] {
        &self.preferred_voices
    }

    /// Fetch the voice catalog and the voice that synthesis would use
    ///
    /// # Errors
    ///
    /// Returns error if audio is not configured, the catalog request fails or
    /// no voice can be selected
    pub async fn resolve_voice(&self) -> Result<(Vec<Voice>, String)> {
        let service = self.service()?;
        let catalog = service.voices().await?;
        let voice_id = select_voice(&catalog, &self.preferred_voices)?.to_string();
        Ok((catalog, voice_id))
    }

    /// Synthesize a summary into audio bytes
    ///
    /// # Errors
    ///
    /// Returns `MissingApiKey` when audio is not configured, `InvalidInput` for
    /// empty text, `NoVoices`/`NoSuitableVoice` when selection fails and `Tts`
    /// for backend failures
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let service = self.service()?;

        if text.trim().is_empty() {
            return Err(Error::InvalidInput("No text provided".to_string()));
        }

        let catalog = service.voices().await?;
        let voice_id = select_voice(&catalog, &self.preferred_voices)?;
        tracing::debug!(voice_id, chars = text.len(), "synthesizing speech");

        let audio = service.synthesize(text, voice_id).await?;
        tracing::info!(voice_id, bytes = audio.len(), "speech synthesized");
        Ok(audio)
    }

    fn service(&self) -> Result<&Arc<dyn SpeechService>> {
        self.service.as_ref().ok_or(Error::MissingApiKey {
            service: "ElevenLabs",
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    fn voice(id: &str, name: &str) -> Voice {
        Voice {
            voice_id: id.to_string(),
            name: name.to_string(),
        }
    }

    fn preferred() -> Vec<String> {
        Vec::from(DEFAULT_PREFERRED_VOICES.map(String::from))
    }

    #[test]
    fn bella_wins_regardless_of_position() {
        let catalogs = [
            vec![voice("b", "Bella"), voice("r", "Rachel"), voice("d", "Domi")],
            vec![voice("r", "Rachel"), voice("d", "Domi"), voice("b", "Bella")],
            vec![voice("r", "Rachel"), voice("b", "Bella")],
        ];
        for catalog in &catalogs {
            assert_eq!(select_voice(catalog, &preferred()).unwrap(), "b");
        }
    }

    #[test]
    fn first_preferred_in_catalog_order_wins() {
        let catalog = vec![voice("s", "Sam"), voice("b", "Bella")];
        assert_eq!(select_voice(&catalog, &preferred()).unwrap(), "s");
    }

    #[test]
    fn falls_back_to_first_entry() {
        let catalog = vec![voice("r", "Rachel"), voice("d", "Domi")];
        assert_eq!(select_voice(&catalog, &preferred()).unwrap(), "r");
    }

    #[test]
    fn empty_catalog_has_no_voices() {
        let err = select_voice(&[], &preferred()).unwrap_err();
        assert!(matches!(err, Error::NoVoices));
        assert_eq!(err.to_string(), "No voices available");
    }

    #[test]
    fn blank_identifier_is_unsuitable() {
        let catalog = vec![voice("", "Rachel")];
        assert!(matches!(
            select_voice(&catalog, &preferred()),
            Err(Error::NoSuitableVoice)
        ));
    }

    #[test]
    fn preferred_voice_without_identifier_falls_back_to_first() {
        let catalog = vec![voice("r", "Rachel"), voice("", "Bella")];
        assert_eq!(select_voice(&catalog, &preferred()).unwrap(), "r");

        let catalog = vec![voice("", "Bella"), voice("a", "Antoni")];
        assert!(matches!(
            select_voice(&catalog, &preferred()),
            Err(Error::NoSuitableVoice)
        ));
    }

    #[test]
    fn name_match_is_exact() {
        let catalog = vec![voice("r", "Rachel"), voice("b", "bella")];
        assert_eq!(select_voice(&catalog, &preferred()).unwrap(), "r");
    }

    struct FakeSpeech {
        catalog: Vec<Voice>,
        calls: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl SpeechService for FakeSpeech {
        async fn voices(&self) -> Result<Vec<Voice>> {
            Ok(self.catalog.clone())
        }

        async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Vec<u8>> {
            self.calls
                .lock()
                .unwrap()
                .push((text.to_string(), voice_id.to_string()));
            Ok(vec![0xFF, 0xFB, 0x90])
        }
    }

    #[tokio::test]
    async fn synthesize_uses_selected_voice() {
        let fake = Arc::new(FakeSpeech {
            catalog: vec![voice("r", "Rachel"), voice("a", "Antoni")],
            calls: Mutex::new(Vec::new()),
        });
        let synth = SpeechSynthesizer::with_default_voices(Some(fake.clone()));

        let audio = synth.synthesize("Rinse and recycle!").await.unwrap();
        assert_eq!(audio, vec![0xFF, 0xFB, 0x90]);
        assert_eq!(
            *fake.calls.lock().unwrap(),
            vec![("Rinse and recycle!".to_string(), "a".to_string())]
        );
    }

    #[tokio::test]
    async fn synthesize_reports_distinct_failures() {
        let unconfigured = SpeechSynthesizer::with_default_voices(None);
        assert!(!unconfigured.is_available());
        assert!(matches!(
            unconfigured.synthesize("hi").await,
            Err(Error::MissingApiKey { service: "ElevenLabs" })
        ));

        let empty = SpeechSynthesizer::with_default_voices(Some(Arc::new(FakeSpeech {
            catalog: Vec::new(),
            calls: Mutex::new(Vec::new()),
        })));
        assert!(matches!(empty.synthesize("hi").await, Err(Error::NoVoices)));
        assert!(matches!(
            empty.synthesize("   ").await,
            Err(Error::InvalidInput(_))
        ));
    }
}
