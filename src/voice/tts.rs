//! `ElevenLabs` text-to-speech client

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::{SpeechService, Voice};
use crate::config::{DEFAULT_TTS_MODEL, SpeechConfig};
use crate::{Error, Result};

const ELEVENLABS_API_URL: &str = "https://api.elevenlabs.io";

/// Lists voices and synthesizes speech through `ElevenLabs`
pub struct ElevenLabsClient {
    client: reqwest::Client,
    api_key: SecretString,
    model: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct VoicesResponse {
    #[serde(default)]
    voices: Vec<Voice>,
}

#[derive(Debug, Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    model_id: &'a str,
}

impl ElevenLabsClient {
    /// Create a new client with the default model
    ///
    /// # Errors
    ///
    /// Returns error if API key is empty
    pub fn new(api_key: SecretString) -> Result<Self> {
        if api_key.expose_secret().trim().is_empty() {
            return Err(Error::MissingApiKey {
                service: "ElevenLabs",
            });
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: DEFAULT_TTS_MODEL.to_string(),
            base_url: ELEVENLABS_API_URL.to_string(),
        })
    }

    /// Build a client from configuration, or `None` when no key is set
    ///
    /// # Errors
    ///
    /// Returns error if the configured key is empty
    pub fn from_config(config: &SpeechConfig) -> Result<Option<Self>> {
        let Some(key) = &config.api_key else {
            return Ok(None);
        };

        let mut client = Self::new(key.clone())?.with_model(config.model_id.clone());
        if let Some(url) = &config.base_url {
            client = client.with_base_url(url.clone());
        }
        Ok(Some(client))
    }

    /// Use a specific synthesis model
    #[must_use]
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    /// Point the client at a different API host
    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl SpeechService for ElevenLabsClient {
    async fn voices(&self) -> Result<Vec<Voice>> {
        let response = self
            .client
            .get(format!("{}/v1/voices", self.base_url))
            .header("xi-api-key", self.api_key.expose_secret())
            .send()
            .await
            .map_err(|e| Error::Tts(format!("voice catalog request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Tts(format!("ElevenLabs voices error {status}: {body}")));
        }

        let catalog: VoicesResponse = response
            .json()
            .await
            .map_err(|e| Error::Tts(format!("voice catalog parse error: {e}")))?;
        Ok(catalog.voices)
    }

    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Vec<u8>> {
        let url = format!("{}/v1/text-to-speech/{voice_id}", self.base_url);

        let request = SynthesisRequest {
            text,
            model_id: &self.model,
        };

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", self.api_key.expose_secret())
            .header("Accept", "audio/mpeg")
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Tts(format!("synthesis request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Tts(format!("ElevenLabs TTS error {status}: {body}")));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| Error::Tts(format!("failed to read synthesized audio: {e}")))?;
        Ok(audio.to_vec())
    }
}
