//! Request pipeline: image → guidance report → voice summary → audio

use std::sync::Arc;

use base64::Engine;
use serde::Serialize;

use crate::guidance::{self, GeminiClient, GuidanceModel};
use crate::summary::{self, SummaryStrategy, SummaryStrategyKind};
use crate::voice::{ElevenLabsClient, SpeechService, SpeechSynthesizer};
use crate::{Config, Error, Result, intake};

/// Combined analysis result returned when audio is generated inline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecycleOutcome {
    /// Guidance report
    pub result: String,
    /// Base64 audio of the voice summary
    pub audio: Option<String>,
    /// Why audio is missing, if it is
    pub error: Option<String>,
}

/// Orchestrates the external services for a single request
#[derive(Clone)]
pub struct RecyclePipeline {
    guidance: Option<Arc<dyn GuidanceModel>>,
    summary: Arc<dyn SummaryStrategy>,
    speech: SpeechSynthesizer,
}

impl RecyclePipeline {
    /// Assemble a pipeline from its parts
    #[must_use]
    pub fn new(
        guidance: Option<Arc<dyn GuidanceModel>>,
        summary: Arc<dyn SummaryStrategy>,
        speech: SpeechSynthesizer,
    ) -> Self {
        Self {
            guidance,
            summary,
            speech,
        }
    }

    /// Build the production pipeline (Gemini + `ElevenLabs`) from configuration
    ///
    /// # Errors
    ///
    /// Returns error if a configured API key is empty
    pub fn from_config(config: &Config) -> Result<Self> {
        let guidance = GeminiClient::from_config(&config.guidance)?
            .map(|client| Arc::new(client) as Arc<dyn GuidanceModel>);
        if guidance.is_none() {
            tracing::warn!("GEMINI_API_KEY not set, image analysis disabled");
        }

        let speech = ElevenLabsClient::from_config(&config.speech)?
            .map(|client| Arc::new(client) as Arc<dyn SpeechService>);
        if speech.is_none() {
            tracing::info!("ELEVENLABS_API_KEY not set, audio disabled");
        }

        let summary = summary::build_strategy(config.summary_strategy, guidance.clone());

        Ok(Self::new(
            guidance,
            summary,
            SpeechSynthesizer::new(speech, config.speech.preferred_voices.clone()),
        ))
    }

    /// Whether image analysis is configured
    #[must_use]
    pub fn guidance_available(&self) -> bool {
        self.guidance.is_some()
    }

    /// Whether speech synthesis is configured
    #[must_use]
    pub fn audio_available(&self) -> bool {
        self.speech.is_available()
    }

    /// Active summary strategy
    #[must_use]
    pub fn summary_kind(&self) -> SummaryStrategyKind {
        self.summary.kind()
    }

    /// Speech synthesizer used for audio
    #[must_use]
    pub const fn speech(&self) -> &SpeechSynthesizer {
        &self.speech
    }

    /// Fail fast when image analysis is not configured
    ///
    /// # Errors
    ///
    /// Returns `MissingApiKey` for Gemini
    pub fn require_guidance(&self) -> Result<&dyn GuidanceModel> {
        self.guidance
            .as_deref()
            .ok_or(Error::MissingApiKey { service: "Gemini" })
    }

    /// Produce a guidance report for an uploaded photo
    ///
    /// # Errors
    ///
    /// Returns error if analysis is not configured, the upload is not an image
    /// or the reasoning service fails
    pub async fn analyze(&self, upload: Vec<u8>) -> Result<String> {
        let model = self.require_guidance()?;
        let image = intake::normalize_upload(upload).await?;
        guidance::generate_report(model, &image).await
    }

    /// Turn a report into a voice script with the configured strategy
    ///
    /// # Errors
    ///
    /// Returns error if the strategy's model call fails
    pub async fn voice_summary(&self, report: &str) -> Result<String> {
        let summary = self.summary.summarize(report).await?;
        tracing::debug!(
            strategy = %self.summary.kind(),
            chars = summary.len(),
            "voice summary ready"
        );
        Ok(summary)
    }

    /// Summarize a report and synthesize it, returning base64 audio
    ///
    /// # Errors
    ///
    /// Returns `MissingApiKey` before any service call when audio is off,
    /// `InvalidInput` for an empty report and any summary or speech failure
    pub async fn generate_audio(&self, report: &str) -> Result<String> {
        if !self.speech.is_available() {
            return Err(Error::MissingApiKey {
                service: "ElevenLabs",
            });
        }
        if report.trim().is_empty() {
            return Err(Error::InvalidInput("No text provided".to_string()));
        }

        let summary = self.voice_summary(report).await?;
        let audio = self.speech.synthesize(&summary).await?;
        Ok(base64::engine::general_purpose::STANDARD.encode(audio))
    }

    /// Analyze a photo and attach audio in the same pass
    ///
    /// Speech failures do not fail the request; they are reported in
    /// [`RecycleOutcome::error`] next to the guidance.
    ///
    /// # Errors
    ///
    /// Returns error if the guidance or the voice summary cannot be produced
    pub async fn analyze_with_audio(&self, upload: Vec<u8>) -> Result<RecycleOutcome> {
        let result = self.analyze(upload).await?;
        let summary = self.voice_summary(&result).await?;

        let (audio, error) = match self.speech.synthesize(&summary).await {
            Ok(audio) => (
                Some(base64::engine::general_purpose::STANDARD.encode(audio)),
                None,
            ),
            Err(e) => {
                tracing::warn!(error = %e, "audio generation failed, returning guidance only");
                (None, Some(e.to_string()))
            }
        };

        Ok(RecycleOutcome {
            result,
            audio,
            error,
        })
    }
}
