//! Recycle Guide - photo-to-recycling-guidance backend
//!
//! Accepts a photo of an object, asks a multimodal model how to recycle it,
//! and optionally reads a short summary aloud through a speech service.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌─────────────┐   ┌───────────────┐   ┌──────────────┐
//! │ Image Intake │──▶│  Guidance   │──▶│ Voice Summary │──▶│    Speech    │
//! │  (JPEG/RGB)  │   │  (Gemini)   │   │ model|extract │   │ (ElevenLabs) │
//! └──────────────┘   └─────────────┘   └───────────────┘   └──────────────┘
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod guidance;
pub mod intake;
pub mod pipeline;
pub mod summary;
pub mod voice;

pub use config::{AudioMode, Config};
pub use error::{Error, Result};
pub use guidance::{GeminiClient, GuidanceModel, ImagePayload};
pub use pipeline::{RecycleOutcome, RecyclePipeline};
pub use summary::{
    DeterministicExtraction, ModelGenerated, SummaryStrategy, SummaryStrategyKind,
};
pub use voice::{ElevenLabsClient, SpeechService, SpeechSynthesizer, Voice, select_voice};
