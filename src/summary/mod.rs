//! Voice summaries: turn a guidance report into a short speakable script
//!
//! Two strategies exist behind [`SummaryStrategy`]:
//! - [`ModelGenerated`] asks the reasoning model for an upbeat ~75 word script
//! - [`DeterministicExtraction`] stitches the instructions and impact sections
//!   together locally, with no extra model call

mod extract;
mod model;

pub use extract::{DeterministicExtraction, IMPACT_LEAD_IN, INSTRUCTIONS_LEAD_IN};
pub use model::{ModelGenerated, SUMMARY_PROMPT};

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;

use crate::guidance::GuidanceModel;
use crate::{Error, Result};

/// Produces a voice script from a guidance report
#[async_trait]
pub trait SummaryStrategy: Send + Sync {
    /// Summarize a report for speech
    ///
    /// # Errors
    ///
    /// Returns error if the strategy depends on a service call that fails
    async fn summarize(&self, report: &str) -> Result<String>;

    /// Which strategy this is
    fn kind(&self) -> SummaryStrategyKind;
}

/// Configurable choice of summary strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SummaryStrategyKind {
    /// Second model call with a summarization prompt
    Model,
    /// Local section extraction
    #[default]
    Extract,
}

impl SummaryStrategyKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Extract => "extract",
        }
    }
}

impl fmt::Display for SummaryStrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SummaryStrategyKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "model" | "llm" => Ok(Self::Model),
            "extract" | "extraction" => Ok(Self::Extract),
            other => Err(Error::Config(format!(
                "unknown summary strategy \"{other}\" (expected \"model\" or \"extract\")"
            ))),
        }
    }
}

/// Build the configured strategy
///
/// The model strategy needs a reasoning client; without one it degrades to
/// extraction so audio keeps working.
#[must_use]
pub fn build_strategy(
    kind: SummaryStrategyKind,
    model: Option<Arc<dyn GuidanceModel>>,
) -> Arc<dyn SummaryStrategy> {
    match (kind, model) {
        (SummaryStrategyKind::Model, Some(model)) => Arc::new(ModelGenerated::new(model)),
        (SummaryStrategyKind::Model, None) => {
            tracing::warn!("model summaries requested without a Gemini key, using extraction");
            Arc::new(DeterministicExtraction)
        }
        (SummaryStrategyKind::Extract, _) => Arc::new(DeterministicExtraction),
    }
}
