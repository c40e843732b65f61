//! Recycling guidance generation
//!
//! A [`GuidanceModel`] is any multimodal text service that accepts a prompt
//! plus an optional inline image and answers with free-form text. The
//! production implementation is [`GeminiClient`].

mod gemini;

pub use gemini::GeminiClient;

use async_trait::async_trait;

use crate::Result;

/// Instruction sent alongside every uploaded photo
pub const RECYCLING_PROMPT: &str = "You are an expert in sustainable waste management. Analyze the attached image and provide a response in the following format:

## Recycling Instructions
[Provide clear, numbered, step-by-step instructions for recycling or disposing of the item. Be concise and practical, focusing on minimal hassle.]

## Materials Breakdown
[List each material that makes up the object using this format:
- ♻️ [material name] (for recyclable materials)
- ⛔ [material name] (for non-recyclable materials)]

## Eco-Friendly Tips
1. [First suggestion to maximize eco-friendliness]
2. [Second suggestion to maximize eco-friendliness]
3. [Third suggestion to maximize eco-friendliness]

## Environmental Impact
🌍 Did you know? [Share one interesting fact about recycling this particular item, specifically focusing on its environmental impact. Make it engaging and quantifiable if possible.]";

/// Section headers every guidance report is expected to carry
pub const REPORT_SECTIONS: [&str; 4] = [
    "Recycling Instructions",
    "Materials Breakdown",
    "Eco-Friendly Tips",
    "Environmental Impact",
];

/// Encoded image ready to be sent inline to a model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub mime_type: &'static str,
    pub data: Vec<u8>,
}

/// Multimodal text generation backend
#[async_trait]
pub trait GuidanceModel: Send + Sync {
    /// Generate text for a prompt, optionally grounded on an image
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the reply holds no text
    async fn generate(&self, prompt: &str, image: Option<&ImagePayload>) -> Result<String>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}

/// Ask the model for a recycling report on a normalized photo
///
/// # Errors
///
/// Returns error if the model call fails
pub async fn generate_report(model: &dyn GuidanceModel, image: &ImagePayload) -> Result<String> {
    tracing::debug!(
        provider = model.name(),
        bytes = image.data.len(),
        "requesting recycling guidance"
    );
    let report = model.generate(RECYCLING_PROMPT, Some(image)).await?;
    tracing::info!(provider = model.name(), chars = report.len(), "guidance generated");
    Ok(report)
}
