//! Model-generated voice summaries

use std::sync::Arc;

use async_trait::async_trait;

use super::{SummaryStrategy, SummaryStrategyKind};
use crate::Result;
use crate::guidance::GuidanceModel;

/// Template wrapped around the report; `{text}` is replaced with the report
pub const SUMMARY_PROMPT: &str = r#"Create an enthusiastic and engaging 30-second summary (approximately 75 words) of the following recycling advice.
Make it sound exciting and motivational, using an upbeat tone. Include encouraging phrases and positive reinforcement.
Focus on the most important preparation steps and disposal methods. Start with an energetic greeting and end with a motivational closer.

Example style:
"Hey there, eco-warrior! Great news about recycling your [items]! Here's what you need to know... Remember, you're making a real difference!"

Advice to summarize:
{text}"#;

/// Asks the reasoning model to rewrite the report as a short upbeat script
pub struct ModelGenerated {
    model: Arc<dyn GuidanceModel>,
}

impl ModelGenerated {
    #[must_use]
    pub fn new(model: Arc<dyn GuidanceModel>) -> Self {
        Self { model }
    }

    fn prompt(report: &str) -> String {
        SUMMARY_PROMPT.replace("{text}", report)
    }
}

#[async_trait]
impl SummaryStrategy for ModelGenerated {
    async fn summarize(&self, report: &str) -> Result<String> {
        let reply = self.model.generate(&Self::prompt(report), None).await?;
        tracing::debug!(provider = self.model.name(), chars = reply.len(), "voice summary generated");
        Ok(reply.trim().to_string())
    }

    fn kind(&self) -> SummaryStrategyKind {
        SummaryStrategyKind::Model
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::Error;
    use crate::guidance::ImagePayload;

    #[derive(Default)]
    struct Recorder {
        prompts: Mutex<Vec<String>>,
        saw_image: Mutex<bool>,
    }

    #[async_trait]
    impl GuidanceModel for Recorder {
        async fn generate(&self, prompt: &str, image: Option<&ImagePayload>) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            *self.saw_image.lock().unwrap() |= image.is_some();
            Ok("\n  Hey there, eco-warrior! Rinse it and bin it!  \n".to_string())
        }

        fn name(&self) -> &'static str {
            "recorder"
        }
    }

    struct Failing;

    #[async_trait]
    impl GuidanceModel for Failing {
        async fn generate(&self, _prompt: &str, _image: Option<&ImagePayload>) -> Result<String> {
            Err(Error::Guidance("quota exceeded".to_string()))
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    #[tokio::test]
    async fn reply_is_trimmed_and_prompt_embeds_report() {
        let recorder = Arc::new(Recorder::default());
        let strategy = ModelGenerated::new(recorder.clone());

        let summary = strategy.summarize("## Recycling Instructions\nRinse.").await.unwrap();
        assert_eq!(summary, "Hey there, eco-warrior! Rinse it and bin it!");

        let prompts = recorder.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("approximately 75 words"));
        assert!(prompts[0].ends_with("Advice to summarize:\n## Recycling Instructions\nRinse."));
        assert!(!*recorder.saw_image.lock().unwrap());
    }

    #[tokio::test]
    async fn model_errors_propagate() {
        let strategy = ModelGenerated::new(Arc::new(Failing));
        let result = strategy.summarize("anything").await;
        assert!(matches!(result, Err(Error::Guidance(_))));
    }
}
