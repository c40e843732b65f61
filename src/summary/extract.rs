//! Deterministic section extraction

use async_trait::async_trait;

use super::{SummaryStrategy, SummaryStrategyKind};
use crate::Result;

/// Opens every extracted summary
pub const INSTRUCTIONS_LEAD_IN: &str = "Here's how to recycle this item: ";

/// Introduces the environmental impact fact
pub const IMPACT_LEAD_IN: &str = "And here's an interesting fact: ";

const SECTION_DELIMITER: &str = "##";
const INSTRUCTIONS_HEADER: &str = "Recycling Instructions";
const IMPACT_HEADER: &str = "Environmental Impact";
const IMPACT_SYMBOL: &str = "🌍";

/// Builds a summary from the instructions and impact sections of a report
#[derive(Debug, Clone, Copy, Default)]
pub struct DeterministicExtraction;

impl DeterministicExtraction {
    /// Extract the speakable parts of a report
    ///
    /// Falls back to the report itself when neither section is present. A
    /// report with only the impact section still opens with the instructions
    /// lead-in.
    #[must_use]
    pub fn extract(report: &str) -> String {
        let mut summary = String::from(INSTRUCTIONS_LEAD_IN);

        for section in report.split(SECTION_DELIMITER) {
            if section.contains(INSTRUCTIONS_HEADER) {
                summary.push_str(section.replace(INSTRUCTIONS_HEADER, "").trim());
                summary.push(' ');
            } else if section.contains(IMPACT_HEADER) {
                let impact = section.replace(IMPACT_HEADER, "").replace(IMPACT_SYMBOL, "");
                summary.push_str(IMPACT_LEAD_IN);
                summary.push_str(impact.trim());
                summary.push(' ');
            }
        }

        if summary.trim() == INSTRUCTIONS_LEAD_IN.trim() {
            return report.to_string();
        }

        summary.trim().to_string()
    }
}

#[async_trait]
impl SummaryStrategy for DeterministicExtraction {
    async fn summarize(&self, report: &str) -> Result<String> {
        Ok(Self::extract(report))
    }

    fn kind(&self) -> SummaryStrategyKind {
        SummaryStrategyKind::Extract
    }
}
