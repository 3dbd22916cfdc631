//! Structured insight output of the extraction pipeline.

use serde::{Deserialize, Serialize};

/// Closed set of match-quality labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchQuality {
    Strong,
    Good,
    /// Lowest-confidence label. The heuristic fallback always uses this.
    NeedsMoreAssessment,
}

/// Which path produced the insight record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightSource {
    /// The language-model extraction succeeded and validated.
    Model,
    /// The deterministic heuristic fallback ran.
    Heuristic,
}

/// Structured output of the extraction pipeline. Produced exactly once per
/// completed session; immutable; replaces any prior placeholder on write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightResult {
    /// Short natural-language insight statements, capped.
    pub insights: Vec<String>,
    /// One-to-two-sentence recommendation.
    pub recommendation: String,
    pub match_quality: MatchQuality,
    pub source: InsightSource,
}

/// Maximum number of insight statements kept in a result.
pub const MAX_INSIGHTS: usize = 5;

impl InsightResult {
    /// Enforce the insight-count cap and reject empty recommendations.
    /// Model output that fails this check is a pipeline failure, not a
    /// partial success.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.insights.is_empty() {
            return Err("insights list is empty".into());
        }
        if self.insights.len() > MAX_INSIGHTS {
            return Err(format!(
                "too many insights: {} > {MAX_INSIGHTS}",
                self.insights.len()
            ));
        }
        if self.recommendation.trim().is_empty() {
            return Err("recommendation is empty".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_insights() {
        let r = InsightResult {
            insights: vec![],
            recommendation: "hire".into(),
            match_quality: MatchQuality::Good,
            source: InsightSource::Model,
        };
        assert!(r.validate().is_err());
    }

    #[test]
    fn rejects_blank_recommendation() {
        let r = InsightResult {
            insights: vec!["clear communicator".into()],
            recommendation: "   ".into(),
            match_quality: MatchQuality::Good,
            source: InsightSource::Model,
        };
        assert!(r.validate().is_err());
    }

    #[test]
    fn accepts_well_formed_result() {
        let r = InsightResult {
            insights: vec!["clear communicator".into(), "led a migration".into()],
            recommendation: "Proceed to a technical round.".into(),
            match_quality: MatchQuality::Strong,
            source: InsightSource::Model,
        };
        assert!(r.validate().is_ok());
    }
}
