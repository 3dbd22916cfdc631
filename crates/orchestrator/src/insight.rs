//! The insight extraction pipeline: model-backed primary path with a
//! deterministic heuristic fallback.
//!
//! This pipeline never raises to the caller. Every completed session gets
//! an [`InsightResult`] — from the model when the one-shot extraction
//! succeeds and validates, otherwise from transcript statistics.

use std::sync::Arc;
use std::time::Instant;

use vv_domain::insight::{InsightResult, InsightSource, MatchQuality};
use vv_domain::interview::{Speaker, TranscriptEntry};
use vv_domain::trace::TraceEvent;

use crate::ports::InsightExtractor;

/// Orchestrator-side pipeline wrapping the extraction client.
pub struct InsightPipeline {
    extractor: Arc<dyn InsightExtractor>,
}

impl InsightPipeline {
    pub fn new(extractor: Arc<dyn InsightExtractor>) -> Self {
        Self { extractor }
    }

    /// Extract insights from a finalized transcript. Single model
    /// attempt; any failure falls back to heuristics. Never errors.
    pub async fn extract(&self, session_id: &str, transcript: &[TranscriptEntry]) -> InsightResult {
        let started = Instant::now();

        let result = match self.extractor.summarize(transcript).await {
            Ok(result) => result,
            Err(e) => {
                TraceEvent::ExtractionFellBack {
                    session_id: session_id.to_owned(),
                    reason: e.to_string(),
                }
                .emit();
                tracing::warn!(session_id, error = %e, "extraction failed, using heuristics");
                heuristic_insights(transcript)
            }
        };

        TraceEvent::InsightExtracted {
            session_id: session_id.to_owned(),
            source: match result.source {
                InsightSource::Model => "model".into(),
                InsightSource::Heuristic => "heuristic".into(),
            },
            insights: result.insights.len(),
            duration_ms: started.elapsed().as_millis() as u64,
        }
        .emit();

        result
    }
}

/// Deterministic fallback over the raw transcript. Interviewer turns
/// containing a question mark proxy for questions asked; the rest is
/// counting. Match quality is pinned to the lowest-confidence label and
/// the recommendation explicitly requests manual review.
pub fn heuristic_insights(transcript: &[TranscriptEntry]) -> InsightResult {
    let questions_asked = transcript
        .iter()
        .filter(|e| e.speaker == Speaker::Interviewer && e.text.contains('?'))
        .count();
    let subject_turns = transcript
        .iter()
        .filter(|e| e.speaker == Speaker::Subject)
        .count();
    let subject_words: usize = transcript
        .iter()
        .filter(|e| e.speaker == Speaker::Subject)
        .map(|e| e.text.split_whitespace().count())
        .sum();

    let minutes = match (transcript.first(), transcript.last()) {
        (Some(first), Some(last)) => {
            (last.timestamp - first.timestamp).num_seconds().max(0) / 60
        }
        _ => 0,
    };

    let mut insights = vec![
        format!("The interviewer asked approximately {questions_asked} questions."),
        format!("The candidate responded across {subject_turns} turns (~{subject_words} words)."),
    ];
    if minutes > 0 {
        insights.push(format!("The conversation spanned roughly {minutes} minutes."));
    }
    if transcript.is_empty() {
        insights = vec!["No transcript content was captured for this session.".into()];
    }

    InsightResult {
        insights,
        recommendation: "Automatic insight extraction was unavailable for this \
                         session; manual review of the transcript is required."
            .into(),
        match_quality: MatchQuality::NeedsMoreAssessment,
        source: InsightSource::Heuristic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use vv_domain::error::Error;

    struct FailingExtractor;

    #[async_trait]
    impl InsightExtractor for FailingExtractor {
        async fn summarize(
            &self,
            _transcript: &[TranscriptEntry],
        ) -> vv_domain::Result<InsightResult> {
            Err(Error::Extraction("503 service unavailable".into()))
        }
    }

    fn transcript() -> Vec<TranscriptEntry> {
        vec![
            TranscriptEntry::new(Speaker::Interviewer, "What did you build at Acme?"),
            TranscriptEntry::new(Speaker::Subject, "I led the data platform rebuild."),
            TranscriptEntry::new(Speaker::Interviewer, "How large was the team?"),
            TranscriptEntry::new(Speaker::Subject, "Six engineers plus two analysts."),
            TranscriptEntry::new(Speaker::Interviewer, "Thanks, that covers it."),
        ]
    }

    #[test]
    fn heuristics_count_question_marks() {
        let result = heuristic_insights(&transcript());
        assert!(result.insights[0].contains("2 questions"));
        assert!(result.insights[1].contains("2 turns"));
        assert_eq!(result.match_quality, MatchQuality::NeedsMoreAssessment);
        assert_eq!(result.source, InsightSource::Heuristic);
    }

    #[test]
    fn heuristics_handle_empty_transcript() {
        let result = heuristic_insights(&[]);
        assert!(!result.insights.is_empty());
        assert!(result.validate().is_ok());
    }

    #[tokio::test]
    async fn pipeline_absorbs_primary_failure() {
        let pipeline = InsightPipeline::new(Arc::new(FailingExtractor));
        let result = pipeline.extract("s1", &transcript()).await;
        assert_eq!(result.source, InsightSource::Heuristic);
        assert_eq!(result.match_quality, MatchQuality::NeedsMoreAssessment);
        assert!(result.recommendation.to_lowercase().contains("manual review"));
    }
}
