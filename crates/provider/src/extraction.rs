//! One-shot structured summarization over a finalized transcript.
//!
//! A single chat-completion request with a strict instruction and a
//! single attempt, no retry. Schema-invalid output is a failure here;
//! the orchestrator's pipeline owns the heuristic fallback.

use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use vv_domain::config::ExtractionConfig;
use vv_domain::error::{Error, Result};
use vv_domain::insight::{InsightResult, InsightSource, MatchQuality};
use vv_domain::interview::{Speaker, TranscriptEntry};

use crate::util::{from_reqwest, resolve_api_key};

/// The strict output schema the model must produce.
#[derive(Debug, Deserialize)]
struct ModelInsightPayload {
    insights: Vec<String>,
    recommendation: String,
    match_quality: MatchQuality,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

const EXTRACTION_INSTRUCTION: &str = "\
You are a recruiting analyst. Extract ONLY facts explicitly present in the \
interview transcript below. Do not infer, embellish or assume anything not \
stated. Respond with a single JSON object and nothing else, of the form \
{\"insights\": [up to 5 short statements], \"recommendation\": \"one to two \
sentences\", \"match_quality\": \"strong\" | \"good\" | \
\"needs_more_assessment\"}.";

/// Chat-completion client for the insight extraction pipeline.
pub struct ExtractionClient {
    cfg: ExtractionConfig,
    client: reqwest::Client,
}

impl ExtractionClient {
    pub fn new(cfg: ExtractionConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(from_reqwest)?;
        Ok(Self { cfg, client })
    }

    /// Whether a primary extraction path is configured at all.
    pub fn is_configured(&self) -> bool {
        !self.cfg.base_url.is_empty()
    }

    /// Submit the transcript once. Any failure (network, non-success
    /// status, schema violation) returns `Error::Extraction` for the
    /// pipeline to absorb.
    pub async fn summarize(&self, transcript: &[TranscriptEntry]) -> Result<InsightResult> {
        if !self.is_configured() {
            return Err(Error::Extraction("no extraction endpoint configured".into()));
        }
        let api_key = resolve_api_key(&self.cfg.auth)
            .map_err(|e| Error::Extraction(e.to_string()))?;

        let body = json!({
            "model": self.cfg.model,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": EXTRACTION_INSTRUCTION },
                { "role": "user", "content": render_transcript(transcript) },
            ],
        });

        let resp = self
            .client
            .post(format!(
                "{}/chat/completions",
                self.cfg.base_url.trim_end_matches('/')
            ))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Extraction(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(Error::Extraction(format!(
                "extraction service returned {status}: {message}"
            )));
        }

        let completion: ChatCompletionResponse = resp
            .json()
            .await
            .map_err(|e| Error::Extraction(format!("malformed completion response: {e}")))?;

        let content = completion
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| Error::Extraction("completion contained no choices".into()))?;

        parse_payload(content)
    }
}

/// Parse and validate model output against the fixed schema. Failure here
/// is a pipeline failure, never partial success.
fn parse_payload(content: &str) -> Result<InsightResult> {
    let payload: ModelInsightPayload = serde_json::from_str(content)
        .map_err(|e| Error::Extraction(format!("schema parse failed: {e}")))?;

    let result = InsightResult {
        insights: payload.insights,
        recommendation: payload.recommendation,
        match_quality: payload.match_quality,
        source: InsightSource::Model,
    };

    result
        .validate()
        .map_err(|reason| Error::Extraction(format!("schema validation failed: {reason}")))?;

    Ok(result)
}

/// Flatten the transcript into the labeled plain-text form the
/// instruction refers to.
fn render_transcript(transcript: &[TranscriptEntry]) -> String {
    let mut out = String::with_capacity(transcript.len() * 48);
    for entry in transcript {
        let label = match entry.speaker {
            Speaker::Subject => "Candidate",
            Speaker::Interviewer => "Interviewer",
        };
        out.push_str(&format!("{label}: {}\n", entry.text));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use vv_domain::interview::Speaker;

    #[test]
    fn valid_payload_parses() {
        let content = r#"{
            "insights": ["Led a data-platform migration", "Prefers pairing"],
            "recommendation": "Advance to a technical deep-dive.",
            "match_quality": "strong"
        }"#;
        let result = parse_payload(content).unwrap();
        assert_eq!(result.insights.len(), 2);
        assert_eq!(result.match_quality, MatchQuality::Strong);
        assert_eq!(result.source, InsightSource::Model);
    }

    #[test]
    fn unknown_label_is_a_schema_failure() {
        let content = r#"{
            "insights": ["x"],
            "recommendation": "y",
            "match_quality": "excellent"
        }"#;
        assert!(matches!(parse_payload(content), Err(Error::Extraction(_))));
    }

    #[test]
    fn empty_insights_is_a_schema_failure() {
        let content = r#"{
            "insights": [],
            "recommendation": "y",
            "match_quality": "good"
        }"#;
        assert!(matches!(parse_payload(content), Err(Error::Extraction(_))));
    }

    #[test]
    fn prose_output_is_a_schema_failure() {
        assert!(matches!(
            parse_payload("The candidate seems strong overall."),
            Err(Error::Extraction(_))
        ));
    }

    #[test]
    fn transcript_renders_with_speaker_labels() {
        let transcript = vec![
            TranscriptEntry::new(Speaker::Interviewer, "Tell me about Acme."),
            TranscriptEntry::new(Speaker::Subject, "I led the platform team."),
        ];
        let rendered = render_transcript(&transcript);
        assert!(rendered.contains("Interviewer: Tell me about Acme."));
        assert!(rendered.contains("Candidate: I led the platform team."));
    }
}
