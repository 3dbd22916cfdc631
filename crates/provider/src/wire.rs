//! Wire-format notifications from the realtime channel and their
//! normalization into [`ProviderEvent`]s.
//!
//! The provider multiplexes heterogeneous JSON frames over one socket.
//! Every inbound text frame is parsed here; unknown frame types are
//! logged and dropped, never surfaced as errors.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use vv_domain::event::ProviderEvent;
use vv_domain::interview::Speaker;

/// One inbound JSON frame, tagged by `type`.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireFrame {
    /// Counterpart participant joined the channel.
    ParticipantJoined,
    /// A finished speech turn with its transcription.
    ConversationItem {
        role: String,
        text: String,
        #[serde(default)]
        timestamp: Option<DateTime<Utc>>,
    },
    AudioPlaybackStarted,
    AudioPlaybackEnded,
    InactivityWarning,
    /// Authoritative remote end signal.
    SessionEnding,
    Error {
        message: String,
    },
}

/// Normalize one parsed frame. Returns `None` for frames that carry no
/// orchestrator-relevant signal (e.g. empty utterances).
///
/// `ai_plays_subject` resolves the raw `assistant`/`user` roles: the AI
/// side is the subject for digital-twin interview kinds and the
/// interviewer for recruiter screening. Semantic roles map directly.
pub fn normalize(frame: WireFrame, ai_plays_subject: bool) -> Option<ProviderEvent> {
    match frame {
        WireFrame::ParticipantJoined => Some(ProviderEvent::ParticipantJoined),
        WireFrame::ConversationItem {
            role,
            text,
            timestamp,
        } => {
            if text.trim().is_empty() {
                return None;
            }
            let speaker = match role.as_str() {
                "subject" | "candidate" => Speaker::Subject,
                "interviewer" => Speaker::Interviewer,
                // Raw provider roles name the transport side, not the
                // transcript side: `assistant` is the AI, `user` the
                // human on the call.
                "assistant" | "agent" if ai_plays_subject => Speaker::Subject,
                "assistant" | "agent" => Speaker::Interviewer,
                "user" if ai_plays_subject => Speaker::Interviewer,
                "user" => Speaker::Subject,
                other => {
                    tracing::debug!(role = other, "unknown conversation role, dropping");
                    return None;
                }
            };
            Some(ProviderEvent::utterance(
                speaker,
                text,
                timestamp.unwrap_or_else(Utc::now),
            ))
        }
        WireFrame::AudioPlaybackStarted => Some(ProviderEvent::AudioPlaybackStarted),
        WireFrame::AudioPlaybackEnded => Some(ProviderEvent::AudioPlaybackEnded),
        WireFrame::InactivityWarning => Some(ProviderEvent::InactivityWarning),
        WireFrame::SessionEnding => Some(ProviderEvent::ProviderInitiatedEnd),
        WireFrame::Error { message } => Some(ProviderEvent::ChannelError { message }),
    }
}

/// Parse and normalize one raw text frame. Malformed JSON and unknown
/// frame types are dropped with a debug log.
pub fn parse_frame(raw: &str, ai_plays_subject: bool) -> Option<ProviderEvent> {
    match serde_json::from_str::<WireFrame>(raw) {
        Ok(frame) => normalize(frame, ai_plays_subject),
        Err(e) => {
            tracing::debug!(error = %e, "unparseable realtime frame, dropping");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screening_maps_user_to_subject() {
        let raw = r#"{"type":"conversation_item","role":"user","text":"Tell me about yourself","timestamp":"2026-03-01T10:00:00Z"}"#;
        match parse_frame(raw, false) {
            Some(ProviderEvent::SubjectUtterance { text, .. }) => {
                assert_eq!(text, "Tell me about yourself");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn screening_maps_assistant_to_interviewer() {
        let raw = r#"{"type":"conversation_item","role":"assistant","text":"Certainly."}"#;
        assert!(matches!(
            parse_frame(raw, false),
            Some(ProviderEvent::InterviewerUtterance { .. })
        ));
    }

    #[test]
    fn twin_kinds_attribute_the_ai_as_subject() {
        // Digital-twin interviews: the AI answers as the candidate, the
        // human recruiter asks the questions.
        let raw = r#"{"type":"conversation_item","role":"assistant","text":"I led the billing rewrite."}"#;
        assert!(matches!(
            parse_frame(raw, true),
            Some(ProviderEvent::SubjectUtterance { .. })
        ));
        let raw = r#"{"type":"conversation_item","role":"user","text":"What was the hardest part?"}"#;
        assert!(matches!(
            parse_frame(raw, true),
            Some(ProviderEvent::InterviewerUtterance { .. })
        ));
    }

    #[test]
    fn semantic_roles_are_fixed_either_way() {
        let raw = r#"{"type":"conversation_item","role":"candidate","text":"Seven years."}"#;
        for flag in [false, true] {
            assert!(matches!(
                parse_frame(raw, flag),
                Some(ProviderEvent::SubjectUtterance { .. })
            ));
        }
    }

    #[test]
    fn empty_utterances_are_dropped() {
        let raw = r#"{"type":"conversation_item","role":"user","text":"   "}"#;
        assert!(parse_frame(raw, false).is_none());
    }

    #[test]
    fn session_ending_is_provider_initiated_end() {
        let raw = r#"{"type":"session_ending"}"#;
        assert!(matches!(
            parse_frame(raw, false),
            Some(ProviderEvent::ProviderInitiatedEnd)
        ));
    }

    #[test]
    fn malformed_frames_are_dropped_not_fatal() {
        assert!(parse_frame("not json", false).is_none());
        assert!(parse_frame(r#"{"type":"unknown_thing"}"#, false).is_none());
    }
}
