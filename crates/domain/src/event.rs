//! Normalized realtime events from the voice-AI provider.
//!
//! The transport delivers heterogeneous, unordered notifications; the
//! channel adapter normalizes each into exactly one [`ProviderEvent`]
//! before the orchestrator ever sees it.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::interview::Speaker;

/// One normalized provider notification.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderEvent {
    /// The provider's counterpart participant joined the channel.
    /// This is the Provisioning → Active confirmation signal.
    ParticipantJoined,

    /// A completed speech turn from the subject side.
    SubjectUtterance {
        text: String,
        timestamp: DateTime<Utc>,
    },

    /// A completed speech turn from the interviewer side.
    InterviewerUtterance {
        text: String,
        timestamp: DateTime<Utc>,
    },

    /// Outbound audio playback started on the provider side.
    AudioPlaybackStarted,

    /// Outbound audio playback finished.
    AudioPlaybackEnded,

    /// The provider warns that the session has been quiet.
    InactivityWarning,

    /// Authoritative end signal from the provider (remote timeout).
    /// The session must drain, not stop instantly.
    ProviderInitiatedEnd,

    /// A transport-level error notification. Classified downstream into
    /// benign-timeout vs genuine fault.
    ChannelError { message: String },

    /// The channel closed.
    ChannelClosed,
}

impl ProviderEvent {
    /// Convenience constructor for an utterance event.
    pub fn utterance(speaker: Speaker, text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        let text = text.into();
        match speaker {
            Speaker::Subject => Self::SubjectUtterance { text, timestamp },
            Speaker::Interviewer => Self::InterviewerUtterance { text, timestamp },
        }
    }

    /// The speaker of an utterance event, `None` for everything else.
    pub fn speaker(&self) -> Option<Speaker> {
        match self {
            Self::SubjectUtterance { .. } => Some(Speaker::Subject),
            Self::InterviewerUtterance { .. } => Some(Speaker::Interviewer),
            _ => None,
        }
    }
}

/// Phrases that mark a `ChannelError` as a benign timeout/duration notice
/// rather than a genuine transport fault. Observed provider wording; kept
/// as constants, matched case-insensitively.
pub const BENIGN_ERROR_PHRASES: &[&str] = &[
    "timeout",
    "timed out",
    "duration exceeded",
    "maximum duration",
    "session expired",
];

/// Classify a channel-error message. Benign matches are routed to the
/// timeout controller as informational; everything else escalates.
pub fn is_benign_channel_error(message: &str) -> bool {
    let lower = message.to_lowercase();
    BENIGN_ERROR_PHRASES.iter().any(|p| lower.contains(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn benign_phrases_match_case_insensitively() {
        assert!(is_benign_channel_error("Session TIMEOUT reached"));
        assert!(is_benign_channel_error("maximum duration exceeded"));
        assert!(is_benign_channel_error("Session expired after limit"));
    }

    #[test]
    fn genuine_faults_are_not_benign() {
        assert!(!is_benign_channel_error("connection reset by peer"));
        assert!(!is_benign_channel_error("invalid access token"));
        assert!(!is_benign_channel_error(""));
    }
}
