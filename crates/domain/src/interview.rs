//! The interview session model: kinds, lifecycle states, transcript turns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Interview kind
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The closed set of interview variants. Each kind selects a persona
/// template and a timeout policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewKind {
    /// Deep-dive on roles and achievements. AI speaks as the candidate.
    RoleExperience,
    /// Work-style and collaboration preferences. AI speaks as the candidate.
    WorkStyle,
    /// A recruiter screens the candidate's digital twin. AI interviews.
    RecruiterScreening,
    /// General-purpose conversation. AI speaks as the candidate.
    General,
}

impl InterviewKind {
    /// Stable string form used in session records and trace events.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RoleExperience => "role_experience",
            Self::WorkStyle => "work_style",
            Self::RecruiterScreening => "recruiter_screening",
            Self::General => "general",
        }
    }

    /// Whether the AI plays the subject (the digital twin) rather than
    /// the interviewing party. Recruiter screening is the one kind where
    /// the AI interviews the human on the other end of the call. Both
    /// the persona template and raw-role speaker attribution key off
    /// this.
    pub fn ai_plays_subject(&self) -> bool {
        !matches!(self, Self::RecruiterScreening)
    }
}

impl std::fmt::Display for InterviewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Lifecycle state
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Canonical lifecycle states. Sessions move strictly forward:
/// `Setup → Provisioning → Active → Draining → Finalizing → Completed`,
/// with `Error` reachable from Provisioning, Active and Draining only.
/// After `Error` the sole re-entry point is a fresh `Setup`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Setup,
    Provisioning,
    Active,
    Draining,
    Finalizing,
    Completed,
    Error,
}

impl SessionState {
    /// Whether a transition from `self` to `next` is legal.
    pub fn can_transition_to(&self, next: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, next),
            (Setup, Provisioning)
                | (Provisioning, Active)
                | (Active, Draining)
                | (Draining, Finalizing)
                | (Finalizing, Completed)
                | (Provisioning, Error)
                | (Active, Error)
                | (Draining, Error)
                | (Error, Setup)
        )
    }

    /// States in which timers may be armed and audio may flow.
    pub fn is_live(&self) -> bool {
        matches!(self, SessionState::Active)
    }

    /// Terminal states — no further transitions except Error → Setup.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Completed | SessionState::Error)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Setup => "setup",
            Self::Provisioning => "provisioning",
            Self::Active => "active",
            Self::Draining => "draining",
            Self::Finalizing => "finalizing",
            Self::Completed => "completed",
            Self::Error => "error",
        };
        f.write_str(s)
    }
}

/// How a session ended. A session closed before reaching `Completed` is
/// `Abandoned` — never silently merged into `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionOutcome {
    Completed,
    Abandoned,
    Failed,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Transcript
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Who produced a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    /// The person (or digital twin) being interviewed.
    Subject,
    /// The interviewing party.
    Interviewer,
}

/// One turn in the append-only transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl TranscriptEntry {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    /// Dedup signature for a physical event: speaker + text + timestamp.
    /// The transport may redeliver; identical signatures are dropped
    /// before the transcript append.
    pub fn signature(&self) -> String {
        format!(
            "{:?}|{}|{}",
            self.speaker,
            self.timestamp.timestamp_millis(),
            self.text
        )
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Provisioned session handle
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Handle returned by the provisioner. External identifiers are assigned
/// once by the provider and immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionHandle {
    pub session_id: String,
    pub kind: InterviewKind,
    pub external_session_id: String,
    pub external_config_id: String,
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_transitions_are_legal() {
        use SessionState::*;
        assert!(Setup.can_transition_to(Provisioning));
        assert!(Provisioning.can_transition_to(Active));
        assert!(Active.can_transition_to(Draining));
        assert!(Draining.can_transition_to(Finalizing));
        assert!(Finalizing.can_transition_to(Completed));
    }

    #[test]
    fn error_reachable_only_from_live_phases() {
        use SessionState::*;
        assert!(Provisioning.can_transition_to(Error));
        assert!(Active.can_transition_to(Error));
        assert!(Draining.can_transition_to(Error));
        assert!(!Setup.can_transition_to(Error));
        assert!(!Finalizing.can_transition_to(Error));
        assert!(!Completed.can_transition_to(Error));
    }

    #[test]
    fn no_skipping_drain() {
        use SessionState::*;
        assert!(!Active.can_transition_to(Finalizing));
        assert!(!Active.can_transition_to(Completed));
    }

    #[test]
    fn error_reenters_only_via_setup() {
        use SessionState::*;
        assert!(Error.can_transition_to(Setup));
        assert!(!Error.can_transition_to(Provisioning));
        assert!(!Error.can_transition_to(Active));
    }

    #[test]
    fn only_screening_has_the_ai_interviewing() {
        assert!(InterviewKind::RoleExperience.ai_plays_subject());
        assert!(InterviewKind::WorkStyle.ai_plays_subject());
        assert!(InterviewKind::General.ai_plays_subject());
        assert!(!InterviewKind::RecruiterScreening.ai_plays_subject());
    }

    #[test]
    fn duplicate_signature_matches() {
        let ts = Utc::now();
        let a = TranscriptEntry {
            speaker: Speaker::Subject,
            text: "hello".into(),
            timestamp: ts,
        };
        let b = a.clone();
        assert_eq!(a.signature(), b.signature());
    }
}
