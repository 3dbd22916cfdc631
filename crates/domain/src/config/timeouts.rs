use serde::{Deserialize, Serialize};

use crate::interview::InterviewKind;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Timeout policy
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Per-session timeout policy resolved from the interview kind.
///
/// The literals come straight from the observed product behavior (13-of-15
/// minute warning, 3-second drain) — they are configuration defaults to be
/// preserved, their derivation lives with the provider's audio buffering,
/// not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutPolicy {
    /// Absolute ceiling on session length. `None` = unbounded.
    pub max_duration_secs: Option<u64>,
    /// Wrap-up warning threshold. Always below the ceiling when both set.
    pub warning_at_secs: Option<u64>,
    /// Inactivity window, reset on every inbound utterance.
    pub inactivity_secs: u64,
    /// Whether inactivity expiry on its own ends the session. False for
    /// unlimited-duration kinds — there it is informational only.
    pub inactivity_ends_session: bool,
}

impl TimeoutPolicy {
    /// Fixed policy table keyed by interview kind.
    pub fn for_kind(kind: InterviewKind) -> Self {
        match kind {
            InterviewKind::RoleExperience => Self {
                max_duration_secs: Some(15 * 60),
                warning_at_secs: Some(13 * 60),
                inactivity_secs: 5 * 60,
                inactivity_ends_session: true,
            },
            InterviewKind::WorkStyle => Self {
                max_duration_secs: Some(5 * 60),
                warning_at_secs: Some(4 * 60),
                inactivity_secs: 5 * 60,
                inactivity_ends_session: true,
            },
            InterviewKind::RecruiterScreening => Self {
                max_duration_secs: None,
                warning_at_secs: None,
                inactivity_secs: 30,
                inactivity_ends_session: false,
            },
            // Warning at 80% of the 10-minute ceiling.
            InterviewKind::General => Self {
                max_duration_secs: Some(10 * 60),
                warning_at_secs: Some(8 * 60),
                inactivity_secs: 5 * 60,
                inactivity_ends_session: true,
            },
        }
    }
}

/// Workspace-level timer defaults shared by every session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutsConfig {
    /// Fixed delay between a completion trigger and channel teardown, so
    /// trailing output audio finishes playback.
    #[serde(default = "d_3")]
    pub drain_delay_secs: u64,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            drain_delay_secs: 3,
        }
    }
}

fn d_3() -> u64 {
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_table_matches_observed_values() {
        let p = TimeoutPolicy::for_kind(InterviewKind::RoleExperience);
        assert_eq!(p.max_duration_secs, Some(900));
        assert_eq!(p.warning_at_secs, Some(780));
        assert_eq!(p.inactivity_secs, 300);
        assert!(p.inactivity_ends_session);

        let p = TimeoutPolicy::for_kind(InterviewKind::WorkStyle);
        assert_eq!(p.max_duration_secs, Some(300));
        assert_eq!(p.warning_at_secs, Some(240));

        let p = TimeoutPolicy::for_kind(InterviewKind::RecruiterScreening);
        assert_eq!(p.max_duration_secs, None);
        assert_eq!(p.inactivity_secs, 30);
        assert!(!p.inactivity_ends_session);

        let p = TimeoutPolicy::for_kind(InterviewKind::General);
        assert_eq!(p.max_duration_secs, Some(600));
        assert_eq!(p.warning_at_secs, Some(480));
    }

    #[test]
    fn warning_always_precedes_ceiling() {
        for kind in [
            InterviewKind::RoleExperience,
            InterviewKind::WorkStyle,
            InterviewKind::RecruiterScreening,
            InterviewKind::General,
        ] {
            let p = TimeoutPolicy::for_kind(kind);
            if let (Some(warn), Some(max)) = (p.warning_at_secs, p.max_duration_secs) {
                assert!(warn < max, "{kind}: warning must fire before the ceiling");
            }
        }
    }
}
