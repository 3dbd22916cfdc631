//! Timeout and auto-completion control for one session.
//!
//! Two independently tracked timers: the max-duration ceiling (with a
//! wrap-up warning threshold below it) and the inactivity window, reset
//! on every inbound utterance. Both are plain deadlines evaluated inside
//! the session actor's select loop — resets and expiries are linearized
//! through the same task, so no reset can race an expiry.

use tokio::time::Instant;

use vv_domain::config::TimeoutPolicy;

/// What to do when the inactivity window expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InactivityAction {
    /// Time-boxed kinds: force completion.
    EndSession,
    /// Unlimited-duration kinds: informational only, window re-armed.
    Informational,
}

/// Deadline bookkeeping for one session. Owned by the actor; all methods
/// are called from its task only.
pub struct TimeoutController {
    policy: TimeoutPolicy,
    warning_deadline: Option<Instant>,
    max_deadline: Option<Instant>,
    inactivity_deadline: Instant,
    warning_fired: bool,
    /// Re-entrancy guard: the drain path fires at most once per session.
    drain_scheduled: bool,
}

impl TimeoutController {
    pub fn new(policy: TimeoutPolicy, now: Instant) -> Self {
        let warning_deadline = policy
            .warning_at_secs
            .map(|s| now + std::time::Duration::from_secs(s));
        let max_deadline = policy
            .max_duration_secs
            .map(|s| now + std::time::Duration::from_secs(s));
        let inactivity_deadline = now + std::time::Duration::from_secs(policy.inactivity_secs);
        Self {
            policy,
            warning_deadline,
            max_deadline,
            inactivity_deadline,
            warning_fired: false,
            drain_scheduled: false,
        }
    }

    /// Reset the inactivity window. Called on every inbound utterance.
    pub fn record_activity(&mut self, now: Instant) {
        self.inactivity_deadline =
            now + std::time::Duration::from_secs(self.policy.inactivity_secs);
    }

    /// The pending warning deadline, `None` once fired or not configured.
    pub fn warning_deadline(&self) -> Option<Instant> {
        if self.warning_fired {
            None
        } else {
            self.warning_deadline
        }
    }

    pub fn mark_warning_fired(&mut self) {
        self.warning_fired = true;
    }

    pub fn max_deadline(&self) -> Option<Instant> {
        self.max_deadline
    }

    pub fn inactivity_deadline(&self) -> Instant {
        self.inactivity_deadline
    }

    /// Handle inactivity expiry: either end the session or re-arm the
    /// window for unlimited-duration kinds.
    pub fn on_inactivity_expired(&mut self, now: Instant) -> InactivityAction {
        if self.policy.inactivity_ends_session {
            InactivityAction::EndSession
        } else {
            self.record_activity(now);
            InactivityAction::Informational
        }
    }

    /// Attempt to schedule the drain path. Returns `false` when a drain
    /// was already scheduled — the path fires at most once.
    pub fn try_schedule_drain(&mut self) -> bool {
        if self.drain_scheduled {
            return false;
        }
        self.drain_scheduled = true;
        true
    }
}

/// Sleep until an optional deadline; pend forever when there is none.
/// Keeps `tokio::select!` arms uniform in the actor loop.
pub async fn sleep_opt(deadline: Option<Instant>) {
    match deadline {
        Some(d) => tokio::time::sleep_until(d).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vv_domain::interview::InterviewKind;

    #[tokio::test(start_paused = true)]
    async fn warning_precedes_ceiling_for_work_style() {
        let now = Instant::now();
        let ctl = TimeoutController::new(
            TimeoutPolicy::for_kind(InterviewKind::WorkStyle),
            now,
        );
        let warn = ctl.warning_deadline().unwrap();
        let max = ctl.max_deadline().unwrap();
        assert_eq!((warn - now).as_secs(), 240);
        assert_eq!((max - now).as_secs(), 300);
    }

    #[tokio::test(start_paused = true)]
    async fn activity_pushes_inactivity_deadline() {
        let now = Instant::now();
        let mut ctl = TimeoutController::new(
            TimeoutPolicy::for_kind(InterviewKind::RoleExperience),
            now,
        );
        let first = ctl.inactivity_deadline();
        tokio::time::advance(std::time::Duration::from_secs(100)).await;
        ctl.record_activity(Instant::now());
        assert!(ctl.inactivity_deadline() > first);
    }

    #[tokio::test(start_paused = true)]
    async fn unbounded_kind_inactivity_is_informational_and_rearms() {
        let now = Instant::now();
        let mut ctl = TimeoutController::new(
            TimeoutPolicy::for_kind(InterviewKind::RecruiterScreening),
            now,
        );
        assert!(ctl.max_deadline().is_none());
        let before = ctl.inactivity_deadline();
        tokio::time::advance(std::time::Duration::from_secs(31)).await;
        let action = ctl.on_inactivity_expired(Instant::now());
        assert_eq!(action, InactivityAction::Informational);
        assert!(ctl.inactivity_deadline() > before);
    }

    #[tokio::test(start_paused = true)]
    async fn drain_guard_fires_once() {
        let mut ctl = TimeoutController::new(
            TimeoutPolicy::for_kind(InterviewKind::WorkStyle),
            Instant::now(),
        );
        assert!(ctl.try_schedule_drain());
        assert!(!ctl.try_schedule_drain());
    }

    #[tokio::test(start_paused = true)]
    async fn warning_deadline_cleared_after_firing() {
        let mut ctl = TimeoutController::new(
            TimeoutPolicy::for_kind(InterviewKind::General),
            Instant::now(),
        );
        assert!(ctl.warning_deadline().is_some());
        ctl.mark_warning_fired();
        assert!(ctl.warning_deadline().is_none());
    }
}
