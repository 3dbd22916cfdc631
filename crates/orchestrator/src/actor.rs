//! The per-session lifecycle actor.
//!
//! One tokio task owns the canonical state, the transcript buffer and the
//! realtime channel for a single interview. Realtime events, timer
//! expiries and user commands all funnel into its select loop, which
//! applies transitions in arrival order. The channel handle is an
//! explicitly owned resource released on every exit path.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::time::Instant;

use vv_domain::config::TimeoutPolicy;
use vv_domain::event::{is_benign_channel_error, ProviderEvent};
use vv_domain::interview::{
    InterviewKind, SessionOutcome, SessionState, Speaker, TranscriptEntry,
};
use vv_domain::trace::TraceEvent;
use vv_provider::realtime::{AudioFrame, RealtimeChannelHandle, RealtimeConnector};
use vv_sessions::{SessionRepository, TranscriptBuffer, TranscriptFinalizer};

use crate::insight::InsightPipeline;
use crate::ports::SessionProvisioning;
use crate::timeout::{sleep_opt, InactivityAction, TimeoutController};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Commands & shared view
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// External inputs to a session. Everything else the actor reacts to
/// arrives on the realtime channel or from its own timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    /// Explicit subject-initiated completion.
    Complete,
    /// External teardown. The session is marked abandoned, never merged
    /// into completed.
    Close,
}

/// Live view of a session shared with the HTTP surface: current state,
/// soft notices, and the audio sender (present only while `Active`).
#[derive(Default)]
pub struct SessionShared {
    inner: Mutex<SharedInner>,
}

#[derive(Default)]
struct SharedInner {
    state: Option<SessionState>,
    history: Vec<SessionState>,
    notices: Vec<String>,
    save_degraded: bool,
    // Set on every actor exit path. Abandoned sessions keep their last
    // lifecycle state, so the state alone cannot signal "done".
    finished: bool,
    audio_tx: Option<mpsc::Sender<AudioFrame>>,
}

impl SessionShared {
    pub fn state(&self) -> SessionState {
        self.inner.lock().state.unwrap_or(SessionState::Setup)
    }

    /// Every state this session has visited, in order.
    pub fn history(&self) -> Vec<SessionState> {
        self.inner.lock().history.clone()
    }

    pub fn notices(&self) -> Vec<String> {
        self.inner.lock().notices.clone()
    }

    pub fn save_degraded(&self) -> bool {
        self.inner.lock().save_degraded
    }

    /// Audio capture sender. `None` outside the Active state: capture
    /// must not start before the channel is confirmed ready, and stops
    /// when draining begins.
    pub fn audio_sender(&self) -> Option<mpsc::Sender<AudioFrame>> {
        self.inner.lock().audio_tx.clone()
    }

    fn set_state(&self, state: SessionState) {
        let mut inner = self.inner.lock();
        inner.state = Some(state);
        inner.history.push(state);
    }

    fn push_notice(&self, notice: impl Into<String>) {
        self.inner.lock().notices.push(notice.into());
    }

    /// True once the owning actor has exited, whatever the outcome.
    pub fn is_finished(&self) -> bool {
        let inner = self.inner.lock();
        inner.finished || inner.state.is_some_and(|s| s.is_terminal())
    }

    fn set_degraded(&self) {
        self.inner.lock().save_degraded = true;
    }

    fn mark_finished(&self) {
        self.inner.lock().finished = true;
    }

    fn set_audio(&self, tx: Option<mpsc::Sender<AudioFrame>>) {
        self.inner.lock().audio_tx = tx;
    }
}

/// Collaborators wired in by the orchestrator manager.
pub struct SessionDeps {
    pub repo: Arc<dyn SessionRepository>,
    pub provisioner: Arc<dyn SessionProvisioning>,
    pub connector: Arc<dyn RealtimeConnector>,
    pub insights: Arc<InsightPipeline>,
    pub drain_delay: Duration,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Actor
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub(crate) struct SessionActor {
    session_id: String,
    kind: InterviewKind,
    instructions: String,
    deps: SessionDeps,
    shared: Arc<SessionShared>,
    cmd_rx: mpsc::Receiver<SessionCommand>,
    state: SessionState,
    buffer: TranscriptBuffer,
    started_wall: chrono::DateTime<Utc>,
}

/// Control outcomes from one Active-loop event.
enum Flow {
    Continue,
    Drain(&'static str),
    Fail(String),
}

impl SessionActor {
    /// Spawn the actor task. Returns the command sender.
    pub(crate) fn spawn(
        session_id: String,
        kind: InterviewKind,
        instructions: String,
        deps: SessionDeps,
        shared: Arc<SessionShared>,
    ) -> mpsc::Sender<SessionCommand> {
        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        let actor = SessionActor {
            buffer: TranscriptBuffer::new(&session_id),
            session_id,
            kind,
            instructions,
            deps,
            shared,
            cmd_rx,
            state: SessionState::Setup,
            started_wall: Utc::now(),
        };
        tokio::spawn(actor.run());
        cmd_tx
    }

    async fn run(mut self) {
        // ── Provisioning ─────────────────────────────────────────────
        self.transition(SessionState::Provisioning, "start");

        let provision = {
            let provisioner = self.deps.provisioner.clone();
            let session_id = self.session_id.clone();
            let instructions = self.instructions.clone();
            let kind = self.kind;
            async move { provisioner.provision(&session_id, &instructions, kind).await }
        };
        tokio::pin!(provision);

        let handle = loop {
            tokio::select! {
                result = &mut provision => match result {
                    Ok(handle) => break handle,
                    Err(e) => return self.fail(e.to_string()),
                },
                cmd = self.cmd_rx.recv() => match cmd {
                    // Nothing is live yet for Complete to wrap up.
                    Some(SessionCommand::Complete) => {}
                    // Closing mid-provisioning drops the in-flight call;
                    // the session never passes through Active.
                    Some(SessionCommand::Close) | None => {
                        return self.abandon(None, "closed during provisioning");
                    }
                },
            }
        };

        let _ = self.deps.repo.update_state(
            &self.session_id,
            SessionState::Provisioning,
            Some((
                handle.external_session_id.clone(),
                handle.external_config_id.clone(),
            )),
        );

        let mut channel = match self.deps.connector.open(&handle).await {
            Ok(channel) => channel,
            Err(e) => return self.fail(e.to_string()),
        };

        // ── Await channel readiness ──────────────────────────────────
        // Active begins only once the provider's counterpart participant
        // has joined; audio capture must not start before that.
        loop {
            tokio::select! {
                cmd = self.cmd_rx.recv() => match cmd {
                    Some(SessionCommand::Complete) => {}
                    Some(SessionCommand::Close) | None => {
                        return self.abandon(Some(channel), "closed before active");
                    }
                },
                event = channel.events.recv() => match event {
                    Some(ProviderEvent::ParticipantJoined) => break,
                    Some(ProviderEvent::ChannelError { message }) => {
                        return self.fail_with_channel(channel, message);
                    }
                    Some(ProviderEvent::ChannelClosed) | None => {
                        return self.fail_with_channel(
                            channel,
                            "channel closed before participant joined".into(),
                        );
                    }
                    Some(_) => {}
                },
            }
        }

        self.transition(SessionState::Active, "participant_joined");
        let _ = self
            .deps
            .repo
            .update_state(&self.session_id, SessionState::Active, None);
        self.shared.set_audio(Some(channel.audio_tx.clone()));

        // ── Active loop ──────────────────────────────────────────────
        let mut controller =
            TimeoutController::new(TimeoutPolicy::for_kind(self.kind), Instant::now());

        let drain_trigger: &'static str = loop {
            tokio::select! {
                cmd = self.cmd_rx.recv() => match cmd {
                    Some(SessionCommand::Complete) => {
                        if controller.try_schedule_drain() {
                            break "user_complete";
                        }
                    }
                    Some(SessionCommand::Close) | None => {
                        return self.abandon(Some(channel), "closed while active");
                    }
                },
                event = channel.events.recv() => {
                    let flow = match event {
                        Some(event) => self.on_event(event, &mut controller),
                        None => Flow::Fail("channel ended unexpectedly".into()),
                    };
                    match flow {
                        Flow::Continue => {}
                        Flow::Drain(trigger) => break trigger,
                        Flow::Fail(message) => {
                            return self.fail_with_channel(channel, message);
                        }
                    }
                },
                _ = sleep_opt(controller.warning_deadline()) => {
                    controller.mark_warning_fired();
                    TraceEvent::TimerFired {
                        session_id: self.session_id.clone(),
                        timer: "duration_warning".into(),
                    }
                    .emit();
                    self.shared.push_notice(
                        "Time is almost up, please wrap up your current thought.",
                    );
                }
                _ = sleep_opt(controller.max_deadline()) => {
                    TraceEvent::TimerFired {
                        session_id: self.session_id.clone(),
                        timer: "max_duration".into(),
                    }
                    .emit();
                    if controller.try_schedule_drain() {
                        break "max_duration";
                    }
                }
                _ = tokio::time::sleep_until(controller.inactivity_deadline()) => {
                    TraceEvent::TimerFired {
                        session_id: self.session_id.clone(),
                        timer: "inactivity".into(),
                    }
                    .emit();
                    match controller.on_inactivity_expired(Instant::now()) {
                        InactivityAction::EndSession => {
                            if controller.try_schedule_drain() {
                                break "inactivity";
                            }
                        }
                        InactivityAction::Informational => {
                            self.shared.push_notice("The session has been quiet for a while.");
                        }
                    }
                }
            }
        };

        // ── Draining ─────────────────────────────────────────────────
        // Capture stops; the channel stays alive so trailing output
        // audio finishes playback before teardown.
        self.transition(SessionState::Draining, drain_trigger);
        let _ = self
            .deps
            .repo
            .update_state(&self.session_id, SessionState::Draining, None);
        self.shared.set_audio(None);

        TraceEvent::DrainScheduled {
            session_id: self.session_id.clone(),
            delay_secs: self.deps.drain_delay.as_secs(),
        }
        .emit();

        let drain_deadline = Instant::now() + self.deps.drain_delay;
        loop {
            tokio::select! {
                _ = tokio::time::sleep_until(drain_deadline) => break,
                cmd = self.cmd_rx.recv() => {
                    if matches!(cmd, Some(SessionCommand::Close) | None) {
                        return self.abandon(Some(channel), "closed while draining");
                    }
                }
                // Trailing provider utterances are still applied.
                event = channel.events.recv() => {
                    if let Some(event) = event {
                        self.apply_utterance(event);
                    }
                }
            }
        }

        // Teardown happens exactly at the Draining → Finalizing boundary;
        // closing earlier risks dropping the final provider utterance.
        channel.close();
        self.transition(SessionState::Finalizing, "drain_elapsed");
        let _ = self
            .deps
            .repo
            .update_state(&self.session_id, SessionState::Finalizing, None);

        // ── Finalize ─────────────────────────────────────────────────
        self.finalize_and_complete().await;
    }

    // ── Event handling ───────────────────────────────────────────────

    fn on_event(&mut self, event: ProviderEvent, controller: &mut TimeoutController) -> Flow {
        match event {
            ProviderEvent::SubjectUtterance { .. } | ProviderEvent::InterviewerUtterance { .. } => {
                if self.apply_utterance(event) {
                    controller.record_activity(Instant::now());
                }
                Flow::Continue
            }
            ProviderEvent::AudioPlaybackStarted | ProviderEvent::AudioPlaybackEnded => {
                Flow::Continue
            }
            ProviderEvent::InactivityWarning => {
                self.shared.push_notice("Are you still there?");
                Flow::Continue
            }
            ProviderEvent::ProviderInitiatedEnd => {
                // Authoritative remote timeout: drain, never stop instantly.
                if controller.try_schedule_drain() {
                    Flow::Drain("provider_end")
                } else {
                    Flow::Continue
                }
            }
            ProviderEvent::ChannelError { message } => {
                if is_benign_channel_error(&message) {
                    // Benign timeout wording, routed to the same drain
                    // path as a provider-initiated end.
                    tracing::info!(
                        session_id = %self.session_id,
                        message = %message,
                        "benign channel timeout"
                    );
                    if controller.try_schedule_drain() {
                        Flow::Drain("benign_timeout")
                    } else {
                        Flow::Continue
                    }
                } else {
                    Flow::Fail(message)
                }
            }
            ProviderEvent::ChannelClosed => Flow::Fail("channel closed unexpectedly".into()),
            ProviderEvent::ParticipantJoined => Flow::Continue,
        }
    }

    /// Append an utterance event to the transcript buffer. Returns true
    /// when the event carried a (non-duplicate) utterance.
    fn apply_utterance(&mut self, event: ProviderEvent) -> bool {
        let entry = match event {
            ProviderEvent::SubjectUtterance { text, timestamp } => TranscriptEntry {
                speaker: Speaker::Subject,
                text,
                timestamp,
            },
            ProviderEvent::InterviewerUtterance { text, timestamp } => TranscriptEntry {
                speaker: Speaker::Interviewer,
                text,
                timestamp,
            },
            _ => return false,
        };
        self.buffer.append(entry)
    }

    // ── Exit paths ───────────────────────────────────────────────────

    async fn finalize_and_complete(mut self) {
        let ended_at = Utc::now();
        let duration_secs = (ended_at - self.started_wall).num_seconds().max(0) as u64;

        let finalizer = TranscriptFinalizer::new(self.deps.repo.clone());
        let outcome = finalizer.finalize(
            &self.session_id,
            std::mem::take(&mut self.buffer).into_entries(),
            ended_at,
            duration_secs,
            SessionOutcome::Completed,
        );
        if outcome.degraded {
            self.shared.set_degraded();
            self.shared
                .push_notice("Saving is delayed; the transcript will be stored when possible.");
        }

        let insight = self
            .deps
            .insights
            .extract(&self.session_id, &outcome.transcript)
            .await;
        if let Err(e) = self.deps.repo.set_insight(&self.session_id, insight) {
            tracing::warn!(session_id = %self.session_id, error = %e, "insight save degraded");
            self.shared.set_degraded();
        }

        self.transition(SessionState::Completed, "finalized");
        let _ = self
            .deps
            .repo
            .update_state(&self.session_id, SessionState::Completed, None);

        TraceEvent::SessionClosed {
            session_id: self.session_id.clone(),
            outcome: "completed".into(),
        }
        .emit();
        self.shared.mark_finished();
    }

    /// External close before completion: release the channel, persist
    /// what we have, mark the session abandoned. Timers die with the
    /// actor; no insight extraction is started or awaited.
    fn abandon(mut self, channel: Option<RealtimeChannelHandle>, reason: &str) {
        if let Some(channel) = channel {
            channel.close();
        }
        self.shared.set_audio(None);

        tracing::info!(session_id = %self.session_id, reason, "session abandoned");

        let ended_at = Utc::now();
        let duration_secs = (ended_at - self.started_wall).num_seconds().max(0) as u64;
        let finalizer = TranscriptFinalizer::new(self.deps.repo.clone());
        let _ = finalizer.finalize(
            &self.session_id,
            std::mem::take(&mut self.buffer).into_entries(),
            ended_at,
            duration_secs,
            SessionOutcome::Abandoned,
        );

        TraceEvent::SessionClosed {
            session_id: self.session_id.clone(),
            outcome: "abandoned".into(),
        }
        .emit();
        self.shared.mark_finished();
    }

    fn fail_with_channel(self, channel: RealtimeChannelHandle, message: String) {
        channel.close();
        self.fail(message)
    }

    /// Transport-level fatal error: terminal Error state with the cause
    /// attached. Only a fresh start recovers from here.
    fn fail(mut self, message: String) {
        self.shared.set_audio(None);
        tracing::error!(session_id = %self.session_id, error = %message, "session failed");

        self.transition(SessionState::Error, "fault");
        let _ = self
            .deps
            .repo
            .update_state(&self.session_id, SessionState::Error, None);

        let ended_at = Utc::now();
        let duration_secs = (ended_at - self.started_wall).num_seconds().max(0) as u64;
        let finalizer = TranscriptFinalizer::new(self.deps.repo.clone());
        let _ = finalizer.finalize(
            &self.session_id,
            std::mem::take(&mut self.buffer).into_entries(),
            ended_at,
            duration_secs,
            SessionOutcome::Failed,
        );

        TraceEvent::SessionClosed {
            session_id: self.session_id.clone(),
            outcome: "failed".into(),
        }
        .emit();
        self.shared.mark_finished();
    }

    fn transition(&mut self, next: SessionState, trigger: &str) {
        if self.state != next && !self.state.can_transition_to(next) {
            // Should be impossible by construction; loud if it happens.
            tracing::error!(
                session_id = %self.session_id,
                from = %self.state,
                to = %next,
                "illegal state transition"
            );
        }
        TraceEvent::StateTransition {
            session_id: self.session_id.clone(),
            from: self.state.to_string(),
            to: next.to_string(),
            trigger: trigger.to_owned(),
        }
        .emit();
        self.state = next;
        self.shared.set_state(next);
    }
}
