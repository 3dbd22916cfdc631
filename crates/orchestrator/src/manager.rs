//! Session registry and entry points.
//!
//! The orchestrator owns one live session per subject at a time. Starting
//! a session assembles the interview context, creates the persistent
//! record and hands everything to a freshly spawned session actor.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use uuid::Uuid;

use vv_context::{ContextAssembler, ContextBundle};
use vv_domain::interview::{InterviewKind, SessionState};
use vv_domain::profile::{CandidateProfile, SituationalContext};
use vv_domain::Result;
use vv_provider::realtime::RealtimeConnector;
use vv_sessions::{SessionRecord, SessionRepository};

use crate::actor::{SessionActor, SessionCommand, SessionDeps, SessionShared};
use crate::insight::InsightPipeline;
use crate::ports::{ProfileSource, SessionProvisioning};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Requests & views
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone)]
pub struct StartRequest {
    pub subject_id: String,
    pub kind: InterviewKind,
    pub situational: SituationalContext,
}

/// What a start call resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartOutcome {
    pub session_id: String,
    /// True when an already-live session was returned instead of a new
    /// one being provisioned.
    pub reused: bool,
}

/// Snapshot of a session for the HTTP surface: persisted record fields
/// plus the actor's live view.
#[derive(Debug, Clone)]
pub struct SessionStatus {
    pub record: SessionRecord,
    pub live_state: SessionState,
    /// Every state the live actor has visited, in order. Empty once the
    /// registry entry is gone.
    pub history: Vec<SessionState>,
    pub notices: Vec<String>,
    pub save_degraded: bool,
}

struct LiveSession {
    session_id: String,
    cmd_tx: mpsc::Sender<SessionCommand>,
    shared: Arc<SessionShared>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Orchestrator
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct Orchestrator {
    repo: Arc<dyn SessionRepository>,
    provisioner: Arc<dyn SessionProvisioning>,
    connector: Arc<dyn RealtimeConnector>,
    insights: Arc<InsightPipeline>,
    profiles: Arc<dyn ProfileSource>,
    assembler: ContextAssembler,
    drain_delay: Duration,
    // Keyed by subject: one live session per subject at a time.
    live: Mutex<HashMap<String, LiveSession>>,
}

impl Orchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        repo: Arc<dyn SessionRepository>,
        provisioner: Arc<dyn SessionProvisioning>,
        connector: Arc<dyn RealtimeConnector>,
        insights: Arc<InsightPipeline>,
        profiles: Arc<dyn ProfileSource>,
        assembler: ContextAssembler,
        drain_delay: Duration,
    ) -> Self {
        Self {
            repo,
            provisioner,
            connector,
            insights,
            profiles,
            assembler,
            drain_delay,
            live: Mutex::new(HashMap::new()),
        }
    }

    /// Start an interview for a subject, or return the already-live one.
    ///
    /// The duplicate-start check and the registry insert happen under one
    /// lock, so two racing starts for the same subject cannot both
    /// provision. A dead entry (actor reached a terminal state) is
    /// replaced; its channel was already released by the actor itself.
    pub async fn start(&self, req: StartRequest) -> Result<StartOutcome> {
        let session_id = format!("vv-{}", Uuid::new_v4());
        let shared = Arc::new(SessionShared::default());

        {
            let mut live = self.live.lock();
            if let Some(existing) = live.get(&req.subject_id) {
                if !existing.shared.is_finished() {
                    tracing::info!(
                        subject_id = %req.subject_id,
                        session_id = %existing.session_id,
                        "start is a no-op, session already live"
                    );
                    return Ok(StartOutcome {
                        session_id: existing.session_id.clone(),
                        reused: true,
                    });
                }
            }
            // Reserve the slot before any await so a concurrent start
            // sees this session as live (a fresh shared view reads as
            // Setup, which is non-terminal).
            let (placeholder_tx, _parked) = mpsc::channel(1);
            live.insert(
                req.subject_id.clone(),
                LiveSession {
                    session_id: session_id.clone(),
                    cmd_tx: placeholder_tx,
                    shared: shared.clone(),
                },
            );
        }

        let bundle = self.assemble_context(&session_id, &req).await;

        if let Err(e) = self
            .repo
            .create(SessionRecord::new(&session_id, &req.subject_id, req.kind))
        {
            // Release the reservation or the subject could never retry.
            self.live.lock().remove(&req.subject_id);
            return Err(e);
        }

        let cmd_tx = SessionActor::spawn(
            session_id.clone(),
            req.kind,
            bundle.instructions,
            SessionDeps {
                repo: self.repo.clone(),
                provisioner: self.provisioner.clone(),
                connector: self.connector.clone(),
                insights: self.insights.clone(),
                drain_delay: self.drain_delay,
            },
            shared,
        );

        let mut live = self.live.lock();
        if let Some(entry) = live.get_mut(&req.subject_id) {
            if entry.session_id == session_id {
                entry.cmd_tx = cmd_tx;
            }
        }

        Ok(StartOutcome {
            session_id,
            reused: false,
        })
    }

    /// Profile fetch failure is not a session failure: the interview can
    /// still run against a minimal context.
    async fn assemble_context(&self, session_id: &str, req: &StartRequest) -> ContextBundle {
        let profile = match self.profiles.fetch(&req.subject_id).await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!(
                    subject_id = %req.subject_id,
                    error = %e,
                    "profile fetch failed, assembling with empty profile"
                );
                CandidateProfile::default()
            }
        };
        self.assembler
            .assemble(session_id, &profile, req.kind, &req.situational)
    }

    /// Subject-initiated completion. Returns false for unknown or
    /// already-finished sessions.
    pub async fn complete(&self, session_id: &str) -> bool {
        match self.sender_for(session_id) {
            Some(tx) => tx.send(SessionCommand::Complete).await.is_ok(),
            None => false,
        }
    }

    /// External teardown. The session is marked abandoned.
    pub async fn close(&self, session_id: &str) -> bool {
        match self.sender_for(session_id) {
            Some(tx) => tx.send(SessionCommand::Close).await.is_ok(),
            None => false,
        }
    }

    pub fn status(&self, session_id: &str) -> Option<SessionStatus> {
        let record = self.repo.get(session_id)?;
        let live = self.live.lock();
        let entry = live.values().find(|s| s.session_id == session_id);
        Some(match entry {
            Some(entry) => SessionStatus {
                live_state: entry.shared.state(),
                history: entry.shared.history(),
                notices: entry.shared.notices(),
                save_degraded: entry.shared.save_degraded(),
                record,
            },
            None => SessionStatus {
                live_state: record.state,
                history: Vec::new(),
                notices: Vec::new(),
                save_degraded: false,
                record,
            },
        })
    }

    fn sender_for(&self, session_id: &str) -> Option<mpsc::Sender<SessionCommand>> {
        let live = self.live.lock();
        live.values()
            .find(|s| s.session_id == session_id && !s.shared.is_finished())
            .map(|s| s.cmd_tx.clone())
    }
}
