//! Orchestrator-owned session store.
//!
//! Persists session records in `sessions.json` under the configured state
//! path. A record carries the session identifiers, kind, timing, lifecycle
//! state, outcome, canonical transcript and insight result. Finalization
//! is one atomic record update under one lock and one disk write —
//! duration-without-transcript partial states cannot occur.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use vv_domain::error::{Error, Result};
use vv_domain::insight::InsightResult;
use vv_domain::interview::{
    InterviewKind, SessionOutcome, SessionState, TranscriptEntry,
};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Session record
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One persisted interview session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: String,
    pub subject_id: String,
    pub kind: InterviewKind,
    /// Assigned once by the provisioner, immutable afterwards.
    #[serde(default)]
    pub external_session_id: Option<String>,
    #[serde(default)]
    pub external_config_id: Option<String>,
    pub state: SessionState,
    #[serde(default)]
    pub outcome: Option<SessionOutcome>,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration_secs: u64,
    #[serde(default)]
    pub transcript: Vec<TranscriptEntry>,
    #[serde(default)]
    pub insight: Option<InsightResult>,
}

impl SessionRecord {
    pub fn new(session_id: &str, subject_id: &str, kind: InterviewKind) -> Self {
        Self {
            session_id: session_id.to_owned(),
            subject_id: subject_id.to_owned(),
            kind,
            external_session_id: None,
            external_config_id: None,
            state: SessionState::Setup,
            outcome: None,
            started_at: Utc::now(),
            ended_at: None,
            duration_secs: 0,
            transcript: Vec::new(),
            insight: None,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Repository trait
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The persistence boundary the orchestrator and finalizer talk to.
/// The JSON-file store is the default implementation; a remote store can
/// substitute without touching the callers.
pub trait SessionRepository: Send + Sync {
    /// Create and persist a fresh record.
    fn create(&self, record: SessionRecord) -> Result<()>;

    fn get(&self, session_id: &str) -> Option<SessionRecord>;

    /// Fetch the authoritative persisted transcript, empty when none.
    fn transcript(&self, session_id: &str) -> Vec<TranscriptEntry>;

    /// Update lifecycle state and, once known, external identifiers.
    fn update_state(
        &self,
        session_id: &str,
        state: SessionState,
        external: Option<(String, String)>,
    ) -> Result<()>;

    /// Atomic finalize: transcript, end time, duration and outcome land
    /// in a single record update.
    fn finalize(
        &self,
        session_id: &str,
        transcript: Vec<TranscriptEntry>,
        ended_at: DateTime<Utc>,
        duration_secs: u64,
        outcome: SessionOutcome,
    ) -> Result<()>;

    /// Attach the insight result, replacing any prior placeholder.
    fn set_insight(&self, session_id: &str, insight: InsightResult) -> Result<()>;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// JSON-file store
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Session store backed by a single JSON file.
pub struct JsonSessionStore {
    sessions_path: PathBuf,
    sessions: RwLock<HashMap<String, SessionRecord>>,
}

impl JsonSessionStore {
    /// Load or create the store at `state_path/sessions.json`.
    pub fn new(state_path: &Path) -> Result<Self> {
        std::fs::create_dir_all(state_path).map_err(Error::Io)?;

        let sessions_path = state_path.join("sessions.json");
        let sessions = if sessions_path.exists() {
            let raw = std::fs::read_to_string(&sessions_path).map_err(Error::Io)?;
            serde_json::from_str(&raw).unwrap_or_default()
        } else {
            HashMap::new()
        };

        tracing::info!(
            sessions = sessions.len(),
            path = %sessions_path.display(),
            "session store loaded"
        );

        Ok(Self {
            sessions_path,
            sessions: RwLock::new(sessions),
        })
    }

    /// Persist the whole map. Called with the write lock held so a
    /// record update and its disk write are one atomic step.
    fn persist(&self, sessions: &HashMap<String, SessionRecord>) -> Result<()> {
        let json = serde_json::to_string_pretty(sessions)?;
        std::fs::write(&self.sessions_path, json)
            .map_err(|e| Error::Persistence(format!("writing sessions.json: {e}")))
    }

    fn mutate<F>(&self, session_id: &str, f: F) -> Result<()>
    where
        F: FnOnce(&mut SessionRecord),
    {
        let mut sessions = self.sessions.write();
        let record = sessions
            .get_mut(session_id)
            .ok_or_else(|| Error::Persistence(format!("unknown session {session_id}")))?;
        f(record);
        self.persist(&sessions)
    }
}

impl SessionRepository for JsonSessionStore {
    fn create(&self, record: SessionRecord) -> Result<()> {
        let mut sessions = self.sessions.write();
        sessions.insert(record.session_id.clone(), record);
        self.persist(&sessions)
    }

    fn get(&self, session_id: &str) -> Option<SessionRecord> {
        self.sessions.read().get(session_id).cloned()
    }

    fn transcript(&self, session_id: &str) -> Vec<TranscriptEntry> {
        self.sessions
            .read()
            .get(session_id)
            .map(|r| r.transcript.clone())
            .unwrap_or_default()
    }

    fn update_state(
        &self,
        session_id: &str,
        state: SessionState,
        external: Option<(String, String)>,
    ) -> Result<()> {
        self.mutate(session_id, |record| {
            record.state = state;
            // External identifiers are write-once.
            if let Some((ext_session, ext_config)) = external {
                if record.external_session_id.is_none() {
                    record.external_session_id = Some(ext_session);
                    record.external_config_id = Some(ext_config);
                }
            }
        })
    }

    fn finalize(
        &self,
        session_id: &str,
        transcript: Vec<TranscriptEntry>,
        ended_at: DateTime<Utc>,
        duration_secs: u64,
        outcome: SessionOutcome,
    ) -> Result<()> {
        self.mutate(session_id, |record| {
            record.transcript = transcript;
            record.ended_at = Some(ended_at);
            record.duration_secs = duration_secs;
            record.outcome = Some(outcome);
        })
    }

    fn set_insight(&self, session_id: &str, insight: InsightResult) -> Result<()> {
        self.mutate(session_id, |record| {
            record.insight = Some(insight);
        })
    }
}
