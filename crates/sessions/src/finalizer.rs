//! Transcript finalization: reconcile local buffer against the
//! authoritative store, persist atomically, degrade softly.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use vv_domain::interview::{SessionOutcome, TranscriptEntry};
use vv_domain::trace::TraceEvent;

use crate::store::SessionRepository;

/// Which copy won the reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptSource {
    /// The authoritative persisted copy was non-empty and preferred.
    Authoritative,
    /// The local live buffer was used.
    LocalBuffer,
}

/// Result of finalization. `degraded` is the soft "saving is delayed"
/// signal — the user-facing flow still reports completion.
#[derive(Debug, Clone)]
pub struct FinalizeOutcome {
    pub transcript: Vec<TranscriptEntry>,
    pub source: TranscriptSource,
    pub degraded: bool,
}

/// Produces the canonical persisted transcript for a finished session.
pub struct TranscriptFinalizer {
    repo: Arc<dyn SessionRepository>,
}

impl TranscriptFinalizer {
    pub fn new(repo: Arc<dyn SessionRepository>) -> Self {
        Self { repo }
    }

    /// Reconcile and persist.
    ///
    /// The authoritative copy may include provider-side content the local
    /// buffer missed (a dropped local event), so it wins whenever it is
    /// non-empty. Persistence failure never fails the caller — it flips
    /// the `degraded` flag and emits a trace event instead.
    pub fn finalize(
        &self,
        session_id: &str,
        local: Vec<TranscriptEntry>,
        ended_at: DateTime<Utc>,
        duration_secs: u64,
        outcome: SessionOutcome,
    ) -> FinalizeOutcome {
        let authoritative = self.repo.transcript(session_id);

        let (transcript, source) = if authoritative.is_empty() {
            (local, TranscriptSource::LocalBuffer)
        } else {
            (authoritative, TranscriptSource::Authoritative)
        };

        let degraded = match self.repo.finalize(
            session_id,
            transcript.clone(),
            ended_at,
            duration_secs,
            outcome,
        ) {
            Ok(()) => false,
            Err(e) => {
                TraceEvent::PersistenceDegraded {
                    session_id: session_id.to_owned(),
                    reason: e.to_string(),
                }
                .emit();
                tracing::warn!(session_id, error = %e, "transcript save degraded");
                true
            }
        };

        TraceEvent::TranscriptFinalized {
            session_id: session_id.to_owned(),
            source: match source {
                TranscriptSource::Authoritative => "authoritative".into(),
                TranscriptSource::LocalBuffer => "local_buffer".into(),
            },
            entries: transcript.len(),
        }
        .emit();

        FinalizeOutcome {
            transcript,
            source,
            degraded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{JsonSessionStore, SessionRecord};
    use vv_domain::interview::{InterviewKind, Speaker};

    fn setup() -> (tempfile::TempDir, Arc<JsonSessionStore>) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(JsonSessionStore::new(dir.path()).unwrap());
        store
            .create(SessionRecord::new("s1", "subject-1", InterviewKind::General))
            .unwrap();
        (dir, store)
    }

    fn entries(texts: &[&str]) -> Vec<TranscriptEntry> {
        texts
            .iter()
            .map(|t| TranscriptEntry::new(Speaker::Subject, *t))
            .collect()
    }

    #[test]
    fn authoritative_copy_wins_when_non_empty() {
        let (_dir, store) = setup();
        // Simulate a prior authoritative write with more content than the
        // local buffer caught.
        store
            .finalize(
                "s1",
                entries(&["a", "b", "c"]),
                Utc::now(),
                10,
                SessionOutcome::Completed,
            )
            .unwrap();

        let finalizer = TranscriptFinalizer::new(store);
        let outcome = finalizer.finalize(
            "s1",
            entries(&["a"]),
            Utc::now(),
            10,
            SessionOutcome::Completed,
        );

        assert_eq!(outcome.source, TranscriptSource::Authoritative);
        assert_eq!(outcome.transcript.len(), 3);
        assert!(!outcome.degraded);
    }

    #[test]
    fn local_buffer_used_when_authoritative_empty() {
        let (_dir, store) = setup();
        let finalizer = TranscriptFinalizer::new(store.clone());
        let outcome = finalizer.finalize(
            "s1",
            entries(&["only local"]),
            Utc::now(),
            5,
            SessionOutcome::Completed,
        );

        assert_eq!(outcome.source, TranscriptSource::LocalBuffer);
        assert_eq!(outcome.transcript.len(), 1);
        // And it was persisted.
        assert_eq!(store.transcript("s1").len(), 1);
    }

    #[test]
    fn persistence_failure_degrades_instead_of_failing() {
        struct FailingRepo;
        impl SessionRepository for FailingRepo {
            fn create(&self, _: SessionRecord) -> vv_domain::Result<()> {
                Ok(())
            }
            fn get(&self, _: &str) -> Option<SessionRecord> {
                None
            }
            fn transcript(&self, _: &str) -> Vec<TranscriptEntry> {
                Vec::new()
            }
            fn update_state(
                &self,
                _: &str,
                _: vv_domain::interview::SessionState,
                _: Option<(String, String)>,
            ) -> vv_domain::Result<()> {
                Ok(())
            }
            fn finalize(
                &self,
                _: &str,
                _: Vec<TranscriptEntry>,
                _: DateTime<Utc>,
                _: u64,
                _: SessionOutcome,
            ) -> vv_domain::Result<()> {
                Err(vv_domain::Error::Persistence("store offline".into()))
            }
            fn set_insight(
                &self,
                _: &str,
                _: vv_domain::insight::InsightResult,
            ) -> vv_domain::Result<()> {
                Ok(())
            }
        }

        let finalizer = TranscriptFinalizer::new(Arc::new(FailingRepo));
        let outcome = finalizer.finalize(
            "s1",
            entries(&["kept locally"]),
            Utc::now(),
            5,
            SessionOutcome::Completed,
        );

        assert!(outcome.degraded);
        assert_eq!(outcome.transcript.len(), 1);
    }
}
