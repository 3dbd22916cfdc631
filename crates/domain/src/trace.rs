use serde::Serialize;

/// Structured trace events emitted across all vivavoce crates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    ContextAssembled {
        session_id: String,
        kind: String,
        total_chars: usize,
        sections: usize,
        sections_placeholder: usize,
        sections_truncated: usize,
        situational_included: bool,
    },
    SessionProvisioned {
        session_id: String,
        external_config_id: String,
        duration_ms: u64,
    },
    StateTransition {
        session_id: String,
        from: String,
        to: String,
        trigger: String,
    },
    TranscriptAppend {
        session_id: String,
        speaker: String,
        chars: usize,
    },
    DuplicateEventDropped {
        session_id: String,
    },
    TimerFired {
        session_id: String,
        timer: String,
    },
    DrainScheduled {
        session_id: String,
        delay_secs: u64,
    },
    TranscriptFinalized {
        session_id: String,
        source: String,
        entries: usize,
    },
    PersistenceDegraded {
        session_id: String,
        reason: String,
    },
    InsightExtracted {
        session_id: String,
        source: String,
        insights: usize,
        duration_ms: u64,
    },
    ExtractionFellBack {
        session_id: String,
        reason: String,
    },
    SessionClosed {
        session_id: String,
        outcome: String,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "vv_event");
    }
}
