//! The live transcript buffer: append-only, deduplicated, ordered.
//!
//! One buffer per session, written only from the session actor (single
//! writer). Duplicate physical deliveries are dropped by signature, and
//! timestamps are kept monotonically non-decreasing.

use std::collections::HashSet;

use vv_domain::interview::TranscriptEntry;
use vv_domain::trace::TraceEvent;

/// Append-only transcript log for one session.
#[derive(Debug, Default)]
pub struct TranscriptBuffer {
    session_id: String,
    entries: Vec<TranscriptEntry>,
    seen: HashSet<String>,
}

impl TranscriptBuffer {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            entries: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Append one turn. Returns `false` when the entry was a duplicate
    /// delivery of an already-applied physical event.
    pub fn append(&mut self, mut entry: TranscriptEntry) -> bool {
        let signature = entry.signature();
        if !self.seen.insert(signature) {
            TraceEvent::DuplicateEventDropped {
                session_id: self.session_id.clone(),
            }
            .emit();
            return false;
        }

        // Entries are applied in arrival order. A stray out-of-order
        // timestamp is clamped so the monotonicity invariant holds.
        if let Some(last) = self.entries.last() {
            if entry.timestamp < last.timestamp {
                entry.timestamp = last.timestamp;
            }
        }

        TraceEvent::TranscriptAppend {
            session_id: self.session_id.clone(),
            speaker: format!("{:?}", entry.speaker).to_lowercase(),
            chars: entry.text.len(),
        }
        .emit();

        self.entries.push(entry);
        true
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Take ownership of the buffered entries at finalization.
    pub fn into_entries(self) -> Vec<TranscriptEntry> {
        self.entries
    }

    /// Clone the buffered entries, leaving the buffer intact.
    pub fn snapshot(&self) -> Vec<TranscriptEntry> {
        self.entries.clone()
    }
}
