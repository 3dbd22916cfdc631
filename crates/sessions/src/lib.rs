//! Session persistence for the interview orchestrator.
//!
//! The orchestrator persists only its own state: session records with
//! their canonical transcripts and insight results, in a JSON state file
//! under the configured state path. The live transcript buffer is an
//! in-memory append-only log with duplicate-delivery protection; the
//! finalizer reconciles it against the authoritative persisted copy.

pub mod finalizer;
pub mod store;
pub mod transcript;

pub use finalizer::{FinalizeOutcome, TranscriptFinalizer, TranscriptSource};
pub use store::{JsonSessionStore, SessionRecord, SessionRepository};
pub use transcript::TranscriptBuffer;
