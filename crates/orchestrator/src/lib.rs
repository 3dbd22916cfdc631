//! The session orchestrator: one lifecycle actor per live interview.
//!
//! Within a session the realtime event consumer, the two timers and any
//! user-initiated completion are concurrent producers of transitions.
//! A single actor task owns the lifecycle state and the transcript
//! buffer; producers reach it only through its command channel, so state
//! and transcript writes are linearized by construction.

pub mod actor;
pub mod insight;
pub mod manager;
pub mod ports;
pub mod timeout;

pub use actor::{SessionCommand, SessionDeps, SessionShared};
pub use insight::InsightPipeline;
pub use manager::{Orchestrator, SessionStatus, StartOutcome, StartRequest};
pub use ports::{InsightExtractor, ProfileSource, SessionProvisioning};
