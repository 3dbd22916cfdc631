//! Shared domain types for the vivavoce interview orchestrator.
//!
//! Everything here is plain data: the error taxonomy, the interview
//! session model, normalized realtime events, insight results, candidate
//! profile material, the TOML configuration tree, and structured trace
//! events. No I/O, no async.

pub mod config;
pub mod error;
pub mod event;
pub mod insight;
pub mod interview;
pub mod profile;
pub mod trace;

pub use error::{Error, Result};
