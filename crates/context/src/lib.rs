//! Context assembly for interview sessions.
//!
//! Builds the layered, size-bounded [`ContextBundle`] handed to the
//! voice-AI provider at session start: persona instructions keyed by
//! interview kind, factual candidate sections with hedged placeholders
//! for anything missing, and situational context when present.
//!
//! Assembly never fails — an interview with less context is preferable
//! to no interview.

pub mod assembler;
pub mod facts;
pub mod persona;
pub mod report;
pub mod truncation;

pub use assembler::{ContextAssembler, ContextBundle};
pub use persona::PersonaTemplate;
pub use report::{AssemblyReport, SectionReport};
