//! Seams between the orchestrator and its collaborators.
//!
//! The orchestrator never talks to concrete HTTP/WS clients directly —
//! each external dependency sits behind a trait so sessions can run
//! against in-memory fakes in tests. The vv-provider adapters implement
//! these traits for production.

use async_trait::async_trait;

use vv_domain::error::Result;
use vv_domain::insight::InsightResult;
use vv_domain::interview::{InterviewKind, SessionHandle, TranscriptEntry};
use vv_domain::profile::CandidateProfile;
use vv_provider::{ExtractionClient, SessionProvisioner};

/// Creates the remote session configuration and access credential.
#[async_trait]
pub trait SessionProvisioning: Send + Sync {
    async fn provision(
        &self,
        session_id: &str,
        instructions: &str,
        kind: InterviewKind,
    ) -> Result<SessionHandle>;
}

#[async_trait]
impl SessionProvisioning for SessionProvisioner {
    async fn provision(
        &self,
        session_id: &str,
        instructions: &str,
        kind: InterviewKind,
    ) -> Result<SessionHandle> {
        SessionProvisioner::provision(self, session_id, instructions, kind).await
    }
}

/// The primary (model-backed) insight extraction path.
#[async_trait]
pub trait InsightExtractor: Send + Sync {
    async fn summarize(&self, transcript: &[TranscriptEntry]) -> Result<InsightResult>;
}

#[async_trait]
impl InsightExtractor for ExtractionClient {
    async fn summarize(&self, transcript: &[TranscriptEntry]) -> Result<InsightResult> {
        ExtractionClient::summarize(self, transcript).await
    }
}

/// Fetches factual candidate material before assembly. Failure is not
/// fatal — assembly proceeds with whatever is available.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn fetch(&self, subject_id: &str) -> Result<CandidateProfile>;
}
