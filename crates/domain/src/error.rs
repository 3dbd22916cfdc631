/// Shared error type used across all vivavoce crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP: {0}")]
    Http(String),

    /// Missing credentials or configuration required before provisioning.
    /// Fatal — never retried.
    #[error("precondition: {0}")]
    Precondition(String),

    /// The voice-AI provider rejected the session-configuration request.
    /// Not retried automatically: the call is not idempotent, a repeat
    /// would create a duplicate remote configuration.
    #[error("provisioning failed ({status}): {message}")]
    ProvisioningFailed { status: u16, message: String },

    /// The provisioning exchange exceeded its deadline. Distinct from
    /// rejection so callers can tell slow from refused.
    #[error("provisioning timed out: {0}")]
    ProvisioningTimeout(String),

    /// A genuine realtime-transport fault. Benign provider timeouts are
    /// classified before this is ever constructed and never reach here.
    #[error("channel: {0}")]
    Channel(String),

    /// Persistence is unreachable or failed. Mapped to a soft
    /// "save degraded" signal at the orchestrator boundary.
    #[error("persistence: {0}")]
    Persistence(String),

    /// The extraction service failed or returned schema-invalid output.
    /// Always absorbed by the heuristic fallback, never surfaced raw.
    #[error("extraction: {0}")]
    Extraction(String),

    #[error("config: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
