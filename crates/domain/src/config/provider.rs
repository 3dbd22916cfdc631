use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Voice-AI provider
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Configuration for the external voice-AI provider: session provisioning
/// endpoint, realtime channel endpoint, credentials and voice selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceProviderConfig {
    /// HTTP base URL for config-create and token requests.
    #[serde(default = "d_provider_url")]
    pub base_url: String,
    /// WebSocket URL for the realtime channel.
    #[serde(default = "d_realtime_url")]
    pub realtime_url: String,
    #[serde(default)]
    pub auth: AuthConfig,
    /// Voice id sent with the session-configuration request.
    #[serde(default = "d_voice")]
    pub voice: String,
    /// Deadline for the provisioning request-response exchange (seconds).
    #[serde(default = "d_30")]
    pub provisioning_timeout_secs: u64,
    /// Greeting spoken once the session activates.
    #[serde(default = "d_greeting")]
    pub greeting: String,
}

impl Default for VoiceProviderConfig {
    fn default() -> Self {
        Self {
            base_url: d_provider_url(),
            realtime_url: d_realtime_url(),
            auth: AuthConfig::default(),
            voice: d_voice(),
            provisioning_timeout_secs: 30,
            greeting: d_greeting(),
        }
    }
}

/// Credential resolution: an inline key (warned against) or an
/// environment-variable name. Absence is a fatal precondition at
/// provisioning time, never retried.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthConfig {
    /// Plaintext API key. Prefer `env`.
    #[serde(default)]
    pub key: Option<String>,
    /// Environment variable holding the API key.
    #[serde(default)]
    pub env: Option<String>,
}

impl AuthConfig {
    pub fn is_unconfigured(&self) -> bool {
        self.key.is_none() && self.env.is_none()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Insight extraction service
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Configuration for the one-shot structured summarization call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Chat-completion base URL. Empty disables the primary path — every
    /// session then gets the heuristic fallback.
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default = "d_model")]
    pub model: String,
    /// Single-attempt deadline (seconds). No retry before falling back.
    #[serde(default = "d_20")]
    pub timeout_secs: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            auth: AuthConfig::default(),
            model: d_model(),
            timeout_secs: 20,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Candidate profile service
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Where candidate profiles are fetched from. Empty base URL means no
/// profile service: sessions run against an empty profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileServiceConfig {
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default = "d_10")]
    pub timeout_secs: u64,
}

impl Default for ProfileServiceConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            auth: AuthConfig::default(),
            timeout_secs: 10,
        }
    }
}

impl ProfileServiceConfig {
    pub fn is_configured(&self) -> bool {
        !self.base_url.is_empty()
    }
}

fn d_provider_url() -> String {
    "https://api.voice-provider.example/v1".into()
}

fn d_realtime_url() -> String {
    "wss://realtime.voice-provider.example/v1".into()
}

fn d_voice() -> String {
    "hope".into()
}

fn d_greeting() -> String {
    "Hello! I'm here for our interview. I'm excited to discuss my background \
     and experience. What would you like to know about my professional journey?"
        .into()
}

fn d_model() -> String {
    "gpt-4o-mini".into()
}

fn d_30() -> u64 {
    30
}

fn d_20() -> u64 {
    20
}

fn d_10() -> u64 {
    10
}
