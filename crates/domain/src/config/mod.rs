mod context;
mod provider;
mod server;
mod timeouts;
mod workspace;

pub use context::*;
pub use provider::*;
pub use server::*;
pub use timeouts::*;
pub use workspace::*;

use serde::{Deserialize, Serialize};
use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub workspace: WorkspaceConfig,
    #[serde(default)]
    pub voice_provider: VoiceProviderConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub profiles: ProfileServiceConfig,
    #[serde(default)]
    pub context: ContextConfig,
    #[serde(default)]
    pub timeouts: TimeoutsConfig,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

impl Config {
    pub fn load(path: &str) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(crate::Error::Io)?;
        let config: Config =
            toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))?;
        Ok(config)
    }

    /// Load from file if it exists, otherwise return defaults.
    pub fn load_or_default(path: &str) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Validate the configuration and return a list of issues.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.server.port == 0 {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "server.port".into(),
                message: "port must be greater than 0".into(),
            });
        }

        if self.server.host.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "server.host".into(),
                message: "host must not be empty".into(),
            });
        }

        if self.voice_provider.base_url.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "voice_provider.base_url".into(),
                message: "base_url must not be empty".into(),
            });
        }

        if self.voice_provider.auth.is_unconfigured() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "voice_provider.auth".into(),
                message: "no credentials configured — provisioning will fail \
                          with a precondition error"
                    .into(),
            });
        }

        if self.extraction.base_url.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "extraction.base_url".into(),
                message: "no extraction endpoint — insights will always use \
                          the heuristic fallback"
                    .into(),
            });
        }

        if !self.profiles.is_configured() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "profiles.base_url".into(),
                message: "no profile service — interviews will run against an \
                          empty candidate profile"
                    .into(),
            });
        }

        if self.timeouts.drain_delay_secs == 0 {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "timeouts.drain_delay_secs".into(),
                message: "zero drain delay risks truncating trailing audio".into(),
            });
        }

        errors
    }
}
