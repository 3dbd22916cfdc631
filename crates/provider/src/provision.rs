//! Session provisioning: remote configuration + access credential.
//!
//! A blocking request-response exchange with a hard deadline. The call is
//! not idempotent (a repeat creates a duplicate remote configuration),
//! so nothing here retries. The caller retries explicitly with a fresh
//! session identifier after surfacing the error.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use std::time::{Duration, Instant};

use vv_domain::config::{TimeoutPolicy, VoiceProviderConfig};
use vv_domain::error::{Error, Result};
use vv_domain::interview::{InterviewKind, SessionHandle};
use vv_domain::trace::TraceEvent;

use crate::util::{from_reqwest, resolve_api_key};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Wire responses
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Deserialize)]
struct ConfigCreateResponse {
    config_id: String,
    session_id: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_at: DateTime<Utc>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Provisioner
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Creates a remote session configuration and access credential from
/// the voice-AI provider.
pub struct SessionProvisioner {
    cfg: VoiceProviderConfig,
    client: reqwest::Client,
}

impl SessionProvisioner {
    pub fn new(cfg: VoiceProviderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.provisioning_timeout_secs))
            .build()
            .map_err(from_reqwest)?;
        Ok(Self { cfg, client })
    }

    /// Provision a remote session for the given context bundle.
    ///
    /// Verifies credentials first (`Error::Precondition` when absent),
    /// then runs the config-create and token exchange under one deadline.
    /// Non-success responses surface as `ProvisioningFailed`; an elapsed
    /// deadline as `ProvisioningTimeout`. Neither is retried here.
    pub async fn provision(
        &self,
        session_id: &str,
        instructions: &str,
        kind: InterviewKind,
    ) -> Result<SessionHandle> {
        // Credential precondition, checked before any remote call.
        let api_key = resolve_api_key(&self.cfg.auth)?;

        let deadline = Duration::from_secs(self.cfg.provisioning_timeout_secs);
        let started = Instant::now();

        let exchange = self.exchange(session_id, instructions, kind, &api_key);
        let handle = match tokio::time::timeout(deadline, exchange).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(Error::ProvisioningTimeout(format!(
                    "provisioning exceeded {}s deadline",
                    deadline.as_secs()
                )));
            }
        };

        TraceEvent::SessionProvisioned {
            session_id: session_id.to_owned(),
            external_config_id: handle.external_config_id.clone(),
            duration_ms: started.elapsed().as_millis() as u64,
        }
        .emit();

        Ok(handle)
    }

    // ── Private helpers ───────────────────────────────────────────────

    async fn exchange(
        &self,
        session_id: &str,
        instructions: &str,
        kind: InterviewKind,
        api_key: &str,
    ) -> Result<SessionHandle> {
        let base = self.cfg.base_url.trim_end_matches('/');
        let policy = TimeoutPolicy::for_kind(kind);

        // 1. Create the remote session configuration.
        let body = json!({
            "instructions": instructions,
            "voice": self.cfg.voice,
            "interview_kind": kind.as_str(),
            "max_duration_secs": policy.max_duration_secs,
            "inactivity_secs": policy.inactivity_secs,
            "greeting": self.cfg.greeting,
        });

        let resp = self
            .client
            .post(format!("{base}/sessions"))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(from_reqwest)?;

        let config = Self::read_json::<ConfigCreateResponse>(resp).await?;

        // 2. Request the access credential for the realtime channel.
        let resp = self
            .client
            .post(format!("{base}/sessions/{}/token", config.session_id))
            .bearer_auth(api_key)
            .send()
            .await
            .map_err(from_reqwest)?;

        let token = Self::read_json::<TokenResponse>(resp).await?;

        Ok(SessionHandle {
            session_id: session_id.to_owned(),
            kind,
            external_session_id: config.session_id,
            external_config_id: config.config_id,
            access_token: token.access_token,
            expires_at: token.expires_at,
        })
    }

    /// Read a JSON body, mapping non-success statuses to
    /// `ProvisioningFailed` with the provider's message attached.
    async fn read_json<T: serde::de::DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(Error::ProvisioningFailed {
                status: status.as_u16(),
                message,
            });
        }
        resp.json::<T>().await.map_err(from_reqwest)
    }
}
