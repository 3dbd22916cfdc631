//! Candidate profile sources.

use std::time::Duration;

use async_trait::async_trait;

use vv_domain::config::ProfileServiceConfig;
use vv_domain::profile::CandidateProfile;
use vv_domain::{Error, Result};
use vv_orchestrator::ProfileSource;
use vv_provider::util::resolve_api_key;

/// Fetches `GET {base_url}/subjects/{id}/profile` as a JSON profile.
pub struct HttpProfileSource {
    client: reqwest::Client,
    config: ProfileServiceConfig,
}

impl HttpProfileSource {
    pub fn new(config: ProfileServiceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl ProfileSource for HttpProfileSource {
    async fn fetch(&self, subject_id: &str) -> Result<CandidateProfile> {
        let url = format!(
            "{}/subjects/{}/profile",
            self.config.base_url.trim_end_matches('/'),
            subject_id
        );

        let mut req = self.client.get(&url);
        if !self.config.auth.is_unconfigured() {
            req = req.bearer_auth(resolve_api_key(&self.config.auth)?);
        }

        let resp = req.send().await.map_err(|e| Error::Http(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(Error::Http(format!(
                "profile service returned {} for {url}",
                resp.status()
            )));
        }

        resp.json::<CandidateProfile>()
            .await
            .map_err(|e| Error::Http(e.to_string()))
    }
}

/// Stand-in when no profile service is configured. The assembler renders
/// hedged placeholder sections from the empty profile.
pub struct EmptyProfileSource;

#[async_trait]
impl ProfileSource for EmptyProfileSource {
    async fn fetch(&self, _subject_id: &str) -> Result<CandidateProfile> {
        Ok(CandidateProfile::default())
    }
}
