//! Shared helpers for provider adapters.

use vv_domain::config::AuthConfig;
use vv_domain::error::{Error, Result};

/// Convert a [`reqwest::Error`] into the domain [`Error`] type.
pub(crate) fn from_reqwest(e: reqwest::Error) -> Error {
    Error::Http(e.to_string())
}

/// Resolve the API key from an [`AuthConfig`].
///
/// Precedence:
/// 1. `key` field (plaintext, warned against)
/// 2. `env` field (reads environment variable)
/// 3. Error: a fatal precondition, never retried.
pub fn resolve_api_key(auth: &AuthConfig) -> Result<String> {
    if let Some(ref key) = auth.key {
        tracing::warn!(
            "API key loaded from plaintext config field 'key', prefer 'env' instead"
        );
        return Ok(key.clone());
    }

    if let Some(ref env_var) = auth.env {
        return std::env::var(env_var).map_err(|_| {
            Error::Precondition(format!(
                "environment variable '{env_var}' not set or not valid UTF-8"
            ))
        });
    }

    Err(Error::Precondition(
        "no API key configured: set 'key' or 'env' in the auth config".into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plaintext_key_wins() {
        let auth = AuthConfig {
            key: Some("sk-test".into()),
            env: Some("UNSET_VAR_FOR_TEST".into()),
        };
        assert_eq!(resolve_api_key(&auth).unwrap(), "sk-test");
    }

    #[test]
    fn missing_credentials_is_a_precondition_error() {
        let auth = AuthConfig::default();
        match resolve_api_key(&auth) {
            Err(Error::Precondition(_)) => {}
            other => panic!("expected precondition error, got {other:?}"),
        }
    }
}
