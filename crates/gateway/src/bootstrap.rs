//! Wires configuration into a running application state.

use std::sync::Arc;
use std::time::Duration;

use vv_context::ContextAssembler;
use vv_domain::config::{Config, ConfigSeverity};
use vv_orchestrator::{InsightPipeline, Orchestrator, ProfileSource};
use vv_provider::{ExtractionClient, SessionProvisioner, WsRealtimeConnector};
use vv_sessions::JsonSessionStore;

use crate::profiles::{EmptyProfileSource, HttpProfileSource};
use crate::AppState;

/// Log every validation issue; return an error when any is fatal.
pub fn check_config(config: &Config) -> anyhow::Result<()> {
    let issues = config.validate();
    let mut fatal = 0usize;
    for issue in &issues {
        match issue.severity {
            ConfigSeverity::Error => {
                fatal += 1;
                tracing::error!(field = %issue.field, "{}", issue.message);
            }
            ConfigSeverity::Warning => {
                tracing::warn!(field = %issue.field, "{}", issue.message);
            }
        }
    }
    if fatal > 0 {
        anyhow::bail!("configuration has {fatal} fatal issue(s)");
    }
    Ok(())
}

pub fn build_state(config: Config) -> anyhow::Result<AppState> {
    check_config(&config)?;
    let config = Arc::new(config);

    let repo = Arc::new(JsonSessionStore::new(&config.workspace.state_path)?);
    let provisioner = Arc::new(SessionProvisioner::new(config.voice_provider.clone())?);
    let connector = Arc::new(WsRealtimeConnector::new(
        config.voice_provider.realtime_url.clone(),
    ));
    let insights = Arc::new(InsightPipeline::new(Arc::new(ExtractionClient::new(
        config.extraction.clone(),
    )?)));

    let profiles: Arc<dyn ProfileSource> = if config.profiles.is_configured() {
        Arc::new(HttpProfileSource::new(config.profiles.clone())?)
    } else {
        Arc::new(EmptyProfileSource)
    };

    let orchestrator = Arc::new(Orchestrator::new(
        repo,
        provisioner,
        connector,
        insights,
        profiles,
        ContextAssembler::new(config.context.clone()),
        Duration::from_secs(config.timeouts.drain_delay_secs),
    ));

    Ok(AppState {
        config,
        orchestrator,
    })
}
