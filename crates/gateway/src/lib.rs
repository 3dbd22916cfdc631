//! HTTP surface and wiring for the interview orchestrator.

pub mod api;
pub mod bootstrap;
pub mod error;
pub mod profiles;

use std::sync::Arc;

use vv_domain::config::Config;
use vv_orchestrator::Orchestrator;

/// Shared application state passed to all API handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub orchestrator: Arc<Orchestrator>,
}
