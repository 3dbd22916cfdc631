pub mod interviews;

use axum::routing::{delete, get, post};
use axum::Router;

use crate::AppState;

/// Build the full API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/interviews", post(interviews::start))
        .route("/api/interviews/:id", get(interviews::status))
        .route("/api/interviews/:id", delete(interviews::close))
        .route("/api/interviews/:id/complete", post(interviews::complete))
        .route("/api/health", get(interviews::health))
}
