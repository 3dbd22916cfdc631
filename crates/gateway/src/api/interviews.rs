use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;

use vv_domain::interview::InterviewKind;
use vv_domain::profile::SituationalContext;
use vv_orchestrator::StartRequest;

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct StartBody {
    pub subject_id: String,
    pub kind: InterviewKind,
    #[serde(default)]
    pub situational: SituationalContext,
}

/// POST /api/interviews
///
/// Starting while the subject already has a live session returns that
/// session with `reused: true` instead of provisioning a second one.
pub async fn start(
    State(state): State<AppState>,
    Json(body): Json<StartBody>,
) -> impl IntoResponse {
    if body.subject_id.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "subject_id must not be empty" })),
        )
            .into_response();
    }

    let request = StartRequest {
        subject_id: body.subject_id,
        kind: body.kind,
        situational: body.situational,
    };

    match state.orchestrator.start(request).await {
        Ok(outcome) => Json(json!({
            "session_id": outcome.session_id,
            "reused": outcome.reused,
        }))
        .into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

/// POST /api/interviews/:id/complete
pub async fn complete(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    if state.orchestrator.complete(&id).await {
        Json(json!({ "ok": true })).into_response()
    } else {
        not_live(&id)
    }
}

/// DELETE /api/interviews/:id — external teardown, marks abandoned.
pub async fn close(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    if state.orchestrator.close(&id).await {
        Json(json!({ "ok": true })).into_response()
    } else {
        not_live(&id)
    }
}

/// GET /api/interviews/:id
pub async fn status(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    match state.orchestrator.status(&id) {
        Some(status) => Json(json!({
            "session_id": status.record.session_id,
            "subject_id": status.record.subject_id,
            "kind": status.record.kind,
            "state": status.live_state,
            "outcome": status.record.outcome,
            "started_at": status.record.started_at,
            "ended_at": status.record.ended_at,
            "duration_secs": status.record.duration_secs,
            "transcript": status.record.transcript,
            "insight": status.record.insight,
            "notices": status.notices,
            "save_degraded": status.save_degraded,
        }))
        .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("unknown session: {id}") })),
        )
            .into_response(),
    }
}

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "provider": state.config.voice_provider.base_url,
    }))
}

fn not_live(id: &str) -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": format!("no live session: {id}") })),
    )
        .into_response()
}
