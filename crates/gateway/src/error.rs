use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde_json::json;

use vv_domain::Error;

/// HTTP mapping for domain errors. vv-domain knows nothing about axum,
/// so the status translation lives here.
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self.0 {
            Error::Precondition(_) => StatusCode::PRECONDITION_FAILED,
            Error::ProvisioningFailed { .. } => StatusCode::BAD_GATEWAY,
            Error::ProvisioningTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Error::Channel(_) => StatusCode::BAD_GATEWAY,
            Error::Http(_) => StatusCode::BAD_GATEWAY,
            Error::Json(_) => StatusCode::BAD_REQUEST,
            Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Io(_)
            | Error::Persistence(_)
            | Error::Extraction(_)
            | Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = json!({ "error": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}
