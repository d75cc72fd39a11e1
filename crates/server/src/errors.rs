use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::warn;

use service::errors::ServiceError;

/// HTTP view of a `ServiceError`.
///
/// `CooldownActive` is an expected throttle condition, not a failure: it maps
/// to 429 with a `Retry-After` header so clients can render a countdown
/// instead of an error banner.
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(ServiceError::Validation(msg.into()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let (status, retry_after) = match &err {
            ServiceError::Validation(_) => (StatusCode::BAD_REQUEST, None),
            ServiceError::AccountAlreadyExists => (StatusCode::CONFLICT, None),
            ServiceError::CooldownActive { remaining_secs } => {
                (StatusCode::TOO_MANY_REQUESTS, Some(*remaining_secs))
            }
            ServiceError::ServerRejected(_) => (StatusCode::BAD_GATEWAY, None),
            ServiceError::NetworkUnreachable(_) => (StatusCode::SERVICE_UNAVAILABLE, None),
        };
        if status.is_server_error() {
            warn!(code = err.code(), error = %err, "upstream failure surfaced to client");
        }

        let mut body = serde_json::json!({
            "error": err.to_string(),
            "code": err.code(),
        });
        if let Some(secs) = retry_after {
            body["remaining_secs"] = secs.into();
        }

        let mut resp = (status, Json(body)).into_response();
        if let Some(secs) = retry_after {
            if let Ok(value) = secs.to_string().parse() {
                resp.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        resp
    }
}
