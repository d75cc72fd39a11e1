use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use models::recovery::PasswordResetRequest;
use service::recovery::{DispatchOutcome, RecoveryState};

use super::ServerState;
use crate::errors::ApiError;

#[derive(Serialize)]
pub struct ResetResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cooldown_secs: Option<u64>,
}

#[derive(Deserialize)]
pub struct CooldownQuery {
    pub email: String,
}

#[derive(Serialize)]
pub struct CooldownResponse {
    pub state: RecoveryState,
    pub remaining_secs: u64,
}

#[utoipa::path(post, path = "/auth/password-reset", tag = "recovery",
    request_body = crate::openapi::PasswordResetDoc,
    responses(
        (status = 202, description = "Reset email dispatched, cooldown started"),
        (status = 400, description = "Validation failed"),
        (status = 429, description = "Cooldown active, no dispatch attempted"),
        (status = 502, description = "Dispatch service rejected the request"),
        (status = 503, description = "Dispatch service unreachable")))]
pub async fn request_reset(
    State(state): State<ServerState>,
    Json(req): Json<PasswordResetRequest>,
) -> Result<(StatusCode, Json<ResetResponse>), ApiError> {
    match state.recovery.request_reset(&req.email).await? {
        DispatchOutcome::Accepted { cooldown_secs } => Ok((
            StatusCode::ACCEPTED,
            Json(ResetResponse { status: "sent", cooldown_secs: Some(cooldown_secs) }),
        )),
        DispatchOutcome::AlreadyInFlight => Ok((
            StatusCode::OK,
            Json(ResetResponse { status: "already_in_flight", cooldown_secs: None }),
        )),
    }
}

/// Countdown state for one address's resend control.
#[utoipa::path(get, path = "/auth/password-reset/cooldown", tag = "recovery",
    params(("email" = String, Query, description = "Address whose resend window to report")),
    responses((status = 200, description = "Remaining cooldown seconds for the address")))]
pub async fn cooldown(
    State(state): State<ServerState>,
    Query(query): Query<CooldownQuery>,
) -> Json<CooldownResponse> {
    Json(CooldownResponse {
        state: state.recovery.state(&query.email),
        remaining_secs: state.recovery.remaining_seconds(&query.email),
    })
}
