use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use models::signup::SignupForm;
use models::tenant::PreselectedPlan;
use service::onboarding::{FinalizeOutcome, OnboardingState, SubmitOutcome};

use super::ServerState;
use crate::errors::ApiError;

/// Sessions are correlated through the `X-Session-Id` header, a Uuid minted
/// by the client shell when the signup surface opens.
pub const SESSION_HEADER: &str = "x-session-id";

fn session_id(headers: &HeaderMap) -> Result<Uuid, ApiError> {
    let raw = headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::bad_request("missing X-Session-Id header"))?;
    raw.parse()
        .map_err(|_| ApiError::bad_request("X-Session-Id must be a valid uuid"))
}

#[derive(Serialize)]
pub struct SignupResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_email: Option<String>,
}

#[derive(Serialize)]
pub struct FinalizeResponse {
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub state: OnboardingState,
}

/// Pricing surface stages a plan fragment before signup begins.
#[utoipa::path(post, path = "/onboarding/plan", tag = "onboarding",
    request_body = crate::openapi::PreselectedPlanDoc,
    responses((status = 204, description = "Plan staged"), (status = 400, description = "Bad Request")))]
pub async fn stage_plan(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(plan): Json<PreselectedPlan>,
) -> Result<StatusCode, ApiError> {
    let session = session_id(&headers)?;
    state.onboarding.stage_plan(session, plan).await;
    Ok(StatusCode::NO_CONTENT)
}

/// Form draft with the preselected plan merged in; the plan record is
/// consumed by this read.
#[utoipa::path(get, path = "/onboarding/form", tag = "onboarding",
    responses((status = 200, description = "Form draft"), (status = 400, description = "Bad Request")))]
pub async fn form_draft(
    State(state): State<ServerState>,
    headers: HeaderMap,
) -> Result<Json<SignupForm>, ApiError> {
    let session = session_id(&headers)?;
    let mut draft = SignupForm::draft();
    state.onboarding.apply_preselected_plan(session, &mut draft).await;
    Ok(Json(draft))
}

#[utoipa::path(post, path = "/onboarding/signup", tag = "onboarding",
    request_body = crate::openapi::SignupFormDoc,
    responses(
        (status = 200, description = "Accepted or ignored duplicate"),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Account already exists"),
        (status = 502, description = "Account service rejected the signup"),
        (status = 503, description = "Account service unreachable")))]
pub async fn signup(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(form): Json<SignupForm>,
) -> Result<Json<SignupResponse>, ApiError> {
    let session = session_id(&headers)?;
    match state.onboarding.submit(session, &form).await? {
        SubmitOutcome::Accepted { correlation_email } => Ok(Json(SignupResponse {
            status: "accepted",
            correlation_email: Some(correlation_email),
        })),
        SubmitOutcome::AlreadyInFlight => {
            Ok(Json(SignupResponse { status: "already_in_flight", correlation_email: None }))
        }
    }
}

/// Callback entry point for the external verification step.
#[utoipa::path(post, path = "/onboarding/verified", tag = "onboarding",
    responses(
        (status = 200, description = "Finalized, or nothing left to finalize"),
        (status = 400, description = "Bad Request"),
        (status = 502, description = "Provisioning rejected; staged payload retained")))]
pub async fn verified(
    State(state): State<ServerState>,
    headers: HeaderMap,
) -> Result<Json<FinalizeResponse>, ApiError> {
    let session = session_id(&headers)?;
    let status = match state.onboarding.finalize(session).await? {
        FinalizeOutcome::Completed => "completed",
        FinalizeOutcome::NothingToFinalize => "nothing_to_finalize",
        FinalizeOutcome::AlreadyInFlight => "already_in_flight",
    };
    Ok(Json(FinalizeResponse { status }))
}

#[utoipa::path(get, path = "/onboarding/status", tag = "onboarding",
    responses((status = 200, description = "Current onboarding state")))]
pub async fn status(
    State(state): State<ServerState>,
    headers: HeaderMap,
) -> Result<Json<StatusResponse>, ApiError> {
    let session = session_id(&headers)?;
    Ok(Json(StatusResponse { state: state.onboarding.state(session) }))
}

/// User restarts signup; staged data for the session is dropped.
#[utoipa::path(delete, path = "/onboarding", tag = "onboarding",
    responses((status = 204, description = "Attempt abandoned")))]
pub async fn abandon(
    State(state): State<ServerState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let session = session_id(&headers)?;
    state.onboarding.abandon(session).await;
    Ok(StatusCode::NO_CONTENT)
}
