use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;
use service::onboarding::OnboardingCoordinator;
use service::recovery::RecoveryLimiter;

pub mod onboarding;
pub mod recovery;

/// Shared handler state: the two core components behind `Arc`.
#[derive(Clone)]
pub struct ServerState {
    pub onboarding: Arc<OnboardingCoordinator>,
    pub recovery: Arc<RecoveryLimiter>,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState").finish_non_exhaustive()
    }
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service is up")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: onboarding, recovery, docs, health.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .route("/onboarding/plan", post(onboarding::stage_plan))
        .route("/onboarding/form", get(onboarding::form_draft))
        .route("/onboarding/signup", post(onboarding::signup))
        .route("/onboarding/verified", post(onboarding::verified))
        .route("/onboarding/status", get(onboarding::status))
        .route("/onboarding", delete(onboarding::abandon))
        .route("/auth/password-reset", post(recovery::request_reset))
        .route("/auth/password-reset/cooldown", get(recovery::cooldown))
        .with_state(state);

    api.merge(
        SwaggerUi::new("/docs").url("/api-docs/openapi.json", crate::openapi::ApiDoc::openapi()),
    )
    .layer(cors)
    .layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
            .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
    )
}
