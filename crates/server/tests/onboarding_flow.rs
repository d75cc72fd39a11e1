use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::json;
use tower::Service;
use uuid::Uuid;

use server::routes::{self, ServerState};
use service::clients::mock::{MockAccountClient, MockResetDispatcher, MockTenantProvisioner};
use service::clients::{AccountClient, ResetDispatcher, TenantProvisioner};
use service::errors::ServiceError;
use service::onboarding::OnboardingCoordinator;
use service::recovery::RecoveryLimiter;
use service::staging::MemoryStagingStore;

struct TestApp {
    app: Router,
    accounts: Arc<MockAccountClient>,
    tenants: Arc<MockTenantProvisioner>,
    dispatcher: Arc<MockResetDispatcher>,
}

fn build_app() -> TestApp {
    let accounts = Arc::new(MockAccountClient::default());
    let tenants = Arc::new(MockTenantProvisioner::default());
    let dispatcher = Arc::new(MockResetDispatcher::default());

    let onboarding = Arc::new(OnboardingCoordinator::new(
        Arc::clone(&accounts) as Arc<dyn AccountClient>,
        Arc::clone(&tenants) as Arc<dyn TenantProvisioner>,
        MemoryStagingStore::new(),
    ));
    let recovery = Arc::new(RecoveryLimiter::new(
        Arc::clone(&dispatcher) as Arc<dyn ResetDispatcher>,
        Duration::from_secs(60),
    ));

    let state = ServerState { onboarding, recovery };
    let app = routes::build_router(state, tower_http_cors());
    TestApp { app, accounts, tenants, dispatcher }
}

fn tower_http_cors() -> tower_http::cors::CorsLayer {
    tower_http::cors::CorsLayer::very_permissive()
}

fn signup_body() -> serde_json::Value {
    json!({
        "email": "owner@acme.example",
        "password": "Secret123",
        "password_confirmation": "Secret123",
        "first_name": "Ada",
        "last_name": "Lovelace",
        "tenant_name": "Acme HR",
        "domain": "acme.example",
        "industry": "software",
        "company_size": "11-50",
        "subscription_plan": "professional",
        "billing_cycle": "annual",
        "max_employees": 50,
        "max_storage_gb": 25
    })
}

fn post(uri: &str, session: Uuid, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-session-id", session.to_string())
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

fn get(uri: &str, session: Uuid) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("x-session-id", session.to_string())
        .body(Body::empty())
        .unwrap()
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_signup_and_verification_flow() -> anyhow::Result<()> {
    let mut t = build_app();
    let session = Uuid::new_v4();

    let resp = t.app.call(post("/onboarding/signup", session, &signup_body())).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["status"], "accepted");
    assert_eq!(body["correlation_email"], "owner@acme.example");

    let resp = t.app.call(get("/onboarding/status", session)).await?;
    let body = body_json(resp).await;
    assert_eq!(body["state"], "awaiting_verification");

    // verification callback finalizes exactly once
    let resp = t.app.call(post("/onboarding/verified", session, &json!({}))).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["status"], "completed");

    let resp = t.app.call(post("/onboarding/verified", session, &json!({}))).await?;
    assert_eq!(body_json(resp).await["status"], "nothing_to_finalize");

    assert_eq!(t.tenants.call_count(), 1);
    assert_eq!(t.tenants.last_call().unwrap().tenant_name, "Acme HR");
    Ok(())
}

#[tokio::test]
async fn test_mismatched_confirmation_rejected_before_network() -> anyhow::Result<()> {
    let mut t = build_app();
    let session = Uuid::new_v4();

    let mut body = signup_body();
    body["password_confirmation"] = "different".into();
    let resp = t.app.call(post("/onboarding/signup", session, &body)).await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(t.accounts.call_count(), 0);

    let resp = t.app.call(get("/onboarding/status", session)).await?;
    assert_eq!(body_json(resp).await["state"], "editing");
    Ok(())
}

#[tokio::test]
async fn test_existing_account_maps_to_conflict() -> anyhow::Result<()> {
    let mut t = build_app();
    let session = Uuid::new_v4();

    t.accounts.fail_next(ServiceError::AccountAlreadyExists);
    let resp = t.app.call(post("/onboarding/signup", session, &signup_body())).await?;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // nothing staged, so a verification callback is a benign no-op
    let resp = t.app.call(post("/onboarding/verified", session, &json!({}))).await?;
    assert_eq!(body_json(resp).await["status"], "nothing_to_finalize");
    assert_eq!(t.tenants.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_provisioning_failure_is_retriable() -> anyhow::Result<()> {
    let mut t = build_app();
    let session = Uuid::new_v4();

    t.app.call(post("/onboarding/signup", session, &signup_body())).await?;

    t.tenants.fail_next(ServiceError::ServerRejected("quota exceeded".into()));
    let resp = t.app.call(post("/onboarding/verified", session, &json!({}))).await?;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

    // payload was retained, so the retry completes
    let resp = t.app.call(post("/onboarding/verified", session, &json!({}))).await?;
    assert_eq!(body_json(resp).await["status"], "completed");
    assert_eq!(t.tenants.call_count(), 2);
    Ok(())
}

#[tokio::test]
async fn test_preselected_plan_consumed_by_first_form_mount() -> anyhow::Result<()> {
    let mut t = build_app();
    let session = Uuid::new_v4();

    let plan = json!({ "subscription_plan": "enterprise", "max_employees": 500 });
    let resp = t.app.call(post("/onboarding/plan", session, &plan)).await?;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = t.app.call(get("/onboarding/form", session)).await?;
    let body = body_json(resp).await;
    assert_eq!(body["subscription_plan"], "enterprise");
    assert_eq!(body["max_employees"], 500);

    // re-mount: the plan record is gone, defaults come back
    let resp = t.app.call(get("/onboarding/form", session)).await?;
    let body = body_json(resp).await;
    assert_eq!(body["subscription_plan"], "basic");
    assert_eq!(body["max_employees"], 25);
    Ok(())
}

#[tokio::test]
async fn test_missing_session_header_rejected() -> anyhow::Result<()> {
    let mut t = build_app();
    let req = Request::builder()
        .method("POST")
        .uri("/onboarding/signup")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&signup_body())?))?;
    let resp = t.app.call(req).await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(t.accounts.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_password_reset_cooldown_gates_resend() -> anyhow::Result<()> {
    let mut t = build_app();
    let body = json!({ "email": "user@acme.example" });

    let resp = t
        .app
        .call(post("/auth/password-reset", Uuid::new_v4(), &body))
        .await?;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    let first = body_json(resp).await;
    assert_eq!(first["status"], "sent");
    assert_eq!(first["cooldown_secs"], 60);

    // second attempt inside the window is throttled client-side
    let resp = t
        .app
        .call(post("/auth/password-reset", Uuid::new_v4(), &body))
        .await?;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(resp.headers().get("retry-after").is_some());
    assert_eq!(t.dispatcher.call_count(), 1);

    let resp = t
        .app
        .call(get("/auth/password-reset/cooldown?email=user@acme.example", Uuid::new_v4()))
        .await?;
    let body = body_json(resp).await;
    assert_eq!(body["state"], "cooldown_active");
    Ok(())
}

#[tokio::test]
async fn test_cooldown_is_per_address() -> anyhow::Result<()> {
    let mut t = build_app();

    let resp = t
        .app
        .call(post("/auth/password-reset", Uuid::new_v4(), &json!({ "email": "alice@acme.example" })))
        .await?;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    // a second mailbox gets its own immediate dispatch
    let resp = t
        .app
        .call(post("/auth/password-reset", Uuid::new_v4(), &json!({ "email": "bob@acme.example" })))
        .await?;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    assert_eq!(t.dispatcher.call_count(), 2);

    // while the first is still inside its own window
    let resp = t
        .app
        .call(post("/auth/password-reset", Uuid::new_v4(), &json!({ "email": "alice@acme.example" })))
        .await?;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

    let resp = t
        .app
        .call(get("/auth/password-reset/cooldown?email=carol@acme.example", Uuid::new_v4()))
        .await?;
    let body = body_json(resp).await;
    assert_eq!(body["state"], "idle");
    assert_eq!(body["remaining_secs"], 0);
    Ok(())
}

#[tokio::test]
async fn test_failed_dispatch_skips_cooldown() -> anyhow::Result<()> {
    let mut t = build_app();
    let body = json!({ "email": "user@acme.example" });

    t.dispatcher.fail_next(ServiceError::NetworkUnreachable("dns failure".into()));
    let resp = t
        .app
        .call(post("/auth/password-reset", Uuid::new_v4(), &body))
        .await?;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    // failure does not start the window; the immediate retry goes through
    let resp = t
        .app
        .call(post("/auth/password-reset", Uuid::new_v4(), &body))
        .await?;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    assert_eq!(t.dispatcher.call_count(), 2);
    Ok(())
}
