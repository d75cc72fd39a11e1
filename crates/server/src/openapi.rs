use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(ToSchema)]
pub struct SignupFormDoc {
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    pub first_name: String,
    pub last_name: String,
    pub requested_role: String,
    pub tenant_name: String,
    pub domain: String,
    pub industry: String,
    pub company_size: String,
    pub subscription_plan: String,
    pub billing_cycle: String,
    pub max_employees: u32,
    pub max_storage_gb: u32,
}

#[derive(ToSchema)]
pub struct PreselectedPlanDoc {
    pub subscription_plan: Option<String>,
    pub billing_cycle: Option<String>,
    pub max_employees: Option<u32>,
    pub max_storage_gb: Option<u32>,
}

#[derive(ToSchema)]
pub struct PasswordResetDoc {
    pub email: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::onboarding::stage_plan,
        crate::routes::onboarding::form_draft,
        crate::routes::onboarding::signup,
        crate::routes::onboarding::verified,
        crate::routes::onboarding::status,
        crate::routes::onboarding::abandon,
        crate::routes::recovery::request_reset,
        crate::routes::recovery::cooldown,
    ),
    components(
        schemas(
            HealthResponse,
            SignupFormDoc,
            PreselectedPlanDoc,
            PasswordResetDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "onboarding"),
        (name = "recovery")
    )
)]
pub struct ApiDoc;
