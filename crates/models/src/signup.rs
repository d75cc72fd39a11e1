use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::tenant::{
    BillingCycle, PreselectedPlan, StagedTenantPayload, SubscriptionPlan, SubscriptionStatus,
};
use crate::validate;

/// Payload sent to the external account service. Immutable once sent.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AccountSignupRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub requested_role: String,
}

fn default_role() -> String {
    "admin".into()
}

fn default_max_employees() -> u32 {
    25
}

fn default_max_storage_gb() -> u32 {
    10
}

/// The full onboarding form: account fields plus the company fields that
/// become the staged tenant payload after the account is acknowledged.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default = "default_role")]
    pub requested_role: String,

    pub tenant_name: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub company_size: String,
    pub subscription_plan: SubscriptionPlan,
    pub billing_cycle: BillingCycle,
    #[serde(default = "default_max_employees")]
    pub max_employees: u32,
    #[serde(default = "default_max_storage_gb")]
    pub max_storage_gb: u32,
}

impl SignupForm {
    /// Empty draft used by the form-initialization endpoint; the preselected
    /// plan (if any) is merged over these defaults.
    pub fn draft() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            password_confirmation: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            requested_role: default_role(),
            tenant_name: String::new(),
            domain: String::new(),
            industry: String::new(),
            company_size: String::new(),
            subscription_plan: SubscriptionPlan::Basic,
            billing_cycle: BillingCycle::Monthly,
            max_employees: default_max_employees(),
            max_storage_gb: default_max_storage_gb(),
        }
    }

    /// Local precondition checks. Runs before any network call; a failure
    /// here must leave the onboarding state untouched.
    pub fn validate(&self) -> Result<(), ModelError> {
        validate::validate_email(&self.email)?;
        validate::require_non_empty("password", &self.password)?;
        validate::passwords_match(&self.password, &self.password_confirmation)?;
        validate::require_non_empty("first_name", &self.first_name)?;
        validate::require_non_empty("last_name", &self.last_name)?;
        validate::require_non_empty("tenant_name", &self.tenant_name)?;
        Ok(())
    }

    /// Fields absent from the preselection leave the draft untouched.
    pub fn apply_plan(&mut self, plan: &PreselectedPlan) {
        if let Some(p) = plan.subscription_plan {
            self.subscription_plan = p;
        }
        if let Some(c) = plan.billing_cycle {
            self.billing_cycle = c;
        }
        if let Some(n) = plan.max_employees {
            self.max_employees = n;
        }
        if let Some(g) = plan.max_storage_gb {
            self.max_storage_gb = g;
        }
    }

    /// Account-creation view of the form. The confirmation never leaves the
    /// client side.
    pub fn account_request(&self) -> AccountSignupRequest {
        AccountSignupRequest {
            email: self.email.clone(),
            password: self.password.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            requested_role: self.requested_role.clone(),
        }
    }

    /// Tenant view of the form; new tenants always start in trial.
    pub fn staged_payload(&self) -> StagedTenantPayload {
        StagedTenantPayload {
            tenant_name: self.tenant_name.clone(),
            domain: self.domain.clone(),
            industry: self.industry.clone(),
            company_size: self.company_size.clone(),
            subscription_plan: self.subscription_plan,
            billing_cycle: self.billing_cycle,
            max_employees: self.max_employees,
            max_storage_gb: self.max_storage_gb,
            subscription_status: SubscriptionStatus::Trial,
            staged_at: Utc::now(),
        }
    }
}
