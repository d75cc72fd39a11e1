use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Subscription tier a tenant signs up for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionPlan {
    Basic,
    Professional,
    Enterprise,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    Monthly,
    Annual,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Trial,
    Active,
    Suspended,
}

/// Company record to be provisioned once the account is verified.
///
/// Built only after the account service acknowledged the signup; lives in the
/// session staging store until consumed or overwritten by a newer submission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StagedTenantPayload {
    pub tenant_name: String,
    pub domain: String,
    pub industry: String,
    pub company_size: String,
    pub subscription_plan: SubscriptionPlan,
    pub billing_cycle: BillingCycle,
    pub max_employees: u32,
    pub max_storage_gb: u32,
    pub subscription_status: SubscriptionStatus,
    pub staged_at: DateTime<Utc>,
}

/// Plan fragment written by the pricing surface before signup starts.
///
/// Consumed exactly once at form-initialization; fields left `None` keep the
/// form's defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PreselectedPlan {
    pub subscription_plan: Option<SubscriptionPlan>,
    pub billing_cycle: Option<BillingCycle>,
    pub max_employees: Option<u32>,
    pub max_storage_gb: Option<u32>,
}

impl PreselectedPlan {
    pub fn is_empty(&self) -> bool {
        self.subscription_plan.is_none()
            && self.billing_cycle.is_none()
            && self.max_employees.is_none()
            && self.max_storage_gb.is_none()
    }
}
