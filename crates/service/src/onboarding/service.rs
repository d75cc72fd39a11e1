use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use models::signup::SignupForm;
use models::tenant::PreselectedPlan;

use super::domain::{FinalizeOutcome, OnboardingState, SubmitOutcome};
use crate::clients::{AccountClient, TenantProvisioner};
use crate::errors::ServiceError;
use crate::staging::StagingStore;

/// Coordinates one onboarding attempt per session: submits the account
/// signup, stages the tenant payload, and finalizes provisioning once the
/// external verification step calls back.
///
/// All collaborators are injected; the coordinator owns only the per-session
/// state map and is the sole writer of the staging store.
pub struct OnboardingCoordinator {
    accounts: Arc<dyn AccountClient>,
    tenants: Arc<dyn TenantProvisioner>,
    staging: Arc<dyn StagingStore>,
    states: DashMap<Uuid, OnboardingState>,
}

impl OnboardingCoordinator {
    pub fn new(
        accounts: Arc<dyn AccountClient>,
        tenants: Arc<dyn TenantProvisioner>,
        staging: Arc<dyn StagingStore>,
    ) -> Self {
        Self { accounts, tenants, staging, states: DashMap::new() }
    }

    /// Current machine state; unknown sessions are `Editing`.
    pub fn state(&self, session: Uuid) -> OnboardingState {
        self.states.get(&session).map(|s| *s).unwrap_or(OnboardingState::Editing)
    }

    /// Submit the filled signup form.
    ///
    /// Validation runs before any network call; on a validation error the
    /// session stays in `Editing`. The staged payload is written only after
    /// the account service acknowledged the signup, so a failed account
    /// never leaves a tenant behind to provision.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::clients::mock::{MockAccountClient, MockTenantProvisioner};
    /// use service::onboarding::{OnboardingCoordinator, SubmitOutcome};
    /// use service::staging::MemoryStagingStore;
    /// use models::signup::SignupForm;
    ///
    /// let coordinator = OnboardingCoordinator::new(
    ///     Arc::new(MockAccountClient::default()),
    ///     Arc::new(MockTenantProvisioner::default()),
    ///     MemoryStagingStore::new(),
    /// );
    /// let form = SignupForm {
    ///     email: "owner@acme.example".into(),
    ///     password: "Secret123".into(),
    ///     password_confirmation: "Secret123".into(),
    ///     first_name: "Ada".into(),
    ///     last_name: "Lovelace".into(),
    ///     tenant_name: "Acme HR".into(),
    ///     ..SignupForm::draft()
    /// };
    /// let session = uuid::Uuid::new_v4();
    /// let outcome = tokio_test::block_on(coordinator.submit(session, &form)).unwrap();
    /// assert_eq!(outcome, SubmitOutcome::Accepted { correlation_email: "owner@acme.example".into() });
    /// ```
    #[instrument(skip(self, form), fields(%session, email = %form.email))]
    pub async fn submit(
        &self,
        session: Uuid,
        form: &SignupForm,
    ) -> Result<SubmitOutcome, ServiceError> {
        form.validate()?;

        let prior = {
            let mut entry = self.states.entry(session).or_insert(OnboardingState::Editing);
            match *entry {
                OnboardingState::Submitting | OnboardingState::Finalizing => {
                    debug!("submit ignored, operation already in flight");
                    return Ok(SubmitOutcome::AlreadyInFlight);
                }
                prior => {
                    *entry = OnboardingState::Submitting;
                    prior
                }
            }
        };

        match self.accounts.create_account(&form.account_request()).await {
            Ok(()) => {
                // Staged strictly after the account ack.
                self.staging.put_payload(session, form.staged_payload()).await;
                self.states.insert(session, OnboardingState::AwaitingVerification);
                info!(tenant = %form.tenant_name, "signup accepted, tenant payload staged");
                Ok(SubmitOutcome::Accepted { correlation_email: form.email.clone() })
            }
            Err(e) => {
                // A failed resubmission must not demote a session whose
                // earlier submission already staged a payload.
                self.states.insert(session, prior);
                warn!(code = e.code(), error = %e, "account creation failed");
                Err(e)
            }
        }
    }

    /// Consume the staged payload after the external verification succeeded.
    ///
    /// Idempotent: with no payload left this is a no-op signalling
    /// `NothingToFinalize`. On provisioning failure the payload is retained
    /// so the user can retry without re-entering the form.
    #[instrument(skip(self), fields(%session))]
    pub async fn finalize(&self, session: Uuid) -> Result<FinalizeOutcome, ServiceError> {
        // Claim the finalizing slot before touching the store so a re-entrant
        // callback cannot read the payload a second time.
        let prior = {
            let mut entry = self.states.entry(session).or_insert(OnboardingState::Editing);
            match *entry {
                OnboardingState::Submitting | OnboardingState::Finalizing => {
                    debug!("finalize ignored, operation already in flight");
                    return Ok(FinalizeOutcome::AlreadyInFlight);
                }
                prior => {
                    *entry = OnboardingState::Finalizing;
                    prior
                }
            }
        };

        let Some(payload) = self.staging.payload(session).await else {
            self.states.insert(session, prior);
            debug!("nothing to finalize");
            return Ok(FinalizeOutcome::NothingToFinalize);
        };
        match self.tenants.create_tenant(&payload).await {
            Ok(()) => {
                self.staging.clear_payload(session).await;
                self.states.insert(session, OnboardingState::Completed);
                info!(tenant = %payload.tenant_name, "tenant provisioned");
                Ok(FinalizeOutcome::Completed)
            }
            Err(e) => {
                // Payload stays staged so finalization can be retried.
                self.states.insert(session, OnboardingState::AwaitingVerification);
                warn!(code = e.code(), error = %e, "tenant provisioning failed, payload retained");
                Err(e)
            }
        }
    }

    /// Pricing surface writes the plan fragment before signup begins.
    pub async fn stage_plan(&self, session: Uuid, plan: PreselectedPlan) {
        self.staging.put_plan(session, plan).await;
    }

    /// Merge a preselected plan into the form draft at initialization time.
    ///
    /// The plan is deleted by the read, so a re-mount of the form is a safe
    /// no-op. Returns whether a plan was applied.
    pub async fn apply_preselected_plan(&self, session: Uuid, draft: &mut SignupForm) -> bool {
        match self.staging.take_plan(session).await {
            Some(plan) => {
                draft.apply_plan(&plan);
                debug!(%session, "preselected plan applied to form draft");
                true
            }
            None => false,
        }
    }

    /// User restarts signup: drop any staged payload and return to editing.
    pub async fn abandon(&self, session: Uuid) {
        self.staging.clear_payload(session).await;
        self.states.insert(session, OnboardingState::Editing);
        info!(%session, "onboarding attempt abandoned");
    }
}
