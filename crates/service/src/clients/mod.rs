//! Contract boundary to the external collaborators.
//!
//! The core never implements account creation, tenant persistence, or email
//! delivery; it only calls them through these traits. `http` holds the
//! production implementations, `mock` the scripted in-memory ones used by
//! tests and doc examples.

use async_trait::async_trait;

use models::signup::AccountSignupRequest;
use models::tenant::StagedTenantPayload;

use crate::errors::ServiceError;

pub mod http;

/// External account service: creates the login identity for the signup.
#[async_trait]
pub trait AccountClient: Send + Sync {
    async fn create_account(&self, req: &AccountSignupRequest) -> Result<(), ServiceError>;
}

/// External tenant service: turns a staged payload into a real tenant record.
#[async_trait]
pub trait TenantProvisioner: Send + Sync {
    async fn create_tenant(&self, payload: &StagedTenantPayload) -> Result<(), ServiceError>;
}

/// External recovery service: dispatches the password-reset email.
#[async_trait]
pub trait ResetDispatcher: Send + Sync {
    async fn send_reset_email(&self, email: &str) -> Result<(), ServiceError>;
}

/// Scripted in-memory clients for tests and doc examples.
pub mod mock {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::sync::Notify;

    /// Records every request and returns `Ok` unless a failure was scripted
    /// with `fail_next`. `hold_next` parks the next call on a [`Notify`] so
    /// tests can observe in-flight behavior.
    #[derive(Default)]
    pub struct MockAccountClient {
        calls: Mutex<Vec<AccountSignupRequest>>,
        next_error: Mutex<Option<ServiceError>>,
        gate: Mutex<Option<Arc<Notify>>>,
    }

    impl MockAccountClient {
        pub fn fail_next(&self, err: ServiceError) {
            *self.next_error.lock().unwrap() = Some(err);
        }

        /// The returned handle must be notified to release the parked call.
        pub fn hold_next(&self) -> Arc<Notify> {
            let notify = Arc::new(Notify::new());
            *self.gate.lock().unwrap() = Some(Arc::clone(&notify));
            notify
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        pub fn last_call(&self) -> Option<AccountSignupRequest> {
            self.calls.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl AccountClient for MockAccountClient {
        async fn create_account(&self, req: &AccountSignupRequest) -> Result<(), ServiceError> {
            let gate = self.gate.lock().unwrap().take();
            if let Some(gate) = gate {
                gate.notified().await;
            }
            self.calls.lock().unwrap().push(req.clone());
            match self.next_error.lock().unwrap().take() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }
    }

    #[derive(Default)]
    pub struct MockTenantProvisioner {
        calls: Mutex<Vec<StagedTenantPayload>>,
        next_error: Mutex<Option<ServiceError>>,
    }

    impl MockTenantProvisioner {
        pub fn fail_next(&self, err: ServiceError) {
            *self.next_error.lock().unwrap() = Some(err);
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        pub fn last_call(&self) -> Option<StagedTenantPayload> {
            self.calls.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl TenantProvisioner for MockTenantProvisioner {
        async fn create_tenant(&self, payload: &StagedTenantPayload) -> Result<(), ServiceError> {
            self.calls.lock().unwrap().push(payload.clone());
            match self.next_error.lock().unwrap().take() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }
    }

    #[derive(Default)]
    pub struct MockResetDispatcher {
        calls: Mutex<Vec<String>>,
        next_error: Mutex<Option<ServiceError>>,
    }

    impl MockResetDispatcher {
        pub fn fail_next(&self, err: ServiceError) {
            *self.next_error.lock().unwrap() = Some(err);
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ResetDispatcher for MockResetDispatcher {
        async fn send_reset_email(&self, email: &str) -> Result<(), ServiceError> {
            self.calls.lock().unwrap().push(email.to_string());
            match self.next_error.lock().unwrap().take() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }
    }
}
