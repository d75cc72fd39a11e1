use thiserror::Error;

/// Business errors for the onboarding and recovery workflows.
///
/// Benign signals (`NothingToFinalize`, ignored duplicate submissions) are
/// not errors; they live on the outcome enums of the operations that raise
/// them.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),
    #[error("rejected by upstream service: {0}")]
    ServerRejected(String),
    #[error("account already exists")]
    AccountAlreadyExists,
    #[error("resend cooldown active, {remaining_secs}s remaining")]
    CooldownActive { remaining_secs: u64 },
}

impl ServiceError {
    /// Stable numeric code for external mapping/logging.
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::Validation(_) => 1001,
            ServiceError::AccountAlreadyExists => 1002,
            ServiceError::CooldownActive { .. } => 1003,
            ServiceError::NetworkUnreachable(_) => 1101,
            ServiceError::ServerRejected(_) => 1102,
        }
    }

    /// True for conditions the user can retry without changing input.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            ServiceError::NetworkUnreachable(_) | ServiceError::ServerRejected(_)
        )
    }
}

impl From<models::errors::ModelError> for ServiceError {
    fn from(err: models::errors::ModelError) -> Self {
        match err {
            models::errors::ModelError::Validation(msg) => ServiceError::Validation(msg),
        }
    }
}
