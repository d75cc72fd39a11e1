use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::validate;

/// Password-reset request; carries nothing beyond the address.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

impl PasswordResetRequest {
    pub fn validate(&self) -> Result<(), ModelError> {
        validate::validate_email(&self.email)
    }
}
