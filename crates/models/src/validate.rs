use crate::errors::ModelError;

/// Reject empty or whitespace-only values.
pub fn require_non_empty(field: &str, value: &str) -> Result<(), ModelError> {
    if value.trim().is_empty() {
        return Err(ModelError::Validation(format!("{field} required")));
    }
    Ok(())
}

/// Minimal shape check: the address must carry a domain separator.
pub fn validate_email(email: &str) -> Result<(), ModelError> {
    require_non_empty("email", email)?;
    if !email.contains('@') {
        return Err(ModelError::Validation("invalid email".into()));
    }
    Ok(())
}

/// Bitwise string equality between password and its confirmation.
pub fn passwords_match(password: &str, confirmation: &str) -> Result<(), ModelError> {
    if password != confirmation {
        return Err(ModelError::Validation("password confirmation does not match".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_field_rejected() {
        assert!(require_non_empty("name", "").is_err());
        assert!(require_non_empty("name", "   ").is_err());
        assert!(require_non_empty("name", "Acme").is_ok());
    }

    #[test]
    fn email_needs_domain_separator() {
        assert!(validate_email("a@b.com").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn confirmation_must_be_exact() {
        assert!(passwords_match("Secret123", "Secret123").is_ok());
        assert!(passwords_match("Secret123", "secret123").is_err());
        assert!(passwords_match("Secret123", "Secret123 ").is_err());
    }
}
