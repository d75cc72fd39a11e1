//! Core services of the onboarding subsystem.
//! - `onboarding`: tenant provisioning coordinator (signup, staging, finalize).
//! - `recovery`: password-reset dispatch behind a resend cooldown.
//! - `staging`: session-scoped store bridging signup and verification.
//! - `clients`: contracts for the external account/provisioning/dispatch services.

pub mod clients;
pub mod errors;
pub mod onboarding;
pub mod recovery;
pub mod staging;
