//! Tenant provisioning coordinator: signup submission, payload staging, and
//! finalization after external verification.

pub mod domain;
pub mod service;

pub use domain::{FinalizeOutcome, OnboardingState, SubmitOutcome};
pub use service::OnboardingCoordinator;
