//! Credential recovery: password-reset dispatch behind a resend cooldown.

pub mod clock;
pub mod service;
pub mod ticker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use service::{DispatchOutcome, RecoveryLimiter, RecoveryState};
pub use ticker::CooldownTicker;
