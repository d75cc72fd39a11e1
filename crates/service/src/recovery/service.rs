use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use models::recovery::PasswordResetRequest;

use crate::clients::ResetDispatcher;
use crate::errors::ServiceError;
use crate::recovery::clock::{Clock, SystemClock};

/// Position in the recovery cycle for one address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryState {
    Idle,
    Requesting,
    CooldownActive,
}

/// Result of a reset request that was not rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Email dispatched; the resend window has started.
    Accepted { cooldown_secs: u64 },
    /// A dispatch is already in flight; the duplicate event is dropped.
    AlreadyInFlight,
}

#[derive(Default)]
struct ResendWindow {
    requesting: bool,
    cooldown_until: Option<Instant>,
}

/// Single-flight throttle over the reset-email dispatch service.
///
/// The guard and the cooldown are keyed by address: only a duplicate email to
/// the *same* mailbox is a risk, so one user's window never blocks another's.
/// The cooldown starts only after a *successful* dispatch; failures leave the
/// address immediately retriable.
pub struct RecoveryLimiter {
    dispatcher: Arc<dyn ResetDispatcher>,
    clock: Arc<dyn Clock>,
    window: Duration,
    windows: DashMap<String, ResendWindow>,
}

impl RecoveryLimiter {
    pub fn new(dispatcher: Arc<dyn ResetDispatcher>, window: Duration) -> Self {
        Self::with_clock(dispatcher, window, Arc::new(SystemClock))
    }

    pub fn with_clock(
        dispatcher: Arc<dyn ResetDispatcher>,
        window: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { dispatcher, clock, window, windows: DashMap::new() }
    }

    /// Request a reset email for `email`.
    ///
    /// During that address's cooldown the request is rejected client-side
    /// with `CooldownActive` and never reaches the dispatch service.
    #[instrument(skip(self))]
    pub async fn request_reset(&self, email: &str) -> Result<DispatchOutcome, ServiceError> {
        PasswordResetRequest { email: email.to_string() }.validate()?;

        {
            let mut entry = self.windows.entry(email.to_string()).or_default();
            if entry.requesting {
                debug!("reset request ignored, dispatch already in flight");
                return Ok(DispatchOutcome::AlreadyInFlight);
            }
            if let Some(remaining_secs) = remaining(&entry, self.clock.now()) {
                debug!(remaining_secs, "reset request rejected, cooldown active");
                return Err(ServiceError::CooldownActive { remaining_secs });
            }
            entry.requesting = true;
        }

        let result = self.dispatcher.send_reset_email(email).await;

        match result {
            Ok(()) => {
                self.windows.insert(
                    email.to_string(),
                    ResendWindow {
                        requesting: false,
                        cooldown_until: Some(self.clock.now() + self.window),
                    },
                );
                info!(window_secs = self.window.as_secs(), "reset email dispatched, cooldown started");
                Ok(DispatchOutcome::Accepted { cooldown_secs: self.window.as_secs() })
            }
            Err(e) => {
                // No cooldown on failure; the address may retry immediately.
                self.windows.remove(email);
                warn!(code = e.code(), error = %e, "reset email dispatch failed");
                Err(e)
            }
        }
    }

    /// Seconds left in the address's resend window; zero once submittable
    /// again.
    pub fn remaining_seconds(&self, email: &str) -> u64 {
        self.windows
            .get(email)
            .and_then(|w| remaining(&w, self.clock.now()))
            .unwrap_or(0)
    }

    /// Derived state for one address; `CooldownActive` lapses to `Idle` once
    /// the window has passed, and the lapsed record is dropped.
    pub fn state(&self, email: &str) -> RecoveryState {
        let now = self.clock.now();
        let state = match self.windows.get(email) {
            Some(w) if w.requesting => RecoveryState::Requesting,
            Some(w) if remaining(&w, now).is_some() => RecoveryState::CooldownActive,
            Some(_) => RecoveryState::Idle,
            None => RecoveryState::Idle,
        };
        if state == RecoveryState::Idle {
            self.windows.remove_if(email, |_, w| !w.requesting);
        }
        state
    }
}

/// Whole seconds left, rounded up; `None` once the deadline has passed.
fn remaining(window: &ResendWindow, now: Instant) -> Option<u64> {
    let until = window.cooldown_until?;
    if now >= until {
        return None;
    }
    let left = until - now;
    let mut secs = left.as_secs();
    if left.subsec_nanos() > 0 {
        secs += 1;
    }
    Some(secs)
}
