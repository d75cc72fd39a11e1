use serde::Serialize;

/// Per-session position in the onboarding flow.
///
/// Failures do not get their own resting state: the error is returned to the
/// caller and the session is restored to the state it can be retried from
/// (`Editing` after a signup failure, `AwaitingVerification` after a
/// provisioning failure).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingState {
    Editing,
    Submitting,
    AwaitingVerification,
    Finalizing,
    Completed,
}

/// Result of a signup submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Account acknowledged and tenant payload staged. The email is the
    /// correlation token handed to the verification surface; the password
    /// never travels with it.
    Accepted { correlation_email: String },
    /// A submission is already in flight for this session; the duplicate
    /// event is dropped, not queued.
    AlreadyInFlight,
}

/// Result of consuming the staged payload after verification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FinalizeOutcome {
    Completed,
    /// No staged payload for this session. Benign: re-entrant navigation
    /// into the verification step must not provision twice.
    NothingToFinalize,
    AlreadyInFlight,
}
