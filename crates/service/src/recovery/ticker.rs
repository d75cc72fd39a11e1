use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::service::RecoveryLimiter;

/// Once-per-second countdown publisher for one address's resend window.
///
/// The spawned task is aborted when the ticker is dropped, so a torn-down
/// owner never receives a late tick and the timer cannot outlive the surface
/// that created it.
pub struct CooldownTicker {
    rx: watch::Receiver<u64>,
    task: JoinHandle<()>,
}

impl CooldownTicker {
    pub fn spawn(limiter: Arc<RecoveryLimiter>, email: String) -> Self {
        let (tx, rx) = watch::channel(0u64);
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if tx.send(limiter.remaining_seconds(&email)).is_err() {
                    break;
                }
            }
        });
        Self { rx, task }
    }

    /// Receiver of the latest `remaining_secs` value.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.rx.clone()
    }
}

impl Drop for CooldownTicker {
    fn drop(&mut self) {
        self.task.abort();
    }
}
