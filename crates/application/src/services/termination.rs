//! Auto-termination counter

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::info;

/// Counts requests that reached the strategy and fires once a threshold is hit
///
/// A threshold of 0 disables the counter. The signal fires exactly once no
/// matter how many requests race past the threshold.
#[derive(Debug)]
pub struct TerminationSignal {
    threshold: u64,
    served: AtomicU64,
    sender: watch::Sender<bool>,
}

impl TerminationSignal {
    /// Create a signal that fires after `threshold` requests
    pub fn new(threshold: u64) -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            threshold,
            served: AtomicU64::new(0),
            sender,
        }
    }

    /// Whether a threshold is configured
    pub const fn is_enabled(&self) -> bool {
        self.threshold > 0
    }

    /// Count one request; returns true for the call that fired the signal
    pub fn record_request(&self) -> bool {
        if !self.is_enabled() {
            return false;
        }

        let served = self.served.fetch_add(1, Ordering::SeqCst) + 1;
        if served == self.threshold {
            info!(
                threshold = self.threshold,
                "Termination threshold reached, signalling shutdown"
            );
            self.sender.send_replace(true);
            true
        } else {
            false
        }
    }

    /// Requests counted so far
    pub fn served(&self) -> u64 {
        self.served.load(Ordering::SeqCst)
    }

    /// Whether the signal has fired
    pub fn is_triggered(&self) -> bool {
        *self.sender.borrow()
    }

    /// Wait until the signal fires; pending forever when disabled
    pub async fn triggered(&self) {
        let mut receiver = self.sender.subscribe();
        // The sender lives in `self`, so the channel cannot close while waiting.
        let _ = receiver.wait_for(|fired| *fired).await;
    }
}
