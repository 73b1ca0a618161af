//! Cooperative cancellation for a workflow run
//!
//! [`RunContext`] wraps the shutdown signal installed by the binary. It is
//! checked at run entry and before every transaction begin; collaborators
//! may observe it too, but work already in flight is never interrupted.

use crate::domain::{Result, ShiftSyncError};
use tokio::sync::watch;

/// Cancellation handle passed through a workflow run
#[derive(Debug, Clone)]
pub struct RunContext {
    shutdown: watch::Receiver<bool>,
}

impl RunContext {
    /// Wraps a shutdown receiver; `true` on the channel means cancelled
    pub fn new(shutdown: watch::Receiver<bool>) -> Self {
        Self { shutdown }
    }

    /// A context that can never be cancelled
    pub fn background() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { shutdown: rx }
    }

    /// Creates a context together with the sender that cancels it
    pub fn channel() -> (watch::Sender<bool>, Self) {
        let (tx, rx) = watch::channel(false);
        (tx, Self { shutdown: rx })
    }

    /// Returns true once cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Fails with [`ShiftSyncError::Cancelled`] if cancellation was requested
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(ShiftSyncError::Cancelled(
                "shutdown signal received".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolves when cancellation is requested
    ///
    /// Never resolves if the sender is dropped without cancelling.
    pub async fn cancelled(&self) {
        let mut rx = self.shutdown.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}
