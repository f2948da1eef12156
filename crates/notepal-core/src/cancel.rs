//! Cancellation tokens for in-flight store operations.
//!
//! A token can spawn child tokens. Cancelling a token cancels every child,
//! while cancelling a child leaves its parent untouched. Session views hold
//! a child of the session token so tearing down one view aborts only the
//! requests it started.

use std::sync::Arc;

use futures::future::select_all;
use tokio::sync::watch;

/// Cooperative cancellation signal with parent/child propagation.
#[derive(Clone, Debug)]
pub struct CancelToken {
    own: Arc<watch::Sender<bool>>,
    /// Receivers for this token and every ancestor, root first.
    watched: Vec<watch::Receiver<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            own: Arc::new(tx),
            watched: vec![rx],
        }
    }

    /// Create a token that is cancelled whenever `self` is.
    pub fn child(&self) -> Self {
        let (tx, rx) = watch::channel(false);
        let mut watched = self.watched.clone();
        watched.push(rx);
        Self {
            own: Arc::new(tx),
            watched,
        }
    }

    /// Cancel this token and all of its children.
    pub fn cancel(&self) {
        self.own.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.watched.iter().any(|rx| *rx.borrow())
    }

    /// Resolve once this token or any ancestor is cancelled.
    pub async fn cancelled(&self) {
        let waits = self.watched.iter().map(|rx| {
            let mut rx = rx.clone();
            Box::pin(async move {
                let outcome = rx.wait_for(|cancelled| *cancelled).await.map(|_| ());
                if outcome.is_err() {
                    // Sender gone without cancelling; this ancestor never fires.
                    std::future::pending::<()>().await;
                }
            })
        });
        select_all(waits).await;
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}
