//! Session-expiry signalling between the HTTP client and the session layer.
//!
//! The client only knows that a request came back 401. It reports that to an
//! [`ExpiryHandler`] and moves on. [`ExpiryGate`] is the handler used in
//! practice: it collapses any number of reports into a single pending signal
//! that the session manager consumes once.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use log::{debug, info};
use tokio::sync::Notify;

/// Receives "the remote side rejected our session" reports.
///
/// Called synchronously from inside the request path, so implementations
/// must not block.
pub trait ExpiryHandler: Send + Sync + fmt::Debug {
    fn session_expired(&self);
}

#[derive(Debug, Default)]
pub struct ExpiryGate {
    pending: AtomicBool,
    reports: AtomicUsize,
    notify: Notify,
}

impl ExpiryGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Total number of reports received, including collapsed ones.
    pub fn report_count(&self) -> usize {
        self.reports.load(Ordering::Relaxed)
    }

    /// Re-arm the gate once the expiry has been dealt with.
    pub fn reset(&self) {
        if self.pending.swap(false, Ordering::AcqRel) {
            debug!("[ExpiryGate] Cleared pending expiry");
        }
    }

    /// Resolve once an expiry is pending.
    pub async fn wait(&self) {
        loop {
            let notified = self.notify.notified();
            if self.is_pending() {
                return;
            }
            notified.await;
        }
    }
}

impl ExpiryHandler for ExpiryGate {
    fn session_expired(&self) {
        self.reports.fetch_add(1, Ordering::Relaxed);
        if !self.pending.swap(true, Ordering::AcqRel) {
            info!("[ExpiryGate] Session rejected by server");
            self.notify.notify_one();
        }
    }
}
