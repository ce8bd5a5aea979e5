//! The shared `connected` flag.
//!
//! Flipping it to `false` is the only shutdown signal the engine has. Loops
//! poll it between units of work and await [`ConnectionState::disconnected`]
//! in every suspension point, so a flip wakes whichever loop is parked.

use tokio::sync::watch;

/// Connection liveness shared by the client handle and its loops.
#[derive(Debug)]
pub struct ConnectionState {
    tx: watch::Sender<bool>,
}

impl Default for ConnectionState {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionState {
    /// Start out disconnected.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    #[inline]
    pub fn is_connected(&self) -> bool {
        *self.tx.borrow()
    }

    /// Mark the connection established. Returns `false` if it already was.
    pub fn connect(&self) -> bool {
        self.tx.send_if_modified(|connected| {
            if *connected {
                false
            } else {
                *connected = true;
                true
            }
        })
    }

    /// Mark the connection gone. Returns `true` only for the call that
    /// performed the transition.
    pub fn disconnect(&self) -> bool {
        self.tx.send_if_modified(|connected| {
            if *connected {
                *connected = false;
                true
            } else {
                false
            }
        })
    }

    /// Resolve once the flag is `false` (immediately if it already is).
    pub async fn disconnected(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so this cannot fail.
        let _ = rx.wait_for(|connected| !*connected).await;
    }
}
