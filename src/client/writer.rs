//! Writer loop: write queue → flood window → socket.

use tokio::time::Instant;
use tracing::{debug, trace, warn};

use super::{Client, DisconnectOnExit};
use crate::flood::FloodWindow;

pub(super) async fn run(client: Client) {
    let shared = &*client.inner;
    let _guard = DisconnectOnExit(&shared.state);

    let flood = &shared.config.flood;
    let mut window = FloodWindow::new(flood.throughput, flood.window(), Instant::now());

    while shared.state.is_connected() {
        window.roll(Instant::now());
        if !window.has_capacity() {
            trace!(sent = window.sent(), "flood window full");
            tokio::select! {
                _ = shared.state.disconnected() => break,
                _ = tokio::time::sleep_until(window.resets_at()) => continue,
            }
        }

        let Some(line) = shared.outgoing.pop() else {
            tokio::select! {
                _ = shared.state.disconnected() => break,
                _ = shared.outgoing.ready() => continue,
            }
        };

        match client.send_now(line).await {
            Ok(true) => window.record(),
            Ok(false) => break,
            Err(e) => {
                warn!(error = %e, "write failed");
                break;
            }
        }
    }

    let dropped = shared.outgoing.len();
    debug!(dropped, "writer stopped");
}
