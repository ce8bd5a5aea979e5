//! Reader loop: socket lines → parsed events → event queue.

use futures_util::StreamExt;
use parley_proto::{ParseError, ProtocolError, parse_with};
use std::time::Duration;
use tracing::{debug, info, trace, warn};

use super::error_handling::{ReadErrorAction, classify_read_error};
use super::{Client, DisconnectOnExit, LineStream, Shared};

enum ReadOutcome {
    Line(String),
    Eof,
    Failed(ProtocolError),
    TimedOut,
}

async fn read_next(lines: &mut LineStream, timeout: Option<Duration>) -> ReadOutcome {
    let next = match timeout {
        Some(limit) => match tokio::time::timeout(limit, lines.next()).await {
            Ok(next) => next,
            Err(_) => return ReadOutcome::TimedOut,
        },
        None => lines.next().await,
    };
    match next {
        Some(Ok(line)) => ReadOutcome::Line(line),
        Some(Err(e)) => ReadOutcome::Failed(e),
        None => ReadOutcome::Eof,
    }
}

pub(super) async fn run(client: Client, mut lines: LineStream) {
    let shared = &*client.inner;
    let _guard = DisconnectOnExit(&shared.state);

    let reader = &shared.config.reader;
    let timeout = reader.read_timeout();
    let backoff = reader.eof_backoff();
    let max_eof = reader.max_eof_retries;

    let mut eofs = 0u32;
    // The framed stream reports end-of-stream once after a failed read.
    let mut after_error = false;

    while shared.state.is_connected() {
        let outcome = tokio::select! {
            _ = shared.state.disconnected() => break,
            outcome = read_next(&mut lines, timeout) => outcome,
        };

        match outcome {
            ReadOutcome::Line(line) => {
                eofs = 0;
                after_error = false;
                enqueue(shared, &line);
            }
            ReadOutcome::Eof if after_error => after_error = false,
            ReadOutcome::Eof => {
                eofs += 1;
                if eofs >= max_eof {
                    info!(attempts = eofs, "connection closed by peer");
                    break;
                }
                debug!(attempt = eofs, "end of stream, retrying");
                tokio::select! {
                    _ = shared.state.disconnected() => break,
                    _ = tokio::time::sleep(backoff) => {}
                }
            }
            ReadOutcome::Failed(e) => {
                let action = e
                    .io_kind()
                    .map_or(ReadErrorAction::Fatal, classify_read_error);
                match action {
                    ReadErrorAction::Fatal => {
                        warn!(error = %e, "read failed");
                        break;
                    }
                    ReadErrorAction::Transient => {
                        debug!(error = %e, "transient read error");
                        after_error = true;
                    }
                }
            }
            ReadOutcome::TimedOut => {
                warn!("read timed out");
                break;
            }
        }
    }
    debug!("reader stopped");
}

/// Parse one line and queue the event. Malformed lines are dropped.
fn enqueue(shared: &Shared, line: &str) {
    trace!(line, "recv");
    let parsed = parse_with(line, &shared.names.read());
    match parsed {
        Ok(event) => shared.events.push(event),
        Err(ParseError::EmptyMessage) => trace!("skipping empty line"),
        Err(e) => warn!(error = %e, "dropping malformed line"),
    }
}
