//! Span constructors so every loop and dispatch logs under a consistent name.

use tracing::{Span, debug_span, info_span};

/// Span covering one connection lifecycle.
pub fn connection(nick: &str) -> Span {
    info_span!("connection", nick = %nick)
}

/// Span for one of the three engine loops.
pub fn engine_loop(name: &'static str) -> Span {
    debug_span!("loop", name)
}

/// Span for one event's dispatch task.
pub fn dispatch(kind: &str, origin: Option<&str>) -> Span {
    match origin {
        Some(origin) => debug_span!("dispatch", kind = %kind, origin = %origin),
        None => debug_span!("dispatch", kind = %kind),
    }
}
