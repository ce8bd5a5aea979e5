//! Dispatcher loop: event queue → handler tasks.
//!
//! Every event with at least one handler gets its own task, so a slow
//! handler never holds up unrelated event types. Events of the same type
//! are chained: each task waits for the previous task of its type to
//! finish before running, which keeps same-type handling in arrival order.

use futures_util::FutureExt;
use parley_proto::Event;
use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;
use tokio::task::{JoinError, JoinSet};
use tracing::{Instrument, debug, error, trace};

use super::{Client, DisconnectOnExit};
use crate::handlers::DispatchPlan;
use crate::telemetry;

pub(super) async fn run(client: Client) {
    let shared = &*client.inner;
    let _guard = DisconnectOnExit(&shared.state);

    let mut tasks = JoinSet::new();
    // Completion signal of the most recent task per event type.
    let mut tails: HashMap<String, oneshot::Receiver<()>> = HashMap::new();

    while shared.state.is_connected() {
        while let Some(joined) = tasks.try_join_next() {
            report(joined);
        }

        let Some(event) = shared.events.pop() else {
            tails.retain(|_, done| matches!(done.try_recv(), Err(TryRecvError::Empty)));
            tokio::select! {
                _ = shared.state.disconnected() => break,
                _ = shared.events.ready() => {}
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => report(joined),
            }
            continue;
        };

        let Some(plan) = shared.registry.plan(&event.command) else {
            trace!(kind = %event.command, "no handlers");
            continue;
        };

        let (done_tx, done_rx) = oneshot::channel();
        let previous = tails.insert(event.command.clone(), done_rx);
        let span = telemetry::dispatch(&event.command, event.origin.as_deref());
        tasks.spawn(
            dispatch_one(client.clone(), event, plan, previous, done_tx).instrument(span),
        );
    }

    if !tasks.is_empty() {
        debug!(in_flight = tasks.len(), "waiting for handlers");
    }
    while let Some(joined) = tasks.join_next().await {
        report(joined);
    }
    debug!("dispatcher stopped");
}

async fn dispatch_one(
    client: Client,
    event: Event,
    plan: DispatchPlan,
    previous: Option<oneshot::Receiver<()>>,
    done: oneshot::Sender<()>,
) {
    if let Some(previous) = previous {
        // A dropped sender still means the predecessor is finished.
        let _ = previous.await;
    }

    for handler in plan.iter() {
        let outcome = AssertUnwindSafe(handler.handle(&client, &event))
            .catch_unwind()
            .await;
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!(code = e.error_code(), error = %e, "handler failed"),
            Err(panic) => error!(panic = panic_message(&*panic), "handler panicked"),
        }
    }

    let _ = done.send(());
}

fn report(joined: Result<(), JoinError>) {
    if let Err(e) = joined {
        error!(error = %e, "dispatch task failed");
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}
