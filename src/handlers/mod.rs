//! Event handlers.
//!
//! A handler is anything implementing [`EventHandler`]; plain closures of
//! shape `Fn(&Client, &Event) -> HandlerResult` qualify through a blanket
//! impl. Handlers are stored as `Arc<dyn EventHandler>` so the same value
//! can later be passed back to `Client::delete_handler` to remove it.

mod builtin;
mod registry;

pub use builtin::install_defaults;
pub use registry::{DispatchPlan, HandlerRegistry};

use async_trait::async_trait;
use parley_proto::Event;
use std::sync::Arc;

use crate::client::Client;
use crate::error::HandlerResult;

/// Something that reacts to events of one or more types.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, client: &Client, event: &Event) -> HandlerResult;
}

#[async_trait]
impl<F> EventHandler for F
where
    F: Fn(&Client, &Event) -> HandlerResult + Send + Sync,
{
    async fn handle(&self, client: &Client, event: &Event) -> HandlerResult {
        self(client, event)
    }
}

/// A registered handler. Identity (for removal) is the `Arc` allocation.
pub type Handler = Arc<dyn EventHandler>;

/// Wrap a closure as a [`Handler`].
///
/// ```no_run
/// use parley::{handler_fn, Client, ClientConfig};
///
/// let client = Client::new(ClientConfig::new("bot", "bot", "Bot"));
/// client.add_handler("join", handler_fn(|client, event| {
///     if let (Some(nick), Some(channel)) = (event.nick(), event.param(0)) {
///         client.privmsg(channel, &format!("hello {nick}"));
///     }
///     Ok(())
/// }));
/// ```
pub fn handler_fn<F>(f: F) -> Handler
where
    F: Fn(&Client, &Event) -> HandlerResult + Send + Sync + 'static,
{
    Arc::new(f)
}
