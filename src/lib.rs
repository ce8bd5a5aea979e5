//! # parley
//!
//! An asynchronous IRC client connection engine.
//!
//! A [`Client`] connects to a server, registers, and then runs three loops
//! until the connection ends: a reader that parses incoming lines into
//! [`Event`]s, a dispatcher that hands each event to the handlers
//! registered for its type, and a flood-controlled writer for outgoing
//! lines. Handlers for the same event type run one at a time in arrival
//! order; different types run concurrently.
//!
//! ```no_run
//! use parley::{handler_fn, Client, ClientConfig};
//!
//! # async fn demo() -> Result<(), parley::ClientError> {
//! let config = ClientConfig::new("parley", "parley", "Parley Bot")
//!     .with_server("irc.example.net", 6667);
//! let client = Client::new(config);
//!
//! client.add_handler("welcome", handler_fn(|client, _| {
//!     client.join("#parley", None);
//!     Ok(())
//! }));
//!
//! client.run().await
//! # }
//! ```

pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod flood;
pub mod handlers;
pub mod queue;
pub mod state;
pub mod telemetry;

pub use client::{Client, ClientBuilder};
pub use config::ClientConfig;
pub use error::{ClientError, HandlerError, HandlerResult};
pub use handlers::{EventHandler, Handler, handler_fn};
pub use parley_proto::{Event, EventNames};
