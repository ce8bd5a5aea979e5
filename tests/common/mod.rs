//! Integration test common infrastructure.
//!
//! Provides an in-memory server peer for driving a [`parley::Client`] and
//! asserting on the lines it writes.

pub mod server;

#[allow(unused_imports)]
pub use server::{MockServer, Session, config, connect};
