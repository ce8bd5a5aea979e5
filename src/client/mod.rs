//! Client - the connection manager.
//!
//! A [`Client`] owns the shared queues, the handler registry and the socket
//! write half, and runs three loops for the lifetime of one connection:
//!
//! ```text
//!   socket ──▶ reader ──parse──▶ EventQueue ──▶ dispatcher ──▶ handlers
//!                                                                 │
//!   socket ◀── writer ◀──flood window── WriteQueue ◀── write() ◀──┘
//! ```
//!
//! Clearing the shared `connected` flag stops all three. `connect` joins
//! them and only then closes the socket, so no handler ever writes into a
//! closed stream.

mod dispatch;
mod error_handling;
mod reader;
mod writer;

use futures_util::SinkExt;
use parking_lot::RwLock;
use parley_proto::{EventNames, LineCodec, ProtocolError};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::sync::OwnedMutexGuard;
use tokio::time::Instant;
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{Instrument, Span, debug, error, info, warn};

use crate::commands;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::handlers::{Handler, HandlerRegistry, install_defaults};
use crate::queue::{EventQueue, WriteQueue};
use crate::state::ConnectionState;
use crate::telemetry;

/// Upper bound on how long `quit` waits to get its line out.
pub const QUIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Upper bound on flushing buffered output when the connection closes.
pub const CLOSE_TIMEOUT: Duration = Duration::from_secs(2);

type BoxedRead = Box<dyn AsyncRead + Send + Unpin>;
type BoxedWrite = Box<dyn AsyncWrite + Send + Unpin>;
type LineSink = FramedWrite<BoxedWrite, LineCodec>;
type LineStream = FramedRead<BoxedRead, LineCodec>;

struct Shared {
    config: ClientConfig,
    state: ConnectionState,
    registry: HandlerRegistry,
    events: EventQueue,
    outgoing: WriteQueue,
    names: RwLock<EventNames>,
    /// Write half of the socket; the lock serializes every write.
    sink: tokio::sync::Mutex<Option<LineSink>>,
    /// Held by the task running the current connection until it has closed.
    running: Arc<tokio::sync::Mutex<()>>,
}

/// Handle to a client connection. Cheap to clone; all clones share state.
#[derive(Clone)]
pub struct Client {
    inner: Arc<Shared>,
}

/// Builder for [`Client`].
pub struct ClientBuilder {
    config: ClientConfig,
    names: EventNames,
    defaults: bool,
}

impl ClientBuilder {
    /// Skip registering the keep-alive, disconnect and CTCP handlers.
    pub fn without_default_handlers(mut self) -> Self {
        self.defaults = false;
        self
    }

    /// Use a custom event-type table.
    pub fn event_names(mut self, names: EventNames) -> Self {
        self.names = names;
        self
    }

    pub fn build(self) -> Client {
        if let Err(e) = self.config.validate() {
            warn!(error = %e, "building client from an invalid config");
        }
        let client = Client {
            inner: Arc::new(Shared {
                config: self.config,
                state: ConnectionState::new(),
                registry: HandlerRegistry::new(),
                events: EventQueue::new(),
                outgoing: WriteQueue::new(),
                names: RwLock::new(self.names),
                sink: tokio::sync::Mutex::new(None),
                running: Arc::new(tokio::sync::Mutex::new(())),
            }),
        };
        if self.defaults {
            install_defaults(&client);
        }
        client
    }
}

impl Client {
    /// Create a client with the default handlers installed.
    pub fn new(config: ClientConfig) -> Self {
        Self::builder(config).build()
    }

    pub fn builder(config: ClientConfig) -> ClientBuilder {
        ClientBuilder {
            config,
            names: EventNames::default(),
            defaults: true,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// The nickname this client registers with.
    pub fn nickname(&self) -> &str {
        &self.inner.config.identity.nick
    }

    pub fn is_connected(&self) -> bool {
        self.inner.state.is_connected()
    }

    pub(crate) fn state(&self) -> &ConnectionState {
        &self.inner.state
    }

    // ========================================================================
    // Connection lifecycle
    // ========================================================================

    /// Connect to the server named in the config, if any.
    pub async fn run(&self) -> Result<(), ClientError> {
        let server = self
            .inner
            .config
            .server
            .clone()
            .ok_or(ClientError::NoServerConfigured)?;
        self.connect(&server.host, server.port).await
    }

    /// Connect over TCP and run until the connection ends.
    pub async fn connect(&self, host: &str, port: u16) -> Result<(), ClientError> {
        let stream = TcpStream::connect((host, port)).await?;
        if let Err(e) = stream.set_nodelay(true) {
            debug!(error = %e, "could not set TCP_NODELAY");
        }
        info!(host, port, "TCP connected");
        self.connect_stream(stream).await
    }

    /// Register over an already established stream, run the reader, writer
    /// and dispatcher until the connection ends, then close the stream.
    pub async fn connect_stream<S>(&self, stream: S) -> Result<(), ClientError>
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let span = telemetry::connection(&self.inner.config.identity.nick);
        self.run_stream(stream).instrument(span).await
    }

    async fn run_stream<S>(&self, stream: S) -> Result<(), ClientError>
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        // One lifecycle at a time. A previous one that is already
        // disconnected but still closing its stream is waited for.
        let running = match self.inner.running.clone().try_lock_owned() {
            Ok(running) => running,
            Err(_) if self.is_connected() => return Err(ClientError::AlreadyConnected),
            Err(_) => self.inner.running.clone().lock_owned().await,
        };
        if !self.inner.state.connect() {
            return Err(ClientError::AlreadyConnected);
        }

        // If the caller drops this future the connection ends; the spawned
        // lifecycle still closes the stream once its loops have stopped.
        let _guard = DisconnectOnExit(&self.inner.state);
        let lifecycle =
            tokio::spawn(self.clone().lifecycle(stream, running).instrument(Span::current()));

        match lifecycle.await {
            Ok(result) => result,
            Err(e) => {
                error!(error = %e, "connection task ended abnormally");
                self.inner.state.disconnect();
                self.close().await;
                Ok(())
            }
        }
    }

    async fn lifecycle<S>(
        self,
        stream: S,
        _running: OwnedMutexGuard<()>,
    ) -> Result<(), ClientError>
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (read_half, write_half) = tokio::io::split(stream);
        let lines: LineStream = FramedRead::new(
            Box::new(read_half),
            LineCodec::with_max_len(self.inner.config.reader.max_line_len),
        );
        *self.inner.sink.lock().await =
            Some(FramedWrite::new(Box::new(write_half), LineCodec::new()));

        // Leftovers from an earlier lifecycle must not leak into this one.
        self.inner.events.clear();
        self.inner.outgoing.clear();

        if let Err(e) = self.register().await {
            warn!(error = %e, "registration failed");
            self.inner.state.disconnect();
            self.close().await;
            return Err(e.into());
        }

        let reader = tokio::spawn(
            reader::run(self.clone(), lines).instrument(telemetry::engine_loop("reader")),
        );
        let writer =
            tokio::spawn(writer::run(self.clone()).instrument(telemetry::engine_loop("writer")));
        let dispatcher = tokio::spawn(
            dispatch::run(self.clone()).instrument(telemetry::engine_loop("dispatcher")),
        );

        let (reader, writer, dispatcher) = tokio::join!(reader, writer, dispatcher);
        for (name, joined) in [
            ("reader", reader),
            ("writer", writer),
            ("dispatcher", dispatcher),
        ] {
            if let Err(e) = joined {
                error!(task = name, error = %e, "engine loop ended abnormally");
            }
        }

        self.inner.state.disconnect();
        self.close().await;
        info!("connection closed");
        Ok(())
    }

    async fn register(&self) -> Result<(), ProtocolError> {
        let identity = &self.inner.config.identity;
        if let Some(password) = &identity.password {
            self.send_now(commands::pass(password)).await?;
        }
        self.send_now(commands::nick(&identity.nick)).await?;
        self.send_now(commands::user(&identity.user, &identity.realname))
            .await?;
        Ok(())
    }

    /// Write one line immediately, bypassing the flood queue.
    ///
    /// Returns `Ok(false)` without writing once disconnected. A write stuck
    /// on a peer that stopped reading is abandoned when the connection ends.
    async fn send_now(&self, line: String) -> Result<bool, ProtocolError> {
        let state = &self.inner.state;
        let mut sink = tokio::select! {
            _ = state.disconnected() => return Ok(false),
            sink = self.inner.sink.lock() => sink,
        };
        let Some(sink) = sink.as_mut() else {
            return Ok(false);
        };
        if !state.is_connected() {
            return Ok(false);
        }
        debug!(line = %line, "send");
        tokio::select! {
            _ = state.disconnected() => {
                debug!("send abandoned on disconnect");
                Ok(false)
            }
            sent = sink.send(line) => sent.map(|()| true),
        }
    }

    /// Flush and shut down the write half. Only the first call does anything.
    ///
    /// A flush that cannot finish within [`CLOSE_TIMEOUT`] is abandoned and
    /// the stream dropped as is.
    async fn close(&self) {
        let sink = self.inner.sink.lock().await.take();
        if let Some(mut sink) = sink {
            match tokio::time::timeout(CLOSE_TIMEOUT, sink.close()).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => debug!(error = %e, "error closing stream"),
                Err(_) => debug!("timed out flushing stream, dropping it"),
            }
        }
    }

    /// Send `QUIT` right away and end the connection.
    ///
    /// Waits at most [`QUIT_TIMEOUT`] for the socket; the connection ends
    /// either way.
    pub async fn quit(&self, message: Option<&str>) {
        let line = commands::quit(message);
        let deadline = Instant::now() + QUIT_TIMEOUT;
        match tokio::time::timeout_at(deadline, self.inner.sink.lock()).await {
            Ok(mut sink) => {
                if let (true, Some(sink)) = (self.is_connected(), sink.as_mut()) {
                    debug!(line = %line, "send");
                    match tokio::time::timeout_at(deadline, sink.send(line)).await {
                        Ok(Ok(())) => {}
                        Ok(Err(e)) => warn!(error = %e, "failed to send QUIT"),
                        Err(_) => warn!("timed out sending QUIT"),
                    }
                }
                // Flip while still holding the write lock so nothing queued
                // behind us can reach the socket.
                self.inner.state.disconnect();
            }
            Err(_) => {
                warn!("socket busy, disconnecting without QUIT");
                self.inner.state.disconnect();
            }
        }
        info!("quit");
    }

    /// End the connection without sending anything.
    pub fn disconnect(&self) {
        if self.inner.state.disconnect() {
            info!("disconnecting");
        }
    }

    // ========================================================================
    // Outgoing
    // ========================================================================

    /// Queue a raw protocol line for the flood-controlled writer.
    ///
    /// Does nothing once disconnected. Anything after an embedded line
    /// ending is dropped, so one call is always exactly one line.
    pub fn write(&self, raw: impl Into<String>) -> bool {
        if !self.is_connected() {
            debug!("write while disconnected ignored");
            return false;
        }
        self.inner.outgoing.push(sanitize(raw.into()));
        true
    }

    /// Drop every queued outgoing line. Flood accounting is unchanged.
    pub fn interrupt(&self) -> usize {
        let dropped = self.inner.outgoing.clear();
        if dropped > 0 {
            info!(dropped, "write queue interrupted");
        }
        dropped
    }

    /// Lines waiting for the writer.
    pub fn pending_writes(&self) -> usize {
        self.inner.outgoing.len()
    }

    pub fn privmsg(&self, target: &str, text: &str) -> bool {
        self.write(commands::privmsg(target, text))
    }

    pub fn notice(&self, target: &str, text: &str) -> bool {
        self.write(commands::notice(target, text))
    }

    pub fn join(&self, channel: &str, key: Option<&str>) -> bool {
        self.write(commands::join(channel, key))
    }

    pub fn part(&self, channel: &str, reason: Option<&str>) -> bool {
        self.write(commands::part(channel, reason))
    }

    pub fn ctcp(&self, target: &str, command: &str, params: Option<&str>) -> bool {
        self.write(commands::ctcp(target, command, params))
    }

    pub fn ctcp_reply(&self, target: &str, command: &str, params: Option<&str>) -> bool {
        self.write(commands::ctcp_reply(target, command, params))
    }

    // ========================================================================
    // Handler registration
    // ========================================================================

    /// Append a handler for an event type.
    pub fn add_handler(&self, kind: &str, handler: Handler) {
        self.inner.registry.add(kind, handler);
    }

    /// Replace every handler for an event type with `handler`.
    pub fn replace_handlers(&self, kind: &str, handler: Handler) {
        self.inner.registry.replace(kind, handler);
    }

    /// Remove one registration of `handler` (compared by identity).
    pub fn delete_handler(&self, kind: &str, handler: &Handler) -> bool {
        self.inner.registry.remove(kind, handler)
    }

    pub fn clear_handlers(&self, kind: &str) -> usize {
        self.inner.registry.clear(kind)
    }

    /// Set the catch-all handler, run after type-specific handlers.
    pub fn set_generic_handler(&self, handler: Handler) -> Option<Handler> {
        self.inner.registry.set_generic(handler)
    }

    pub fn clear_generic_handler(&self) -> Option<Handler> {
        self.inner.registry.clear_generic()
    }

    pub fn handler_count(&self, kind: &str) -> usize {
        self.inner.registry.count(kind)
    }

    /// Adjust the event-type table used for lines read from now on.
    pub fn update_event_names<R>(&self, f: impl FnOnce(&mut EventNames) -> R) -> R {
        f(&mut self.inner.names.write())
    }
}

/// Cut a line at its first line ending.
fn sanitize(mut line: String) -> String {
    if let Some(pos) = line.find(['\r', '\n']) {
        line.truncate(pos);
    }
    line
}

/// Clears the connected flag when an engine loop exits, including by panic.
struct DisconnectOnExit<'a>(&'a ConnectionState);

impl Drop for DisconnectOnExit<'_> {
    fn drop(&mut self) {
        self.0.disconnect();
    }
}
