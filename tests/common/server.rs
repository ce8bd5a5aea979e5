//! Mock server peer.
//!
//! The client side of a `tokio::io::duplex` pipe is handed to
//! `Client::connect_stream`; the test holds the other side and plays the
//! server by writing raw lines and reading what the client sends.

#![allow(dead_code)]

use parley::{Client, ClientConfig, ClientError};
use std::time::Duration;
use tokio::io::{
    AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, ReadHalf, WriteHalf,
};
use tokio::task::JoinHandle;
use tokio::time::timeout;

const DEFAULT_RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Config used by most tests: nick `bot`, fast end-of-stream handling.
pub fn config() -> ClientConfig {
    let mut config = ClientConfig::new("bot", "bot", "Bot");
    config.reader.eof_backoff_ms = 10;
    config.reader.max_eof_retries = 3;
    config
}

/// A running client and the server end of its connection.
pub struct Session {
    pub client: Client,
    pub server: MockServer,
    pub task: JoinHandle<Result<(), ClientError>>,
}

impl Session {
    /// Wait for the connection task to finish.
    pub async fn finished(self) -> Result<(), ClientError> {
        timeout(Duration::from_secs(5), self.task)
            .await
            .expect("connection did not end in time")
            .expect("connection task panicked")
    }
}

/// Start `client` over an in-memory stream and consume its registration.
pub async fn connect(client: Client) -> Session {
    let mut session = connect_raw(client);
    let nick = session.client.config().identity.nick.clone();
    session
        .server
        .expect_registration(&nick)
        .await
        .expect("registration");
    session
}

/// Start `client` without consuming anything.
pub fn connect_raw(client: Client) -> Session {
    connect_raw_with_capacity(client, 64 * 1024)
}

/// Start `client` over a pipe that buffers at most `capacity` bytes each
/// way. A server that stops reading makes the client's writes block.
pub fn connect_raw_with_capacity(client: Client, capacity: usize) -> Session {
    let (ours, theirs) = tokio::io::duplex(capacity);
    let task = tokio::spawn({
        let client = client.clone();
        async move { client.connect_stream(ours).await }
    });
    Session {
        client,
        server: MockServer::new(theirs),
        task,
    }
}

/// The server end of a client connection.
pub struct MockServer {
    reader: BufReader<ReadHalf<DuplexStream>>,
    writer: WriteHalf<DuplexStream>,
}

impl MockServer {
    fn new(stream: DuplexStream) -> Self {
        let (read_half, write_half) = tokio::io::split(stream);
        Self {
            reader: BufReader::new(read_half),
            writer: write_half,
        }
    }

    /// Send a raw line, adding the terminator if missing.
    pub async fn send_raw(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        if !line.ends_with("\r\n") {
            self.writer.write_all(b"\r\n").await?;
        }
        self.writer.flush().await?;
        Ok(())
    }

    /// Receive one line from the client.
    pub async fn recv(&mut self) -> anyhow::Result<String> {
        self.recv_timeout(DEFAULT_RECV_TIMEOUT).await
    }

    /// Receive one line, failing on timeout or end of stream.
    pub async fn recv_timeout(&mut self, dur: Duration) -> anyhow::Result<String> {
        let mut line = String::new();
        let read = timeout(dur, self.reader.read_line(&mut line)).await??;
        if read == 0 {
            anyhow::bail!("client closed the connection");
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Receive lines until one satisfies `predicate`, returning it.
    pub async fn recv_until<F>(&mut self, mut predicate: F) -> anyhow::Result<String>
    where
        F: FnMut(&str) -> bool,
    {
        loop {
            let line = self.recv().await?;
            if predicate(&line) {
                return Ok(line);
            }
        }
    }

    /// Consume `NICK` and `USER`, plus `PASS` if sent first.
    pub async fn expect_registration(&mut self, nick: &str) -> anyhow::Result<()> {
        let mut line = self.recv().await?;
        if line.starts_with("PASS ") {
            line = self.recv().await?;
        }
        anyhow::ensure!(line == format!("NICK {nick}"), "expected NICK, got {line:?}");
        let line = self.recv().await?;
        anyhow::ensure!(line.starts_with("USER "), "expected USER, got {line:?}");
        Ok(())
    }

    /// Assert the client closes its side without sending anything else.
    pub async fn expect_eof(&mut self) -> anyhow::Result<()> {
        let mut line = String::new();
        let read = timeout(DEFAULT_RECV_TIMEOUT, self.reader.read_line(&mut line)).await??;
        anyhow::ensure!(read == 0, "expected end of stream, got {line:?}");
        Ok(())
    }

    /// Read everything left until the client closes its side.
    pub async fn drain_until_eof(&mut self) -> anyhow::Result<Vec<String>> {
        let mut lines = Vec::new();
        loop {
            let mut line = String::new();
            let read = timeout(DEFAULT_RECV_TIMEOUT, self.reader.read_line(&mut line)).await??;
            if read == 0 {
                return Ok(lines);
            }
            lines.push(line.trim_end_matches(['\r', '\n']).to_string());
        }
    }

    /// Assert nothing arrives within `dur`.
    pub async fn expect_silence(&mut self, dur: Duration) -> anyhow::Result<()> {
        let mut line = String::new();
        match timeout(dur, self.reader.read_line(&mut line)).await {
            Err(_) => Ok(()),
            Ok(_) => anyhow::bail!("expected silence, got {line:?}"),
        }
    }

    /// Close the server's write side; the client sees end of stream.
    pub async fn hang_up(&mut self) -> anyhow::Result<()> {
        self.writer.shutdown().await?;
        Ok(())
    }
}
