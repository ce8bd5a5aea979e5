//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use super::defaults::{
    default_clientinfo, default_ctcp_version, default_eof_backoff_ms, default_max_eof_retries,
    default_max_line_len, default_port, default_throughput, default_window_secs,
};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Who we register as.
    pub identity: IdentityConfig,
    /// Server to connect to. Without it the client is built but not connected.
    #[serde(default)]
    pub server: Option<ServerConfig>,
    /// Outgoing flood control.
    #[serde(default)]
    pub flood: FloodConfig,
    /// Socket read behavior.
    #[serde(default)]
    pub reader: ReaderConfig,
    /// Replies given by the default CTCP handlers.
    #[serde(default)]
    pub ctcp: CtcpConfig,
    /// Channels the demo binary joins after the welcome numeric.
    #[serde(default)]
    pub autojoin: Vec<AutojoinBlock>,
}

impl ClientConfig {
    /// Build a config in code with defaults for everything but the identity.
    pub fn new(
        nick: impl Into<String>,
        user: impl Into<String>,
        realname: impl Into<String>,
    ) -> Self {
        Self {
            identity: IdentityConfig {
                nick: nick.into(),
                user: user.into(),
                realname: realname.into(),
                password: None,
            },
            server: None,
            flood: FloodConfig::default(),
            reader: ReaderConfig::default(),
            ctcp: CtcpConfig::default(),
            autojoin: Vec::new(),
        }
    }

    /// Set the server password sent as `PASS` during registration.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.identity.password = Some(password.into());
        self
    }

    /// Set the server to connect to.
    pub fn with_server(mut self, host: impl Into<String>, port: u16) -> Self {
        self.server = Some(ServerConfig {
            host: host.into(),
            port,
        });
        self
    }

    /// Set the flood-control window.
    pub fn with_flood(mut self, throughput: u32, window_secs: u64) -> Self {
        self.flood = FloodConfig {
            throughput,
            window_secs,
        };
        self
    }

    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let nick = &self.identity.nick;
        if nick.is_empty() || nick.contains([' ', '\r', '\n']) {
            return Err(ConfigError::Invalid(format!("bad nickname {nick:?}")));
        }
        if self.identity.user.is_empty() || self.identity.user.contains(' ') {
            return Err(ConfigError::Invalid(format!(
                "bad username {:?}",
                self.identity.user
            )));
        }
        if self.flood.throughput == 0 {
            return Err(ConfigError::Invalid(
                "[flood].throughput must be at least 1".to_string(),
            ));
        }
        if self.flood.window_secs == 0 {
            return Err(ConfigError::Invalid(
                "[flood].window_secs must be at least 1".to_string(),
            ));
        }
        if self.reader.max_line_len < 512 {
            return Err(ConfigError::Invalid(
                "[reader].max_line_len must be at least 512".to_string(),
            ));
        }
        Ok(())
    }
}

/// Registration identity.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    /// Nickname sent with `NICK`.
    pub nick: String,
    /// Username (ident) sent with `USER`.
    pub user: String,
    /// Real name sent as the `USER` trailing parameter.
    pub realname: String,
    /// Optional server password sent with `PASS`.
    #[serde(default)]
    pub password: Option<String>,
}

/// Server address.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Hostname or IP address.
    pub host: String,
    /// TCP port (default: 6667).
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Outgoing flood control.
///
/// At most `throughput` lines are written per `window_secs` window.
#[derive(Debug, Clone, Deserialize)]
pub struct FloodConfig {
    /// Lines per window (default: 20).
    #[serde(default = "default_throughput")]
    pub throughput: u32,
    /// Window length in seconds (default: 20).
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

impl Default for FloodConfig {
    fn default() -> Self {
        Self {
            throughput: default_throughput(),
            window_secs: default_window_secs(),
        }
    }
}

impl FloodConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

/// Reader loop configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReaderConfig {
    /// Treat a read that blocks this long as a timed-out socket.
    /// Unset means reads never time out.
    #[serde(default)]
    pub read_timeout_secs: Option<u64>,
    /// Lines longer than this are discarded (default: 8191).
    #[serde(default = "default_max_line_len")]
    pub max_line_len: usize,
    /// Pause between reads after end-of-stream (default: 500).
    #[serde(default = "default_eof_backoff_ms")]
    pub eof_backoff_ms: u64,
    /// Consecutive end-of-stream reads tolerated before the connection is
    /// considered closed (default: 10).
    #[serde(default = "default_max_eof_retries")]
    pub max_eof_retries: u32,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            read_timeout_secs: None,
            max_line_len: default_max_line_len(),
            eof_backoff_ms: default_eof_backoff_ms(),
            max_eof_retries: default_max_eof_retries(),
        }
    }
}

impl ReaderConfig {
    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_secs.map(Duration::from_secs)
    }

    pub fn eof_backoff(&self) -> Duration {
        Duration::from_millis(self.eof_backoff_ms)
    }
}

/// CTCP reply configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CtcpConfig {
    /// CTCP VERSION reply.
    #[serde(default = "default_ctcp_version")]
    pub version: String,
    /// Sub-commands advertised in the CTCP CLIENTINFO reply.
    #[serde(default = "default_clientinfo")]
    pub clientinfo: Vec<String>,
}

impl Default for CtcpConfig {
    fn default() -> Self {
        Self {
            version: default_ctcp_version(),
            clientinfo: default_clientinfo(),
        }
    }
}

/// A channel to join once registered.
#[derive(Debug, Clone, Deserialize)]
pub struct AutojoinBlock {
    pub channel: String,
    #[serde(default)]
    pub key: Option<String>,
}
