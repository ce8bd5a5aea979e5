//! Default value functions for configuration.
//!
//! Separated into its own module for clarity and reuse.

// =============================================================================
// Server Defaults
// =============================================================================

pub fn default_port() -> u16 {
    6667
}

// =============================================================================
// Flood Control Defaults
// =============================================================================

pub fn default_throughput() -> u32 {
    20
}

pub fn default_window_secs() -> u64 {
    20
}

// =============================================================================
// Reader Defaults
// =============================================================================

pub fn default_max_line_len() -> usize {
    parley_proto::line::DEFAULT_MAX_LINE_LEN
}

pub fn default_eof_backoff_ms() -> u64 {
    500
}

pub fn default_max_eof_retries() -> u32 {
    10
}

// =============================================================================
// CTCP Defaults
// =============================================================================

pub fn default_ctcp_version() -> String {
    format!("parley {}", env!("CARGO_PKG_VERSION"))
}

pub fn default_clientinfo() -> Vec<String> {
    ["ACTION", "CLIENTINFO", "PING", "TIME", "VERSION"]
        .into_iter()
        .map(String::from)
        .collect()
}
