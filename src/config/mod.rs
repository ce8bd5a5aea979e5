//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Config struct definitions and TOML loading
//! - [`defaults`]: serde default value functions

mod defaults;
mod types;

pub use types::{
    AutojoinBlock, ClientConfig, ConfigError, CtcpConfig, FloodConfig, IdentityConfig,
    ReaderConfig, ServerConfig,
};
