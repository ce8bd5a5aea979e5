//! # parley-proto
//!
//! Structural parsing of IRC protocol lines for the parley client engine.
//!
//! ## Features
//!
//! - Tokenizing `[:prefix ]<command>[ param]*[ :trailing]` lines into [`Event`]s
//! - A public, user-extensible table mapping raw command tokens to event-type
//!   names (`001` → `welcome`, CTCP payloads → `ctcp_<sub>`)
//! - CTCP quoting helpers
//! - Optional Tokio CRLF line codec
//!
//! ## Quick Start
//!
//! ```rust
//! use parley_proto::parse;
//!
//! let event = parse(":nick!u@h PRIVMSG #c :hello there friend").unwrap();
//! assert_eq!(event.command, "privmsg");
//! assert_eq!(event.origin.as_deref(), Some("nick!u@h"));
//! assert_eq!(event.params, vec!["#c", "hello there friend"]);
//! ```
//!
//! Nothing here interprets message semantics: numeric replies, mode strings
//! and the like are left to handlers.

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod ctcp;
pub mod error;
pub mod event;
#[cfg(feature = "tokio")]
pub mod line;
pub mod names;
pub mod parse;

pub use self::ctcp::Ctcp;
pub use self::error::{ParseError, ProtocolError};
pub use self::event::Event;
#[cfg(feature = "tokio")]
pub use self::line::LineCodec;
pub use self::names::EventNames;
pub use self::parse::{parse, parse_with};
