//! CTCP (Client-to-Client Protocol) payloads.
//!
//! CTCP requests ride inside PRIVMSG bodies and replies inside NOTICE
//! bodies, wrapped in `\x01` delimiters:
//!
//! ```
//! use parley_proto::ctcp::Ctcp;
//!
//! let ctcp = Ctcp::parse("\x01PING 1700000000\x01").unwrap();
//! assert_eq!(ctcp.command, "PING");
//! assert_eq!(ctcp.params, Some("1700000000"));
//!
//! assert_eq!(Ctcp::quote("VERSION", Some("parley 0.1")), "\x01VERSION parley 0.1\x01");
//! ```
//!
//! # Reference
//! - <https://modern.ircdocs.horse/ctcp.html>

/// The CTCP delimiter character (`\x01`).
pub const CTCP_DELIM: char = '\x01';

/// A CTCP payload borrowed from a message body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ctcp<'a> {
    /// The sub-command as sent (case preserved).
    pub command: &'a str,
    /// Everything after the sub-command, if non-empty.
    pub params: Option<&'a str>,
}

impl<'a> Ctcp<'a> {
    /// Parse a CTCP payload from a PRIVMSG/NOTICE body.
    ///
    /// Returns `None` if the body does not start with the delimiter or carries
    /// no sub-command. A missing closing delimiter is tolerated.
    pub fn parse(text: &'a str) -> Option<Self> {
        let text = text.strip_prefix(CTCP_DELIM)?;
        let text = text.strip_suffix(CTCP_DELIM).unwrap_or(text);

        let (command, params) = match text.split_once(' ') {
            Some((command, params)) => (command, Some(params).filter(|p| !p.is_empty())),
            None => (text, None),
        };

        if command.is_empty() {
            return None;
        }

        Some(Self { command, params })
    }

    /// Check if a message body looks like a CTCP payload.
    #[inline]
    pub fn is_ctcp(text: &str) -> bool {
        text.starts_with(CTCP_DELIM)
    }

    /// Wrap a sub-command and optional argument string in delimiters.
    pub fn quote(command: &str, params: Option<&str>) -> String {
        match params {
            Some(params) => format!("{CTCP_DELIM}{command} {params}{CTCP_DELIM}"),
            None => format!("{CTCP_DELIM}{command}{CTCP_DELIM}"),
        }
    }
}
