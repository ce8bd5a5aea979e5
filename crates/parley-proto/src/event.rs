//! The structured form of one received protocol line.

use std::fmt;

/// One parsed protocol message.
///
/// `command` is the event-type name used for handler lookup: a lowercased
/// command token, a named numeric such as `welcome`, or a synthesized CTCP
/// type such as `ctcp_ping`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    /// Event-type name.
    pub command: String,
    /// Protocol arguments in order. The last one may contain spaces.
    pub params: Vec<String>,
    /// `nick!user@host` or server name prefix, if the line carried one.
    pub origin: Option<String>,
}

impl Event {
    /// Build an event without an origin.
    pub fn new<C, I, P>(command: C, params: I) -> Self
    where
        C: Into<String>,
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            command: command.into(),
            params: params.into_iter().map(Into::into).collect(),
            origin: None,
        }
    }

    /// Attach an origin prefix.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// The nickname part of the origin (everything before `!`).
    ///
    /// For server origins this is the whole server name.
    pub fn nick(&self) -> Option<&str> {
        self.origin
            .as_deref()
            .map(|o| o.split_once('!').map_or(o, |(nick, _)| nick))
    }

    /// The last parameter, if any.
    pub fn trailing(&self) -> Option<&str> {
        self.params.last().map(String::as_str)
    }

    /// Parameter at `index`, if present.
    pub fn param(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }
}

impl fmt::Display for Event {
    /// Re-serialize as a protocol line (without terminator).
    ///
    /// The last parameter gets a `:` when it would not otherwise survive
    /// tokenizing: it is empty, contains a space, or starts with `:`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(origin) = &self.origin {
            write!(f, ":{origin} ")?;
        }
        f.write_str(&self.command)?;

        if let Some((last, middle)) = self.params.split_last() {
            for param in middle {
                write!(f, " {param}")?;
            }
            if last.is_empty() || last.contains(' ') || last.starts_with(':') {
                write!(f, " :{last}")?;
            } else {
                write!(f, " {last}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nick_from_user_origin() {
        let event = Event::new("privmsg", ["#c", "hi"]).with_origin("alice!a@example.org");
        assert_eq!(event.nick(), Some("alice"));
    }

    #[test]
    fn test_nick_from_server_origin() {
        let event = Event::new("notice", ["*", "hi"]).with_origin("irc.example.net");
        assert_eq!(event.nick(), Some("irc.example.net"));
    }

    #[test]
    fn test_display_trailing_with_space() {
        let event = Event::new("privmsg", ["#c", "hello there"]).with_origin("n!u@h");
        assert_eq!(event.to_string(), ":n!u@h privmsg #c :hello there");
    }

    #[test]
    fn test_display_plain_params() {
        let event = Event::new("mode", ["#c", "+o", "bob"]);
        assert_eq!(event.to_string(), "mode #c +o bob");
    }

    #[test]
    fn test_display_empty_trailing() {
        let event = Event::new("topic", ["#c", ""]);
        assert_eq!(event.to_string(), "topic #c :");
    }

    #[test]
    fn test_accessors() {
        let event = Event::new("ping", ["server.example"]);
        assert_eq!(event.trailing(), Some("server.example"));
        assert_eq!(event.param(0), Some("server.example"));
        assert_eq!(event.param(1), None);
        assert_eq!(event.nick(), None);
    }
}
