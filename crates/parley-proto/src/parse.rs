//! Tokenizing a raw protocol line into an [`Event`].
//!
//! Grammar: `[:prefix ]<command>[ param]*[ :trailing]`. The first param that
//! starts with `:` swallows the rest of the line, spaces included.

use std::str::FromStr;
use std::sync::OnceLock;

use crate::error::ParseError;
use crate::event::Event;
use crate::names::EventNames;

fn default_names() -> &'static EventNames {
    static NAMES: OnceLock<EventNames> = OnceLock::new();
    NAMES.get_or_init(EventNames::default)
}

/// Parse a line using the default event-type table.
///
/// The line must already be stripped of its terminator; a stray trailing
/// `\r` or `\n` is tolerated.
pub fn parse(line: &str) -> Result<Event, ParseError> {
    parse_with(line, default_names())
}

/// Parse a line, naming the event through `names`.
pub fn parse_with(line: &str, names: &EventNames) -> Result<Event, ParseError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Err(ParseError::EmptyMessage);
    }

    let (origin, rest) = match line.strip_prefix(':') {
        Some(prefixed) => match prefixed.split_once(' ') {
            Some((origin, rest)) => (Some(origin), rest.trim_start_matches(' ')),
            None => (Some(prefixed), ""),
        },
        None => (None, line),
    };

    let (command, param_string) = rest.split_once(' ').unwrap_or((rest, ""));
    if command.is_empty() {
        return Err(ParseError::MissingCommand {
            line: line.to_owned(),
        });
    }

    let (command, params) = names.resolve(command, split_params(param_string));

    Ok(Event {
        command,
        params,
        origin: origin.map(str::to_owned),
    })
}

/// Split the parameter section, honoring the trailing-parameter rule.
fn split_params(mut rest: &str) -> Vec<String> {
    let mut params = Vec::new();

    while !rest.is_empty() {
        if let Some(trailing) = rest.strip_prefix(':') {
            params.push(trailing.to_owned());
            break;
        }

        match rest.split_once(' ') {
            Some((token, tail)) => {
                if !token.is_empty() {
                    params.push(token.to_owned());
                }
                rest = tail;
            }
            None => {
                params.push(rest.to_owned());
                break;
            }
        }
    }

    params
}

impl FromStr for Event {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}
