//! Outgoing command formatting.
//!
//! Plain string builders; nothing here touches the connection. `Client`
//! wraps the common ones so handlers can write `client.privmsg(..)`.

use parley_proto::Ctcp;

pub fn pass(password: &str) -> String {
    format!("PASS {password}")
}

pub fn nick(nick: &str) -> String {
    format!("NICK {nick}")
}

pub fn user(user: &str, realname: &str) -> String {
    format!("USER {user} 0 * :{realname}")
}

pub fn pong(token: &str) -> String {
    format!("PONG :{token}")
}

pub fn privmsg(target: &str, text: &str) -> String {
    format!("PRIVMSG {target} :{text}")
}

pub fn notice(target: &str, text: &str) -> String {
    format!("NOTICE {target} :{text}")
}

pub fn join(channel: &str, key: Option<&str>) -> String {
    match key {
        Some(key) => format!("JOIN {channel} {key}"),
        None => format!("JOIN {channel}"),
    }
}

pub fn part(channel: &str, reason: Option<&str>) -> String {
    match reason {
        Some(reason) => format!("PART {channel} :{reason}"),
        None => format!("PART {channel}"),
    }
}

pub fn quit(message: Option<&str>) -> String {
    match message {
        Some(message) => format!("QUIT :{message}"),
        None => "QUIT".to_string(),
    }
}

/// CTCP request: a PRIVMSG carrying a quoted sub-command.
pub fn ctcp(target: &str, command: &str, params: Option<&str>) -> String {
    privmsg(target, &Ctcp::quote(command, params))
}

/// CTCP reply: a NOTICE carrying a quoted sub-command.
pub fn ctcp_reply(target: &str, command: &str, params: Option<&str>) -> String {
    notice(target, &Ctcp::quote(command, params))
}
