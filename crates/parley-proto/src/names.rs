//! Event-type naming.
//!
//! Raw command tokens become handler lookup keys through this table:
//! named numerics (`001` → `welcome`), recognized CTCP sub-commands
//! (`PRIVMSG x :\x01PING 1\x01` → `ctcp_ping`), and everything else
//! lowercased. The table is plain data and callers may extend it.

use std::collections::{HashMap, HashSet};

use crate::ctcp::Ctcp;

/// Event-type prefix for CTCP requests carried in PRIVMSG.
pub const CTCP_PREFIX: &str = "ctcp_";
/// Event-type prefix for CTCP replies carried in NOTICE.
pub const CTCP_REPLY_PREFIX: &str = "ctcpreply_";

/// Numeric replies with well-known names (RFC 1459 / RFC 2812).
const NUMERICS: &[(&str, &str)] = &[
    ("001", "welcome"),
    ("002", "yourhost"),
    ("003", "created"),
    ("004", "myinfo"),
    ("005", "featurelist"),
    ("200", "tracelink"),
    ("201", "traceconnecting"),
    ("202", "tracehandshake"),
    ("203", "traceunknown"),
    ("204", "traceoperator"),
    ("205", "traceuser"),
    ("206", "traceserver"),
    ("208", "tracenewtype"),
    ("211", "statslinkinfo"),
    ("212", "statscommands"),
    ("219", "endofstats"),
    ("221", "umodeis"),
    ("242", "statsuptime"),
    ("243", "statsoline"),
    ("251", "luserclient"),
    ("252", "luserop"),
    ("253", "luserunknown"),
    ("254", "luserchannels"),
    ("255", "luserme"),
    ("256", "adminme"),
    ("257", "adminloc1"),
    ("258", "adminloc2"),
    ("259", "adminemail"),
    ("265", "n_local"),
    ("266", "n_global"),
    ("301", "away"),
    ("302", "userhost"),
    ("303", "ison"),
    ("305", "unaway"),
    ("306", "nowaway"),
    ("311", "whoisuser"),
    ("312", "whoisserver"),
    ("313", "whoisoperator"),
    ("314", "whowasuser"),
    ("315", "endofwho"),
    ("317", "whoisidle"),
    ("318", "endofwhois"),
    ("319", "whoischannels"),
    ("321", "liststart"),
    ("322", "list"),
    ("323", "listend"),
    ("324", "channelmodeis"),
    ("329", "channelcreate"),
    ("331", "notopic"),
    ("332", "currenttopic"),
    ("333", "topicinfo"),
    ("341", "inviting"),
    ("351", "version"),
    ("352", "whoreply"),
    ("353", "namreply"),
    ("364", "links"),
    ("365", "endoflinks"),
    ("366", "endofnames"),
    ("367", "banlist"),
    ("368", "endofbanlist"),
    ("369", "endofwhowas"),
    ("371", "info"),
    ("372", "motd"),
    ("374", "endofinfo"),
    ("375", "motdstart"),
    ("376", "endofmotd"),
    ("381", "youreoper"),
    ("391", "time"),
    ("401", "nosuchnick"),
    ("402", "nosuchserver"),
    ("403", "nosuchchannel"),
    ("404", "cannotsendtochan"),
    ("405", "toomanychannels"),
    ("406", "wasnosuchnick"),
    ("409", "noorigin"),
    ("411", "norecipient"),
    ("412", "notexttosend"),
    ("421", "unknowncommand"),
    ("422", "nomotd"),
    ("431", "nonicknamegiven"),
    ("432", "erroneusnickname"),
    ("433", "nicknameinuse"),
    ("436", "nickcollision"),
    ("437", "unavailresource"),
    ("441", "usernotinchannel"),
    ("442", "notonchannel"),
    ("443", "useronchannel"),
    ("451", "notregistered"),
    ("461", "needmoreparams"),
    ("462", "alreadyregistered"),
    ("464", "passwdmismatch"),
    ("465", "yourebannedcreep"),
    ("471", "channelisfull"),
    ("472", "unknownmode"),
    ("473", "inviteonlychan"),
    ("474", "bannedfromchan"),
    ("475", "badchannelkey"),
    ("477", "nochanmodes"),
    ("481", "noprivileges"),
    ("482", "chanoprivsneeded"),
    ("491", "nooperhost"),
    ("501", "umodeunknownflag"),
    ("502", "usersdontmatch"),
];

/// CTCP sub-commands that get their own event type by default.
const CTCP_COMMANDS: &[&str] = &[
    "action",
    "clientinfo",
    "dcc",
    "errmsg",
    "finger",
    "ping",
    "source",
    "time",
    "userinfo",
    "version",
];

/// Mapping from raw command tokens to event-type names.
#[derive(Clone, Debug)]
pub struct EventNames {
    numerics: HashMap<String, String>,
    ctcp: HashSet<String>,
}

impl Default for EventNames {
    fn default() -> Self {
        Self {
            numerics: NUMERICS
                .iter()
                .map(|(code, name)| ((*code).to_owned(), (*name).to_owned()))
                .collect(),
            ctcp: CTCP_COMMANDS.iter().map(|c| (*c).to_owned()).collect(),
        }
    }
}

impl EventNames {
    /// An empty table: every command is simply lowercased and no CTCP
    /// sub-command is recognized.
    pub fn empty() -> Self {
        Self {
            numerics: HashMap::new(),
            ctcp: HashSet::new(),
        }
    }

    /// Name a command token (usually a numeric). Returns the previous name.
    pub fn insert_numeric(
        &mut self,
        token: impl Into<String>,
        name: impl Into<String>,
    ) -> Option<String> {
        self.numerics.insert(token.into(), name.into().to_ascii_lowercase())
    }

    /// Recognize a CTCP sub-command so it gets its own `ctcp_<sub>` type.
    pub fn insert_ctcp(&mut self, command: &str) -> bool {
        self.ctcp.insert(command.to_ascii_lowercase())
    }

    /// Stop recognizing a CTCP sub-command.
    pub fn remove_ctcp(&mut self, command: &str) -> bool {
        self.ctcp.remove(&command.to_ascii_lowercase())
    }

    /// Whether a CTCP sub-command is recognized.
    pub fn is_ctcp(&self, command: &str) -> bool {
        self.ctcp.contains(&command.to_ascii_lowercase())
    }

    /// Look up the name for a raw command token, without CTCP handling.
    pub fn name_of(&self, token: &str) -> String {
        self.numerics
            .get(token)
            .cloned()
            .unwrap_or_else(|| token.to_ascii_lowercase())
    }

    /// Resolve the event type for a raw command and its params.
    ///
    /// A PRIVMSG or NOTICE whose last param is a recognized CTCP payload is
    /// rewritten to `ctcp_<sub>` / `ctcpreply_<sub>` with params
    /// `[target]` or `[target, args]`.
    pub fn resolve(&self, token: &str, params: Vec<String>) -> (String, Vec<String>) {
        let name = self.name_of(token);

        let prefix = match name.as_str() {
            "privmsg" => CTCP_PREFIX,
            "notice" => CTCP_REPLY_PREFIX,
            _ => return (name, params),
        };

        let ctcp = match params.as_slice() {
            [target, body] => Ctcp::parse(body).map(|ctcp| (target, ctcp)),
            _ => None,
        };

        match ctcp {
            Some((target, ctcp)) if self.is_ctcp(ctcp.command) => {
                let kind = format!("{prefix}{}", ctcp.command.to_ascii_lowercase());
                let mut rewritten = vec![target.clone()];
                rewritten.extend(ctcp.params.map(str::to_owned));
                (kind, rewritten)
            }
            _ => (name, params),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_numeric_lookup() {
        let names = EventNames::default();
        assert_eq!(names.name_of("001"), "welcome");
        assert_eq!(names.name_of("433"), "nicknameinuse");
        assert_eq!(names.name_of("999"), "999");
    }

    #[test]
    fn test_plain_commands_lowercased() {
        let names = EventNames::default();
        assert_eq!(names.name_of("PRIVMSG"), "privmsg");
        assert_eq!(names.name_of("Kick"), "kick");
    }

    #[test]
    fn test_ctcp_request_rewritten() {
        let names = EventNames::default();
        let (kind, params) = names.resolve("PRIVMSG", strings(&["bot", "\x01PING 42\x01"]));
        assert_eq!(kind, "ctcp_ping");
        assert_eq!(params, strings(&["bot", "42"]));
    }

    #[test]
    fn test_ctcp_reply_rewritten() {
        let names = EventNames::default();
        let (kind, params) = names.resolve("NOTICE", strings(&["bot", "\x01VERSION x 1.0\x01"]));
        assert_eq!(kind, "ctcpreply_version");
        assert_eq!(params, strings(&["bot", "x 1.0"]));
    }

    #[test]
    fn test_unrecognized_ctcp_left_alone() {
        let names = EventNames::default();
        let body = "\x01BOGUS\x01";
        let (kind, params) = names.resolve("PRIVMSG", strings(&["bot", body]));
        assert_eq!(kind, "privmsg");
        assert_eq!(params, strings(&["bot", body]));
    }

    #[test]
    fn test_user_extension() {
        let mut names = EventNames::default();
        names.insert_ctcp("BOGUS");
        names.insert_numeric("900", "LoggedIn");

        let (kind, params) = names.resolve("PRIVMSG", strings(&["bot", "\x01BOGUS\x01"]));
        assert_eq!(kind, "ctcp_bogus");
        assert_eq!(params, strings(&["bot"]));
        assert_eq!(names.name_of("900"), "loggedin");

        assert!(names.remove_ctcp("bogus"));
        assert!(!names.is_ctcp("BOGUS"));
    }

    #[test]
    fn test_empty_table() {
        let names = EventNames::empty();
        assert_eq!(names.name_of("001"), "001");
        let (kind, _) = names.resolve("PRIVMSG", strings(&["bot", "\x01PING 1\x01"]));
        assert_eq!(kind, "privmsg");
    }
}
