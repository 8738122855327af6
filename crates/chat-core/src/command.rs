//! Local interpretation of lines typed into the client.

use crate::routing::PRIVATE_COMMAND;

pub const QUIT: &str = "/quit";
pub const HELP: &str = "/help";
pub const SHOUT_PREFIX: &str = "/shout ";
pub const SHOUT_SUFFIX: &str = "!! 🔊";

pub const HELP_TEXT: &str = "Commands: /quit, /help, /shout <text>, /msg <user> <text>";

/// Result of interpreting one line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientAction {
    /// Close the connection and stop sending.
    Quit,
    /// Print [`HELP_TEXT`] locally; nothing is sent.
    Help,
    /// Send this frame to the relay.
    Send(String),
}

/// Interpret a line typed by `username`.
///
/// `/quit` and `/help` only match exactly. `/msg ...` goes to the relay
/// untouched so it can resolve the target; anything else is prefixed
/// with `"<username>: "`.
pub fn interpret_input(line: &str, username: &str) -> ClientAction {
    match line {
        QUIT => return ClientAction::Quit,
        HELP => return ClientAction::Help,
        _ => {}
    }

    if let Some(text) = line.strip_prefix(SHOUT_PREFIX) {
        return ClientAction::Send(format!("{}: {}", username, shout(text)));
    }

    if is_private_command(line) {
        return ClientAction::Send(line.to_string());
    }

    ClientAction::Send(format!("{}: {}", username, line))
}

/// `"go team"` -> `"GO TEAM!! 🔊"`.
pub fn shout(text: &str) -> String {
    let mut out = text.to_uppercase();
    out.push_str(SHOUT_SUFFIX);
    out
}

fn is_private_command(line: &str) -> bool {
    line.split_whitespace().next() == Some(PRIVATE_COMMAND)
}
