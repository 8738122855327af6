//! Classification of frames received by a session handler.
//!
//! Priority order:
//! 1. `/msg <target> <content>` private message
//! 2. frames tripping the [`ContentFilter`]
//! 3. everything else is broadcast verbatim

use crate::filter::ContentFilter;

/// Command token for private messages.
pub const PRIVATE_COMMAND: &str = "/msg";

/// What the relay should do with one inbound frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inbound<'a> {
    /// Deliver `content` to the session named `target` only.
    Private { target: &'a str, content: &'a str },
    /// `/msg` without a target or without content.
    MalformedPrivate,
    /// Frame contains a filtered word; reply to sender, do not broadcast.
    Filtered,
    /// Relay the frame to everyone except the sender.
    Broadcast,
}

/// Classify a single frame.
pub fn classify<'a>(frame: &'a str, filter: &ContentFilter) -> Inbound<'a> {
    if let Some(rest) = strip_private_command(frame) {
        return match split_target(rest) {
            Some((target, content)) => Inbound::Private { target, content },
            None => Inbound::MalformedPrivate,
        };
    }

    if filter.is_blocked(frame) {
        return Inbound::Filtered;
    }

    Inbound::Broadcast
}

/// Returns the text after `/msg` if the first whitespace-separated token
/// is exactly the command.
fn strip_private_command(frame: &str) -> Option<&str> {
    let rest = frame.strip_prefix(PRIVATE_COMMAND)?;
    match rest.chars().next() {
        None => Some(rest),
        Some(c) if c.is_whitespace() => Some(rest),
        Some(_) => None,
    }
}

/// Split `<target> <content>`. Only the one separator after the target
/// is consumed; content keeps all of its own spacing.
fn split_target(rest: &str) -> Option<(&str, &str)> {
    let rest = rest.trim_start();
    let (target, content) = rest.split_once(char::is_whitespace)?;
    if target.is_empty() || content.is_empty() {
        return None;
    }
    Some((target, content))
}
