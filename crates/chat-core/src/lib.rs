//! chat-core
//!
//! Pure chat relay semantics, shared by server and client:
//! - inbound frame routing (private message, filtered, broadcast)
//! - client-side command interpretation (`/quit`, `/help`, `/shout`)
//! - the content filter
//! - system notice texts

pub mod command;
pub mod filter;
pub mod notice;
pub mod routing;

pub use command::{interpret_input, ClientAction};
pub use filter::ContentFilter;
pub use routing::{classify, Inbound};
