//! chat-client
//!
//! Line-based terminal client for the chat relay:
//! - [`network`] : framed read/write halves over one TCP connection
//! - [`app`]     : handshake, receive loop, send loop, shutdown signal
//! - [`types`]   : client configuration

pub mod app;
pub mod network;
pub mod types;
