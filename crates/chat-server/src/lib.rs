//! chat-server
//!
//! Multi-client async TCP chat relay.

pub mod config;
pub mod registry;
pub mod server;
pub mod session;
pub mod types;

pub use config::Config;
pub use registry::{Registry, RegistryError};
pub use types::SessionId;
