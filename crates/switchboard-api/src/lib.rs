// switchboard-api: Async Rust client for the switch inventory northbound API

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::{BasicAuth, SwitchClient};
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
