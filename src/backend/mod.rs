pub mod client;
pub mod proto;
pub mod server;

pub use client::{BackendClient, BackendError};

/// Header carrying the shared secret on server-to-server calls
pub const INTERNAL_KEY_HEADER: &str = "x-internal-key";
