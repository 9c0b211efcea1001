//! connhub Core Library
//!
//! Manages authenticated connections to one or more remote hosts:
//! - Lazily restores previously cached connections on first access
//! - Logs hosts in and out through a pluggable authenticator
//! - Keeps one failed restoration from blocking the others
//!
//! Storage and the remote login exchange are abstracted through traits,
//! so the same manager runs against the system keychain, files, or mocks.

pub mod error;
pub mod services;
pub mod traits;
pub mod types;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{AuthError, CoreError, CoreResult};
pub use services::{ConnectionList, ConnectionManager, ConnectionManagerExt, ServiceContext};
pub use traits::{
    Authenticator, ConnectionCache, ConnectionManagement, ErrorReporter, SecretAccessor,
    SecretStore,
};
pub use types::{CachedConnection, Connection, HostAddress};
