//! Platform-agnostic storage adapters.

mod json_connection_cache;

#[cfg(feature = "keyring-store")]
mod keyring_secret_store;

pub use json_connection_cache::JsonConnectionCache;

#[cfg(feature = "keyring-store")]
pub use keyring_secret_store::KeyringSecretStore;
