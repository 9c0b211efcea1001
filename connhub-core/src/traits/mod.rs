//! Collaborator abstraction trait definition

mod authenticator;
mod connection_cache;
mod connection_management;
mod error_reporter;
mod secret_store;

pub use authenticator::Authenticator;
pub use connection_cache::ConnectionCache;
pub use connection_management::ConnectionManagement;
pub use error_reporter::{ErrorReporter, LogErrorReporter};
pub use secret_store::{InMemorySecretStore, SecretAccessor, SecretStore};
