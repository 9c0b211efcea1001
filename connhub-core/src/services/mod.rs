//! Business logic service layer

mod connection_list;
mod connection_manager;
mod connection_manager_ext;

pub use connection_list::ConnectionList;
pub use connection_manager::{ConnectionManager, RestoreSummary};
pub use connection_manager_ext::ConnectionManagerExt;

use std::sync::Arc;

use crate::traits::{
    Authenticator, ConnectionCache, ErrorReporter, LogErrorReporter, SecretAccessor, SecretStore,
};
use crate::types::HostAddress;

/// Service context - holds all dependencies
///
/// The platform layer creates this context and injects its storage and
/// authentication implementations.
pub struct ServiceContext {
    connection_cache: Arc<dyn ConnectionCache>,
    secret_store: Arc<dyn SecretStore>,
    authenticator: Arc<dyn Authenticator>,
    error_reporter: Arc<dyn ErrorReporter>,
}

impl ServiceContext {
    /// Create a service context that reports background failures to the log
    #[must_use]
    pub fn new(
        connection_cache: Arc<dyn ConnectionCache>,
        secret_store: Arc<dyn SecretStore>,
        authenticator: Arc<dyn Authenticator>,
    ) -> Self {
        Self {
            connection_cache,
            secret_store,
            authenticator,
            error_reporter: Arc::new(LogErrorReporter),
        }
    }

    /// Replace the error reporter
    #[must_use]
    pub fn with_error_reporter(mut self, error_reporter: Arc<dyn ErrorReporter>) -> Self {
        self.error_reporter = error_reporter;
        self
    }

    pub fn connection_cache(&self) -> &Arc<dyn ConnectionCache> {
        &self.connection_cache
    }

    pub fn authenticator(&self) -> &Arc<dyn Authenticator> {
        &self.authenticator
    }

    pub fn error_reporter(&self) -> &Arc<dyn ErrorReporter> {
        &self.error_reporter
    }

    /// Credential accessor scoped to one host
    pub fn secret_accessor(&self, host: &HostAddress) -> SecretAccessor {
        SecretAccessor::new(host.clone(), Arc::clone(&self.secret_store))
    }
}
