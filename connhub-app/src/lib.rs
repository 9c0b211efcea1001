//! Platform-agnostic application bootstrap for connhub.
//!
//! Provides `AppState` (service container), `AppStateBuilder` (adapter injection),
//! and `AppConfig` (file locations and keychain naming).

pub mod adapters;
mod config;
mod sync;

use std::sync::{Arc, Mutex, PoisonError};

use tokio::runtime::Handle;

use connhub_core::error::{CoreError, CoreResult};
use connhub_core::services::{ConnectionManager, RestoreSummary, ServiceContext};
use connhub_core::traits::{
    Authenticator, ConnectionCache, ConnectionManagement, ErrorReporter, SecretStore,
};

pub use config::AppConfig;
pub use sync::CacheSync;

use adapters::JsonConnectionCache;

/// Platform-agnostic application state.
///
/// Holds the `ServiceContext` and the connection manager. Every frontend
/// constructs this once at startup via `AppStateBuilder`.
pub struct AppState {
    /// Service context (holds all adapters)
    pub ctx: Arc<ServiceContext>,
    /// Connection manager
    pub connection_manager: Arc<ConnectionManager>,
    runtime: Handle,
    cache_sync: Mutex<Option<CacheSync>>,
}

impl AppState {
    /// Run the startup sequence: restore connections, then keep the cache in sync.
    ///
    /// When the cache could not be read, syncing stays off so the unreadable
    /// file is never overwritten.
    pub async fn run_startup(&self) -> RestoreSummary {
        let connections = self.connection_manager.get_all_connections();
        let events = connections.subscribe();
        self.connection_manager.get_loaded_connections().await;
        let summary = self.connection_manager.restore_summary().unwrap_or_default();

        if summary.cache_failed {
            log::warn!(
                "Startup continuing without cached connections; cache persistence is disabled"
            );
            return summary;
        }
        log::info!(
            "Startup complete: {} connections restored, {} failed",
            summary.restored,
            summary.failed
        );

        let mut cache_sync = self
            .cache_sync
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if cache_sync.is_none() {
            *cache_sync = Some(CacheSync::spawn(
                connections,
                events,
                Arc::clone(self.ctx.connection_cache()),
                &self.runtime,
            ));
        }

        summary
    }

    /// Whether connection restoration has completed
    pub fn restore_completed(&self) -> bool {
        self.connection_manager.is_loaded()
    }
}

/// Builder for constructing `AppState` with platform-specific adapters.
///
/// # Required adapters
/// - `connection_cache`: where the connection list is persisted
/// - `secret_store`: where secrets are kept
/// - `authenticator`: how hosts are logged in to
///
/// # Optional
/// - `error_reporter`: defaults to `LogErrorReporter`
/// - `runtime`: defaults to the runtime `build()` is called from
pub struct AppStateBuilder {
    connection_cache: Option<Arc<dyn ConnectionCache>>,
    secret_store: Option<Arc<dyn SecretStore>>,
    authenticator: Option<Arc<dyn Authenticator>>,
    error_reporter: Option<Arc<dyn ErrorReporter>>,
    runtime: Option<Handle>,
}

impl AppStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            connection_cache: None,
            secret_store: None,
            authenticator: None,
            error_reporter: None,
            runtime: None,
        }
    }

    /// Pre-fill the adapters described by `config`.
    ///
    /// The connection cache is always the JSON file at `cache_path`. With the
    /// `keyring-store` feature the secret store is the system keychain.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        let builder =
            Self::new().connection_cache(Arc::new(JsonConnectionCache::new(&config.cache_path)));

        #[cfg(feature = "keyring-store")]
        let builder = builder.secret_store(Arc::new(adapters::KeyringSecretStore::new(
            config.keyring_service.clone(),
        )));

        builder
    }

    #[must_use]
    pub fn connection_cache(mut self, cache: Arc<dyn ConnectionCache>) -> Self {
        self.connection_cache = Some(cache);
        self
    }

    #[must_use]
    pub fn secret_store(mut self, store: Arc<dyn SecretStore>) -> Self {
        self.secret_store = Some(store);
        self
    }

    #[must_use]
    pub fn authenticator(mut self, authenticator: Arc<dyn Authenticator>) -> Self {
        self.authenticator = Some(authenticator);
        self
    }

    #[must_use]
    pub fn error_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.error_reporter = Some(reporter);
        self
    }

    #[must_use]
    pub fn runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Build the `AppState`.
    ///
    /// # Errors
    /// Returns `CoreError::ValidationError` if required adapters are missing,
    /// and `CoreError::RuntimeUnavailable` if no runtime was given and `build()`
    /// is not called from within one.
    pub fn build(self) -> CoreResult<AppState> {
        let connection_cache = self.connection_cache.ok_or_else(|| {
            CoreError::ValidationError("connection_cache is required".to_string())
        })?;
        let secret_store = self
            .secret_store
            .ok_or_else(|| CoreError::ValidationError("secret_store is required".to_string()))?;
        let authenticator = self
            .authenticator
            .ok_or_else(|| CoreError::ValidationError("authenticator is required".to_string()))?;
        let runtime = match self.runtime {
            Some(runtime) => runtime,
            None => Handle::try_current().map_err(|_| CoreError::RuntimeUnavailable)?,
        };

        let mut ctx = ServiceContext::new(connection_cache, secret_store, authenticator);
        if let Some(reporter) = self.error_reporter {
            ctx = ctx.with_error_reporter(reporter);
        }
        let ctx = Arc::new(ctx);

        let connection_manager = Arc::new(ConnectionManager::new(
            Arc::clone(&ctx),
            runtime.clone(),
        ));

        Ok(AppState {
            ctx,
            connection_manager,
            runtime,
            cache_sync: Mutex::new(None),
        })
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
