//! Connection manager
//!
//! Owns the connection list, restores it from the connection cache on first
//! access, and logs hosts in and out.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tokio::runtime::Handle;
use tokio::sync::watch;

use crate::error::{CoreError, CoreResult};
use crate::services::{ConnectionList, ServiceContext};
use crate::traits::ConnectionManagement;
use crate::types::{Connection, ConnectionEvent, HostAddress};

/// Outcome of the startup restoration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreSummary {
    /// Cached connections that logged in again
    pub restored: usize,
    /// Cached connections kept with a connection error
    pub failed: usize,
    /// Cached records dropped because their host was already restored
    pub skipped_duplicates: usize,
    /// Whether the cache itself could not be read
    pub cache_failed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadState {
    Uninitialized,
    Initializing,
    Ready,
}

/// Settles the loaded signal when dropped.
///
/// Owned by the restoration task, so the signal settles whether restoration
/// returns, panics, or is dropped by a shutting-down runtime.
struct LoadedGuard {
    state: Arc<Mutex<LoadState>>,
    loaded: Arc<watch::Sender<Option<RestoreSummary>>>,
    connections: ConnectionList,
    summary: RestoreSummary,
}

impl Drop for LoadedGuard {
    fn drop(&mut self) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = LoadState::Ready;
        self.loaded.send_replace(Some(self.summary));
        self.connections.publish(ConnectionEvent::Loaded);
    }
}

/// Process-wide manager of host connections
pub struct ConnectionManager {
    ctx: Arc<ServiceContext>,
    runtime: Handle,
    connections: ConnectionList,
    state: Arc<Mutex<LoadState>>,
    loaded: Arc<watch::Sender<Option<RestoreSummary>>>,
}

impl ConnectionManager {
    /// Create a connection manager whose restoration runs on `runtime`
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>, runtime: Handle) -> Self {
        let (loaded, _) = watch::channel(None);
        Self {
            ctx,
            runtime,
            connections: ConnectionList::new(),
            state: Arc::new(Mutex::new(LoadState::Uninitialized)),
            loaded: Arc::new(loaded),
        }
    }

    /// Create a connection manager bound to the runtime of the calling context
    pub fn with_current_runtime(ctx: Arc<ServiceContext>) -> CoreResult<Self> {
        let runtime = Handle::try_current().map_err(|_| CoreError::RuntimeUnavailable)?;
        Ok(Self::new(ctx, runtime))
    }

    /// Whether restoration has finished
    pub fn is_loaded(&self) -> bool {
        self.loaded.borrow().is_some()
    }

    /// Restoration outcome, once restoration has finished
    pub fn restore_summary(&self) -> Option<RestoreSummary> {
        *self.loaded.borrow()
    }

    /// Take the `Uninitialized -> Initializing` transition. Only one caller ever gets `true`.
    fn begin_restore(&self) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if *state == LoadState::Uninitialized {
            *state = LoadState::Initializing;
            true
        } else {
            false
        }
    }

    fn spawn_restore(&self) {
        let guard = LoadedGuard {
            state: Arc::clone(&self.state),
            loaded: Arc::clone(&self.loaded),
            connections: self.connections.clone(),
            summary: RestoreSummary::default(),
        };
        let ctx = Arc::clone(&self.ctx);
        let connections = self.connections.clone();
        self.runtime
            .spawn(async move { restore_connections(&ctx, &connections, guard).await });
    }
}

/// Restore every cached connection, one at a time, in cache order.
///
/// A failed cached login becomes a connection carrying the error. Only a
/// failure to read the cache itself stops restoration.
async fn restore_connections(
    ctx: &ServiceContext,
    connections: &ConnectionList,
    mut guard: LoadedGuard,
) {
    log::info!("Restoring cached connections");

    // 1. Load the cached connection list
    let cached = match ctx.connection_cache().load().await {
        Ok(cached) => cached,
        Err(e) => {
            guard.summary.cache_failed = true;
            let err = CoreError::CacheLoadFailed(e.to_string());
            ctx.error_reporter().report("Connection restoration aborted", &err);
            return;
        }
    };

    // 2. Log in to each host with its stored secret
    for record in cached {
        let host = record.host_address;
        if connections.contains(&host).await {
            log::warn!("Skipping duplicate cached connection for {host}");
            guard.summary.skipped_duplicates += 1;
            continue;
        }

        let secrets = ctx.secret_accessor(&host);
        let connection = match ctx.authenticator().login_from_cache(&host, &secrets).await {
            Ok(user) => {
                log::debug!("Restored connection to {host} as {}", user.login);
                guard.summary.restored += 1;
                Connection::logged_in(host, record.user_name, user)
            }
            Err(e) => {
                log::warn!("Failed to restore connection to {host}: {e}");
                guard.summary.failed += 1;
                Connection::failed(host, record.user_name, e)
            }
        };
        connections.insert_if_absent(connection).await;
    }

    log::info!(
        "Connection restoration complete: {} restored, {} failed",
        guard.summary.restored,
        guard.summary.failed
    );
}

#[async_trait]
impl ConnectionManagement for ConnectionManager {
    fn get_all_connections(&self) -> ConnectionList {
        if self.begin_restore() {
            self.spawn_restore();
        }
        self.connections.clone()
    }

    async fn get_loaded_connections(&self) -> ConnectionList {
        let connections = self.get_all_connections();
        let mut loaded = self.loaded.subscribe();
        if loaded.wait_for(Option::is_some).await.is_err() {
            // Only possible once the sender is gone, i.e. never while `self` is alive
            log::debug!("Loaded signal closed");
        }
        connections
    }

    async fn get_connection(&self, host: &HostAddress) -> Option<Connection> {
        self.get_loaded_connections().await.find(host).await
    }

    async fn log_in(
        &self,
        host: &HostAddress,
        user_name: &str,
        password: &str,
    ) -> CoreResult<Connection> {
        // 1. Wait for restoration and refuse a second connection to the host
        let connections = self.get_loaded_connections().await;
        if connections.contains(host).await {
            return Err(CoreError::AlreadyConnected(host.clone()));
        }

        // 2. Log in
        let secrets = self.ctx.secret_accessor(host);
        let user = self
            .ctx
            .authenticator()
            .login(host, &secrets, user_name, password)
            .await
            .map_err(|e| {
                if e.is_expected() {
                    log::warn!("Login to {host} as {user_name} rejected: {e}");
                } else {
                    log::error!("Login to {host} as {user_name} failed: {e}");
                }
                CoreError::LoginFailed(e)
            })?;

        // 3. Append, unless a concurrent login to the same host got there first
        let connection = Connection::logged_in(host.clone(), user_name, user);
        if !connections.insert_if_absent(connection.clone()).await {
            log::warn!("Discarding login to {host}: a connection was added concurrently");
            return Err(CoreError::AlreadyConnected(host.clone()));
        }

        log::info!("Logged in to {host} as {user_name}");
        Ok(connection)
    }

    async fn log_out(&self, host: &HostAddress) -> CoreResult<()> {
        // 1. Find the connection
        let connection = self
            .get_connection(host)
            .await
            .ok_or_else(|| CoreError::NotConnected(host.clone()))?;

        // 2. Log out remotely; keep the connection if that fails
        let secrets = self.ctx.secret_accessor(host);
        self.ctx
            .authenticator()
            .logout(host, &secrets)
            .await
            .map_err(|e| {
                log::error!("Logout from {host} failed: {e}");
                CoreError::LogoutFailed(e)
            })?;

        // 3. Drop it from the list, unless it was replaced while logging out
        if self.connections.remove_exact(&connection).await {
            log::info!("Logged out of {host} ({})", connection.user_name());
        } else {
            log::warn!(
                "Logged out of {host} ({}), but its connection had already been replaced",
                connection.user_name()
            );
        }
        Ok(())
    }
}
