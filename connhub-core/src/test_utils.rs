//! Test helper module
//!
//! Provides mock collaborators and convenient factory methods.

#![allow(clippy::unwrap_used, clippy::panic)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::watch;

use crate::error::{AuthError, CoreError, CoreResult};
use crate::services::{ConnectionManager, ServiceContext};
use crate::traits::{
    Authenticator, ConnectionCache, ErrorReporter, InMemorySecretStore, SecretAccessor,
};
use crate::types::{CachedConnection, HostAddress, HostCredentials, UserIdentity};

// ===== MockConnectionCache =====

pub struct MockConnectionCache {
    records: Vec<CachedConnection>,
    /// If Some, load returns this error
    load_error: Option<String>,
    /// load blocks until this is true
    gate: watch::Sender<bool>,
    load_calls: AtomicUsize,
}

impl MockConnectionCache {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    pub fn with_records(records: Vec<CachedConnection>) -> Self {
        let (gate, _) = watch::channel(true);
        Self {
            records,
            load_error: None,
            gate,
            load_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_load_error(mut self, msg: &str) -> Self {
        self.load_error = Some(msg.to_string());
        self
    }

    /// Hold `load` open until `open_gate` is called
    pub fn gated(self) -> Self {
        self.gate.send_replace(false);
        self
    }

    pub fn open_gate(&self) {
        self.gate.send_replace(true);
    }

    pub fn load_calls(&self) -> usize {
        self.load_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConnectionCache for MockConnectionCache {
    async fn load(&self) -> CoreResult<Vec<CachedConnection>> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        let mut gate = self.gate.subscribe();
        let _ = gate.wait_for(|open| *open).await;
        if let Some(ref msg) = self.load_error {
            return Err(CoreError::StorageError(msg.clone()));
        }
        Ok(self.records.clone())
    }

    async fn save(&self, _connections: &[CachedConnection]) -> CoreResult<()> {
        Ok(())
    }
}

// ===== MockAuthenticator =====

#[derive(Default)]
pub struct MockAuthenticator {
    login_failures: HashMap<HostAddress, AuthError>,
    cached_failures: HashMap<HostAddress, AuthError>,
    logout_failures: HashMap<HostAddress, AuthError>,
    cached_panics: HashSet<HostAddress>,
    /// The first logout call blocks until this is true
    first_logout_gate: Option<watch::Sender<bool>>,
    login_calls: AtomicUsize,
    login_from_cache_calls: AtomicUsize,
    logout_calls: AtomicUsize,
}

impl MockAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_login_failure(mut self, host: &HostAddress, err: AuthError) -> Self {
        self.login_failures.insert(host.clone(), err);
        self
    }

    pub fn with_cached_failure(mut self, host: &HostAddress, err: AuthError) -> Self {
        self.cached_failures.insert(host.clone(), err);
        self
    }

    pub fn with_logout_failure(mut self, host: &HostAddress, err: AuthError) -> Self {
        self.logout_failures.insert(host.clone(), err);
        self
    }

    /// Panic inside `login_from_cache` for the host
    pub fn with_cached_panic(mut self, host: &HostAddress) -> Self {
        self.cached_panics.insert(host.clone());
        self
    }

    /// Hold the first `logout` call open until `release_first_logout` is called
    pub fn with_first_logout_gated(mut self) -> Self {
        self.first_logout_gate = Some(watch::channel(false).0);
        self
    }

    pub fn release_first_logout(&self) {
        if let Some(gate) = &self.first_logout_gate {
            gate.send_replace(true);
        }
    }

    pub fn login_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    pub fn login_from_cache_calls(&self) -> usize {
        self.login_from_cache_calls.load(Ordering::SeqCst)
    }

    pub fn logout_calls(&self) -> usize {
        self.logout_calls.load(Ordering::SeqCst)
    }
}

fn identity(login: &str, id: usize) -> UserIdentity {
    UserIdentity {
        login: login.to_string(),
        id: id as u64,
        name: None,
        email: None,
        avatar_url: None,
    }
}

fn secret_store_error(host: &HostAddress, e: &CoreError) -> AuthError {
    AuthError::SecretStore {
        host: host.host().to_string(),
        detail: e.to_string(),
    }
}

#[async_trait]
impl Authenticator for MockAuthenticator {
    async fn login(
        &self,
        host: &HostAddress,
        secrets: &SecretAccessor,
        user_name: &str,
        password: &str,
    ) -> Result<UserIdentity, AuthError> {
        let id = self.login_calls.fetch_add(1, Ordering::SeqCst);
        // Give concurrent callers a chance to interleave
        tokio::task::yield_now().await;
        if let Some(err) = self.login_failures.get(host) {
            return Err(err.clone());
        }
        secrets
            .write(&HostCredentials {
                user_name: user_name.to_string(),
                secret: password.to_string(),
            })
            .await
            .map_err(|e| secret_store_error(host, &e))?;
        Ok(identity(user_name, id))
    }

    async fn login_from_cache(
        &self,
        host: &HostAddress,
        _secrets: &SecretAccessor,
    ) -> Result<UserIdentity, AuthError> {
        let id = self.login_from_cache_calls.fetch_add(1, Ordering::SeqCst);
        if self.cached_panics.contains(host) {
            panic!("login_from_cache panicked for {host}");
        }
        if let Some(err) = self.cached_failures.get(host) {
            return Err(err.clone());
        }
        Ok(identity(&format!("user@{}", host.host()), id))
    }

    async fn logout(&self, host: &HostAddress, secrets: &SecretAccessor) -> Result<(), AuthError> {
        let call = self.logout_calls.fetch_add(1, Ordering::SeqCst);
        if let (0, Some(gate)) = (call, &self.first_logout_gate) {
            let _ = gate.subscribe().wait_for(|open| *open).await;
        }
        if let Some(err) = self.logout_failures.get(host) {
            return Err(err.clone());
        }
        secrets
            .delete()
            .await
            .map_err(|e| secret_store_error(host, &e))
    }
}

// ===== RecordingErrorReporter =====

#[derive(Default)]
pub struct RecordingErrorReporter {
    reports: Mutex<Vec<String>>,
}

impl RecordingErrorReporter {
    pub fn reports(&self) -> Vec<String> {
        self.reports.lock().unwrap().clone()
    }
}

impl ErrorReporter for RecordingErrorReporter {
    fn report(&self, context: &str, error: &CoreError) {
        self.reports
            .lock()
            .unwrap()
            .push(format!("{context}: {error}"));
    }
}

// ===== Factory methods =====

pub struct TestManager {
    pub manager: ConnectionManager,
    pub cache: Arc<MockConnectionCache>,
    pub auth: Arc<MockAuthenticator>,
    pub secrets: Arc<InMemorySecretStore>,
    pub reporter: Arc<RecordingErrorReporter>,
}

/// Create a `ConnectionManager` for tests. Must be called inside a tokio runtime.
pub fn create_test_manager(cache: MockConnectionCache, auth: MockAuthenticator) -> TestManager {
    let cache = Arc::new(cache);
    let auth = Arc::new(auth);
    let secrets = Arc::new(InMemorySecretStore::new());
    let reporter = Arc::new(RecordingErrorReporter::default());

    let ctx = ServiceContext::new(cache.clone(), secrets.clone(), auth.clone())
        .with_error_reporter(reporter.clone());
    let manager = ConnectionManager::with_current_runtime(Arc::new(ctx)).unwrap();

    TestManager {
        manager,
        cache,
        auth,
        secrets,
        reporter,
    }
}

pub fn host(url: &str) -> HostAddress {
    HostAddress::create(url).unwrap()
}

pub fn invalid_credentials(host: &HostAddress) -> AuthError {
    AuthError::InvalidCredentials {
        host: host.host().to_string(),
        raw_message: Some("Bad credentials".to_string()),
    }
}
