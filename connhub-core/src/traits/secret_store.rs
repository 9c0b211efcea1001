//! Secret storage abstract Trait

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::CoreResult;
use crate::types::{HostAddress, HostCredentials};

/// Secret Store Trait
///
/// Keyed by host address. Platform implementation:
/// - Desktop: `KeyringSecretStore` (keyring crate)
/// - Tests / headless: `InMemorySecretStore`
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Read the secret stored for a host
    ///
    /// # Returns
    /// * `Ok(Some(credentials))` - a secret is stored
    /// * `Ok(None)` - nothing is stored for the host
    async fn read(&self, host: &HostAddress) -> CoreResult<Option<HostCredentials>>;

    /// Store (or replace) the secret for a host
    async fn write(&self, host: &HostAddress, credentials: &HostCredentials) -> CoreResult<()>;

    /// Delete the secret for a host. Deleting a missing secret is not an error.
    async fn delete(&self, host: &HostAddress) -> CoreResult<()>;
}

/// In-memory secret store
#[derive(Clone, Default)]
pub struct InMemorySecretStore {
    secrets: Arc<RwLock<HashMap<HostAddress, HostCredentials>>>,
}

impl InMemorySecretStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SecretStore for InMemorySecretStore {
    async fn read(&self, host: &HostAddress) -> CoreResult<Option<HostCredentials>> {
        Ok(self.secrets.read().await.get(host).cloned())
    }

    async fn write(&self, host: &HostAddress, credentials: &HostCredentials) -> CoreResult<()> {
        self.secrets
            .write()
            .await
            .insert(host.clone(), credentials.clone());
        Ok(())
    }

    async fn delete(&self, host: &HostAddress) -> CoreResult<()> {
        self.secrets.write().await.remove(host);
        Ok(())
    }
}

/// Credential accessor bound to a single host.
///
/// Handed to the [`Authenticator`](super::Authenticator) so it can read and
/// update the secret for the host it is talking to, and nothing else.
#[derive(Clone)]
pub struct SecretAccessor {
    host: HostAddress,
    store: Arc<dyn SecretStore>,
}

impl SecretAccessor {
    pub fn new(host: HostAddress, store: Arc<dyn SecretStore>) -> Self {
        Self { host, store }
    }

    pub fn host(&self) -> &HostAddress {
        &self.host
    }

    pub async fn read(&self) -> CoreResult<Option<HostCredentials>> {
        self.store.read(&self.host).await
    }

    pub async fn write(&self, credentials: &HostCredentials) -> CoreResult<()> {
        self.store.write(&self.host, credentials).await
    }

    pub async fn delete(&self) -> CoreResult<()> {
        self.store.delete(&self.host).await
    }
}

impl std::fmt::Debug for SecretAccessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretAccessor")
            .field("host", &self.host)
            .finish_non_exhaustive()
    }
}
