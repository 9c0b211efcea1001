//! Keyring-based secret store.
//!
//! Uses the system keychain (macOS Keychain, Windows Credential Manager,
//! Linux Secret Service) via the `keyring` crate. One keychain entry per
//! host, holding the `HostCredentials` as JSON.

use async_trait::async_trait;
use keyring::Entry;

use connhub_core::error::{CoreError, CoreResult};
use connhub_core::traits::SecretStore;
use connhub_core::types::{HostAddress, HostCredentials};

pub const DEFAULT_SERVICE_NAME: &str = "connhub";

/// Keyring-based secret store.
pub struct KeyringSecretStore {
    service: String,
}

impl KeyringSecretStore {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn get_entry(service: &str, host: &str) -> CoreResult<Entry> {
        Entry::new(service, host).map_err(|e| CoreError::CredentialError(e.to_string()))
    }

    fn read_sync(service: &str, host: &str) -> CoreResult<Option<HostCredentials>> {
        let entry = Self::get_entry(service, host)?;
        let json = match entry.get_password() {
            Ok(json) => json,
            Err(keyring::Error::NoEntry) => return Ok(None),
            Err(e) => return Err(CoreError::CredentialError(e.to_string())),
        };
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| CoreError::SerializationError(e.to_string()))
    }

    fn write_sync(service: &str, host: &str, credentials: &HostCredentials) -> CoreResult<()> {
        let json = serde_json::to_string(credentials)
            .map_err(|e| CoreError::SerializationError(e.to_string()))?;
        Self::get_entry(service, host)?
            .set_password(&json)
            .map_err(|e| CoreError::CredentialError(e.to_string()))
    }

    fn delete_sync(service: &str, host: &str) -> CoreResult<()> {
        match Self::get_entry(service, host)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(CoreError::CredentialError(e.to_string())),
        }
    }
}

impl Default for KeyringSecretStore {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICE_NAME)
    }
}

#[async_trait]
impl SecretStore for KeyringSecretStore {
    async fn read(&self, host: &HostAddress) -> CoreResult<Option<HostCredentials>> {
        let service = self.service.clone();
        let key = host.to_string();
        tokio::task::spawn_blocking(move || {
            log::debug!("Reading secret for {key} from Keychain");
            Self::read_sync(&service, &key)
        })
        .await
        .map_err(|e| CoreError::CredentialError(format!("Task join error: {e}")))?
    }

    async fn write(&self, host: &HostAddress, credentials: &HostCredentials) -> CoreResult<()> {
        let service = self.service.clone();
        let key = host.to_string();
        let credentials = credentials.clone();
        tokio::task::spawn_blocking(move || Self::write_sync(&service, &key, &credentials))
            .await
            .map_err(|e| CoreError::CredentialError(format!("Task join error: {e}")))??;
        log::info!("Secret saved for host: {host}");
        Ok(())
    }

    async fn delete(&self, host: &HostAddress) -> CoreResult<()> {
        let service = self.service.clone();
        let key = host.to_string();
        tokio::task::spawn_blocking(move || Self::delete_sync(&service, &key))
            .await
            .map_err(|e| CoreError::CredentialError(format!("Task join error: {e}")))??;
        log::info!("Secret deleted for host: {host}");
        Ok(())
    }
}
