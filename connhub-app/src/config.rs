//! Application configuration

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use connhub_core::error::{CoreError, CoreResult};

const APP_DIR: &str = "connhub";
const CACHE_FILE: &str = "connections.json";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    /// Where the connection cache is stored
    pub cache_path: PathBuf,
    /// Service name under which secrets are kept in the system keychain
    pub keyring_service: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            cache_path: base.join(APP_DIR).join(CACHE_FILE),
            keyring_service: APP_DIR.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file. Missing keys and a missing file use defaults.
    pub fn load(path: &Path) -> CoreResult<Self> {
        match std::fs::read_to_string(path) {
            Ok(json) => serde_json::from_str(&json)
                .map_err(|e| CoreError::SerializationError(format!("{}: {e}", path.display()))),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(CoreError::StorageError(format!("{}: {e}", path.display()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cache_path_is_under_app_dir() {
        let config = AppConfig::default();
        assert!(config.cache_path.ends_with("connhub/connections.json"));
        assert_eq!(config.keyring_service, "connhub");
    }

    #[test]
    fn missing_file_uses_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&tmp.path().join("config.json")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn partial_file_overrides_only_given_keys() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, r#"{ "cachePath": "/tmp/c.json" }"#).unwrap();

        let config = AppConfig::load(&path).unwrap();

        assert_eq!(config.cache_path, PathBuf::from("/tmp/c.json"));
        assert_eq!(config.keyring_service, "connhub");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, "[").unwrap();
        assert!(matches!(
            AppConfig::load(&path),
            Err(CoreError::SerializationError(_))
        ));
    }
}
