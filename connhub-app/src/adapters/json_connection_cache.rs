//! File-backed connection cache.
//!
//! Stores the connection list as JSON. Blocking file I/O runs on the
//! blocking thread pool.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use connhub_core::error::{CoreError, CoreResult};
use connhub_core::traits::ConnectionCache;
use connhub_core::types::CachedConnection;

/// On-disk layout
#[derive(Serialize, Deserialize, Default)]
struct CacheFile {
    connections: Vec<CachedConnection>,
}

/// JSON file connection cache.
///
/// A missing or empty file is an empty cache. Writes go to a temporary file
/// that is renamed over the cache, so readers never see a partial file.
#[derive(Debug, Clone)]
pub struct JsonConnectionCache {
    path: PathBuf,
}

impl JsonConnectionCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_sync(path: &Path) -> CoreResult<Vec<CachedConnection>> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(CoreError::StorageError(format!("{}: {e}", path.display()))),
        };
        if json.trim().is_empty() {
            return Ok(Vec::new());
        }
        let file: CacheFile = serde_json::from_str(&json)
            .map_err(|e| CoreError::SerializationError(format!("{}: {e}", path.display())))?;
        Ok(file.connections)
    }

    fn write_sync(path: &Path, connections: Vec<CachedConnection>) -> CoreResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| CoreError::StorageError(format!("{}: {e}", parent.display())))?;
        }
        let json = serde_json::to_string_pretty(&CacheFile { connections })
            .map_err(|e| CoreError::SerializationError(e.to_string()))?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .map_err(|e| CoreError::StorageError(format!("{}: {e}", tmp.display())))?;
        std::fs::rename(&tmp, path)
            .map_err(|e| CoreError::StorageError(format!("{}: {e}", path.display())))
    }
}

#[async_trait]
impl ConnectionCache for JsonConnectionCache {
    async fn load(&self) -> CoreResult<Vec<CachedConnection>> {
        let path = self.path.clone();
        let connections = tokio::task::spawn_blocking(move || Self::read_sync(&path))
            .await
            .map_err(|e| CoreError::StorageError(format!("Task join error: {e}")))??;
        log::debug!(
            "Loaded {} cached connections from {}",
            connections.len(),
            self.path.display()
        );
        Ok(connections)
    }

    async fn save(&self, connections: &[CachedConnection]) -> CoreResult<()> {
        let path = self.path.clone();
        let connections = connections.to_vec();
        let count = connections.len();
        tokio::task::spawn_blocking(move || Self::write_sync(&path, connections))
            .await
            .map_err(|e| CoreError::StorageError(format!("Task join error: {e}")))??;
        log::debug!("Saved {count} connections to {}", self.path.display());
        Ok(())
    }
}
