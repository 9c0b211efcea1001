//! Connection cache abstract Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::CachedConnection;

/// Durable list of connections to restore at startup
///
/// Platform implementation:
/// - `connhub-app`: `JsonConnectionCache` (JSON file)
#[async_trait]
pub trait ConnectionCache: Send + Sync {
    /// Load all cached connections, in the order they were saved
    async fn load(&self) -> CoreResult<Vec<CachedConnection>>;

    /// Replace the cached list
    ///
    /// # Arguments
    /// * `connections` - Connections to persist
    async fn save(&self, connections: &[CachedConnection]) -> CoreResult<()>;
}
