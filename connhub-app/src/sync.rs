//! Keeps the connection cache in step with the connection list.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::task::JoinHandle;

use connhub_core::services::ConnectionList;
use connhub_core::traits::ConnectionCache;
use connhub_core::types::{CachedConnection, ConnectionEvent};

/// Background task that saves the connection list after every add or remove.
///
/// The list is saved once on start, covering changes made between
/// subscribing and spawning. Save failures are logged and retried on the
/// next change. The task stops when this handle is dropped.
pub struct CacheSync {
    handle: JoinHandle<()>,
}

impl CacheSync {
    /// Spawn the task. `events` must come from `connections.subscribe()`.
    pub fn spawn(
        connections: ConnectionList,
        mut events: broadcast::Receiver<ConnectionEvent>,
        cache: Arc<dyn ConnectionCache>,
        runtime: &Handle,
    ) -> Self {
        let handle = runtime.spawn(async move {
            // Everything queued so far is covered by the first save
            while let Ok(_) | Err(TryRecvError::Lagged(_)) = events.try_recv() {}
            save(&connections, cache.as_ref()).await;

            loop {
                match events.recv().await {
                    Ok(ConnectionEvent::Added(_) | ConnectionEvent::Removed(_)) => {}
                    Ok(ConnectionEvent::Loaded) => continue,
                    Err(RecvError::Lagged(skipped)) => {
                        log::debug!("Cache sync lagged by {skipped} events, resaving");
                    }
                    Err(RecvError::Closed) => break,
                }
                save(&connections, cache.as_ref()).await;
            }
        });
        Self { handle }
    }
}

async fn save(connections: &ConnectionList, cache: &dyn ConnectionCache) {
    let records: Vec<CachedConnection> = connections
        .snapshot()
        .await
        .iter()
        .map(CachedConnection::from)
        .collect();
    if let Err(e) = cache.save(&records).await {
        log::error!("Failed to save connection cache: {e}");
    }
}

impl Drop for CacheSync {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
