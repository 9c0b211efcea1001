//! Shared, observable list of connections

use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};

use crate::types::{Connection, ConnectionEvent, HostAddress};

const EVENT_CAPACITY: usize = 64;

/// Live view of the connection manager's connections.
///
/// Cloning yields another handle to the same list. Only the connection
/// manager mutates it; everyone else reads snapshots or subscribes to
/// [`ConnectionEvent`]s. At most one connection per host is ever held.
#[derive(Clone)]
pub struct ConnectionList {
    connections: Arc<RwLock<Vec<Connection>>>,
    events: broadcast::Sender<ConnectionEvent>,
}

impl ConnectionList {
    pub(crate) fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            connections: Arc::new(RwLock::new(Vec::new())),
            events,
        }
    }

    /// Copy of the current connections, in insertion order
    pub async fn snapshot(&self) -> Vec<Connection> {
        self.connections.read().await.clone()
    }

    /// Connection for the host, if any
    pub async fn find(&self, host: &HostAddress) -> Option<Connection> {
        self.connections
            .read()
            .await
            .iter()
            .find(|c| c.host_address() == host)
            .cloned()
    }

    pub async fn contains(&self, host: &HostAddress) -> bool {
        self.connections
            .read()
            .await
            .iter()
            .any(|c| c.host_address() == host)
    }

    pub async fn len(&self) -> usize {
        self.connections.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.connections.read().await.is_empty()
    }

    /// Receive every change made after this call
    pub fn subscribe(&self) -> broadcast::Receiver<ConnectionEvent> {
        self.events.subscribe()
    }

    /// Whether both handles point at the same list
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.connections, &other.connections)
    }

    /// Append unless the host already has a connection. Returns whether it was added.
    pub(crate) async fn insert_if_absent(&self, connection: Connection) -> bool {
        let mut connections = self.connections.write().await;
        if connections
            .iter()
            .any(|c| c.host_address() == connection.host_address())
        {
            return false;
        }
        connections.push(connection.clone());
        self.publish(ConnectionEvent::Added(connection));
        true
    }

    /// Remove `connection` if it is still the one held for its host.
    ///
    /// A connection that replaced it in the meantime is left in place.
    pub(crate) async fn remove_exact(&self, connection: &Connection) -> bool {
        let mut connections = self.connections.write().await;
        let Some(index) = connections.iter().position(|c| c == connection) else {
            return false;
        };
        connections.remove(index);
        self.publish(ConnectionEvent::Removed(connection.host_address().clone()));
        true
    }

    pub(crate) fn publish(&self, event: ConnectionEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

impl std::fmt::Debug for ConnectionList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionList").finish_non_exhaustive()
    }
}
