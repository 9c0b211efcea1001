//! Read-only query helpers over the loaded connection list

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::traits::ConnectionManagement;
use crate::types::{Connection, HostAddress};

/// Convenience queries available on every [`ConnectionManagement`].
///
/// All of them wait for restoration to finish and never mutate the list.
#[async_trait]
pub trait ConnectionManagerExt: ConnectionManagement {
    /// Whether any connection is logged in
    async fn is_logged_in(&self) -> bool {
        self.get_loaded_connections()
            .await
            .snapshot()
            .await
            .iter()
            .any(Connection::is_logged_in)
    }

    /// Whether the connection for `host` exists and is logged in
    async fn is_logged_in_to(&self, host: &HostAddress) -> bool {
        self.get_loaded_connections()
            .await
            .find(host)
            .await
            .is_some_and(|c| c.is_logged_in())
    }

    /// Connection for the host a repository was cloned from
    async fn lookup_connection(&self, clone_url: &str) -> CoreResult<Option<Connection>> {
        let host = HostAddress::create(clone_url)?;
        Ok(self.get_loaded_connections().await.find(&host).await)
    }

    /// Every connection that is logged in, in list order
    async fn logged_in_connections(&self) -> Vec<Connection> {
        self.get_loaded_connections()
            .await
            .snapshot()
            .await
            .into_iter()
            .filter(Connection::is_logged_in)
            .collect()
    }
}

impl<T: ConnectionManagement + ?Sized> ConnectionManagerExt for T {}
