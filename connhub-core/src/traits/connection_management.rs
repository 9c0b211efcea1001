//! Connection manager public interface

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::services::ConnectionList;
use crate::types::{Connection, HostAddress};

/// Operations the connection manager exposes to UI and automation layers.
///
/// Query helpers are layered on top of this trait by
/// [`ConnectionManagerExt`](crate::services::ConnectionManagerExt).
#[async_trait]
pub trait ConnectionManagement: Send + Sync {
    /// Shared connection list. Starts restoration on the first call and never blocks.
    fn get_all_connections(&self) -> ConnectionList;

    /// Shared connection list, once restoration has finished.
    async fn get_loaded_connections(&self) -> ConnectionList;

    /// Connection for the host, once restoration has finished.
    async fn get_connection(&self, host: &HostAddress) -> Option<Connection>;

    /// Log in to a host that has no connection yet.
    async fn log_in(
        &self,
        host: &HostAddress,
        user_name: &str,
        password: &str,
    ) -> CoreResult<Connection>;

    /// Log out of a host and drop its connection.
    async fn log_out(&self, host: &HostAddress) -> CoreResult<()>;
}
