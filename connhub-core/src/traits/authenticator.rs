//! Remote authentication abstract Trait

use async_trait::async_trait;

use crate::error::AuthError;
use crate::types::{HostAddress, UserIdentity};

use super::SecretAccessor;

/// Performs the login/logout exchange with a remote host.
///
/// Timeouts and retries are the implementation's business; the connection
/// manager waits for as long as a call takes.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Log in with a username and password.
    ///
    /// On success the implementation stores whatever secret it needs for
    /// later cached logins through `secrets`.
    async fn login(
        &self,
        host: &HostAddress,
        secrets: &SecretAccessor,
        user_name: &str,
        password: &str,
    ) -> Result<UserIdentity, AuthError>;

    /// Log in with the secret previously stored for the host.
    async fn login_from_cache(
        &self,
        host: &HostAddress,
        secrets: &SecretAccessor,
    ) -> Result<UserIdentity, AuthError>;

    /// Log out, revoking and deleting the stored secret.
    async fn logout(&self, host: &HostAddress, secrets: &SecretAccessor) -> Result<(), AuthError>;
}
