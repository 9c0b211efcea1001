//! Connection related type definitions

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::{AuthError, CoreError, CoreResult};

use super::HostAddress;

/// Identity of the user resolved by a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Login name on the host
    pub login: String,
    /// Numeric user ID on the host
    pub id: u64,
    /// Display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Primary e-mail address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Avatar image URL
    #[serde(rename = "avatarUrl")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Secret material kept in the secret store for one host
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostCredentials {
    /// User name the secret belongs to
    #[serde(rename = "userName")]
    pub user_name: String,
    /// Password or access token
    pub secret: String,
}

impl fmt::Debug for HostCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostCredentials")
            .field("user_name", &self.user_name)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Persisted form of a connection: no secret material
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedConnection {
    /// Host the connection belongs to
    #[serde(rename = "hostAddress")]
    pub host_address: HostAddress,
    /// User name used for the connection
    #[serde(rename = "userName")]
    pub user_name: String,
}

impl CachedConnection {
    pub fn new(host_address: HostAddress, user_name: impl Into<String>) -> Self {
        Self {
            host_address,
            user_name: user_name.into(),
        }
    }
}

impl From<&Connection> for CachedConnection {
    fn from(connection: &Connection) -> Self {
        Self::new(connection.host_address.clone(), connection.user_name.clone())
    }
}

/// Resolved authentication outcome for one host.
///
/// A connection never changes after construction. It either carries the
/// resolved [`UserIdentity`] or the [`AuthError`] that restoring it
/// produced, never both and never neither.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    host_address: HostAddress,
    user_name: String,
    outcome: Result<UserIdentity, AuthError>,
}

impl Connection {
    /// A connection whose login succeeded.
    pub fn logged_in(
        host_address: HostAddress,
        user_name: impl Into<String>,
        user: UserIdentity,
    ) -> Self {
        Self {
            host_address,
            user_name: user_name.into(),
            outcome: Ok(user),
        }
    }

    /// A connection whose login from the cache failed.
    pub fn failed(host_address: HostAddress, user_name: impl Into<String>, error: AuthError) -> Self {
        Self {
            host_address,
            user_name: user_name.into(),
            outcome: Err(error),
        }
    }

    pub fn host_address(&self) -> &HostAddress {
        &self.host_address
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    /// Resolved user, present iff the login succeeded.
    pub fn user(&self) -> Option<&UserIdentity> {
        self.outcome.as_ref().ok()
    }

    /// Login failure, present iff the login failed.
    pub fn connection_error(&self) -> Option<&AuthError> {
        self.outcome.as_ref().err()
    }

    pub fn is_logged_in(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Resolved user, or `RestoreEntryFailed` carrying the captured failure.
    pub fn require_user(&self) -> CoreResult<&UserIdentity> {
        self.outcome
            .as_ref()
            .map_err(|e| CoreError::RestoreEntryFailed {
                host: self.host_address.clone(),
                source: e.clone(),
            })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConnectionView<'a> {
    host_address: &'a HostAddress,
    user_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<&'a UserIdentity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    connection_error: Option<&'a AuthError>,
    is_logged_in: bool,
}

impl Serialize for Connection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ConnectionView {
            host_address: &self.host_address,
            user_name: &self.user_name,
            user: self.user(),
            connection_error: self.connection_error(),
            is_logged_in: self.is_logged_in(),
        }
        .serialize(serializer)
    }
}

/// Change notification published by the connection list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// A connection was appended
    Added(Connection),
    /// The connection for this host was removed
    Removed(HostAddress),
    /// Restoration finished; the list is settled
    Loaded,
}
