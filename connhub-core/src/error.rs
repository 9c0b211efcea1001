//! Unified error type definition

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::HostAddress;

/// Failure reported by an [`Authenticator`](crate::traits::Authenticator).
///
/// Every variant names the host it concerns. The type is `Clone` so that a
/// failed restoration can be stored inside an immutable
/// [`Connection`](crate::types::Connection).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum AuthError {
    /// The username/password or stored token was rejected.
    InvalidCredentials {
        /// Host that rejected the credentials.
        host: String,
        /// Original error message from the remote service, if available.
        raw_message: Option<String>,
    },

    /// No secret is stored for the host, so a cached login is impossible.
    MissingCredentials {
        /// Host without a stored secret.
        host: String,
    },

    /// The account requires a second factor the caller did not supply.
    TwoFactorRequired {
        /// Host asking for the second factor.
        host: String,
    },

    /// A network-level error occurred (DNS resolution, connection refused, TLS, ...).
    NetworkError {
        /// Host that could not be reached.
        host: String,
        /// Error details.
        detail: String,
    },

    /// The remote call timed out.
    Timeout {
        /// Host that timed out.
        host: String,
        /// Error details.
        detail: String,
    },

    /// Reading or writing the secret store failed during the exchange.
    SecretStore {
        /// Host whose secret could not be accessed.
        host: String,
        /// Error details.
        detail: String,
    },

    /// Anything not mapped to a dedicated variant.
    Unknown {
        /// Host that produced the error.
        host: String,
        /// Raw message from the remote service.
        raw_message: String,
    },
}

impl AuthError {
    /// Host the failure concerns.
    pub fn host(&self) -> &str {
        match self {
            Self::InvalidCredentials { host, .. }
            | Self::MissingCredentials { host }
            | Self::TwoFactorRequired { host }
            | Self::NetworkError { host, .. }
            | Self::Timeout { host, .. }
            | Self::SecretStore { host, .. }
            | Self::Unknown { host, .. } => host,
        }
    }

    /// Whether the failure is caused by user input rather than a system fault.
    ///
    /// Returns `true` for failures that should be logged at `warn`, `false` for `error`.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials { .. }
                | Self::MissingCredentials { .. }
                | Self::TwoFactorRequired { .. }
        )
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCredentials { host, raw_message } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{host}] Invalid credentials: {msg}")
                } else {
                    write!(f, "[{host}] Invalid credentials")
                }
            }
            Self::MissingCredentials { host } => write!(f, "[{host}] No stored credentials"),
            Self::TwoFactorRequired { host } => {
                write!(f, "[{host}] Two-factor authentication required")
            }
            Self::NetworkError { host, detail } => write!(f, "[{host}] Network error: {detail}"),
            Self::Timeout { host, detail } => write!(f, "[{host}] Request timed out: {detail}"),
            Self::SecretStore { host, detail } => {
                write!(f, "[{host}] Secret store error: {detail}")
            }
            Self::Unknown { host, raw_message } => write!(f, "[{host}] {raw_message}"),
        }
    }
}

impl std::error::Error for AuthError {}

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// A connection to the host already exists
    #[error("A connection to {0} already exists")]
    AlreadyConnected(HostAddress),

    /// No connection to the host exists
    #[error("Could not find a connection to {0}")]
    NotConnected(HostAddress),

    /// The authenticator rejected an explicit login
    #[error("Login failed: {0}")]
    LoginFailed(AuthError),

    /// The authenticator failed to log out
    #[error("Logout failed: {0}")]
    LogoutFailed(AuthError),

    /// Reading the connection cache failed during restoration
    #[error("Failed to load connection cache: {0}")]
    CacheLoadFailed(String),

    /// A cached connection could not be restored
    #[error("Failed to restore connection to {host}: {source}")]
    RestoreEntryFailed { host: HostAddress, source: AuthError },

    /// The input could not be turned into a host address
    #[error("Invalid host address: {0}")]
    InvalidHostAddress(String),

    /// Secret store error
    #[error("Credential error: {0}")]
    CredentialError(String),

    /// Storage layer error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// No tokio runtime was available to run restoration on
    #[error("No async runtime available")]
    RuntimeUnavailable,
}

impl CoreError {
    /// Whether it is expected behavior (user input, resource does not exist, etc.) is used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added. **
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::AlreadyConnected(_)
            | Self::NotConnected(_)
            | Self::InvalidHostAddress(_)
            | Self::ValidationError(_) => true,
            Self::LoginFailed(e) | Self::LogoutFailed(e) => e.is_expected(),
            Self::RestoreEntryFailed { source, .. } => source.is_expected(),
            _ => false,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
