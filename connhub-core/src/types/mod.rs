//! Type definition module

mod connection;
mod host_address;

pub use connection::{CachedConnection, Connection, ConnectionEvent, HostCredentials, UserIdentity};
pub use host_address::{HostAddress, DOT_COM_HOST};
