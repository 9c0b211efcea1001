//! Host address: the identity of a remote service instance

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{CoreError, CoreResult};

/// Host name of the public service. Its API lives on a separate subdomain.
pub const DOT_COM_HOST: &str = "github.com";

const DOT_COM_API: &str = "https://api.github.com/";

/// Identifies a remote host service.
///
/// Two addresses are equal when their normalized web URIs are equal, so
/// `https://GitHub.com/owner/repo`, `git@github.com:owner/repo.git` and
/// `www.github.com` all resolve to the same address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HostAddress {
    web_uri: Url,
    api_uri: Url,
}

impl HostAddress {
    /// Derive a host address from a base URL, a bare host name, or a clone URL.
    ///
    /// Accepted forms:
    /// - `https://host[:port]/anything`
    /// - `ssh://git@host/owner/repo.git`, `git://host/...`
    /// - `git@host:owner/repo.git`
    /// - `host[:port]`
    pub fn create(input: &str) -> CoreResult<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidHostAddress(input.to_string()));
        }

        let parsed = Url::parse(&Self::to_absolute(trimmed))
            .map_err(|e| CoreError::InvalidHostAddress(format!("{input}: {e}")))?;

        let host = parsed
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| CoreError::InvalidHostAddress(input.to_string()))?
            .to_ascii_lowercase();
        let host = host.strip_prefix("www.").unwrap_or(&host);

        // Only http(s) ports describe the web endpoint; ssh/git ports do not.
        let (scheme, port) = match parsed.scheme() {
            "http" => ("http", parsed.port()),
            "https" => ("https", parsed.port()),
            _ => ("https", None),
        };

        let authority = match port {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };

        let web_uri = Url::parse(&format!("{scheme}://{authority}/"))
            .map_err(|e| CoreError::InvalidHostAddress(format!("{input}: {e}")))?;

        let api_uri = if host == DOT_COM_HOST {
            Url::parse(DOT_COM_API)
        } else {
            web_uri.join("api/v3/")
        }
        .map_err(|e| CoreError::InvalidHostAddress(format!("{input}: {e}")))?;

        Ok(Self { web_uri, api_uri })
    }

    /// Rewrite scheme-less inputs into something `Url` can parse.
    fn to_absolute(input: &str) -> String {
        if input.contains("://") {
            return input.to_string();
        }
        // scp-like syntax: user@host:path
        if let Some((user_host, _path)) = input.split_once(':') {
            if let Some((_user, host)) = user_host.rsplit_once('@') {
                return format!("ssh://{host}");
            }
        }
        format!("https://{input}")
    }

    /// Base URI of the web front end, always ending in `/`.
    pub fn web_uri(&self) -> &Url {
        &self.web_uri
    }

    /// Base URI of the REST API, always ending in `/`.
    pub fn api_uri(&self) -> &Url {
        &self.api_uri
    }

    /// Host name, without port.
    pub fn host(&self) -> &str {
        self.web_uri.host_str().unwrap_or_default()
    }

    /// Whether this is the public service rather than a self-hosted instance.
    pub fn is_dot_com(&self) -> bool {
        self.host() == DOT_COM_HOST
    }
}

impl fmt::Display for HostAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.web_uri.as_str().trim_end_matches('/'))
    }
}

impl From<HostAddress> for String {
    fn from(address: HostAddress) -> Self {
        address.to_string()
    }
}

impl TryFrom<String> for HostAddress {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::create(&value)
    }
}

impl std::str::FromStr for HostAddress {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::create(s)
    }
}
