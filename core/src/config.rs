//! Where the API lives.
//!
//! The host is read from `API_HOST`, after loading a `.env` file when one is
//! present. Resource clients append their collection path to it.

use tracing::debug;
use url::Url;

use crate::error::ConfigError;

pub const HOST_ENV: &str = "API_HOST";
pub const DEFAULT_HOST: &str = "http://localhost:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    host: String,
}

impl ClientConfig {
    /// Validate `host` as an absolute http(s) URL without query or fragment.
    /// Trailing slashes are dropped.
    pub fn new(host: &str) -> Result<Self, ConfigError> {
        let trimmed = host.trim().trim_end_matches('/');
        let invalid = |reason: String| ConfigError::InvalidHost {
            host: host.to_string(),
            reason,
        };

        let parsed = Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {:?}", parsed.scheme())));
        }
        // Collection paths are appended to the host, so it must end in a path.
        if parsed.query().is_some() || parsed.fragment().is_some() || parsed.cannot_be_a_base() {
            return Err(invalid("host must not carry a query or fragment".to_string()));
        }
        Ok(Self {
            host: trimmed.to_string(),
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "loaded environment file");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup(HOST_ENV)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        Self::new(&host)
    }

    pub fn host(&self) -> &str {
        &self.host
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
        }
    }
}
