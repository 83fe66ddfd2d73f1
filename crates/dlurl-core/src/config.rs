//! Resolver configuration, loadable from a TOML file.
//!
//! ```toml
//! base_url = "https://s3.amazonaws.com/influxdb/"
//! prefix = "influxdb"
//! package = "influxdb"
//! timeout_secs = 30
//! insecure_skip_tls_verify = false
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://s3.amazonaws.com/influxdb/";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Bucket root; both the listing and the download URL hang off it.
    pub base_url: String,
    /// Value of the `prefix` query parameter on the listing request.
    pub prefix: String,
    /// Literal package name every filename starts with.
    pub package: String,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// Disables certificate verification. Off unless explicitly set.
    pub insecure_skip_tls_verify: bool,
    pub user_agent: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            prefix: dlurl_schema::DEFAULT_PACKAGE.to_string(),
            package: dlurl_schema::DEFAULT_PACKAGE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            insecure_skip_tls_verify: false,
            user_agent: crate::USER_AGENT.to_string(),
        }
    }
}

impl ResolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs();
        self
    }

    pub fn with_insecure_skip_tls_verify(mut self, insecure: bool) -> Self {
        self.insecure_skip_tls_verify = insecure;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Bucket root with exactly one trailing slash.
    pub fn bucket_root(&self) -> String {
        format!("{}/", self.base_url.trim_end_matches('/'))
    }

    /// Final download location of a listed file.
    pub fn download_url(&self, filename: &str) -> String {
        format!("{}{filename}", self.bucket_root())
    }
}
