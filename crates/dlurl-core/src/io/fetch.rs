//! Retrieval of raw bucket listings.
//!
//! The resolver only sees the [`ListingSource`] trait, so tests and offline
//! runs can substitute a canned document for the HTTPS request.

use std::path::Path;

use async_trait::async_trait;
use reqwest::Client;

use crate::config::ResolverConfig;
use crate::error::FetchError;

#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Return the raw listing body for keys starting with `prefix`.
    async fn fetch(&self, prefix: &str) -> Result<String, FetchError>;
}

/// One GET against `<base_url>?prefix=<prefix>`, no retries.
#[derive(Debug, Clone)]
pub struct HttpListingSource {
    client: Client,
    base_url: String,
}

impl HttpListingSource {
    /// Build a client from the configured timeouts and TLS policy.
    ///
    /// Certificates are verified unless `insecure_skip_tls_verify` is set.
    pub fn new(config: &ResolverConfig) -> Result<Self, FetchError> {
        let mut builder = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(config.user_agent.as_str());

        if config.insecure_skip_tls_verify {
            tracing::warn!(
                "TLS certificate verification disabled for {}",
                config.base_url
            );
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder.build().map_err(FetchError::Client)?;
        Ok(Self::with_client(client, config.bucket_root()))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ListingSource for HttpListingSource {
    async fn fetch(&self, prefix: &str) -> Result<String, FetchError> {
        tracing::debug!("Fetching listing {}?prefix={prefix}", self.base_url);

        let resp = self
            .client
            .get(&self.base_url)
            .query(&[("prefix", prefix)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: resp.url().to_string(),
            });
        }

        let body = resp.text().await?;
        tracing::debug!("Fetched {} bytes of listing", body.len());
        Ok(body)
    }
}

/// A listing that is already in memory, e.g. read from a saved file.
///
/// The prefix is ignored; the document is returned as-is.
#[derive(Debug, Clone)]
pub struct StaticListingSource {
    body: String,
}

impl StaticListingSource {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }

    pub fn from_file(path: &Path) -> Result<Self, FetchError> {
        let body = std::fs::read_to_string(path).map_err(|source| FetchError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(body))
    }
}

#[async_trait]
impl ListingSource for StaticListingSource {
    async fn fetch(&self, _prefix: &str) -> Result<String, FetchError> {
        Ok(self.body.clone())
    }
}
