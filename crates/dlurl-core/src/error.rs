//! Error types for fetching, parsing and resolving.

use std::path::PathBuf;

use dlurl_schema::SchemaError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} fetching {url}")]
    Status { status: u16, url: String },

    #[error("failed to read listing from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("malformed listing XML at byte {position}: {source}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    #[error("expected a ListBucketResult document, found <{0}>")]
    UnexpectedRoot(String),

    #[error("listing ended inside <{0}>")]
    Truncated(String),

    #[error("listing contains no root element")]
    Empty,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Everything that can end a resolution. None of these are recovered
/// internally.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("failed to fetch bucket listing: {0}")]
    Fetch(#[from] FetchError),

    #[error("failed to parse bucket listing: {0}")]
    Parse(#[from] ParseError),

    #[error("could not find any package matching criteria: {criteria}, suffix {suffix}")]
    NotFound { criteria: String, suffix: String },
}

impl ResolveError {
    /// Whether the caller passed flags that conflict with a pinned version.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Schema(SchemaError::Configuration { .. }))
    }

    /// Whether the host platform has no entry in the suffix table.
    pub fn is_unsupported_platform(&self) -> bool {
        matches!(self, Self::Schema(SchemaError::UnsupportedPlatform { .. }))
    }
}
