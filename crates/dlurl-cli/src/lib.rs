//! influxdb-download-url - resolve the download URL of a package from a bucket listing
//!
//! Fetches the bucket listing, keeps the files built for this host, and picks
//! the newest acceptable package (or one pinned version). Only the URL is
//! written to stdout so the tool composes with shell pipelines; logs go to
//! stderr and are controlled by `RUST_LOG`.
//!
//! # Precedence
//!
//! Command-line flags and their environment variables override the config
//! file given with `--config`, which overrides the built-in defaults.

#![allow(clippy::missing_errors_doc)]

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use dlurl_core::host::detect_platform;
use dlurl_core::{ResolvedPackage, Resolver, ResolverConfig, StaticListingSource};
use dlurl_schema::{Platform, SelectionCriteria};

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "influxdb-download-url")]
#[command(author, version, about = "Resolve the download URL of the best matching package")]
pub struct Cli {
    /// Exact version to pin, or an alphabetic sentinel such as `latest` or `present`
    #[arg(value_name = "VERSION", default_value = "latest")]
    pub target: String,

    /// Accept release candidates when looking for the latest version
    #[arg(long = "allow-rc")]
    pub allow_rc: bool,

    /// Accept nightly builds when looking for the latest version
    #[arg(long)]
    pub allow_nightly: bool,

    /// OS family fact (`redhat`, `debian`); detected from os-release if omitted
    #[arg(long, env = "DLURL_OS_FAMILY")]
    pub os_family: Option<String>,

    /// Hardware model fact (`x86_64`, `i686`, ...); defaults to this build's target
    #[arg(long, env = "DLURL_ARCH")]
    pub arch: Option<String>,

    /// TOML config file
    #[arg(long, short, env = "DLURL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Bucket root URL
    #[arg(long, env = "DLURL_BASE_URL")]
    pub base_url: Option<String>,

    /// Listing prefix query
    #[arg(long)]
    pub prefix: Option<String>,

    /// Package name every filename starts with
    #[arg(long)]
    pub package: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Skip TLS certificate verification (unsafe)
    #[arg(long, env = "DLURL_INSECURE")]
    pub insecure: bool,

    /// Resolve against a saved listing instead of fetching it
    #[arg(long, value_name = "PATH")]
    pub listing_file: Option<PathBuf>,

    /// Print the selected version and channel to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Layer flags over the config file over defaults.
    pub fn resolver_config(&self) -> Result<ResolverConfig> {
        let mut config = match &self.config {
            Some(path) => ResolverConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => ResolverConfig::default(),
        };

        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url);
        }
        if let Some(prefix) = &self.prefix {
            config = config.with_prefix(prefix);
        }
        if let Some(package) = &self.package {
            config = config.with_package(package);
        }
        if let Some(secs) = self.timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if self.insecure {
            config = config.with_insecure_skip_tls_verify(true);
        }
        Ok(config)
    }

    /// Host facts from the flags, with detection filling whatever is missing.
    pub fn platform(&self) -> Platform {
        match (&self.os_family, &self.arch) {
            (Some(os_family), Some(arch)) => Platform::new(os_family, arch),
            (os_family, arch) => {
                let detected = detect_platform();
                Platform::new(
                    os_family.clone().unwrap_or(detected.os_family),
                    arch.clone().unwrap_or(detected.architecture),
                )
            }
        }
    }
}

/// Resolve the package described by the arguments.
pub async fn run(cli: &Cli) -> Result<ResolvedPackage> {
    // Invalid flag combinations fail before config or network access.
    let criteria = SelectionCriteria::new(cli.allow_rc, cli.allow_nightly, &cli.target)?;
    let config = cli.resolver_config()?;
    let platform = cli.platform();
    tracing::debug!(%criteria, %platform, base_url = %config.base_url, "Resolving");

    let resolved = if let Some(path) = &cli.listing_file {
        tracing::debug!(path = %path.display(), "Using saved listing");
        let source = StaticListingSource::from_file(path)?;
        Resolver::new(source, config)?
            .resolve_criteria(&criteria, &platform)
            .await?
    } else {
        Resolver::from_config(config)?
            .resolve_criteria(&criteria, &platform)
            .await?
    };
    Ok(resolved)
}
