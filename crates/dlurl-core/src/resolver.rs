use dlurl_schema::{Channel, PackageFamily, PackageName, Platform, SelectionCriteria};

use crate::config::ResolverConfig;
use crate::error::ResolveError;
use crate::io::fetch::{HttpListingSource, ListingSource};
use crate::listing::Listing;
use crate::select::select;
use crate::version::{DottedVersionOrder, VersionOrder};

/// The chosen package and where to download it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPackage {
    pub filename: PackageName,
    pub version: String,
    pub channel: Channel,
    pub url: String,
}

/// Fetch → parse → filter by platform suffix → select.
///
/// Criteria and platform are validated before the listing is fetched, so an
/// invalid request never touches the network.
#[derive(Debug)]
pub struct Resolver<S, O = DottedVersionOrder> {
    source: S,
    config: ResolverConfig,
    family: PackageFamily,
    order: O,
}

impl Resolver<HttpListingSource> {
    /// Resolver that fetches over HTTPS according to `config`.
    pub fn from_config(config: ResolverConfig) -> Result<Self, ResolveError> {
        let source = HttpListingSource::new(&config)?;
        Self::new(source, config)
    }
}

impl<S: ListingSource> Resolver<S> {
    pub fn new(source: S, config: ResolverConfig) -> Result<Self, ResolveError> {
        let family = PackageFamily::new(&config.package)?;
        Ok(Self {
            source,
            config,
            family,
            order: DottedVersionOrder,
        })
    }
}

impl<S: ListingSource, O: VersionOrder> Resolver<S, O> {
    /// Swap in a different version ordering.
    pub fn with_order<P: VersionOrder>(self, order: P) -> Resolver<S, P> {
        Resolver {
            source: self.source,
            config: self.config,
            family: self.family,
            order,
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve from the three positional arguments.
    ///
    /// A concrete `version` combined with either flag fails with a
    /// configuration error before anything is fetched.
    pub async fn resolve(
        &self,
        allow_release_candidates: bool,
        allow_nightly: bool,
        version: &str,
        platform: &Platform,
    ) -> Result<ResolvedPackage, ResolveError> {
        let criteria = SelectionCriteria::new(allow_release_candidates, allow_nightly, version)?;
        self.resolve_criteria(&criteria, platform).await
    }

    pub async fn resolve_criteria(
        &self,
        criteria: &SelectionCriteria,
        platform: &Platform,
    ) -> Result<ResolvedPackage, ResolveError> {
        let suffix = platform.suffix()?;
        tracing::debug!("Resolving {criteria} for {platform} (suffix {suffix})");

        let body = self.source.fetch(&self.config.prefix).await?;
        let listing = Listing::parse(&body)?;
        if listing.is_truncated() {
            tracing::warn!(
                "Bucket listing is truncated after {} keys; newer packages may be missing",
                listing.len()
            );
        }

        let candidates = listing.matching(suffix);
        tracing::debug!(
            "{} keys listed, {} match suffix {suffix}",
            listing.len(),
            candidates.clone().count()
        );

        let selected = select(candidates, criteria, &self.family, &self.order).ok_or_else(|| {
            ResolveError::NotFound {
                criteria: criteria.to_string(),
                suffix: suffix.to_string(),
            }
        })?;

        let resolved = ResolvedPackage {
            filename: selected.clone(),
            version: self.family.extract_version(selected).to_string(),
            channel: self.family.classify(selected),
            url: self.config.download_url(selected),
        };
        tracing::info!("Selected {} ({})", resolved.filename, resolved.channel);
        Ok(resolved)
    }
}

/// Resolve a download URL against the default bucket.
pub async fn resolve_download_url(
    allow_release_candidates: bool,
    allow_nightly: bool,
    version: &str,
    platform: &Platform,
) -> Result<String, ResolveError> {
    resolve_download_url_with(
        ResolverConfig::default(),
        allow_release_candidates,
        allow_nightly,
        version,
        platform,
    )
    .await
}

/// [`resolve_download_url`] against the bucket described by `config`.
pub async fn resolve_download_url_with(
    config: ResolverConfig,
    allow_release_candidates: bool,
    allow_nightly: bool,
    version: &str,
    platform: &Platform,
) -> Result<String, ResolveError> {
    // Validate before building a client.
    let criteria = SelectionCriteria::new(allow_release_candidates, allow_nightly, version)?;
    let resolver = Resolver::from_config(config)?;
    let resolved = resolver.resolve_criteria(&criteria, platform).await?;
    Ok(resolved.url)
}
