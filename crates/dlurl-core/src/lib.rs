pub mod config;
pub mod error;
pub mod host;
pub mod io;
pub mod listing;
pub mod resolver;
pub mod select;
pub mod version;

pub use config::ResolverConfig;
pub use error::{ConfigError, FetchError, ParseError, ResolveError};
pub use io::fetch::{HttpListingSource, ListingSource, StaticListingSource};
pub use listing::Listing;
pub use resolver::{ResolvedPackage, Resolver, resolve_download_url, resolve_download_url_with};
pub use select::{rank, select};
pub use version::{DottedVersionOrder, SemverOrder, VersionOrder};

/// User Agent string for listing requests
pub const USER_AGENT: &str = concat!("dlurl/", env!("CARGO_PKG_VERSION"));
