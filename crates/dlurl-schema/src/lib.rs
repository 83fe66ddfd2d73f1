//! Shared value types for resolving package download URLs from a bucket listing.
//!
//! Everything in this crate is pure: filenames, host facts and selection
//! criteria go in, derived values come out. Network access and ordering of
//! versions live in `dlurl-core`.

pub mod criteria;
pub mod error;
pub mod package;
pub mod platform;

// Re-exports
pub use criteria::{SelectionCriteria, VersionTarget};
pub use error::SchemaError;
pub use package::{Channel, PackageFamily, PackageName};
pub use platform::{OsFamily, Platform, WordSize, resolve_suffix};

/// Package family published to the default bucket.
pub const DEFAULT_PACKAGE: &str = "influxdb";
