//! Errors raised while validating host facts and selection criteria.

use thiserror::Error;

/// Errors produced by the pure schema layer, before any I/O happens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The OS family has no entry in the suffix table.
    #[error("unsupported platform: os family '{os_family}' has no known package format")]
    UnsupportedPlatform {
        /// The OS family as supplied by the caller.
        os_family: String,
    },

    /// A concrete version was pinned while a channel flag was set.
    #[error("do not set boolean options to true if pinning specific version (got '{version}')")]
    Configuration {
        /// The pinned version that conflicted with the flags.
        version: String,
    },

    /// The package prefix cannot be turned into filename patterns.
    #[error("invalid package name '{name}': {reason}")]
    InvalidFamily {
        /// The rejected package prefix.
        name: String,
        /// Why it was rejected.
        reason: String,
    },
}
