//! Selection criteria: which channels are acceptable and which version is wanted.
//!
//! A target made only of ASCII letters (`latest`, `present`, `installed`, ...)
//! asks for the newest acceptable package. Anything else pins one exact
//! version token.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// What the caller asked for in the version position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "mode", content = "value")]
pub enum VersionTarget {
    /// An alphabetic sentinel such as `latest`; the sentinel itself is kept
    /// for messages only.
    Latest(String),
    /// An exact version token, compared by string equality.
    Pinned(String),
}

impl VersionTarget {
    /// Classify a raw version argument.
    ///
    /// The empty string is not alphabetic and therefore pins a version that no
    /// package carries.
    pub fn parse(version: &str) -> Self {
        if !version.is_empty() && version.chars().all(|c| c.is_ascii_alphabetic()) {
            Self::Latest(version.to_string())
        } else {
            Self::Pinned(version.to_string())
        }
    }

    /// Whether a concrete version was requested.
    pub fn is_pinned(&self) -> bool {
        matches!(self, Self::Pinned(_))
    }

    /// The raw argument this target was parsed from.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Latest(s) | Self::Pinned(s) => s,
        }
    }
}

impl fmt::Display for VersionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest(s) => write!(f, "latest ({s})"),
            Self::Pinned(s) => write!(f, "version {s}"),
        }
    }
}

/// Immutable selection input.
///
/// Construction through [`SelectionCriteria::new`] enforces that a pinned
/// version is never combined with a channel flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionCriteria {
    allow_release_candidates: bool,
    allow_nightly: bool,
    target: VersionTarget,
}

impl SelectionCriteria {
    /// Validate and build criteria from the three positional arguments.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Configuration`] if `version` is concrete and
    /// either channel flag is set.
    pub fn new(
        allow_release_candidates: bool,
        allow_nightly: bool,
        version: &str,
    ) -> Result<Self, SchemaError> {
        let target = VersionTarget::parse(version);
        if target.is_pinned() && (allow_release_candidates || allow_nightly) {
            return Err(SchemaError::Configuration {
                version: version.to_string(),
            });
        }
        Ok(Self {
            allow_release_candidates,
            allow_nightly,
            target,
        })
    }

    /// Newest stable package, no release candidates or nightlies.
    pub fn latest() -> Self {
        Self {
            allow_release_candidates: false,
            allow_nightly: false,
            target: VersionTarget::Latest("latest".to_string()),
        }
    }

    /// Whether release candidates may be selected.
    pub fn allow_release_candidates(&self) -> bool {
        self.allow_release_candidates
    }

    /// Whether nightly builds may be selected.
    pub fn allow_nightly(&self) -> bool {
        self.allow_nightly
    }

    /// The requested version.
    pub fn target(&self) -> &VersionTarget {
        &self.target
    }
}

impl fmt::Display for SelectionCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (release candidates: {}, nightly: {})",
            self.target, self.allow_release_candidates, self.allow_nightly
        )
    }
}
