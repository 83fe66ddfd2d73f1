//! Package filenames and what can be read off them.
//!
//! A bucket key such as `influxdb_1.3.0rc1_amd64.deb` is an opaque
//! [`PackageName`]. Its version token and release channel are derived on
//! demand by a [`PackageFamily`], which knows the literal package prefix.

use std::borrow::Borrow;
use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// One object key from a bucket listing, kept verbatim.
///
/// Unlike index package names, keys are not normalized: two keys differing
/// only in case are distinct objects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageName(String);

impl PackageName {
    /// Wrap a bucket key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Return the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the key ends with the given platform suffix.
    pub fn has_suffix(&self, suffix: &str) -> bool {
        self.0.ends_with(suffix)
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::ops::Deref for PackageName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for PackageName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for PackageName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for PackageName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for PackageName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl From<&str> for PackageName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PackageName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Release maturity of a listed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Channel {
    /// A plain numbered release.
    Stable,
    /// A build whose version token contains `rc`.
    ReleaseCandidate,
    /// A build whose version token contains `nightly`.
    Nightly,
    /// Not a package of this family at all (checksums, docs, other tools).
    Excluded,
}

impl Channel {
    /// Short lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stable => "stable",
            Self::ReleaseCandidate => "release-candidate",
            Self::Nightly => "nightly",
            Self::Excluded => "excluded",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The literal package prefix shared by every file of one product, with the
/// two patterns derived from it compiled once.
#[derive(Debug, Clone)]
pub struct PackageFamily {
    name: String,
    /// `^<name>(_|-)(.*)(_|-|.)(x86|i686|i386|amd64).*`
    extract: Regex,
    /// `^<name>[_-](nightly|[0-9])`
    gate: Regex,
}

impl PackageFamily {
    /// Compile the patterns for a package prefix such as `influxdb`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidFamily`] if the name is empty or the
    /// resulting pattern cannot be compiled.
    pub fn new(name: &str) -> Result<Self, SchemaError> {
        if name.is_empty() {
            return Err(SchemaError::InvalidFamily {
                name: String::new(),
                reason: "package name must not be empty".to_string(),
            });
        }
        let escaped = regex::escape(name);
        let invalid = |e: regex::Error| SchemaError::InvalidFamily {
            name: name.to_string(),
            reason: e.to_string(),
        };

        let extract = Regex::new(&format!(
            r"^{escaped}(_|-)(.*)(_|-|\.)(x86|i686|i386|amd64).*"
        ))
        .map_err(invalid)?;
        let gate = Regex::new(&format!(r"^{escaped}[_\-](nightly|[0-9])")).map_err(invalid)?;

        Ok(Self {
            name: name.to_string(),
            extract,
            gate,
        })
    }

    /// The literal package prefix.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Strip the package prefix and the architecture/format tail, returning
    /// the version token in between.
    ///
    /// `influxdb-1.2.3.x86_64.rpm` gives `1.2.3`, `influxdb_1.3.0rc1_amd64.deb`
    /// gives `1.3.0rc1`. Names that do not have this shape are returned
    /// unchanged; they never reach ordering because [`classify`](Self::classify)
    /// excludes them first.
    pub fn extract_version<'a>(&self, name: &'a str) -> &'a str {
        self.extract
            .captures(name)
            .and_then(|caps| caps.get(2))
            .map_or(name, |m| m.as_str())
    }

    /// Whether the name looks like a package of this family at all.
    pub fn is_member(&self, name: &str) -> bool {
        self.gate.is_match(name)
    }

    /// Place a filename into exactly one [`Channel`].
    ///
    /// Channel markers may appear anywhere in the version token, so after the
    /// structural gate a substring test is enough. `rc` wins over `nightly`.
    pub fn classify(&self, name: &str) -> Channel {
        if !self.is_member(name) {
            return Channel::Excluded;
        }
        let version = self.extract_version(name);
        if version.contains("rc") {
            Channel::ReleaseCandidate
        } else if version.contains("nightly") {
            Channel::Nightly
        } else {
            Channel::Stable
        }
    }
}
