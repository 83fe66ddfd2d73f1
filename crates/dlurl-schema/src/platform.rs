//! Host platform facts and the filename suffix they imply.
//!
//! Package filenames in the bucket end in a marker that combines the packaging
//! format (`rpm`/`deb`) with a CPU width marker. The table in
//! [`resolve_suffix`] is the only place that couples host facts to filename
//! shape.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// Operating system family, as reported by the host's facts.
///
/// Parsing is case-insensitive: `RedHat`, `redhat` and `REDHAT` are the same
/// family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
    /// RPM based distributions (RHEL, `CentOS`, Fedora, ...).
    RedHat,
    /// DEB based distributions (Debian, Ubuntu, ...).
    Debian,
}

impl OsFamily {
    /// Lowercase name used in host facts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RedHat => "redhat",
            Self::Debian => "debian",
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OsFamily {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "redhat" => Ok(Self::RedHat),
            "debian" => Ok(Self::Debian),
            _ => Err(SchemaError::UnsupportedPlatform {
                os_family: s.to_string(),
            }),
        }
    }
}

/// CPU word size, derived from the hardware model string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WordSize {
    /// Any architecture whose name contains `64`.
    Bits64,
    /// Everything else.
    Bits32,
}

impl WordSize {
    /// Classify a hardware model string (`x86_64`, `amd64`, `i686`, ...).
    pub fn from_architecture(architecture: &str) -> Self {
        if architecture.contains("64") {
            Self::Bits64
        } else {
            Self::Bits32
        }
    }
}

/// The two host facts the suffix table needs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Platform {
    /// OS family fact, e.g. `RedHat` or `debian`.
    pub os_family: String,
    /// Hardware model fact, e.g. `x86_64` or `i686`.
    pub architecture: String,
}

impl Platform {
    /// Bundle two host facts.
    pub fn new(os_family: impl Into<String>, architecture: impl Into<String>) -> Self {
        Self {
            os_family: os_family.into(),
            architecture: architecture.into(),
        }
    }

    /// Filename suffix of packages installable on this platform.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnsupportedPlatform`] if the OS family is not
    /// in the suffix table.
    pub fn suffix(&self) -> Result<&'static str, SchemaError> {
        resolve_suffix(&self.os_family, &self.architecture)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os_family, self.architecture)
    }
}

/// Map host facts to the package filename suffix.
///
/// | family | 64-bit       | otherwise  |
/// |--------|--------------|------------|
/// | redhat | `x86_64.rpm` | `i686.rpm` |
/// | debian | `amd64.deb`  | `i686.deb` |
///
/// # Errors
///
/// Returns [`SchemaError::UnsupportedPlatform`] for any other family.
pub fn resolve_suffix(os_family: &str, architecture: &str) -> Result<&'static str, SchemaError> {
    let family: OsFamily = os_family.parse()?;
    let suffix = match (family, WordSize::from_architecture(architecture)) {
        (OsFamily::RedHat, WordSize::Bits64) => "x86_64.rpm",
        (OsFamily::RedHat, WordSize::Bits32) => "i686.rpm",
        (OsFamily::Debian, WordSize::Bits64) => "amd64.deb",
        (OsFamily::Debian, WordSize::Bits32) => "i686.deb",
    };
    Ok(suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_table() {
        assert_eq!(resolve_suffix("redhat", "x86_64").unwrap(), "x86_64.rpm");
        assert_eq!(resolve_suffix("redhat", "i686").unwrap(), "i686.rpm");
        assert_eq!(resolve_suffix("debian", "amd64").unwrap(), "amd64.deb");
        assert_eq!(resolve_suffix("debian", "i386").unwrap(), "i686.deb");
    }

    #[test]
    fn test_family_is_case_insensitive() {
        assert_eq!(resolve_suffix("RedHat", "x86_64").unwrap(), "x86_64.rpm");
        assert_eq!(resolve_suffix("DEBIAN", "aarch64").unwrap(), "amd64.deb");
        assert_eq!("Debian".parse::<OsFamily>().unwrap(), OsFamily::Debian);
    }

    #[test]
    fn test_any_64_marker_counts() {
        // Only the presence of "64" matters, not the actual instruction set.
        assert_eq!(WordSize::from_architecture("ppc64le"), WordSize::Bits64);
        assert_eq!(WordSize::from_architecture("armv7l"), WordSize::Bits32);
        assert_eq!(WordSize::from_architecture(""), WordSize::Bits32);
    }

    #[test]
    fn test_unsupported_family() {
        for family in ["suse", "archlinux", "windows", ""] {
            let err = resolve_suffix(family, "x86_64").unwrap_err();
            assert_eq!(
                err,
                SchemaError::UnsupportedPlatform {
                    os_family: family.to_string()
                }
            );
        }
    }

    #[test]
    fn test_platform_suffix() {
        let platform = Platform::new("RedHat", "i386");
        assert_eq!(platform.suffix().unwrap(), "i686.rpm");
        assert_eq!(platform.to_string(), "RedHat/i386");
    }
}
