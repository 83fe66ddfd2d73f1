//! Host fact detection for callers that do not supply their own.
//!
//! The OS family comes from `os-release` (`ID`, then `ID_LIKE`), the hardware
//! model from the compile-time target. Unknown distributions are passed
//! through verbatim so the suffix table can reject them by name.

use dlurl_schema::{OsFamily, Platform};

const OS_RELEASE_PATHS: [&str; 2] = ["/etc/os-release", "/usr/lib/os-release"];

const REDHAT_IDS: &[&str] = &[
    "rhel", "centos", "fedora", "rocky", "almalinux", "amzn", "ol", "scientific",
];
const DEBIAN_IDS: &[&str] = &["debian", "ubuntu", "linuxmint", "raspbian", "pop"];

/// Detect the current host's platform facts.
pub fn detect_platform() -> Platform {
    let os_release = OS_RELEASE_PATHS
        .iter()
        .find_map(|p| std::fs::read_to_string(p).ok())
        .unwrap_or_default();

    let os_family = os_family_from_os_release(&os_release)
        .unwrap_or_else(|| std::env::consts::OS.to_string());

    tracing::debug!("Detected host {os_family}/{}", std::env::consts::ARCH);
    Platform::new(os_family, std::env::consts::ARCH)
}

/// Derive the OS family from the contents of an `os-release` file.
///
/// Returns `None` only when the file has no `ID` at all.
pub fn os_family_from_os_release(contents: &str) -> Option<String> {
    let mut id = None;
    let mut id_like = None;
    for line in contents.lines() {
        let Some((key, value)) = line.trim().split_once('=') else {
            continue;
        };
        let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
        match key {
            "ID" => id = Some(value.to_lowercase()),
            "ID_LIKE" => id_like = Some(value.to_lowercase()),
            _ => {}
        }
    }

    let id = id?;
    let known = std::iter::once(id.as_str())
        .chain(id_like.iter().flat_map(|l| l.split_whitespace()))
        .find_map(family_of_id);

    Some(known.map_or(id, |f| f.as_str().to_string()))
}

fn family_of_id(id: &str) -> Option<OsFamily> {
    if REDHAT_IDS.contains(&id) {
        Some(OsFamily::RedHat)
    } else if DEBIAN_IDS.contains(&id) {
        Some(OsFamily::Debian)
    } else {
        None
    }
}
