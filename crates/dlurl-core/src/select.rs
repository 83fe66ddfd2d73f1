//! Choosing one package out of the platform-filtered listing.
//!
//! Two disjoint modes, picked by the [`VersionTarget`]:
//!
//! - **latest**: keep members of the package family whose channel is allowed
//!   (stable always, release candidates and nightlies only when enabled), then
//!   take the highest version.
//! - **pinned**: keep names whose version token equals the target string
//!   exactly, then take the highest.

use dlurl_schema::{Channel, PackageFamily, PackageName, SelectionCriteria, VersionTarget};

use crate::version::VersionOrder;

/// Whether a single name survives the filter for these criteria.
pub fn accepts(name: &str, criteria: &SelectionCriteria, family: &PackageFamily) -> bool {
    match criteria.target() {
        VersionTarget::Latest(_) => match family.classify(name) {
            Channel::Stable => true,
            Channel::ReleaseCandidate => criteria.allow_release_candidates(),
            Channel::Nightly => criteria.allow_nightly(),
            Channel::Excluded => false,
        },
        VersionTarget::Pinned(version) => family.extract_version(name) == version,
    }
}

/// All surviving candidates, sorted ascending by version token.
///
/// The sort is stable: names with equal versions keep listing order.
pub fn rank<'a, I, O>(
    candidates: I,
    criteria: &SelectionCriteria,
    family: &PackageFamily,
    order: &O,
) -> Vec<&'a PackageName>
where
    I: IntoIterator<Item = &'a PackageName>,
    O: VersionOrder + ?Sized,
{
    let mut survivors: Vec<&PackageName> = candidates
        .into_iter()
        .filter(|name| accepts(name, criteria, family))
        .collect();

    survivors.sort_by(|a, b| {
        order.compare(family.extract_version(a), family.extract_version(b))
    });
    survivors
}

/// The best candidate, or `None` when nothing satisfies the criteria.
pub fn select<'a, I, O>(
    candidates: I,
    criteria: &SelectionCriteria,
    family: &PackageFamily,
    order: &O,
) -> Option<&'a PackageName>
where
    I: IntoIterator<Item = &'a PackageName>,
    O: VersionOrder + ?Sized,
{
    rank(candidates, criteria, family, order).pop()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::DottedVersionOrder;

    fn family() -> PackageFamily {
        PackageFamily::new("influxdb").unwrap()
    }

    fn names(list: &[&str]) -> Vec<PackageName> {
        list.iter().map(|s| PackageName::from(*s)).collect()
    }

    fn pick(list: &[PackageName], criteria: &SelectionCriteria) -> Option<String> {
        select(list, criteria, &family(), &DottedVersionOrder).map(ToString::to_string)
    }

    fn catalog() -> Vec<PackageName> {
        names(&[
            "influxdb_1.0.0_amd64.deb",
            "influxdb_1.2.0-rc1_amd64.deb",
            "influxdb_1.1.0_amd64.deb",
            "influxdb_nightly_amd64.deb",
        ])
    }

    #[test]
    fn test_latest_stable_only() {
        let criteria = SelectionCriteria::new(false, false, "latest").unwrap();
        assert_eq!(
            pick(&catalog(), &criteria).as_deref(),
            Some("influxdb_1.1.0_amd64.deb")
        );
    }

    #[test]
    fn test_latest_with_release_candidates() {
        let criteria = SelectionCriteria::new(true, false, "present").unwrap();
        assert_eq!(
            pick(&catalog(), &criteria).as_deref(),
            Some("influxdb_1.2.0-rc1_amd64.deb")
        );
    }

    #[test]
    fn test_latest_with_nightly() {
        // "nightly" sorts above every numbered version.
        let criteria = SelectionCriteria::new(false, true, "latest").unwrap();
        assert_eq!(
            pick(&catalog(), &criteria).as_deref(),
            Some("influxdb_nightly_amd64.deb")
        );
    }

    #[test]
    fn test_pinned_exact() {
        let criteria = SelectionCriteria::new(false, false, "1.0.0").unwrap();
        assert_eq!(
            pick(&catalog(), &criteria).as_deref(),
            Some("influxdb_1.0.0_amd64.deb")
        );
    }

    #[test]
    fn test_pinned_is_string_equality() {
        // 1.0 and 1.0.0 may be the same release semantically, but not textually.
        let criteria = SelectionCriteria::new(false, false, "1.0").unwrap();
        assert_eq!(pick(&catalog(), &criteria), None);
    }

    #[test]
    fn test_pinned_may_select_release_candidate() {
        let criteria = SelectionCriteria::new(false, false, "1.2.0-rc1").unwrap();
        assert_eq!(
            pick(&catalog(), &criteria).as_deref(),
            Some("influxdb_1.2.0-rc1_amd64.deb")
        );
    }

    #[test]
    fn test_not_found() {
        let criteria = SelectionCriteria::new(false, false, "9.9.9").unwrap();
        assert_eq!(pick(&catalog(), &criteria), None);
        assert_eq!(pick(&[], &SelectionCriteria::latest()), None);
    }

    #[test]
    fn test_excluded_never_selected() {
        let list = names(&[
            "readme.txt",
            "influxdb-latest_amd64.deb",
            "telegraf_9.0_amd64.deb",
        ]);
        let criteria = SelectionCriteria::new(true, true, "latest").unwrap();
        assert_eq!(pick(&list, &criteria), None);
    }

    #[test]
    fn test_equal_versions_keep_last_listed() {
        // Two files share token "1.0.0" (deb separator differs); the stable
        // sort keeps listing order, so the later one is the maximum.
        let list = names(&["influxdb_1.0.0_amd64.deb", "influxdb-1.0.0_amd64.deb"]);
        let criteria = SelectionCriteria::new(false, false, "1.0.0").unwrap();
        assert_eq!(pick(&list, &criteria).as_deref(), Some("influxdb-1.0.0_amd64.deb"));
    }

    #[test]
    fn test_rank_is_ascending() {
        let list = names(&[
            "influxdb_0.13.0_amd64.deb",
            "influxdb_0.9.6_amd64.deb",
            "influxdb_1.10.0_amd64.deb",
            "influxdb_1.9.0_amd64.deb",
        ]);
        let criteria = SelectionCriteria::latest();
        let ranked: Vec<&str> = rank(&list, &criteria, &family(), &DottedVersionOrder)
            .into_iter()
            .map(PackageName::as_str)
            .collect();
        assert_eq!(
            ranked,
            [
                "influxdb_0.9.6_amd64.deb",
                "influxdb_0.13.0_amd64.deb",
                "influxdb_1.9.0_amd64.deb",
                "influxdb_1.10.0_amd64.deb",
            ]
        );
    }

    #[test]
    fn test_injected_order() {
        // A reversed comparator turns "highest" into "lowest".
        let reversed = |a: &str, b: &str| DottedVersionOrder.compare(b, a);
        let list = catalog();
        let criteria = SelectionCriteria::latest();
        let picked = select(&list, &criteria, &family(), &reversed);
        assert_eq!(picked.map(PackageName::as_str), Some("influxdb_1.0.0_amd64.deb"));
    }
}
