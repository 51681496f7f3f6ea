use std::cmp::Ordering;

use semver::Prerelease;

/// Numeric core of a loosely formatted version string
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct NumericVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

/// Parse the `MAJOR.MINOR.PATCH` part of a version string.
///
/// Never fails: a segment contributes its leading digits, and a missing or
/// non-numeric segment counts as 0. A leading `v` is ignored.
///
/// Examples:
/// - "1" -> (1, 0, 0)
/// - "2.1.0-beta.0" -> (2, 1, 0)
/// - "beta" -> (0, 0, 0)
pub fn parse_numeric(version: &str) -> NumericVersion {
    let version = version.trim();
    let version = version.strip_prefix('v').unwrap_or(version);
    let mut segments = version.split('.').map(leading_number);

    NumericVersion {
        major: segments.next().unwrap_or(0),
        minor: segments.next().unwrap_or(0),
        patch: segments.next().unwrap_or(0),
    }
}

fn leading_number(segment: &str) -> u64 {
    let end = segment
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(segment.len());
    segment[..end].parse().unwrap_or(0)
}

/// Compare two versions by their numeric segments only.
///
/// Pre-release and build suffixes are ignored, so `2.1.0` and
/// `2.1.0-beta.0` compare equal.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    parse_numeric(a).cmp(&parse_numeric(b))
}

/// Pre-release part of a version string (`"beta.0"` for `"2.1.0-beta.0"`)
pub fn prerelease(version: &str) -> Option<&str> {
    let version = version.trim();
    let version = version.split_once('+').map_or(version, |(v, _)| v);
    version
        .split_once('-')
        .map(|(_, pre)| pre)
        .filter(|pre| !pre.is_empty())
}

/// Compare two versions numerically, then break ties on the pre-release tag.
///
/// A version without a pre-release tag is newer than the same numeric
/// version with one. Two tagged versions follow semver precedence
/// (`beta.1` < `beta.3` < `rc.0`), falling back to plain string order when
/// a tag is not valid semver.
pub fn compare_with_prerelease(a: &str, b: &str) -> Ordering {
    compare_versions(a, b).then_with(|| match (prerelease(a), prerelease(b)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(pa), Some(pb)) => match (Prerelease::new(pa), Prerelease::new(pb)) {
            (Ok(pa), Ok(pb)) => pa.cmp(&pb),
            _ => pa.cmp(pb),
        },
    })
}

/// Kind of change between an installed version and its upgrade target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpgradeKind {
    Major,
    Minor,
    Patch,
}

impl UpgradeKind {
    /// Classify by the first dot segment that differs.
    ///
    /// Returns None when the versions have identical segments.
    pub fn between(current: &str, latest: &str) -> Option<Self> {
        let current: Vec<&str> = current.split('.').collect();
        let latest: Vec<&str> = latest.split('.').collect();

        [Self::Major, Self::Minor, Self::Patch]
            .into_iter()
            .enumerate()
            .find(|(i, _)| current.get(*i) != latest.get(*i))
            .map(|(_, kind)| kind)
    }
}
