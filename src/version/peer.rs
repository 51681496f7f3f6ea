//! Normalization of peer dependency ranges into a single version

use std::sync::LazyLock;

use regex::Regex;

use crate::version::semver::compare_versions;

/// Leading comparison operators of a range alternative (`>=`, `^`, `~`, ...)
static RANGE_OPERATOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[<=>^~]+\s*").expect("valid range operator regex"));

/// Version mode of an installed dependency string (`^` or `~`)
static VERSION_MODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\^~]").expect("valid version mode regex"));

/// Reduce a version range to one representative version.
///
/// Each `||` alternative is stripped of its leading operators, then the
/// alternatives are sorted numerically; the smallest is returned, or the
/// largest when `prefer_max` is set. Empty input comes back unchanged.
///
/// Examples:
/// - `">=11.5.6 || >=12.0.0-alpha.1"` -> `"11.5.6"`
/// - `">=11.5.6 || >=12.0.0"` with `prefer_max` -> `"12.0.0"`
/// - `"^18.0.0"` -> `"18.0.0"`
pub fn normalize_peer_version(range: &str, prefer_max: bool) -> String {
    let mut alternatives: Vec<String> = range
        .split("||")
        .map(|alternative| {
            RANGE_OPERATOR_REGEX
                .replace(alternative.trim(), "")
                .trim()
                .to_string()
        })
        .collect();

    alternatives.sort_by(|a, b| {
        if prefer_max {
            compare_versions(b, a)
        } else {
            compare_versions(a, b)
        }
    });

    alternatives
        .into_iter()
        .next()
        .unwrap_or_else(|| range.to_string())
}

/// Split an installed dependency string into its version and mode.
///
/// `"^1.2.3"` -> `("1.2.3", "^")`, `"1.2.3"` -> `("1.2.3", "")`
pub fn split_version_mode(raw: &str) -> (String, String) {
    let mode = VERSION_MODE_REGEX
        .find(raw)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();
    let version = VERSION_MODE_REGEX.replace(raw, "").trim().to_string();

    (version, mode)
}
