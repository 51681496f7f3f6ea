//! Merging upgrade candidates from every source into one list

use std::collections::HashSet;

use crate::upgrade::types::UpgradeCandidate;

/// Merge candidates into a deduplicated list of packages that need action.
///
/// Sources are taken in priority order: direct targets, then peers,
/// ancillary libraries and missing peers. The first candidate seen for a
/// package wins, candidates that are already latest are dropped, and the
/// first-occurrence order is kept.
pub fn aggregate(
    direct: Vec<UpgradeCandidate>,
    peers: Vec<UpgradeCandidate>,
    libraries: Vec<UpgradeCandidate>,
    missing: Vec<UpgradeCandidate>,
) -> Vec<UpgradeCandidate> {
    let mut seen = HashSet::new();

    direct
        .into_iter()
        .chain(peers)
        .chain(libraries)
        .chain(missing)
        .filter(|candidate| seen.insert(candidate.package.clone()))
        .filter(|candidate| !candidate.is_latest)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(package: &str, current: &str, latest: &str, is_latest: bool) -> UpgradeCandidate {
        UpgradeCandidate {
            package: package.to_string(),
            current_version: current.to_string(),
            latest_version: latest.to_string(),
            is_latest,
            version_mode: String::new(),
            peer_dependencies: None,
        }
    }

    #[test]
    fn direct_candidate_wins_over_peer_for_same_package() {
        let direct = candidate("react", "17.0.0", "18.3.1", false);

        let result = aggregate(
            vec![direct.clone()],
            vec![candidate("react", "17.0.0", "18.0.0", false)],
            vec![],
            vec![],
        );

        assert_eq!(result, vec![direct]);
    }

    #[test]
    fn direct_candidate_wins_over_missing_peer() {
        let direct = candidate("@heroui/theme", "2.3.0", "2.4.0", false);

        let result = aggregate(
            vec![direct.clone()],
            vec![],
            vec![],
            vec![candidate("@heroui/theme", "Missing", "2.4.0-beta.1", false)],
        );

        assert_eq!(result, vec![direct]);
    }

    #[test]
    fn latest_candidates_are_dropped_from_every_source() {
        let result = aggregate(
            vec![candidate("@heroui/button", "2.2.0", "2.2.0", true)],
            vec![candidate("react", "18.0.0", "18.0.0", true)],
            vec![candidate("@heroui/theme", "2.4.0", "2.4.0", true)],
            vec![],
        );

        assert!(result.is_empty());
    }

    #[test]
    fn latest_first_occurrence_shadows_outdated_duplicate() {
        let result = aggregate(
            vec![candidate("react", "18.3.1", "18.3.1", true)],
            vec![candidate("react", "18.3.1", "19.0.0", false)],
            vec![],
            vec![],
        );

        assert!(result.is_empty());
    }

    #[test]
    fn order_follows_sources_and_keeps_unresolved_versions() {
        let result = aggregate(
            vec![candidate("@heroui/react", "1.0.0", "1.1.0", false)],
            vec![candidate("react", "17.0.0", "18.0.0", false)],
            vec![candidate("@heroui/theme", "2.3.0", "", false)],
            vec![candidate("framer-motion", "Missing", "11.5.6", false)],
        );

        let packages: Vec<_> = result.iter().map(|c| c.package.as_str()).collect();
        assert_eq!(
            packages,
            vec!["@heroui/react", "react", "@heroui/theme", "framer-motion"]
        );
        assert_eq!(result[2].latest_version, "");
    }
}
