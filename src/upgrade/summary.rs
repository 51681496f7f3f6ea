//! Counts of planned upgrades by kind

use crate::upgrade::types::UpgradeCandidate;
use crate::version::peer::normalize_peer_version;
use crate::version::semver::UpgradeKind;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpgradeSummary {
    pub major: usize,
    pub minor: usize,
    pub patch: usize,
}

impl UpgradeSummary {
    /// Missing packages count as major upgrades.
    pub fn from_candidates(candidates: &[UpgradeCandidate]) -> Self {
        let mut summary = Self::default();

        for candidate in candidates {
            let kind = if candidate.is_missing() {
                Some(UpgradeKind::Major)
            } else {
                UpgradeKind::between(
                    &normalize_peer_version(&candidate.current_version, false),
                    &normalize_peer_version(&candidate.latest_version, false),
                )
            };

            match kind {
                Some(UpgradeKind::Major) => summary.major += 1,
                Some(UpgradeKind::Minor) => summary.minor += 1,
                Some(UpgradeKind::Patch) => summary.patch += 1,
                None => {}
            }
        }

        summary
    }

    pub fn total(&self) -> usize {
        self.major + self.minor + self.patch
    }
}
