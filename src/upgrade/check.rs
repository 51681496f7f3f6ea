//! Peer dependency check for a set of installed packages

use futures::future::try_join_all;
use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::project::manifest::{Dependencies, PackageRecord};
use crate::upgrade::context::UpgradeContext;
use crate::upgrade::error::UpgradeError;
use crate::upgrade::peer::{resolve_missing, resolve_peer_dependencies};
use crate::upgrade::types::MissingSet;
use crate::version::registry::PeerDependencies;
use crate::version::semver::compare_versions;

async fn peers_of(
    ctx: &UpgradeContext,
    installed: &Dependencies,
    package: &str,
) -> Result<PeerDependencies, UpgradeError> {
    if let Some(component) = ctx.catalog().by_package(package)
        && !component.peer_dependencies.is_empty()
    {
        return Ok(component.peer_dependencies.clone());
    }

    let version = match installed.get(package) {
        Some(raw) => PackageRecord::new(package, raw).installed_version,
        None => ctx.target_version(package).await?,
    };
    ctx.peer_dependencies(package, &version).await
}

/// Peers of `package_names` that must be installed or upgraded.
///
/// Returns `name@version` entries in first-seen order. When several
/// packages require the same peer, the highest required version is kept.
pub async fn check_peer_dependencies(
    ctx: &UpgradeContext,
    installed: &Dependencies,
    package_names: &[String],
) -> Result<Vec<String>, UpgradeError> {
    let peer_maps = try_join_all(
        package_names
            .iter()
            .map(|package| peers_of(ctx, installed, package)),
    )
    .await?;

    let mut missing = MissingSet::new();
    let mut outdated = Vec::new();
    for (package, peers) in package_names.iter().zip(&peer_maps) {
        outdated.extend(resolve_peer_dependencies(
            ctx.channel(),
            package,
            installed,
            &mut missing,
            peers,
        ));
    }
    outdated.extend(resolve_missing(ctx, &missing).await?);

    let mut required: IndexMap<String, String> = IndexMap::new();
    for candidate in outdated.into_iter().filter(|c| !c.is_latest) {
        match required.entry(candidate.package) {
            Entry::Occupied(mut entry) => {
                if compare_versions(&candidate.latest_version, entry.get()).is_gt() {
                    entry.insert(candidate.latest_version);
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(candidate.latest_version);
            }
        }
    }

    Ok(required
        .into_iter()
        .map(|(name, version)| format!("{}@{}", name, version))
        .collect())
}
