//! Candidates for the component packages a project installs directly

use futures::future::try_join_all;
use tracing::debug;

use crate::config::{MAIN_PACKAGE, PACKAGE_PREFIX};
use crate::project::manifest::{Dependencies, PackageRecord};
use crate::upgrade::context::UpgradeContext;
use crate::upgrade::error::UpgradeError;
use crate::upgrade::types::UpgradeCandidate;
use crate::version::channel::satisfies_target;
use crate::version::peer::normalize_peer_version;
use crate::version::registry::PeerDependencies;

/// Compare one installed package with its target version on the active channel.
pub async fn package_candidate(
    ctx: &UpgradeContext,
    record: PackageRecord,
    peer_dependencies: Option<PeerDependencies>,
) -> Result<UpgradeCandidate, UpgradeError> {
    let current = normalize_peer_version(&record.installed_version, false);
    let target = ctx.target_version(&record.name).await?;
    let is_latest = satisfies_target(&current, &target, ctx.channel());

    debug!(
        "{}: installed {}, target {} (latest: {})",
        record.name, current, target, is_latest
    );

    Ok(UpgradeCandidate {
        package: record.name,
        current_version: current,
        latest_version: target,
        is_latest,
        version_mode: record.version_mode,
        peer_dependencies,
    })
}

/// Candidates for every installed catalog component plus the main package.
///
/// Lookups run concurrently; the first failed lookup fails the whole batch.
pub async fn direct_candidates(
    ctx: &UpgradeContext,
    installed: &Dependencies,
) -> Result<Vec<UpgradeCandidate>, UpgradeError> {
    let mut targets: Vec<(PackageRecord, Option<PeerDependencies>)> = ctx
        .catalog()
        .installed(installed)
        .into_iter()
        .filter_map(|component| {
            let raw = installed.get(&component.package)?;
            let peers = (!component.peer_dependencies.is_empty())
                .then(|| component.peer_dependencies.clone());
            Some((PackageRecord::new(&component.package, raw), peers))
        })
        .collect();

    if let Some(raw) = installed.get(MAIN_PACKAGE)
        && !ctx.catalog().is_component_package(MAIN_PACKAGE)
    {
        targets.push((PackageRecord::new(MAIN_PACKAGE, raw), None));
    }

    try_join_all(
        targets
            .into_iter()
            .map(|(record, peers)| package_candidate(ctx, record, peers)),
    )
    .await
}

/// Candidates for installed `@heroui/` packages that are not catalog components.
///
/// A library that is already up to date reports its installed version as
/// the latest.
pub async fn library_candidates(
    ctx: &UpgradeContext,
    installed: &Dependencies,
) -> Result<Vec<UpgradeCandidate>, UpgradeError> {
    let libraries: Vec<PackageRecord> = installed
        .iter()
        .filter(|(name, _)| {
            name.starts_with(PACKAGE_PREFIX) && !ctx.catalog().is_component_package(name)
        })
        .map(|(name, raw)| PackageRecord::new(name, raw))
        .collect();

    if libraries.is_empty() {
        return Ok(Vec::new());
    }

    let candidates = try_join_all(
        libraries
            .into_iter()
            .map(|record| package_candidate(ctx, record, None)),
    )
    .await?;

    Ok(candidates
        .into_iter()
        .map(|mut candidate| {
            if candidate.is_latest {
                candidate.latest_version = candidate.current_version.clone();
            }
            candidate
        })
        .collect())
}
