//! Full upgrade resolution for a project

use futures::future::try_join_all;
use tracing::{debug, info};

use crate::config::MAIN_PACKAGE;
use crate::project::manifest::PackageManifest;
use crate::upgrade::aggregate::aggregate;
use crate::upgrade::context::UpgradeContext;
use crate::upgrade::direct::{direct_candidates, library_candidates};
use crate::upgrade::error::UpgradeError;
use crate::upgrade::peer::{resolve_missing, resolve_peer_dependencies};
use crate::upgrade::types::{MissingSet, UpgradeCandidate};
use crate::version::registry::PeerDependencies;

/// What to upgrade
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpgradeRequest {
    /// Upgrade every installed component along with the ancillary libraries
    pub all: bool,
    /// Component names or packages; empty selects every outdated component
    pub components: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpgradeOutcome {
    /// The manifest lists no component package
    NoComponentsDetected,
    /// Nothing selected needs an upgrade
    UpToDate,
    Planned(Vec<UpgradeCandidate>),
}

fn select(
    ctx: &UpgradeContext,
    direct: &[UpgradeCandidate],
    request: &UpgradeRequest,
) -> Result<Vec<UpgradeCandidate>, UpgradeError> {
    if request.all {
        return Ok(direct.to_vec());
    }

    if request.components.is_empty() {
        return Ok(direct.iter().filter(|c| !c.is_latest).cloned().collect());
    }

    request
        .components
        .iter()
        .map(|name| {
            let package = ctx
                .catalog()
                .by_name(name)
                .map_or(name.as_str(), |c| c.package.as_str());

            direct
                .iter()
                .find(|c| c.package == package)
                .cloned()
                .ok_or_else(|| UpgradeError::UnknownComponent(name.clone()))
        })
        .collect()
}

async fn peers_of(
    ctx: &UpgradeContext,
    candidate: &UpgradeCandidate,
) -> Result<PeerDependencies, UpgradeError> {
    if let Some(peers) = &candidate.peer_dependencies {
        return Ok(peers.clone());
    }

    let version = if candidate.latest_version.is_empty() {
        &candidate.current_version
    } else {
        &candidate.latest_version
    };
    ctx.peer_dependencies(&candidate.package, version).await
}

/// Resolve everything an upgrade of `manifest` would change.
pub async fn plan_upgrade(
    ctx: &UpgradeContext,
    manifest: &PackageManifest,
    request: &UpgradeRequest,
) -> Result<UpgradeOutcome, UpgradeError> {
    let installed = manifest.all_dependencies();

    let direct = direct_candidates(ctx, &installed).await?;
    if direct.is_empty() {
        return Ok(UpgradeOutcome::NoComponentsDetected);
    }

    let selected = select(ctx, &direct, request)?;
    if selected.is_empty() {
        info!("All components are up to date");
        return Ok(UpgradeOutcome::UpToDate);
    }

    let peer_maps = try_join_all(selected.iter().map(|c| peers_of(ctx, c))).await?;

    let mut missing = MissingSet::new();
    let mut peers = Vec::new();
    for (candidate, peer_map) in selected.iter().zip(&peer_maps) {
        peers.extend(resolve_peer_dependencies(
            ctx.channel(),
            &candidate.package,
            &installed,
            &mut missing,
            peer_map,
        ));
    }

    let libraries = if request.all && installed.contains_key(MAIN_PACKAGE) {
        library_candidates(ctx, &installed).await?
    } else {
        Vec::new()
    };

    let missing = resolve_missing(ctx, &missing).await?;
    debug!(
        "Aggregating {} direct, {} peer, {} library and {} missing candidates",
        selected.len(),
        peers.len(),
        libraries.len(),
        missing.len()
    );

    let plan = aggregate(selected, peers, libraries, missing);
    if plan.is_empty() {
        return Ok(UpgradeOutcome::UpToDate);
    }

    info!("Planned {} upgrades", plan.len());
    Ok(UpgradeOutcome::Planned(plan))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::catalog::{Component, ComponentCatalog};
    use crate::project::manifest::Dependencies;
    use crate::version::cache::ExecCache;
    use crate::version::channel::Channel;
    use crate::version::registry::MockRegistry;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn map(pairs: &[(&str, &str)]) -> Dependencies {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn catalog() -> ComponentCatalog {
        ComponentCatalog::new(vec![
            Component {
                name: "button".to_string(),
                package: "@heroui/button".to_string(),
                version: "2.2.0".to_string(),
                peer_dependencies: map(&[("react", ">=18.0.0"), ("@heroui/theme", ">=2.4.0")]),
            },
            Component {
                name: "card".to_string(),
                package: "@heroui/card".to_string(),
                version: "2.2.1".to_string(),
                peer_dependencies: map(&[("react", ">=18.0.0")]),
            },
        ])
    }

    fn context(dir: &TempDir, registry: MockRegistry) -> UpgradeContext {
        let cache = ExecCache::init(&dir.path().join("cache.json"), false).unwrap();
        UpgradeContext::new(Channel::Latest, Arc::new(registry), cache, catalog())
    }

    fn manifest(deps: &str) -> PackageManifest {
        PackageManifest::parse(&format!(r#"{{"dependencies": {}}}"#, deps)).unwrap()
    }

    fn request(all: bool, components: &[&str]) -> UpgradeRequest {
        UpgradeRequest {
            all,
            components: components.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn reports_no_components_when_none_installed() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir, MockRegistry::new());

        let outcome = plan_upgrade(&ctx, &manifest(r#"{"react": "18.2.0"}"#), &request(false, &[]))
            .await
            .unwrap();

        assert_eq!(outcome, UpgradeOutcome::NoComponentsDetected);
    }

    #[tokio::test]
    async fn reports_up_to_date_when_nothing_is_outdated() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir, MockRegistry::new());

        let outcome = plan_upgrade(
            &ctx,
            &manifest(r#"{"@heroui/card": "2.2.1", "react": "18.2.0"}"#),
            &request(false, &[]),
        )
        .await
        .unwrap();

        assert_eq!(outcome, UpgradeOutcome::UpToDate);
    }

    #[tokio::test]
    async fn named_component_brings_its_peers_and_missing_dependencies() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir, MockRegistry::new());

        let outcome = plan_upgrade(
            &ctx,
            &manifest(r#"{"@heroui/button": "^2.1.0", "@heroui/card": "2.2.0", "react": "17.0.2"}"#),
            &request(false, &["button"]),
        )
        .await
        .unwrap();

        let UpgradeOutcome::Planned(plan) = outcome else {
            panic!("expected a plan, got {:?}", outcome);
        };
        let packages: Vec<_> = plan
            .iter()
            .map(|c| (c.package.as_str(), c.current_version.as_str(), c.latest_version.as_str()))
            .collect();
        assert_eq!(
            packages,
            vec![
                ("@heroui/button", "2.1.0", "2.2.0"),
                ("react", "17.0.2", "18.0.0"),
                ("@heroui/theme", "Missing", "2.4.0"),
            ]
        );
    }

    #[tokio::test]
    async fn unknown_component_is_rejected() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir, MockRegistry::new());

        let result = plan_upgrade(
            &ctx,
            &manifest(r#"{"@heroui/button": "2.1.0"}"#),
            &request(false, &["buton"]),
        )
        .await;

        assert!(matches!(result, Err(UpgradeError::UnknownComponent(name)) if name == "buton"));
    }

    #[tokio::test]
    async fn all_includes_libraries_when_main_package_is_installed() {
        let dir = TempDir::new().unwrap();
        let mut registry = MockRegistry::new();
        registry.expect_fetch_dist_tags().returning(|name| {
            let version = if name == MAIN_PACKAGE { "2.7.0" } else { "2.4.6" };
            Ok([("latest".to_string(), version.to_string())].into_iter().collect())
        });
        registry
            .expect_fetch_peer_dependencies()
            .returning(|_, _| Ok(map(&[("react", ">=18.0.0")])));
        let ctx = context(&dir, registry);

        let outcome = plan_upgrade(
            &ctx,
            &manifest(r#"{"@heroui/react": "2.6.0", "@heroui/theme": "2.4.0", "react": "18.2.0"}"#),
            &request(true, &[]),
        )
        .await
        .unwrap();

        let UpgradeOutcome::Planned(plan) = outcome else {
            panic!("expected a plan, got {:?}", outcome);
        };
        let packages: Vec<_> = plan
            .iter()
            .map(|c| (c.package.as_str(), c.latest_version.as_str()))
            .collect();
        assert_eq!(
            packages,
            vec![("@heroui/react", "2.7.0"), ("@heroui/theme", "2.4.6")]
        );
    }
}
