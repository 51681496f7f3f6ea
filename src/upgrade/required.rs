//! Check that the packages a component setup depends on are installed

use futures::future::try_join_all;
use tracing::debug;

use crate::config::{FRAMER_MOTION, MAIN_PACKAGE, SYSTEM_PACKAGE, TAILWINDCSS, THEME_PACKAGE};
use crate::project::manifest::Dependencies;
use crate::upgrade::check::check_peer_dependencies;
use crate::upgrade::context::UpgradeContext;
use crate::upgrade::error::UpgradeError;

/// How the components are installed in a project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallMode {
    /// Everything through the main package
    All,
    /// Individual component packages
    Partial,
}

impl InstallMode {
    /// Required packages in report order, paired with whether they follow
    /// the release channel.
    fn required(&self) -> &'static [(&'static str, bool)] {
        match self {
            InstallMode::All => &[(MAIN_PACKAGE, true), (FRAMER_MOTION, false), (TAILWINDCSS, false)],
            InstallMode::Partial => &[
                (FRAMER_MOTION, false),
                (SYSTEM_PACKAGE, true),
                (THEME_PACKAGE, true),
                (TAILWINDCSS, false),
            ],
        }
    }
}

async fn install_target(
    ctx: &UpgradeContext,
    package: &'static str,
    follows_channel: bool,
) -> Result<String, UpgradeError> {
    if follows_channel && ctx.channel().is_prerelease() {
        let version = ctx.target_version(package).await?;
        return Ok(format!("{}@{}", package, version));
    }
    Ok(package.to_string())
}

/// Packages `mode` requires that are missing from `installed`.
///
/// On beta and canary channels the channel packages are pinned as
/// `name@version`. When `peer_packages` is not empty, the peers those
/// packages still need are appended. An empty result means the setup is
/// complete.
pub async fn check_required_content(
    ctx: &UpgradeContext,
    mode: InstallMode,
    installed: &Dependencies,
    peer_packages: &[String],
) -> Result<Vec<String>, UpgradeError> {
    let missing: Vec<_> = mode
        .required()
        .iter()
        .filter(|(package, _)| !installed.contains_key(*package))
        .collect();
    debug!("{:?} setup is missing {} packages", mode, missing.len());

    let mut result = try_join_all(
        missing
            .into_iter()
            .map(|(package, follows_channel)| install_target(ctx, *package, *follows_channel)),
    )
    .await?;

    if !peer_packages.is_empty() {
        result.extend(check_peer_dependencies(ctx, installed, peer_packages).await?);
    }

    Ok(result)
}
