use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use heroui_upgrade::config::{self, Config};
use heroui_upgrade::project::{ComponentCatalog, PackageManifest};
use heroui_upgrade::upgrade::check::check_peer_dependencies;
use heroui_upgrade::upgrade::{
    InstallMode, UpgradeCandidate, UpgradeContext, UpgradeOutcome, UpgradeRequest,
    UpgradeSummary, check_required_content, plan_upgrade,
};
use heroui_upgrade::version::cache::ExecCache;
use heroui_upgrade::version::channel::Channel;
use heroui_upgrade::version::registries::NpmRegistry;

const LOG_ENV: &str = "HEROUI_UPGRADE_LOG";

#[derive(Parser)]
#[command(name = "heroui-upgrade")]
#[command(version, about = "Upgrade HeroUI components and their peer dependencies")]
struct Cli {
    /// Log at debug level
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct ProjectArgs {
    /// Path to the project's package.json
    #[arg(long, default_value = "package.json")]
    package_path: PathBuf,

    /// Component catalog (JSON) describing the published components
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Ignore cached lookups for this run
    #[arg(long)]
    no_cache: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Plan (and optionally apply) upgrades
    Upgrade {
        /// Component names or packages to upgrade
        components: Vec<String>,

        /// Upgrade every component and the ancillary libraries
        #[arg(long)]
        all: bool,

        #[arg(long, conflicts_with = "canary")]
        beta: bool,

        #[arg(long)]
        canary: bool,

        /// Write the planned versions back to package.json
        #[arg(long)]
        write: bool,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        project: ProjectArgs,
    },
    /// List peer dependencies the given packages still need
    Peers {
        packages: Vec<String>,

        #[command(flatten)]
        project: ProjectArgs,
    },
    /// List required packages that are not installed
    Required {
        /// Packages whose peer dependencies are checked as well
        packages: Vec<String>,

        /// Components are installed individually rather than through the main package
        #[arg(long)]
        partial: bool,

        #[arg(long, conflicts_with = "canary")]
        beta: bool,

        #[arg(long)]
        canary: bool,

        #[command(flatten)]
        project: ProjectArgs,
    },
    /// Show the version of a peer dependency derived from the catalog
    Peer {
        name: String,

        /// Print the first declaring component's own version instead of
        /// the lowest requirement
        #[arg(long)]
        lenient: bool,

        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Manage the lookup cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Print the cache file location
    Path,
    /// Delete the cache file
    Clear,
}

fn init_logging(debug: bool) -> anyhow::Result<WorkerGuard> {
    let log_dir = config::log_dir();
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory {:?}", log_dir))?;

    let appender = tracing_appender::rolling::never(&log_dir, "heroui-upgrade.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .init();

    Ok(guard)
}

fn load_catalog(path: Option<&Path>) -> anyhow::Result<ComponentCatalog> {
    match path {
        Some(path) => ComponentCatalog::load(path)
            .with_context(|| format!("failed to load component catalog {:?}", path)),
        None => Ok(ComponentCatalog::default()),
    }
}

fn build_context(
    config: &Config,
    channel: Channel,
    project: &ProjectArgs,
) -> anyhow::Result<UpgradeContext> {
    let cache = ExecCache::init(&config::cache_path(), project.no_cache || config.cache.disabled)?
        .with_ttl(config.cache.ttl);
    let registry = Arc::new(NpmRegistry::new(&config.registry.url));
    let catalog = load_catalog(project.catalog.as_deref())?;

    Ok(UpgradeContext::new(channel, registry, cache, catalog))
}

fn select_channel(beta: bool, canary: bool) -> Channel {
    if beta {
        Channel::Beta
    } else if canary {
        Channel::Canary
    } else {
        Channel::Latest
    }
}

fn print_plan(plan: &[UpgradeCandidate]) {
    let width = plan.iter().map(|c| c.package.len()).max().unwrap_or(0);

    for candidate in plan {
        let latest = if candidate.latest_version.is_empty() {
            "unknown"
        } else {
            candidate.latest_version.as_str()
        };
        println!(
            "{:width$}  {} -> {}{}",
            candidate.package,
            candidate.current_version,
            candidate.version_mode,
            latest,
            width = width
        );
    }

    let summary = UpgradeSummary::from_candidates(plan);
    println!(
        "\n{} upgrades ({} major, {} minor, {} patch)",
        summary.total(),
        summary.major,
        summary.minor,
        summary.patch
    );
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(&config::config_path())?;

    match cli.command {
        Command::Upgrade {
            components,
            all,
            beta,
            canary,
            write,
            json,
            project,
        } => {
            let ctx = build_context(&config, select_channel(beta, canary), &project)?;
            let mut manifest = PackageManifest::load(&project.package_path)
                .with_context(|| format!("failed to load {:?}", project.package_path))?;

            let request = UpgradeRequest { all, components };
            let plan = match plan_upgrade(&ctx, &manifest, &request).await? {
                UpgradeOutcome::NoComponentsDetected => {
                    println!("No HeroUI components detected in {:?}", project.package_path);
                    return Ok(());
                }
                UpgradeOutcome::UpToDate => {
                    println!("All components are already up to date");
                    return Ok(());
                }
                UpgradeOutcome::Planned(plan) => plan,
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                print_plan(&plan);
            }

            if write {
                manifest.write_upgrade_versions(&plan);
                manifest.save(&project.package_path)?;
                info!("Applied {} upgrades", plan.len());
            }
        }
        Command::Peers { packages, project } => {
            let ctx = build_context(&config, Channel::Latest, &project)?;
            let manifest = PackageManifest::load(&project.package_path)
                .with_context(|| format!("failed to load {:?}", project.package_path))?;

            let required =
                check_peer_dependencies(&ctx, &manifest.all_dependencies(), &packages).await?;
            for entry in required {
                println!("{}", entry);
            }
        }
        Command::Required {
            packages,
            partial,
            beta,
            canary,
            project,
        } => {
            let ctx = build_context(&config, select_channel(beta, canary), &project)?;
            let manifest = PackageManifest::load(&project.package_path)
                .with_context(|| format!("failed to load {:?}", project.package_path))?;
            let mode = if partial {
                InstallMode::Partial
            } else {
                InstallMode::All
            };

            let missing =
                check_required_content(&ctx, mode, &manifest.all_dependencies(), &packages)
                    .await?;
            if missing.is_empty() {
                println!("All required packages are installed");
            }
            for entry in missing {
                println!("{}", entry);
            }
        }
        Command::Peer {
            name,
            lenient,
            catalog,
        } => {
            let catalog = load_catalog(catalog.as_deref())?;
            match catalog.peer_requirement(&name, !lenient) {
                Some(version) => println!("{}", version),
                None => anyhow::bail!("no component requires {}", name),
            }
        }
        Command::Cache { action } => {
            let cache = ExecCache::init(&config::cache_path(), config.cache.disabled)?;
            match action {
                CacheAction::Path => println!("{}", cache.path().display()),
                CacheAction::Clear => {
                    cache.remove()?;
                    println!("Removed {}", cache.path().display());
                }
            }
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging(cli.debug)?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli))
}
