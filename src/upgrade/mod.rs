//! Upgrade resolution: from installed packages to a deduplicated upgrade plan
//!
//! # Flow
//!
//! ```text
//! package.json ──▶ direct ──▶ peer ──▶ aggregate ──▶ plan
//!                    │          │
//!                    ▼          ▼
//!                 context ◀── missing
//!            (channel, registry, cache)
//! ```
//!
//! # Modules
//!
//! - [`aggregate`]: Merge and deduplicate candidates from every source
//! - [`check`]: Peer requirements a set of packages still needs
//! - [`context`]: Channel, registry, cache and per-invocation version store
//! - [`direct`]: Candidates for installed components and libraries
//! - [`error`]: Error type for resolution
//! - [`peer`]: Peer dependency resolution and missing peers
//! - [`plan`]: End-to-end planning for one request
//! - [`required`]: Packages a component setup needs installed
//! - [`summary`]: Counts of planned upgrades by kind
//! - [`types`]: Candidate and missing-peer types

pub mod aggregate;
pub mod check;
pub mod context;
pub mod direct;
pub mod error;
pub mod peer;
pub mod plan;
pub mod required;
pub mod summary;
pub mod types;

pub use context::{StoreKey, UpgradeContext};
pub use error::UpgradeError;
pub use plan::{UpgradeOutcome, UpgradeRequest, plan_upgrade};
pub use required::{InstallMode, check_required_content};
pub use summary::UpgradeSummary;
pub use types::{MissingDependency, MissingSet, UpgradeCandidate};
