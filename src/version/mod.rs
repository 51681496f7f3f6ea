//! Version layer: comparison, range normalization, caching and registry lookups
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Registry  │────▶│  ExecCache  │◀────│   Upgrade   │
//! │  (lookup)   │     │ (json file) │     │  resolution │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                                                ▼
//!                     ┌─────────────┐     ┌─────────────┐
//!                     │    Peer     │────▶│   Semver    │
//!                     │ (normalize) │     │  (compare)  │
//!                     └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`cache`]: JSON-file TTL cache for lookups and command results
//! - [`channel`]: latest/beta/canary selection and the up-to-date rule
//! - [`error`]: Error types for cache and registry operations
//! - [`peer`]: Peer dependency range normalization
//! - [`registry`]: Registry trait for looking up versions remotely
//! - [`registries`]: Concrete registry implementations (npm)
//! - [`semver`]: Tolerant numeric version comparison

pub mod cache;
pub mod channel;
pub mod error;
pub mod peer;
pub mod registries;
pub mod registry;
pub mod semver;
