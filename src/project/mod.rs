//! Project metadata: the consumer's package.json and the component catalog
//!
//! - manifest.rs: package.json reading, dependency maps, version write-back
//! - catalog.rs: published components and their peer requirements

pub mod catalog;
pub mod manifest;

pub use catalog::{Component, ComponentCatalog};
pub use manifest::{Dependencies, ManifestError, PackageManifest, PackageRecord};
