//! Registry implementations for looking up package versions

pub mod npm;

pub use npm::NpmRegistry;
