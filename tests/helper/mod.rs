#![allow(dead_code)]

pub mod registry;

pub use registry::{MockRegistry, create_test_cache, create_test_context, manifest};
