pub mod config;
pub mod project;
pub mod upgrade;
pub mod version;
