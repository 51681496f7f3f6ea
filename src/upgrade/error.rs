use thiserror::Error;

use crate::version::error::RegistryError;

#[derive(Debug, Error)]
pub enum UpgradeError {
    #[error("Registry lookup failed: {0}")]
    Registry(#[from] RegistryError),

    #[error("Component '{0}' not found")]
    UnknownComponent(String),
}
