//! npm registry API implementation

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::config::DEFAULT_REGISTRY_URL;
use crate::version::error::RegistryError;
use crate::version::registry::{DistTags, PeerDependencies, Registry};

/// Manifest of a single published version
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NpmVersionManifest {
    #[serde(default)]
    peer_dependencies: PeerDependencies,
}

/// Registry implementation for npm registry API
pub struct NpmRegistry {
    client: reqwest::Client,
    base_url: String,
}

impl NpmRegistry {
    /// Creates a new NpmRegistry with a custom base URL
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("heroui-upgrade")
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build HTTP client, using defaults: {}", e);
                reqwest::Client::new()
            });

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Encode package name for URL (handles scoped packages)
    fn encode_package_name(package_name: &str) -> String {
        if package_name.starts_with('@') {
            // Scoped package: @scope/name -> @scope%2Fname
            package_name.replace('/', "%2F")
        } else {
            package_name.to_string()
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        package_name: &str,
    ) -> Result<T, RegistryError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RegistryError::NotFound(package_name.to_string()));
        }

        if !status.is_success() {
            warn!("npm registry returned status {}: {}", status, url);
            return Err(RegistryError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        response.json().await.map_err(|e| {
            warn!("Failed to parse npm registry response: {}", e);
            RegistryError::InvalidResponse(e.to_string())
        })
    }
}

impl Default for NpmRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_REGISTRY_URL)
    }
}

#[async_trait::async_trait]
impl Registry for NpmRegistry {
    async fn fetch_dist_tags(&self, package_name: &str) -> Result<DistTags, RegistryError> {
        let url = format!(
            "{}/-/package/{}/dist-tags",
            self.base_url,
            Self::encode_package_name(package_name)
        );
        info!("Fetching dist-tags for {}", package_name);

        self.get_json(&url, package_name).await
    }

    async fn fetch_peer_dependencies(
        &self,
        package_name: &str,
        version: &str,
    ) -> Result<PeerDependencies, RegistryError> {
        let url = format!(
            "{}/{}/{}",
            self.base_url,
            Self::encode_package_name(package_name),
            version
        );
        info!("Fetching peer dependencies for {}@{}", package_name, version);

        let manifest: NpmVersionManifest = self.get_json(&url, package_name).await?;
        Ok(manifest.peer_dependencies)
    }
}
