//! Catalog of published components and their peer requirements

use std::path::Path;

use serde::Deserialize;

use crate::project::manifest::{Dependencies, ManifestError};
use crate::version::peer::normalize_peer_version;
use crate::version::registry::PeerDependencies;
use crate::version::semver::compare_versions;

/// A component package as listed in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    /// Short name used on the command line (e.g. `button`)
    pub name: String,
    /// npm package (e.g. `@heroui/button`)
    pub package: String,
    /// Latest published version
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub peer_dependencies: PeerDependencies,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ComponentCatalog {
    #[serde(default)]
    components: Vec<Component>,
}

impl ComponentCatalog {
    pub fn new(components: Vec<Component>) -> Self {
        Self { components }
    }

    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn by_name(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }

    pub fn by_package(&self, package: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.package == package)
    }

    pub fn is_component_package(&self, package: &str) -> bool {
        self.by_package(package).is_some()
    }

    /// Catalog components present in the dependency map, in catalog order
    pub fn installed<'a>(&'a self, dependencies: &Dependencies) -> Vec<&'a Component> {
        self.components
            .iter()
            .filter(|c| dependencies.contains_key(&c.package))
            .collect()
    }

    /// Version of `peer` derived from the catalog's components.
    ///
    /// In strict mode the lowest requirement across every component that
    /// declares `peer` wins. Otherwise the published version of the first
    /// component declaring `peer` is returned. The result is normalized;
    /// None when no component declares `peer`.
    pub fn peer_requirement(&self, peer: &str, strict: bool) -> Option<String> {
        let mut declaring = self
            .components
            .iter()
            .filter_map(|c| c.peer_dependencies.get(peer).map(|range| (c, range)));

        if strict {
            declaring
                .map(|(_, range)| normalize_peer_version(range, false))
                .min_by(|a, b| compare_versions(a, b))
        } else {
            declaring
                .next()
                .map(|(component, _)| normalize_peer_version(&component.version, false))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const CATALOG: &str = r#"{
        "components": [
            {
                "name": "button",
                "package": "@heroui/button",
                "version": "2.2.0",
                "peerDependencies": { "react": ">=18.2.0", "@heroui/theme": ">=2.4.0" }
            },
            {
                "name": "card",
                "package": "@heroui/card",
                "version": "2.2.1",
                "peerDependencies": { "react": ">=18.0.0" }
            },
            {
                "name": "code",
                "package": "@heroui/code",
                "version": "2.2.0"
            }
        ]
    }"#;

    fn catalog() -> ComponentCatalog {
        serde_json::from_str(CATALOG).unwrap()
    }

    #[test]
    fn lookups_by_name_and_package() {
        let catalog = catalog();

        assert_eq!(catalog.by_name("card").unwrap().package, "@heroui/card");
        assert_eq!(catalog.by_package("@heroui/button").unwrap().name, "button");
        assert!(catalog.by_name("@heroui/card").is_none());
        assert!(!catalog.is_component_package("@heroui/theme"));
        assert!(catalog.components()[2].peer_dependencies.is_empty());
    }

    #[test]
    fn installed_returns_components_in_catalog_order() {
        let catalog = catalog();
        let deps: Dependencies = [
            ("@heroui/code".to_string(), "2.0.0".to_string()),
            ("@heroui/button".to_string(), "^2.1.0".to_string()),
            ("react".to_string(), "18.2.0".to_string()),
        ]
        .into_iter()
        .collect();

        let names: Vec<_> = catalog.installed(&deps).iter().map(|c| c.name.as_str()).collect();

        assert_eq!(names, vec!["button", "code"]);
    }

    #[rstest]
    #[case("react", true, Some("18.0.0"))]
    #[case("react", false, Some("2.2.0"))]
    #[case("@heroui/theme", false, Some("2.2.0"))]
    #[case("@heroui/theme", true, Some("2.4.0"))]
    #[case("vue", true, None)]
    fn peer_requirement_returns_expected(
        #[case] peer: &str,
        #[case] strict: bool,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(
            catalog().peer_requirement(peer, strict),
            expected.map(str::to_string)
        );
    }
}
