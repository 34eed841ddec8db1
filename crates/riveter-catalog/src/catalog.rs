//! The built-in action catalog.
//!
//! Loaded once from an embedded JSON asset and treated as read-only input to
//! the palette; nothing in the core ever mutates it.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use riveter_types::{ConfigMap, ConfigValue};

const CATALOG_ASSET: &str = include_str!("../assets/actions-catalog.json");

/// One draggable step template in the palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionTemplate {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub description: String,
    pub marketplace: String,
    #[serde(default)]
    pub config: ConfigMap,
}

impl ActionTemplate {
    /// Templates published under the official `actions/` namespace get an
    /// "Official" badge in the palette.
    pub fn is_official(&self) -> bool {
        self.marketplace.starts_with("actions/")
    }
}

/// A titled group of templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub title: String,
    pub nodes: Vec<ActionTemplate>,
}

/// The full catalog: every category in palette order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(rename = "nodeCategories")]
    pub categories: Vec<Category>,
}

static BUILTIN: OnceLock<Catalog> = OnceLock::new();

impl Catalog {
    /// The embedded built-in catalog, parsed on first access.
    pub fn builtin() -> &'static Catalog {
        BUILTIN.get_or_init(|| {
            serde_json::from_str(CATALOG_ASSET).expect("embedded action catalog must parse")
        })
    }

    /// Look up a template by its kind tag.
    pub fn template(&self, kind: &str) -> Option<&ActionTemplate> {
        self.categories
            .iter()
            .flat_map(|c| c.nodes.iter())
            .find(|t| t.kind == kind)
    }

    /// Iterate every template across all categories.
    pub fn templates(&self) -> impl Iterator<Item = &ActionTemplate> {
        self.categories.iter().flat_map(|c| c.nodes.iter())
    }

    /// The baseline configuration a node of `kind` resets to. Distinct from
    /// the template defaults: resetting strips user-entered values back to a
    /// minimal skeleton. Unknown kinds reset to an empty map.
    pub fn default_config(kind: &str) -> ConfigMap {
        match kind {
            "checkout" => ConfigMap::from([
                ("repository".to_string(), ConfigValue::from("")),
                ("ref".to_string(), ConfigValue::from("main")),
                ("token".to_string(), ConfigValue::from("")),
            ]),
            "setup-node" => ConfigMap::from([
                ("node-version".to_string(), ConfigValue::from("18")),
                ("cache".to_string(), ConfigValue::from("npm")),
            ]),
            "run" => ConfigMap::from([
                ("command".to_string(), ConfigValue::from("")),
                ("shell".to_string(), ConfigValue::from("bash")),
            ]),
            "cache" => ConfigMap::from([
                ("path".to_string(), ConfigValue::from("node_modules")),
                (
                    "key".to_string(),
                    ConfigValue::from("node-${{ hashFiles('**/package-lock.json') }}"),
                ),
            ]),
            "upload-artifact" => ConfigMap::from([
                ("name".to_string(), ConfigValue::from("artifact")),
                ("path".to_string(), ConfigValue::from("dist/")),
                ("retention-days".to_string(), ConfigValue::from(30i64)),
            ]),
            "download-artifact" => ConfigMap::from([
                ("name".to_string(), ConfigValue::from("artifact")),
                ("path".to_string(), ConfigValue::from("dist/")),
            ]),
            "deploy" => ConfigMap::from([
                ("environment".to_string(), ConfigValue::from("production")),
                ("strategy".to_string(), ConfigValue::from("rolling")),
            ]),
            _ => ConfigMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_parses() {
        let catalog = Catalog::builtin();
        assert!(!catalog.categories.is_empty());
        assert!(catalog.templates().count() >= 10);
    }

    #[test]
    fn template_lookup_by_kind() {
        let checkout = Catalog::builtin().template("checkout").unwrap();
        assert_eq!(checkout.name, "Checkout");
        assert!(checkout.is_official());
        assert_eq!(
            checkout.config.get("repository").and_then(|v| v.as_str()),
            Some("actions/checkout@v4")
        );
    }

    #[test]
    fn unknown_kind_has_no_template() {
        assert!(Catalog::builtin().template("mystery").is_none());
    }

    #[test]
    fn community_templates_are_not_official() {
        let run = Catalog::builtin().template("run").unwrap();
        assert!(!run.is_official());
    }

    #[test]
    fn every_template_kind_is_unique() {
        let catalog = Catalog::builtin();
        let mut kinds: Vec<_> = catalog.templates().map(|t| t.kind.as_str()).collect();
        let total = kinds.len();
        kinds.sort_unstable();
        kinds.dedup();
        assert_eq!(kinds.len(), total, "duplicate template kinds in catalog");
    }

    #[test]
    fn reset_defaults_for_known_kinds() {
        let config = Catalog::default_config("upload-artifact");
        assert_eq!(config.get("retention-days"), Some(&ConfigValue::Number(30.0)));
        assert_eq!(config.get("path").and_then(|v| v.as_str()), Some("dist/"));
    }

    #[test]
    fn reset_defaults_for_unknown_kind_is_empty() {
        assert!(Catalog::default_config("mystery").is_empty());
    }
}
