//! Bundled default configuration and the MS²PIP model registry.
//!
//! The default configuration is compiled into the binary and parsed once. It
//! supplies the default MS²PIP modification definitions shown in the form.
use std::collections::HashSet;
use std::sync::OnceLock;

use serde_json::{Map, Value};

use crate::core::literal::to_literal;
use crate::error::{Error, Result};

const CONFIG_DEFAULT: &str = include_str!("config_default.json");

pub const DEFAULT_MS2PIP_MODEL: &str = "HCD2021";
pub const DEFAULT_FRAG_ERROR: f64 = 0.02;
pub const DEFAULT_FIXED_MODIFICATIONS: &str = "C Carbamidomethyl";
pub const DEFAULT_MODIFICATION_MAPPING: &str = "cm Carbamidomethyl\nox Oxidation\nac Acetyl\ncm Carbamidomethyl\nde Deamidated\ngl Gln->pyro-Glu";

/// The parsed bundled configuration.
#[derive(Debug, Clone)]
pub struct DefaultConfig {
    root: Map<String, Value>,
}

static BUNDLED: OnceLock<DefaultConfig> = OnceLock::new();

impl DefaultConfig {
    /// Parse a configuration document. The document must be a JSON object
    /// with an `ms2pip.modifications` list.
    pub fn from_json(text: &str) -> Result<Self> {
        let root = match serde_json::from_str::<Value>(text)? {
            Value::Object(root) => root,
            _ => return Err(Error::External("default configuration is not an object".into())),
        };
        let config = Self { root };
        if config.ms2pip_modifications_value().is_none() {
            return Err(Error::External(
                "default configuration lacks ms2pip.modifications".into(),
            ));
        }
        Ok(config)
    }

    /// The configuration shipped with the binary.
    pub fn bundled() -> &'static DefaultConfig {
        BUNDLED.get_or_init(|| {
            Self::from_json(CONFIG_DEFAULT).expect("bundled config_default.json is valid")
        })
    }

    pub fn section(&self, name: &str) -> Option<&Map<String, Value>> {
        self.root.get(name).and_then(Value::as_object)
    }

    fn ms2pip_modifications_value(&self) -> Option<&Vec<Value>> {
        self.section("ms2pip")?
            .get("modifications")
            .and_then(Value::as_array)
    }

    pub fn ms2pip_modifications(&self) -> &[Value] {
        self.ms2pip_modifications_value()
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Default text for the modification definitions field.
    pub fn ms2pip_modifications_text(&self) -> String {
        to_literal(&Value::Array(self.ms2pip_modifications().to_vec()))
    }
}

/// Registry of valid MS²PIP model names, used to populate and validate the
/// model choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRegistry {
    names: Vec<String>,
}

impl ModelRegistry {
    pub fn builtin() -> Self {
        Self::from_names([
            "CID",
            "HCD2019",
            "HCD2021",
            "TTOF5600",
            "TMT",
            "iTRAQ",
            "iTRAQphospho",
            "HCDch2",
            "CIDch2",
            "Immuno-HCD",
            "CID-TMT",
            "timsTOF2023",
            "timsTOF2024",
        ])
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let names = names
            .into_iter()
            .map(Into::into)
            .filter(|name: &String| seen.insert(name.clone()))
            .collect();
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::literal::parse_literal;

    #[test]
    fn bundled_config_has_modifications() {
        let config = DefaultConfig::bundled();
        let mods = config.ms2pip_modifications();
        assert!(mods.len() > 1);
        assert!(mods.iter().all(Value::is_object));
        assert_eq!(
            config.section("ms2pip").unwrap()["model"],
            Value::from(DEFAULT_MS2PIP_MODEL)
        );
    }

    #[test]
    fn default_modifications_text_parses_back() {
        let config = DefaultConfig::bundled();
        let text = config.ms2pip_modifications_text();
        let parsed = parse_literal(&text).unwrap();
        assert_eq!(parsed.as_array().unwrap(), config.ms2pip_modifications());
    }

    #[test]
    fn rejects_config_without_modifications() {
        assert!(DefaultConfig::from_json(r#"{"ms2pip": {}}"#).is_err());
        assert!(DefaultConfig::from_json("[]").is_err());
        assert!(DefaultConfig::from_json("{").is_err());
    }

    #[test]
    fn registry_knows_default_model() {
        let registry = ModelRegistry::builtin();
        assert!(registry.contains(DEFAULT_MS2PIP_MODEL));
        assert!(!registry.contains("hcd2021"));
        assert_eq!(ModelRegistry::default(), registry);
    }

    #[test]
    fn registry_drops_repeated_names_keeping_first_order() {
        let registry = ModelRegistry::from_names(["HCD2021", "CID", "TMT", "CID", "HCD2021"]);
        assert_eq!(registry.names(), ["HCD2021", "CID", "TMT"]);
    }
}
