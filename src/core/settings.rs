//! Assembly of the nested rescoring configuration from flat form values.
//!
//! The form submits one value per field. [`parse_settings`] keeps the scalar
//! settings under `general` and relocates the MaxQuant and MS²PIP text blocks
//! into their own sections, parsing them on the way. Every failure names the
//! form field so the user can fix the input and resubmit.
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::core::literal::parse_literal;
use crate::error::{Error, Result};

pub const MODIFICATION_MAPPING: &str = "modification_mapping";
pub const FIXED_MODIFICATIONS: &str = "fixed_modifications";
pub const MS2PIP_MODEL: &str = "ms2pip_model";
pub const MS2PIP_FRAG_ERROR: &str = "ms2pip_frag_error";
pub const MS2PIP_MODIFICATIONS: &str = "ms2pip_modifications";

/// Keys moved out of `general` by [`parse_settings`].
pub const RELOCATED_FIELDS: [&str; 5] = [
    MODIFICATION_MAPPING,
    FIXED_MODIFICATIONS,
    MS2PIP_MODEL,
    MS2PIP_FRAG_ERROR,
    MS2PIP_MODIFICATIONS,
];

/// Flat form values, one entry per user-facing input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawFormValues(Map<String, Value>);

impl RawFormValues {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn insert<V: Into<Value>>(&mut self, field: &str, value: V) -> Option<Value> {
        self.0.insert(field.to_string(), value.into())
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for RawFormValues {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Label to full modification name, in the order the lines were given.
pub type ModificationMap = IndexMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaxquantSettings {
    pub modification_mapping: ModificationMap,
    pub fixed_modifications: ModificationMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ms2pipSettings {
    pub model: String,
    pub frag_error: f64,
    /// Modification definition records, passed through untouched
    pub modifications: Vec<Map<String, Value>>,
}

/// The nested configuration handed to the rescoring entry point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedConfiguration {
    pub general: Map<String, Value>,
    pub maxquant_to_rescore: MaxquantSettings,
    pub ms2pip: Ms2pipSettings,
}

impl ParsedConfiguration {
    /// Path of the identification file, if the form supplied one.
    pub fn identification_file(&self) -> Option<&str> {
        self.general.get("identification_file").and_then(Value::as_str)
    }
}

/// Reshape flat form values into a [`ParsedConfiguration`].
pub fn parse_settings(raw: RawFormValues) -> Result<ParsedConfiguration> {
    let mut general = raw.into_inner();

    let modification_mapping = take_modification_map(&mut general, MODIFICATION_MAPPING)?;
    let fixed_modifications = take_modification_map(&mut general, FIXED_MODIFICATIONS)?;

    let model = match take(&mut general, MS2PIP_MODEL)? {
        Value::String(model) if !model.trim().is_empty() => model,
        other => {
            return Err(Error::configuration(
                MS2PIP_MODEL,
                format!("expected a model name, got {other}"),
            ));
        }
    };
    let frag_error = take(&mut general, MS2PIP_FRAG_ERROR)?
        .as_f64()
        .ok_or_else(|| Error::configuration(MS2PIP_FRAG_ERROR, "expected a decimal number"))?;

    let modifications = match take(&mut general, MS2PIP_MODIFICATIONS)? {
        Value::String(text) => parse_modification_definitions(&text)?,
        other => {
            return Err(Error::configuration(
                MS2PIP_MODIFICATIONS,
                format!("expected modification definitions text, got {other}"),
            ));
        }
    };
    debug!(
        "Parsed settings: {} mapped labels, {} fixed modifications, {} MS²PIP modification definitions",
        modification_mapping.len(),
        fixed_modifications.len(),
        modifications.len()
    );

    Ok(ParsedConfiguration {
        general,
        maxquant_to_rescore: MaxquantSettings {
            modification_mapping,
            fixed_modifications,
        },
        ms2pip: Ms2pipSettings {
            model,
            frag_error,
            modifications,
        },
    })
}

fn take(general: &mut Map<String, Value>, field: &'static str) -> Result<Value> {
    general
        .remove(field)
        .ok_or_else(|| Error::configuration(field, "field is missing"))
}

fn take_modification_map(
    general: &mut Map<String, Value>,
    field: &'static str,
) -> Result<ModificationMap> {
    match take(general, field)? {
        Value::Null => Ok(ModificationMap::new()),
        Value::String(text) => parse_modification_lines(field, &text),
        other => Err(Error::configuration(
            field,
            format!("expected modification text, got {other}"),
        )),
    }
}

/// Parse `<label> <full name>` lines into a map. Empty text gives an empty
/// map. A repeated label keeps its last full name.
pub fn parse_modification_lines(field: &'static str, text: &str) -> Result<ModificationMap> {
    let mut map = ModificationMap::new();
    if text.is_empty() {
        return Ok(map);
    }
    let text = text.strip_suffix('\n').unwrap_or(text);
    for (index, line) in text.split('\n').enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let mut tokens = line.split(' ');
        let (label, name) = match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(label), Some(name), None) if !label.is_empty() && !name.is_empty() => {
                (label, name)
            }
            _ => {
                return Err(Error::configuration(
                    field,
                    format!(
                        "line {} ({line:?}) must be a label and a full modification name separated by a single space",
                        index + 1
                    ),
                ));
            }
        };
        if let Some(previous) = map.insert(label.to_string(), name.to_string()) {
            if previous != name {
                warn!(
                    "Label '{}' in {} is defined more than once, using '{}' instead of '{}'",
                    label, field, name, previous
                );
            }
        }
    }
    Ok(map)
}

/// Parse the literal list of modification definition records.
pub fn parse_modification_definitions(text: &str) -> Result<Vec<Map<String, Value>>> {
    let value = parse_literal(text).map_err(|e| Error::configuration(MS2PIP_MODIFICATIONS, e.to_string()))?;
    let Value::Array(items) = value else {
        return Err(Error::configuration(
            MS2PIP_MODIFICATIONS,
            "expected a list of modification definitions",
        ));
    };
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(record) => Ok(record),
            other => Err(Error::configuration(
                MS2PIP_MODIFICATIONS,
                format!("entry {} is not a dictionary: {other}", index + 1),
            )),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::params::FormParams;
    use serde_json::json;

    fn raw(fixed: &str, mapping: &str, modifications: &str) -> RawFormValues {
        let mut raw = RawFormValues::new();
        raw.insert("identification_file", "msms.txt");
        raw.insert("pipeline", "maxquant");
        raw.insert(FIXED_MODIFICATIONS, fixed);
        raw.insert(MODIFICATION_MAPPING, mapping);
        raw.insert(MS2PIP_MODEL, "HCD2021");
        raw.insert(MS2PIP_FRAG_ERROR, 0.02);
        raw.insert(MS2PIP_MODIFICATIONS, modifications);
        raw
    }

    fn map(pairs: &[(&str, &str)]) -> ModificationMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn relocates_maxquant_sections() {
        let config = parse_settings(raw("C Carbamidomethyl", "ox Oxidation\nac Acetyl", "[]")).unwrap();
        assert_eq!(
            config.maxquant_to_rescore.fixed_modifications,
            map(&[("C", "Carbamidomethyl")])
        );
        assert_eq!(
            config.maxquant_to_rescore.modification_mapping,
            map(&[("ox", "Oxidation"), ("ac", "Acetyl")])
        );
        assert_eq!(
            serde_json::to_value(&config.maxquant_to_rescore).unwrap(),
            json!({
                "modification_mapping": {"ox": "Oxidation", "ac": "Acetyl"},
                "fixed_modifications": {"C": "Carbamidomethyl"}
            })
        );
    }

    #[test]
    fn builds_ms2pip_section() {
        let config = parse_settings(raw("", "", "[]")).unwrap();
        assert_eq!(
            serde_json::to_value(&config.ms2pip).unwrap(),
            json!({"model": "HCD2021", "frag_error": 0.02, "modifications": []})
        );
    }

    #[test]
    fn general_loses_relocated_fields_only() {
        let config = parse_settings(raw("", "", "[]")).unwrap();
        for field in RELOCATED_FIELDS {
            assert!(!config.general.contains_key(field), "{field} left in general");
        }
        assert_eq!(config.general.len(), 2);
        assert_eq!(config.identification_file(), Some("msms.txt"));
        assert_eq!(config.general["pipeline"], json!("maxquant"));
    }

    #[test]
    fn empty_text_is_an_empty_map() {
        assert!(parse_modification_lines(FIXED_MODIFICATIONS, "").unwrap().is_empty());
        let mut values = raw("", "", "[]");
        values.insert(FIXED_MODIFICATIONS, Value::Null);
        let config = parse_settings(values).unwrap();
        assert!(config.maxquant_to_rescore.fixed_modifications.is_empty());
        assert!(config.maxquant_to_rescore.modification_mapping.is_empty());
    }

    #[test]
    fn one_entry_per_line() {
        let parsed = parse_modification_lines(
            MODIFICATION_MAPPING,
            "cm Carbamidomethyl\r\nde Deamidated\ngl Gln->pyro-Glu\n",
        )
        .unwrap();
        assert_eq!(
            parsed,
            map(&[
                ("cm", "Carbamidomethyl"),
                ("de", "Deamidated"),
                ("gl", "Gln->pyro-Glu")
            ])
        );
    }

    #[test]
    fn duplicate_label_keeps_last() {
        let parsed = parse_modification_lines(
            MODIFICATION_MAPPING,
            "cm Carbamidomethyl\nox Oxidation\ncm Propionamide",
        )
        .unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed["cm"], "Propionamide");

        let defaults = FormParams::default();
        let parsed = parse_modification_lines(MODIFICATION_MAPPING, &defaults.modification_mapping).unwrap();
        assert_eq!(parsed.len(), 5);
    }

    #[test]
    fn malformed_lines_name_the_field() {
        for (field, text) in [
            (FIXED_MODIFICATIONS, "Carbamidomethyl"),
            (FIXED_MODIFICATIONS, "C Carbamido methyl"),
            (MODIFICATION_MAPPING, "ox Oxidation\n\nac Acetyl"),
            (MODIFICATION_MAPPING, "ox  Oxidation"),
            (MODIFICATION_MAPPING, " "),
        ] {
            let err = parse_modification_lines(field, text).unwrap_err();
            assert_eq!(err.field(), Some(field), "{text:?}");
        }

        let err = parse_settings(raw("C Carbamido methyl", "ox Oxidation", "[]")).unwrap_err();
        assert_eq!(err.field(), Some(FIXED_MODIFICATIONS));
        assert!(err.to_string().contains("line 1"));

        let err = parse_settings(raw("C Carbamidomethyl", "ox Oxidation\nac", "[]")).unwrap_err();
        assert_eq!(err.field(), Some(MODIFICATION_MAPPING));
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn invalid_modification_literal_names_the_field() {
        for text in ["[{'name': 'Oxidation'}", "[1, 2]", "{'name': 'Oxidation'}", "", "not a literal"] {
            let err = parse_settings(raw("", "", text)).unwrap_err();
            assert!(
                matches!(err, Error::Configuration { field: MS2PIP_MODIFICATIONS, .. }),
                "{text:?}: {err}"
            );
        }
    }

    #[test]
    fn mappings_keep_line_order() {
        let config = parse_settings(raw("M Oxidation\nC Carbamidomethyl", "ox Oxidation\nac Acetyl\nox Dioxidation", "[]")).unwrap();
        let labels: Vec<&str> = config
            .maxquant_to_rescore
            .modification_mapping
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(labels, ["ox", "ac"]);
        assert_eq!(
            serde_json::to_string(&config.maxquant_to_rescore).unwrap(),
            r#"{"modification_mapping":{"ox":"Dioxidation","ac":"Acetyl"},"fixed_modifications":{"M":"Oxidation","C":"Carbamidomethyl"}}"#
        );
    }

    #[test]
    fn deeply_nested_definitions_are_a_field_error() {
        for depth in [crate::core::literal::MAX_DEPTH + 1, 5_000, 100_000] {
            let text = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
            let err = parse_settings(raw("", "", &text)).unwrap_err();
            assert_eq!(err.field(), Some(MS2PIP_MODIFICATIONS), "depth {depth}");
            assert!(err.to_string().contains("nesting too deep"), "{err}");
        }

        let large = format!("[{}]", vec!["{'name': 'Oxidation', 'amino_acid': 'M'}"; 20_000].join(", "));
        let config = parse_settings(raw("", "", &large)).unwrap();
        assert_eq!(config.ms2pip.modifications.len(), 20_000);
    }

    #[test]
    fn modification_records_are_kept() {
        let text = "[{'name': 'Oxidation', 'unimod_accession': 35, 'mass_shift': 15.994915, 'amino_acid': 'M'},\n \
                    ({'name': 'Acetyl', 'amino_acid': None, 'n_term': True})]";
        let config = parse_settings(raw("", "", text)).unwrap();
        assert_eq!(config.ms2pip.modifications.len(), 2);
        assert_eq!(config.ms2pip.modifications[0]["unimod_accession"], json!(35));
        assert_eq!(config.ms2pip.modifications[1]["n_term"], json!(true));
    }

    #[test]
    fn missing_or_mistyped_fields_fail() {
        let mut values = raw("", "", "[]");
        values.insert(MS2PIP_FRAG_ERROR, "0.02");
        assert_eq!(parse_settings(values).unwrap_err().field(), Some(MS2PIP_FRAG_ERROR));

        let mut map = raw("", "", "[]").into_inner();
        map.remove(MS2PIP_MODEL);
        assert_eq!(
            parse_settings(map.into()).unwrap_err().field(),
            Some(MS2PIP_MODEL)
        );
    }

    #[test]
    fn default_form_parses() {
        let params = FormParams {
            identification_file: Some("search.pin".into()),
            ..FormParams::default()
        };
        let config = parse_settings(params.to_raw().unwrap()).unwrap();
        assert_eq!(config.ms2pip.model, "HCD2021");
        assert!(!config.ms2pip.modifications.is_empty());
        assert_eq!(config.general["mgf_path"], Value::Null);
    }
}
