use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::defaults::{
    DEFAULT_FIXED_MODIFICATIONS, DEFAULT_FRAG_ERROR, DEFAULT_MODIFICATION_MAPPING,
    DEFAULT_MS2PIP_MODEL, DefaultConfig,
};
use crate::core::settings::RawFormValues;
use crate::error::{Error, Result};
use crate::types::{LogLevel, Pipeline};

/// Form parameters suitable for the CLI, the GUI and presets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormParams {
    pub identification_file: Option<PathBuf>,
    /// MGF file or directory with MGF files
    pub mgf_path: Option<PathBuf>,
    pub config_file: Option<PathBuf>,
    pub tmp_path: Option<PathBuf>,
    /// Output filename prefix
    pub output_filename: Option<PathBuf>,
    pub pipeline: Pipeline,
    pub log_level: LogLevel,

    // MaxQuant text blocks, one `<label> <full name>` pair per line
    pub fixed_modifications: String,
    pub modification_mapping: String,

    pub ms2pip_model: String,
    /// MS2 error tolerance in Da
    pub ms2pip_frag_error: f64,
    /// Literal list of modification definition records
    pub ms2pip_modifications: String,
}

impl Default for FormParams {
    fn default() -> Self {
        Self {
            identification_file: None,
            mgf_path: None,
            config_file: None,
            tmp_path: None,
            output_filename: None,
            pipeline: Pipeline::Infer,
            log_level: LogLevel::Info,
            fixed_modifications: DEFAULT_FIXED_MODIFICATIONS.to_string(),
            modification_mapping: DEFAULT_MODIFICATION_MAPPING.to_string(),
            ms2pip_model: DEFAULT_MS2PIP_MODEL.to_string(),
            ms2pip_frag_error: DEFAULT_FRAG_ERROR,
            ms2pip_modifications: DefaultConfig::bundled().ms2pip_modifications_text(),
        }
    }
}

/// Empty paths are left out as null. Paths that are not valid UTF-8 cannot
/// be carried in the configuration and are rejected.
fn path_value(field: &'static str, path: &Option<PathBuf>) -> Result<Value> {
    match path {
        Some(p) if !p.as_os_str().is_empty() => p
            .to_str()
            .map(|s| Value::String(s.to_string()))
            .ok_or_else(|| {
                Error::configuration(
                    field,
                    format!("path {} is not valid UTF-8", p.display()),
                )
            }),
        _ => Ok(Value::Null),
    }
}

impl FormParams {
    /// Flatten into one entry per form field, the way the form submits them.
    pub fn to_raw(&self) -> Result<RawFormValues> {
        let mut raw = RawFormValues::new();
        let paths = [
            ("identification_file", &self.identification_file),
            ("mgf_path", &self.mgf_path),
            ("config_file", &self.config_file),
            ("tmp_path", &self.tmp_path),
            ("output_filename", &self.output_filename),
        ];
        for (field, path) in paths {
            raw.insert(field, path_value(field, path)?);
        }
        raw.insert("pipeline", self.pipeline.as_str());
        raw.insert("log_level", self.log_level.as_str());
        raw.insert("fixed_modifications", self.fixed_modifications.as_str());
        raw.insert("modification_mapping", self.modification_mapping.as_str());
        raw.insert("ms2pip_model", self.ms2pip_model.as_str());
        raw.insert("ms2pip_frag_error", self.ms2pip_frag_error);
        raw.insert("ms2pip_modifications", self.ms2pip_modifications.as_str());
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_form() {
        let params = FormParams::default();
        assert_eq!(params.pipeline, Pipeline::Infer);
        assert_eq!(params.log_level, LogLevel::Info);
        assert_eq!(params.fixed_modifications, "C Carbamidomethyl");
        assert_eq!(params.modification_mapping.lines().count(), 6);
        assert_eq!(params.ms2pip_model, "HCD2021");
        assert_eq!(params.ms2pip_frag_error, 0.02);
        assert!(params.ms2pip_modifications.starts_with("[{'name': 'Acetyl'"));
    }

    #[test]
    fn raw_values_carry_every_field() {
        let params = FormParams {
            identification_file: Some(PathBuf::from("/data/msms.txt")),
            mgf_path: Some(PathBuf::new()),
            ..FormParams::default()
        };
        let raw = params.to_raw().unwrap();
        assert_eq!(raw.len(), 12);
        assert_eq!(raw.get("identification_file"), Some(&Value::from("/data/msms.txt")));
        assert_eq!(raw.get("mgf_path"), Some(&Value::Null));
        assert_eq!(raw.get("pipeline"), Some(&Value::from("infer")));
        assert_eq!(raw.get("ms2pip_frag_error"), Some(&Value::from(0.02)));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_path_is_rejected() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let params = FormParams {
            identification_file: Some(PathBuf::from("msms.txt")),
            tmp_path: Some(PathBuf::from(OsStr::from_bytes(b"/tmp/run\xff"))),
            ..FormParams::default()
        };
        let err = params.to_raw().unwrap_err();
        assert_eq!(err.field(), Some("tmp_path"));
        assert!(err.to_string().contains("not valid UTF-8"));
    }

    #[test]
    fn preset_json_fills_missing_fields_with_defaults() {
        let params: FormParams =
            serde_json::from_str(r#"{"pipeline": "maxquant", "ms2pip_frag_error": 0.05}"#).unwrap();
        assert_eq!(params.pipeline, Pipeline::Maxquant);
        assert_eq!(params.ms2pip_frag_error, 0.05);
        assert_eq!(params.ms2pip_model, DEFAULT_MS2PIP_MODEL);
    }
}
