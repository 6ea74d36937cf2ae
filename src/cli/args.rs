use clap::Parser;
use std::path::PathBuf;

use ms2rescore_gui::core::defaults::{
    DEFAULT_FIXED_MODIFICATIONS, DEFAULT_FRAG_ERROR, DEFAULT_MODIFICATION_MAPPING,
    DEFAULT_MS2PIP_MODEL,
};
use ms2rescore_gui::{FormParams, LogLevel, Pipeline};

#[derive(Parser, Debug)]
#[command(
    name = "ms2rescore-gui",
    version,
    about = "Sensitive PSM rescoring with MS²PIP, DeepLC, and Percolator."
)]
pub struct CliArgs {
    /// Path to identification file (pin, mzid, msms.txt, tandem xml...)
    pub identification_file: PathBuf,

    /// Path to MGF file or directory with MGF files (default: derived from identification file)
    #[arg(short = 'm', long)]
    pub mgf_path: Option<PathBuf>,

    /// Path to MS²Rescore configuration file
    #[arg(short = 'c', long)]
    pub config_file: Option<PathBuf>,

    /// Path to directory to place temporary files
    #[arg(short = 't', long)]
    pub tmp_path: Option<PathBuf>,

    /// Name for output files (default: derive from identification file)
    #[arg(short = 'o', long)]
    pub output_filename: Option<PathBuf>,

    /// Identification file pipeline to use, depends on the search engine used
    #[arg(long, value_enum, default_value_t = Pipeline::Infer)]
    pub pipeline: Pipeline,

    /// Controls the amount of information that is logged
    #[arg(short = 'l', long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Fixed modifications of the MaxQuant search, one `<amino acid> <full name>` per line
    #[arg(long, default_value = DEFAULT_FIXED_MODIFICATIONS)]
    pub fixed_modifications: String,

    /// MaxQuant modification labels and their full names, one `<label> <full name>` per line
    #[arg(long, default_value = DEFAULT_MODIFICATION_MAPPING)]
    pub modification_mapping: String,

    /// MS²PIP prediction model to use
    #[arg(long, default_value = DEFAULT_MS2PIP_MODEL)]
    pub ms2pip_model: String,

    /// MS2 error tolerance in Da, for MS²PIP spectrum annotation
    #[arg(long, default_value_t = DEFAULT_FRAG_ERROR)]
    pub ms2pip_frag_error: f64,

    /// List of modification definition dictionaries for MS²PIP (default: bundled definitions)
    #[arg(long)]
    pub ms2pip_modifications: Option<String>,

    /// Write the assembled configuration as JSON to this path ("-" for stdout) and stop
    #[arg(long)]
    pub emit_config: Option<PathBuf>,

    /// Rescoring program to launch
    #[arg(long, default_value = ms2rescore_gui::api::DEFAULT_RESCORE_PROGRAM)]
    pub rescore_program: String,

    /// Keep the generated configuration file after the run
    #[arg(long, default_value_t = false)]
    pub keep_config: bool,
}

impl CliArgs {
    pub fn to_form(&self) -> FormParams {
        let defaults = FormParams::default();
        FormParams {
            identification_file: Some(self.identification_file.clone()),
            mgf_path: self.mgf_path.clone(),
            config_file: self.config_file.clone(),
            tmp_path: self.tmp_path.clone(),
            output_filename: self.output_filename.clone(),
            pipeline: self.pipeline,
            log_level: self.log_level,
            fixed_modifications: self.fixed_modifications.clone(),
            modification_mapping: self.modification_mapping.clone(),
            ms2pip_model: self.ms2pip_model.clone(),
            ms2pip_frag_error: self.ms2pip_frag_error,
            ms2pip_modifications: self
                .ms2pip_modifications
                .clone()
                .unwrap_or(defaults.ms2pip_modifications),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_the_form() {
        let args = CliArgs::try_parse_from(["ms2rescore-gui", "msms.txt"]).unwrap();
        let form = args.to_form();
        assert_eq!(
            form,
            FormParams {
                identification_file: Some(PathBuf::from("msms.txt")),
                ..FormParams::default()
            }
        );
        assert_eq!(args.rescore_program, "ms2rescore");
    }

    #[test]
    fn parses_every_field() {
        let args = CliArgs::try_parse_from([
            "ms2rescore-gui",
            "search.t.xml",
            "-m",
            "spectra/",
            "-c",
            "config.json",
            "-t",
            "/tmp/ms2rescore",
            "-o",
            "out/run1",
            "--pipeline",
            "tandem",
            "-l",
            "critical",
            "--fixed-modifications",
            "",
            "--modification-mapping",
            "ox Oxidation\nac Acetyl",
            "--ms2pip-model",
            "CID",
            "--ms2pip-frag-error",
            "0.5",
            "--ms2pip-modifications",
            "[]",
            "--emit-config",
            "-",
        ])
        .unwrap();
        assert_eq!(args.pipeline, Pipeline::Tandem);
        assert_eq!(args.log_level, LogLevel::Critical);
        assert_eq!(args.emit_config, Some(PathBuf::from("-")));

        let form = args.to_form();
        assert_eq!(form.mgf_path, Some(PathBuf::from("spectra/")));
        assert_eq!(form.fixed_modifications, "");
        assert_eq!(form.ms2pip_frag_error, 0.5);
        assert_eq!(form.ms2pip_modifications, "[]");
    }

    #[test]
    fn rejects_unknown_pipeline_and_bad_tolerance() {
        assert!(CliArgs::try_parse_from(["ms2rescore-gui", "x.pin", "--pipeline", "mascot"]).is_err());
        assert!(
            CliArgs::try_parse_from(["ms2rescore-gui", "x.pin", "--ms2pip-frag-error", "abc"])
                .is_err()
        );
        assert!(CliArgs::try_parse_from(["ms2rescore-gui"]).is_err());
    }
}
