//! High-level library API: turn form values into a configuration and hand it
//! to a rescoring entry point. Prefer these entrypoints over the low-level
//! `core` modules when embedding the front-end.
use std::ffi::OsString;
use std::process::Command;

use tracing::{debug, info};

use crate::core::params::FormParams;
use crate::core::settings::{ParsedConfiguration, RawFormValues, parse_settings};
use crate::error::{Error, Result};
use crate::io::config::write_configuration_to;

pub const DEFAULT_RESCORE_PROGRAM: &str = "ms2rescore";

/// A rescoring entry point that consumes an assembled configuration.
pub trait Rescorer {
    fn run(&self, config: &ParsedConfiguration) -> Result<()>;
}

/// Runs the external `ms2rescore` program on a temporary JSON copy of the
/// configuration.
#[derive(Debug, Clone)]
pub struct CommandRescorer {
    pub program: OsString,
    /// Leave the generated configuration file on disk after the run
    pub keep_config: bool,
}

impl Default for CommandRescorer {
    fn default() -> Self {
        Self::new(DEFAULT_RESCORE_PROGRAM)
    }
}

impl CommandRescorer {
    pub fn new<P: Into<OsString>>(program: P) -> Self {
        Self {
            program: program.into(),
            keep_config: false,
        }
    }

    pub fn keep_config(mut self, keep: bool) -> Self {
        self.keep_config = keep;
        self
    }
}

impl Rescorer for CommandRescorer {
    fn run(&self, config: &ParsedConfiguration) -> Result<()> {
        let identification_file =
            config
                .identification_file()
                .ok_or_else(|| Error::MissingArgument {
                    arg: "identification_file".to_string(),
                })?;

        let mut file = tempfile::Builder::new()
            .prefix("ms2rescore-config-")
            .suffix(".json")
            .tempfile()?;
        write_configuration_to(config, file.as_file_mut())?;
        debug!("Temporary configuration: {:?}", file.path());

        let mut command = Command::new(&self.program);
        command
            .arg("-c")
            .arg(file.path())
            .arg(identification_file);
        info!("Running {:?}", command);

        let status = command.status()?;

        if self.keep_config {
            let (_, path) = file.keep().map_err(|e| Error::Io(e.error))?;
            info!("Configuration kept at {:?}", path);
        }

        if status.success() {
            Ok(())
        } else {
            Err(Error::External(format!(
                "{} exited with {}",
                self.program.to_string_lossy(),
                status
            )))
        }
    }
}

/// Parse the form values and run the rescorer on the result. Nothing is
/// run when the configuration is invalid.
pub fn rescore<R: Rescorer + ?Sized>(raw: RawFormValues, rescorer: &R) -> Result<ParsedConfiguration> {
    let config = parse_settings(raw)?;
    info!(
        "Starting rescoring of {}",
        config.identification_file().unwrap_or("<none>")
    );
    rescorer.run(&config)?;
    info!("Rescoring finished");
    Ok(config)
}

/// [`rescore`] for typed form parameters.
pub fn rescore_form<R: Rescorer + ?Sized>(params: &FormParams, rescorer: &R) -> Result<ParsedConfiguration> {
    rescore(params.to_raw()?, rescorer)
}
