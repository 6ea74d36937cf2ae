use std::io;
use std::path::Path;

use tracing::{debug, error, info};

use ms2rescore_gui::io::config::{write_configuration, write_configuration_to};
use ms2rescore_gui::{CommandRescorer, FormParams, ModelRegistry, ParsedConfiguration, Rescorer, parse_settings};

use super::args::CliArgs;
use super::errors::AppError;

/// Input-layer checks that the form widgets perform in the GUI.
fn validate_form(form: &FormParams, registry: &ModelRegistry) -> Result<(), AppError> {
    if !registry.contains(&form.ms2pip_model) {
        return Err(AppError::UnknownModel {
            model: form.ms2pip_model.clone(),
            available: registry.names().join(", "),
        });
    }
    if !form.ms2pip_frag_error.is_finite() || form.ms2pip_frag_error <= 0.0 {
        return Err(AppError::InvalidFragError {
            value: form.ms2pip_frag_error,
        });
    }
    Ok(())
}

fn emit_configuration(config: &ParsedConfiguration, target: &Path) -> Result<(), AppError> {
    if target == Path::new("-") {
        write_configuration_to(config, io::stdout().lock())?;
    } else {
        write_configuration(config, target)?;
        info!("Configuration written to {:?}", target);
    }
    Ok(())
}

pub fn build_configuration(args: &CliArgs) -> Result<ParsedConfiguration, AppError> {
    let form = args.to_form();
    validate_form(&form, &ModelRegistry::builtin())?;
    debug!("Form values: {:?}", form);

    form.to_raw().and_then(parse_settings).map_err(|e| {
        error!("{}", e);
        AppError::from(e)
    })
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(args.log_level.to_tracing())
        .with_writer(io::stderr)
        .init();

    let config = build_configuration(&args)?;

    if let Some(target) = &args.emit_config {
        emit_configuration(&config, target)?;
        return Ok(());
    }

    let rescorer = CommandRescorer::new(&args.rescore_program).keep_config(args.keep_config);
    info!("Rescoring {:?}", args.identification_file);
    rescorer.run(&config).map_err(AppError::from)?;
    info!("Successfully rescored: {:?}", args.identification_file);

    Ok(())
}
