use super::models::Ms2RescoreGui;
use crate::api::{CommandRescorer, Rescorer};
use crate::core::settings::{ParsedConfiguration, parse_settings};
use std::path::PathBuf;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, error, info, trace};

/// GUI-specific errors
#[derive(Debug, Error)]
pub enum GuiError {
    #[error("An identification file is required")]
    MissingIdentificationFile,

    #[error("Unknown MS²PIP model: {model}")]
    UnknownModel { model: String },

    #[error("MS2 error tolerance must be a positive number, got: {value}")]
    InvalidFragError { value: f64 },

    #[error("A rescoring run is already in progress")]
    AlreadyRunning,

    #[error(transparent)]
    Configuration(#[from] crate::error::Error),
}

impl Ms2RescoreGui {
    pub fn select_identification_file(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter(
                "Identification files",
                &["pin", "mzid", "txt", "xml", "csv", "tsv"],
            )
            .add_filter("All files", &["*"])
            .pick_file()
        {
            info!("Selected identification file: {:?}", path);
            self.form.identification_file = Some(path);
        }
    }

    pub fn select_mgf_path(&mut self) {
        if let Some(path) = rfd::FileDialog::new().pick_folder() {
            info!("Selected spectrum file directory: {:?}", path);
            self.form.mgf_path = Some(path);
        }
    }

    pub fn select_config_file(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Configuration files", &["json", "toml"])
            .pick_file()
        {
            info!("Selected configuration file: {:?}", path);
            self.form.config_file = Some(path);
        }
    }

    pub fn select_tmp_path(&mut self) {
        if let Some(path) = rfd::FileDialog::new().pick_folder() {
            info!("Selected temporary file directory: {:?}", path);
            self.form.tmp_path = Some(path);
        }
    }

    pub fn select_output_filename(&mut self) {
        if let Some(path) = rfd::FileDialog::new().save_file() {
            info!("Selected output filename prefix: {:?}", path);
            self.form.output_filename = Some(path);
        }
    }

    /// Validate the form the way the input widgets would, then parse it.
    pub fn build_configuration(&mut self) -> Result<ParsedConfiguration, GuiError> {
        self.field_error = None;

        if self
            .form
            .identification_file
            .as_ref()
            .is_none_or(|p| p.as_os_str().is_empty())
        {
            self.field_error = Some((
                "identification_file",
                GuiError::MissingIdentificationFile.to_string(),
            ));
            return Err(GuiError::MissingIdentificationFile);
        }
        if !self.registry.contains(&self.form.ms2pip_model) {
            return Err(GuiError::UnknownModel {
                model: self.form.ms2pip_model.clone(),
            });
        }
        let frag_error = self.form.ms2pip_frag_error;
        if !frag_error.is_finite() || frag_error <= 0.0 {
            self.field_error = Some((
                "ms2pip_frag_error",
                GuiError::InvalidFragError { value: frag_error }.to_string(),
            ));
            return Err(GuiError::InvalidFragError { value: frag_error });
        }

        self.form.to_raw().and_then(parse_settings).map_err(|e| {
            if let crate::error::Error::Configuration { field, reason } = &e {
                self.field_error = Some((*field, reason.clone()));
            }
            GuiError::from(e)
        })
    }

    /// Parse the form and launch the rescoring program in a background thread.
    pub fn run_rescoring(&mut self) {
        if self.is_processing {
            error!("{}", GuiError::AlreadyRunning);
            return;
        }

        let config = match self.build_configuration() {
            Ok(config) => config,
            Err(e) => {
                error!("Invalid settings: {}", e);
                self.status_message = "Invalid settings".to_string();
                return;
            }
        };

        let identification_file = self
            .form
            .identification_file
            .clone()
            .unwrap_or_else(PathBuf::new);
        debug!("Parsed configuration: {:?}", config);

        self.log_separator("--- Rescoring Started ---");
        self.is_processing = true;
        self.processing_start_time = Some(Instant::now());
        self.status_message = "Running".to_string();

        let rescorer =
            CommandRescorer::new(self.rescore_program.clone()).keep_config(self.keep_config);
        let (tx, rx) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            trace!("Background rescoring thread started");
            let result = match rescorer.run(&config) {
                Ok(()) => Ok(format!("Successfully rescored: {:?}", identification_file)),
                Err(e) => {
                    error!("Rescoring failed: {}", e);
                    Err(format!("Error: {}", e))
                }
            };
            let _ = tx.send(result);
        });

        self.completion_receiver = Some(rx);
        info!("Rescoring started in background thread");
    }

    /// Pick up the result of a finished background run, if any.
    pub fn poll_completion(&mut self) {
        let Some(receiver) = &self.completion_receiver else {
            return;
        };
        let Ok(result) = receiver.try_recv() else {
            return;
        };

        if let Some(start_time) = self.processing_start_time.take() {
            let duration = start_time.elapsed();
            self.last_processing_duration = Some(duration);
            info!("Run completed in {:.2?}", duration);
        }
        match result {
            Ok(msg) => {
                info!("{}", msg);
                self.status_message = "Finished".to_string();
            }
            Err(msg) => {
                self.status_message = msg;
            }
        }
        self.is_processing = false;
        self.completion_receiver = None;
    }

    fn log_separator(&self, message: &str) {
        let separator = crate::gui::logging::LogEntry::new(
            tracing::Level::INFO,
            message.to_string(),
            "gui".to_string(),
        );
        if let Ok(mut logs) = self.log_messages.lock() {
            crate::gui::logging::push_bounded(&mut logs, separator);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_with_file() -> Ms2RescoreGui {
        let mut app = Ms2RescoreGui::default();
        app.form.identification_file = Some(PathBuf::from("msms.txt"));
        app
    }

    #[test]
    fn identification_file_is_required() {
        let mut app = Ms2RescoreGui::default();
        assert!(matches!(
            app.build_configuration(),
            Err(GuiError::MissingIdentificationFile)
        ));
        assert!(app.field_error_for("identification_file").is_some());
    }

    #[test]
    fn parse_errors_mark_the_field() {
        let mut app = app_with_file();
        app.form.fixed_modifications = "Carbamidomethyl".to_string();
        assert!(app.build_configuration().is_err());
        assert!(app.field_error_for("fixed_modifications").is_some());
        assert!(app.field_error_for("modification_mapping").is_none());

        app.form.fixed_modifications = "C Carbamidomethyl".to_string();
        let config = app.build_configuration().unwrap();
        assert!(app.field_error.is_none());
        assert_eq!(config.identification_file(), Some("msms.txt"));
    }

    #[test]
    fn unknown_model_and_bad_tolerance_are_rejected() {
        let mut app = app_with_file();
        app.form.ms2pip_model = "HCD1999".to_string();
        assert!(matches!(
            app.build_configuration(),
            Err(GuiError::UnknownModel { .. })
        ));

        let mut app = app_with_file();
        app.form.ms2pip_frag_error = 0.0;
        assert!(matches!(
            app.build_configuration(),
            Err(GuiError::InvalidFragError { .. })
        ));
        assert!(app.field_error_for("ms2pip_frag_error").is_some());
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_path_marks_its_field() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let mut app = app_with_file();
        app.form.mgf_path = Some(PathBuf::from(OsStr::from_bytes(b"spectra\xfe")));
        assert!(matches!(
            app.build_configuration(),
            Err(GuiError::Configuration(_))
        ));
        assert!(app.field_error_for("mgf_path").is_some());
    }

    #[test]
    fn invalid_form_does_not_start_a_run() {
        let mut app = Ms2RescoreGui::default();
        app.run_rescoring();
        assert!(!app.is_processing);
        assert!(app.completion_receiver.is_none());
        assert_eq!(app.status_message, "Invalid settings");
    }

    #[cfg(unix)]
    #[test]
    fn background_run_reports_completion() {
        let mut app = app_with_file();
        app.rescore_program = "true".to_string();
        app.run_rescoring();
        assert!(app.is_processing);

        let deadline = Instant::now() + std::time::Duration::from_secs(10);
        while app.is_processing && Instant::now() < deadline {
            std::thread::sleep(std::time::Duration::from_millis(20));
            app.poll_completion();
        }
        assert!(!app.is_processing);
        assert_eq!(app.status_message, "Finished");
        assert!(app.last_processing_duration.is_some());
    }
}
