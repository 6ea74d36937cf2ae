use crate::api::DEFAULT_RESCORE_PROGRAM;
use crate::core::defaults::ModelRegistry;
use crate::core::params::FormParams;
use crate::gui::logging::{GuiLogLayer, LogEntry};
use crate::io::Resources;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::Level;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry};

/// Tabs of the settings panel, one per argument group.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum SettingsTab {
    #[default]
    General,
    Maxquant,
    Ms2pip,
}

impl SettingsTab {
    pub const ALL: [SettingsTab; 3] = [SettingsTab::General, SettingsTab::Maxquant, SettingsTab::Ms2pip];

    pub fn title(&self) -> &'static str {
        match self {
            SettingsTab::General => "General configuration",
            SettingsTab::Maxquant => "MaxQuant settings",
            SettingsTab::Ms2pip => "MS²PIP settings",
        }
    }
}

static LOGGING_INIT: OnceCell<()> = OnceCell::new();

pub fn init_gui_logging() {
    LOGGING_INIT.get_or_init(|| {
        let gui_layer = GuiLogLayer::new();

        // Keep eframe and winit chatter out of the log panel
        let filter = EnvFilter::new("trace")
            .add_directive("eframe=info".parse().expect("static directive"))
            .add_directive("winit=info".parse().expect("static directive"));

        let subscriber = Registry::default().with(gui_layer).with(filter);
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

pub struct Ms2RescoreGui {
    // Form values
    pub form: FormParams,
    pub active_tab: SettingsTab,

    // Collaborators resolved at startup
    pub resources: Resources,
    pub registry: ModelRegistry,

    // Launcher options
    pub rescore_program: String,
    pub keep_config: bool,

    // Status
    pub min_log_level: Level,
    pub status_message: String,
    pub is_processing: bool,
    pub processing_start_time: Option<Instant>,
    pub last_processing_duration: Option<Duration>,
    /// Field and message of the last configuration error, shown next to the field
    pub field_error: Option<(&'static str, String)>,

    pub log_messages: Arc<Mutex<Vec<LogEntry>>>,

    // Receiver for completion notification from the background run
    pub completion_receiver: Option<Receiver<Result<String, String>>>,
}

impl Default for Ms2RescoreGui {
    fn default() -> Self {
        Self::new(Resources::default())
    }
}

impl Ms2RescoreGui {
    pub fn new(resources: Resources) -> Self {
        Self {
            form: FormParams::default(),
            active_tab: SettingsTab::General,
            resources,
            registry: ModelRegistry::builtin(),
            rescore_program: DEFAULT_RESCORE_PROGRAM.to_string(),
            keep_config: false,
            min_log_level: Level::TRACE,
            status_message: "Ready".to_string(),
            is_processing: false,
            processing_start_time: None,
            last_processing_duration: None,
            field_error: None,
            log_messages: Arc::new(Mutex::new(Vec::new())),
            completion_receiver: None,
        }
    }

    /// Reset the form, keeping startup resources and the log.
    pub fn reset(&mut self) {
        let resources = self.resources.clone();
        let log_messages = self.log_messages.clone();
        *self = Self::new(resources);
        self.log_messages = log_messages;
    }

    /// TRACE shows everything, any other level shows only that level.
    pub fn is_visible(&self, entry: &LogEntry) -> bool {
        self.min_log_level == Level::TRACE || entry.level == self.min_log_level
    }

    pub fn field_error_for(&self, field: &str) -> Option<&str> {
        match &self.field_error {
            Some((f, message)) if *f == field => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn save_logs_to_file(&self) -> Result<(), Box<dyn std::error::Error>> {
        let logs = self
            .log_messages
            .lock()
            .map_err(|e| format!("Failed to lock logs: {}", e))?;

        let filtered_logs: Vec<&LogEntry> =
            logs.iter().filter(|entry| self.is_visible(entry)).collect();
        if filtered_logs.is_empty() {
            return Err("No logs match the current filter level".into());
        }

        if let Some(save_path) = rfd::FileDialog::new()
            .add_filter("Log files", &["log", "txt"])
            .set_file_name("ms2rescore_gui.log")
            .save_file()
        {
            let mut log_content = String::new();
            log_content.push_str("=== MS²Rescore Log File ===\n");
            log_content.push_str(&format!("Generated: {}\n", chrono::Utc::now().to_rfc3339()));
            log_content.push_str(&format!("Total Logs: {}\n", filtered_logs.len()));
            log_content.push_str("===========================\n\n");
            for entry in &filtered_logs {
                log_content.push_str(&entry.to_line());
                log_content.push('\n');
            }

            fs::write(&save_path, log_content)?;
            tracing::info!(
                "Logs saved to: {:?} ({} entries)",
                save_path,
                filtered_logs.len()
            );
            Ok(())
        } else {
            Err("No save location selected".into())
        }
    }

    pub fn save_preset(&self) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(save_path) = rfd::FileDialog::new()
            .add_filter("MS²Rescore form presets", &["json"])
            .set_file_name("ms2rescore_preset.json")
            .save_file()
        {
            crate::io::save_preset(&self.form, &save_path)?;
            Ok(())
        } else {
            Err("No save location selected".into())
        }
    }

    pub fn load_preset(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(load_path) = rfd::FileDialog::new()
            .add_filter("MS²Rescore form presets", &["json"])
            .pick_file()
        {
            self.apply_preset(&load_path)?;
            Ok(())
        } else {
            Err("No preset file selected".into())
        }
    }

    pub fn apply_preset(&mut self, path: &Path) -> crate::Result<()> {
        self.form = crate::io::load_preset(path)?;
        self.field_error = None;
        Ok(())
    }

    /// Equivalent command line for the current form.
    pub fn generate_cli_command(&self) -> String {
        let defaults = FormParams::default();
        let form = &self.form;
        let mut cmd = String::from("ms2rescore-gui");

        match &form.identification_file {
            Some(path) => cmd.push_str(&format!(" {}", shell_quote(&path.to_string_lossy()))),
            None => cmd.push_str(" <identification_file>"),
        }

        let paths = [
            ("-m", &form.mgf_path),
            ("-c", &form.config_file),
            ("-t", &form.tmp_path),
            ("-o", &form.output_filename),
        ];
        for (flag, path) in paths {
            if let Some(path) = path.as_ref().filter(|p| !p.as_os_str().is_empty()) {
                cmd.push_str(&format!(" {} {}", flag, shell_quote(&path.to_string_lossy())));
            }
        }

        cmd.push_str(&format!(" --pipeline {}", form.pipeline));
        cmd.push_str(&format!(" -l {}", form.log_level));

        if form.fixed_modifications != defaults.fixed_modifications {
            cmd.push_str(&format!(
                " --fixed-modifications {}",
                shell_quote(&form.fixed_modifications)
            ));
        }
        if form.modification_mapping != defaults.modification_mapping {
            cmd.push_str(&format!(
                " --modification-mapping {}",
                shell_quote(&form.modification_mapping)
            ));
        }
        cmd.push_str(&format!(" --ms2pip-model {}", shell_quote(&form.ms2pip_model)));
        cmd.push_str(&format!(" --ms2pip-frag-error {}", form.ms2pip_frag_error));
        if form.ms2pip_modifications != defaults.ms2pip_modifications {
            cmd.push_str(&format!(
                " --ms2pip-modifications {}",
                shell_quote(&form.ms2pip_modifications)
            ));
        }
        if self.rescore_program != DEFAULT_RESCORE_PROGRAM {
            cmd.push_str(&format!(
                " --rescore-program {}",
                shell_quote(&self.rescore_program)
            ));
        }
        if self.keep_config {
            cmd.push_str(" --keep-config");
        }

        cmd
    }
}

/// Quote for a POSIX shell, leaving plain words untouched.
pub fn shell_quote(s: &str) -> String {
    let plain = !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=+@%,".contains(c));
    if plain {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', "'\\''"))
    }
}
