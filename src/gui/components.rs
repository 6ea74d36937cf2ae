use super::models::{Ms2RescoreGui, SettingsTab};
use crate::types::{LogLevel, Pipeline};
use eframe::egui::{
    Align, Color32, ComboBox, DragValue, Frame, Layout, RichText, TextEdit, Ui,
};
use std::path::PathBuf;

const COMPONENT_WIDTH: f32 = 320.0;
const TEXTAREA_ROWS: usize = 6;

fn hint(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).color(Color32::from_gray(120)).size(11.0));
}

fn field_error(ui: &mut Ui, app: &Ms2RescoreGui, field: &str) {
    if let Some(message) = app.field_error_for(field) {
        ui.label(
            RichText::new(message)
                .color(Color32::from_rgb(255, 100, 100))
                .size(11.0),
        );
    }
}

/// Label, Browse/Clear buttons and the current path. Returns true when
/// Browse was clicked.
fn path_row(ui: &mut Ui, label: &str, path: &mut Option<PathBuf>) -> bool {
    let mut browse = false;
    ui.horizontal(|ui| {
        ui.label(label);
        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            if ui.button("Browse").clicked() {
                browse = true;
            }
            if path.is_some() && ui.button("Clear").clicked() {
                *path = None;
            }
        });
    });

    if let Some(p) = path {
        ui.label(RichText::new(p.to_string_lossy()).color(Color32::from_rgb(255, 165, 0)));
    } else {
        ui.label(RichText::new("None selected").color(Color32::from_gray(120)));
    }
    browse
}

pub struct TabBarComponent;

impl TabBarComponent {
    pub fn render(ui: &mut Ui, app: &mut Ms2RescoreGui) {
        ui.horizontal(|ui| {
            for tab in SettingsTab::ALL {
                let title = match tab {
                    SettingsTab::General => "General",
                    SettingsTab::Maxquant => "MaxQuant",
                    SettingsTab::Ms2pip => "MS²PIP",
                };
                ui.selectable_value(&mut app.active_tab, tab, title);
            }
        });
    }
}

pub struct GeneralSettingsComponent;

impl GeneralSettingsComponent {
    pub fn render(ui: &mut Ui, app: &mut Ms2RescoreGui) {
        ui.heading(SettingsTab::General.title());

        Frame::NONE.inner_margin(0.0).show(ui, |ui| {
            ui.set_min_width(COMPONENT_WIDTH);

            if path_row(ui, "Identification file (required):", &mut app.form.identification_file) {
                app.select_identification_file();
            }
            hint(ui, "Path to identification file (pin, mzid, msms.txt, tandem xml...)");
            field_error(ui, app, "identification_file");

            ui.add_space(10.0);
            if path_row(ui, "Spectrum file directory:", &mut app.form.mgf_path) {
                app.select_mgf_path();
            }
            hint(
                ui,
                "Path to MGF file or directory with MGF files (default: derived from identification file)",
            );

            ui.add_space(10.0);
            if path_row(ui, "Configuration file:", &mut app.form.config_file) {
                app.select_config_file();
            }
            hint(ui, "Path to MS²Rescore configuration file (see online documentation)");

            ui.add_space(10.0);
            if path_row(ui, "Temporary file directory:", &mut app.form.tmp_path) {
                app.select_tmp_path();
            }

            ui.add_space(10.0);
            if path_row(ui, "Output filename prefix:", &mut app.form.output_filename) {
                app.select_output_filename();
            }
            hint(ui, "Name for output files (default: derive from identification file)");

            ui.add_space(10.0);
            ui.horizontal(|ui| {
                ui.label("Pipeline / search engine:");
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    ComboBox::from_id_salt("pipeline")
                        .selected_text(app.form.pipeline.as_str())
                        .show_ui(ui, |ui| {
                            for pipeline in Pipeline::ALL {
                                ui.selectable_value(&mut app.form.pipeline, pipeline, pipeline.as_str());
                            }
                        });
                });
            });
            hint(
                ui,
                "Depends on the search engine used. By default, this is inferred from the input file extension.",
            );

            ui.add_space(10.0);
            ui.horizontal(|ui| {
                ui.label("Logging level:");
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    ComboBox::from_id_salt("log_level")
                        .selected_text(app.form.log_level.as_str())
                        .show_ui(ui, |ui| {
                            for level in LogLevel::ALL {
                                ui.selectable_value(&mut app.form.log_level, level, level.as_str());
                            }
                        });
                });
            });
        });
    }
}

pub struct MaxquantSettingsComponent;

impl MaxquantSettingsComponent {
    pub fn render(ui: &mut Ui, app: &mut Ms2RescoreGui) {
        ui.heading(SettingsTab::Maxquant.title());
        hint(
            ui,
            "MaxQuant uses two-letter labels to denote modifications in the msms.txt output. \
             Additionally, fixed modifications are not listed at all. To correctly parse the \
             msms.txt file, additional modification information needs to be provided below. \
             Make sure MaxQuant was run without PSM-level FDR filtering; i.e. the FDR Threshold set at 1.",
        );

        Frame::NONE.inner_margin(0.0).show(ui, |ui| {
            ui.set_min_width(COMPONENT_WIDTH);

            ui.add_space(10.0);
            ui.label("Fixed modifications:");
            ui.add(
                TextEdit::multiline(&mut app.form.fixed_modifications)
                    .desired_rows(TEXTAREA_ROWS)
                    .desired_width(f32::INFINITY)
                    .code_editor(),
            );
            hint(
                ui,
                "One modification per line: <amino acid one-letter code> <full modification name>, space-separated.",
            );
            field_error(ui, app, "fixed_modifications");

            ui.add_space(10.0);
            ui.label("Modification mapping:");
            ui.add(
                TextEdit::multiline(&mut app.form.modification_mapping)
                    .desired_rows(TEXTAREA_ROWS)
                    .desired_width(f32::INFINITY)
                    .code_editor(),
            );
            hint(
                ui,
                "Modification labels and their full names as listed in the MS²PIP modification definitions. One per line, space-separated.",
            );
            field_error(ui, app, "modification_mapping");
        });
    }
}

pub struct Ms2pipSettingsComponent;

impl Ms2pipSettingsComponent {
    pub fn render(ui: &mut Ui, app: &mut Ms2RescoreGui) {
        ui.heading(SettingsTab::Ms2pip.title());

        Frame::NONE.inner_margin(0.0).show(ui, |ui| {
            ui.set_min_width(COMPONENT_WIDTH);

            ui.horizontal(|ui| {
                ui.label("MS²PIP model:");
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    ComboBox::from_id_salt("ms2pip_model")
                        .selected_text(app.form.ms2pip_model.clone())
                        .show_ui(ui, |ui| {
                            for name in app.registry.names() {
                                ui.selectable_value(
                                    &mut app.form.ms2pip_model,
                                    name.clone(),
                                    name.as_str(),
                                );
                            }
                        });
                });
            });

            ui.add_space(10.0);
            ui.horizontal(|ui| {
                ui.label("MS2 error tolerance in Da:");
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    ui.add(
                        DragValue::new(&mut app.form.ms2pip_frag_error)
                            .speed(0.001)
                            .range(0.0001..=10.0)
                            .max_decimals(4),
                    );
                });
            });
            hint(ui, "MS2 error tolerance in Da, for MS²PIP spectrum annotation");
            field_error(ui, app, "ms2pip_frag_error");

            ui.add_space(10.0);
            ui.horizontal(|ui| {
                ui.label("Modification definitions:");
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if ui.button("Restore defaults").clicked() {
                        app.form.ms2pip_modifications =
                            crate::core::defaults::DefaultConfig::bundled().ms2pip_modifications_text();
                    }
                });
            });
            ui.add(
                TextEdit::multiline(&mut app.form.ms2pip_modifications)
                    .desired_rows(TEXTAREA_ROWS * 2)
                    .desired_width(f32::INFINITY)
                    .code_editor(),
            );
            hint(
                ui,
                "List of modification definition dictionaries for MS²PIP. See online documentation for more info.",
            );
            field_error(ui, app, "ms2pip_modifications");
        });
    }
}

pub struct LauncherOptionsComponent;

impl LauncherOptionsComponent {
    pub fn render(ui: &mut Ui, app: &mut Ms2RescoreGui) {
        ui.collapsing("Launcher", |ui| {
            ui.horizontal(|ui| {
                ui.label("Rescoring program:");
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    let response = ui.text_edit_singleline(&mut app.rescore_program);
                    if response.changed() && app.rescore_program.trim().is_empty() {
                        app.rescore_program = crate::api::DEFAULT_RESCORE_PROGRAM.to_string();
                    }
                });
            });
            ui.horizontal(|ui| {
                ui.label("Keep generated configuration file:");
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    ui.checkbox(&mut app.keep_config, "");
                });
            });
        });
    }
}

pub struct FooterComponent;

impl FooterComponent {
    pub fn render(ui: &mut Ui, app: &mut Ms2RescoreGui) {
        ui.horizontal(|ui| {
            let status_color = if app.is_processing {
                Color32::from_rgb(255, 165, 0)
            } else if app.field_error.is_some() {
                Color32::from_rgb(255, 100, 100)
            } else {
                Color32::from_rgb(100, 200, 100)
            };

            let timing_text = if app.is_processing {
                match app.processing_start_time {
                    Some(start_time) => format!("Running: {:.2?}", start_time.elapsed()),
                    None => "Running...".to_string(),
                }
            } else if let Some(duration) = app.last_processing_duration {
                format!("{} (last run: {:.2?})", app.status_message, duration)
            } else {
                app.status_message.clone()
            };

            ui.label(RichText::new(timing_text).color(status_color).size(14.0));

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if ui.button("To CLI").clicked() {
                    let cli_command = app.generate_cli_command();
                    let cli_entry = crate::gui::logging::LogEntry::new(
                        tracing::Level::INFO,
                        format!("CLI Command: {}", cli_command),
                        "cli".to_string(),
                    );
                    if let Ok(mut logs) = app.log_messages.lock() {
                        crate::gui::logging::push_bounded(&mut logs, cli_entry);
                    }
                }

                if ui.button("Save Preset").clicked() {
                    if let Err(e) = app.save_preset() {
                        tracing::error!("Failed to save preset: {}", e);
                    }
                }

                if ui.button("Load Preset").clicked() {
                    if let Err(e) = app.load_preset() {
                        tracing::error!("Failed to load preset: {}", e);
                    }
                }

                if ui.button("Save Logs").clicked() {
                    if let Err(e) = app.save_logs_to_file() {
                        tracing::error!("Failed to save logs: {}", e);
                    }
                }

                if ui.button("Clear").clicked() {
                    if let Ok(mut logs) = app.log_messages.lock() {
                        logs.clear();
                    }
                }

                ui.add_enabled_ui(!app.is_processing, |ui| {
                    if ui.button("Reset").clicked() {
                        app.reset();
                    }
                });
            });
        });
    }
}
