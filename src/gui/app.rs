use super::components::*;
use super::models::{Ms2RescoreGui, SettingsTab};
use crate::gui::logging::{LogEntry, get_log_buffer, push_bounded};
use eframe::egui;
use tracing::Level;

fn format_log_entry(entry: &LogEntry) -> egui::RichText {
    if entry.message.starts_with("---") {
        return egui::RichText::new(&entry.message)
            .color(egui::Color32::from_rgb(255, 165, 0))
            .monospace()
            .strong();
    }

    if entry.target == "cli" {
        return egui::RichText::new(&entry.message)
            .color(egui::Color32::from_rgb(100, 255, 100))
            .monospace()
            .strong();
    }

    let color = match entry.level {
        Level::ERROR => egui::Color32::from_rgb(255, 100, 100),
        Level::WARN => egui::Color32::from_rgb(255, 200, 100),
        Level::INFO => egui::Color32::from_rgb(100, 200, 255),
        Level::DEBUG => egui::Color32::from_rgb(150, 150, 150),
        Level::TRACE => egui::Color32::from_rgb(100, 100, 100),
    };

    let formatted_text = format!(
        "[{}] {} {}: {}",
        entry.timestamp,
        entry.level_name(),
        entry.target,
        entry.message
    );

    egui::RichText::new(formatted_text).color(color).monospace()
}

fn apply_dark_style(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();
    style.visuals.override_text_color = Some(egui::Color32::from_gray(220));
    style.visuals.widgets.noninteractive.bg_fill = egui::Color32::from_rgb(40, 40, 40);
    style.visuals.widgets.inactive.bg_fill = egui::Color32::from_rgb(50, 50, 50);
    style.visuals.widgets.hovered.bg_fill = egui::Color32::from_rgb(60, 60, 60);
    style.visuals.widgets.active.bg_fill = egui::Color32::from_rgb(70, 70, 70);
    style.visuals.panel_fill = egui::Color32::from_rgb(30, 30, 30);
    style.visuals.window_fill = egui::Color32::from_rgb(25, 25, 25);
    style.visuals.faint_bg_color = egui::Color32::from_rgb(45, 45, 45);
    style.visuals.extreme_bg_color = egui::Color32::from_rgb(20, 20, 20);
    ctx.set_style(style);
}

impl Ms2RescoreGui {
    /// Move entries captured by the tracing layer into the panel log.
    fn drain_log_buffer(&mut self) -> bool {
        let mut new_messages = Vec::new();
        if let Ok(mut buf) = get_log_buffer().lock() {
            new_messages.extend(buf.drain(..));
        }
        if new_messages.is_empty() {
            return false;
        }
        if let Ok(mut logs) = self.log_messages.lock() {
            for entry in new_messages {
                push_bounded(&mut logs, entry);
            }
        }
        true
    }
}

impl eframe::App for Ms2RescoreGui {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        static INIT: std::sync::Once = std::sync::Once::new();
        INIT.call_once(|| {
            crate::gui::models::init_gui_logging();
            egui_extras::install_image_loaders(ctx);
            apply_dark_style(ctx);
        });

        let has_new_logs = self.drain_log_buffer();
        self.poll_completion();
        if has_new_logs || self.is_processing {
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(icon) = self.resources.program_icon() {
                    ui.add(
                        egui::Image::new(format!("file://{}", icon.display()))
                            .fit_to_exact_size(egui::Vec2::new(40.0, 40.0)),
                    );
                }
                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        ui.label(egui::RichText::new("MS²Rescore").size(32.0).strong());
                        ui.label(
                            egui::RichText::new(format!("v{}", env!("CARGO_PKG_VERSION")))
                                .size(10.0)
                                .color(egui::Color32::from_gray(150)),
                        );
                    });
                    ui.label(
                        egui::RichText::new(
                            "Sensitive PSM rescoring with MS²PIP, DeepLC, and Percolator.",
                        )
                        .size(12.0),
                    );
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.add_enabled_ui(!self.is_processing, |ui| {
                        if ui
                            .button(egui::RichText::new("Run").size(16.0))
                            .clicked()
                        {
                            self.run_rescoring();
                        }
                    });
                });
            });
        });

        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            FooterComponent::render(ui, self);
        });

        egui::SidePanel::left("settings_panel")
            .resizable(true)
            .default_width(400.0)
            .show(ctx, |ui| {
                ui.add_space(6.0);
                TabBarComponent::render(ui, self);
                ui.separator();

                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        ui.add_enabled_ui(!self.is_processing, |ui| {
                            match self.active_tab {
                                SettingsTab::General => {
                                    GeneralSettingsComponent::render(ui, self);
                                    ui.separator();
                                    LauncherOptionsComponent::render(ui, self);
                                }
                                SettingsTab::Maxquant => MaxquantSettingsComponent::render(ui, self),
                                SettingsTab::Ms2pip => Ms2pipSettingsComponent::render(ui, self),
                            }
                        });
                        ui.add_space(20.0);
                    });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Log Output");

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.selectable_value(&mut self.min_log_level, Level::ERROR, "ERROR");
                    ui.selectable_value(&mut self.min_log_level, Level::WARN, "WARN");
                    ui.selectable_value(&mut self.min_log_level, Level::INFO, "INFO");
                    ui.selectable_value(&mut self.min_log_level, Level::DEBUG, "DEBUG");
                    ui.selectable_value(&mut self.min_log_level, Level::TRACE, "ALL");

                    if let Ok(logs) = self.log_messages.lock() {
                        let visible = logs.iter().filter(|e| self.is_visible(e)).count();
                        if !logs.is_empty() {
                            ui.label(format!("({} visible / {} total)", visible, logs.len()));
                        }
                    }
                });
            });

            ui.add_space(5.0);

            egui::ScrollArea::vertical()
                .stick_to_bottom(true)
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    if let Ok(logs) = self.log_messages.lock() {
                        if logs.is_empty() {
                            ui.centered_and_justified(|ui| {
                                ui.label(
                                    egui::RichText::new("No log messages")
                                        .color(egui::Color32::from_gray(120)),
                                );
                            });
                        } else {
                            for entry in logs.iter().filter(|e| self.is_visible(e)) {
                                ui.label(format_log_entry(entry));
                            }
                        }
                    }
                });
        });
    }
}
