//! Layer panel: load progress, search, visibility toggles and removal

use egui::{RichText, Ui};

use eudr_core::overlay::LoadProgress;
use eudr_core::{Command, OverlayRegistry};
use eudr_ui::theme::{error_color, muted_color, to_color32};
use eudr_ui::{icon_button, icons, ScrollAreaExt, WidgetId};

pub const NO_LAYERS: &str = "No layers available";

/// Share of the current cycle that has settled
pub fn progress_fraction(progress: &LoadProgress) -> f32 {
    if progress.total == 0 {
        1.0
    } else {
        progress.settled() as f32 / progress.total as f32
    }
}

#[derive(Default)]
pub struct LayerPanel {
    query: String,
}

impl LayerPanel {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn ui(&mut self, ui: &mut Ui, registry: &OverlayRegistry, commands: &mut Vec<Command>) {
        ui.horizontal(|ui| {
            ui.heading(format!("{} Layers", icons::LAYERS));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let reload = ui.button(icons::RELOAD);
                if reload.on_hover_text("Reload all layers").clicked() {
                    commands.push(Command::ReloadLayers);
                }
            });
        });

        let progress = registry.progress();
        let indicator = progress.indicator();
        ui.add(egui::ProgressBar::new(progress_fraction(&progress)).text(&indicator.progress));
        if let Some(remaining) = &indicator.remaining {
            ui.label(RichText::new(remaining).small().color(muted_color()));
        }
        if let Some(errors) = &indicator.errors {
            ui.label(RichText::new(errors).small().color(error_color()));
        }

        ui.separator();
        ui.horizontal(|ui| {
            ui.label(icons::SEARCH);
            ui.add(egui::TextEdit::singleline(&mut self.query).hint_text("Search layers"));
        });

        let entries = registry.search(&self.query);
        if entries.is_empty() {
            ui.add_space(8.0);
            ui.label(RichText::new(NO_LAYERS).italics().color(muted_color()));
            return;
        }

        egui::ScrollArea::vertical()
            .id_builder(WidgetId::new("layers").with("list"))
            .show(ui, |ui| {
                for entry in entries {
                    ui.push_id(WidgetId::new("layer_row").layer(&entry.id).id(), |ui| {
                        ui.horizontal(|ui| {
                            let (swatch, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                            ui.painter().rect_filled(swatch, 2.0, to_color32(entry.color));

                            let mut visible = entry.visible;
                            if ui.checkbox(&mut visible, &entry.name).changed() {
                                commands.push(Command::ToggleLayer(entry.id.clone()));
                            }

                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                if icon_button(ui, icons::CLOSE, "Remove layer").clicked() {
                                    commands.push(Command::RemoveLayer(entry.id.clone()));
                                }
                            });
                        });
                        ui.label(RichText::new(&entry.source).small().color(muted_color()));
                    });
                }
            });
    }
}
