//! Detail modal and the map's feature-info panel

use egui::{Context, RichText, Ui};

use eudr_core::table::truncate;
use eudr_core::{
    Command, DetailValue, DetailView, ExportRequest, FeatureInfo, Restriction, SectionBody,
};
use eudr_ui::theme::{category_color, muted_color, tone_color};
use eudr_ui::{icons, GridExt, WidgetId};

fn value_ui(ui: &mut Ui, value: &DetailValue) {
    match value {
        DetailValue::Text(text) => {
            ui.label(text);
        }
        DetailValue::Code(text) => {
            ui.code(text);
        }
        DetailValue::Link { text, url } => {
            ui.hyperlink_to(text, url);
        }
        DetailValue::Badge(text, category) => {
            let color = category_color(*category);
            egui::Frame::none()
                .fill(color.linear_multiply(0.25))
                .rounding(8.0)
                .inner_margin(egui::Margin::symmetric(6.0, 2.0))
                .show(ui, |ui| {
                    ui.label(RichText::new(text).color(color));
                });
        }
        DetailValue::Missing(placeholder) => {
            ui.label(RichText::new(*placeholder).italics().color(muted_color()));
        }
    }
}

/// Modal with every section of the selected restriction
pub fn show_detail(ctx: &Context, view: &DetailView, commands: &mut Vec<Command>) {
    let mut open = true;

    egui::Window::new(&view.title)
        .id(WidgetId::new("detail").record(&view.id).id())
        .open(&mut open)
        .collapsible(false)
        .resizable(true)
        .default_width(620.0)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().max_height(520.0).show(ui, |ui| {
                for (index, section) in view.sections.iter().enumerate() {
                    ui.add_space(6.0);
                    ui.label(RichText::new(section.title).strong().size(15.0));
                    match &section.body {
                        SectionBody::Fields(fields) => {
                            egui::Grid::new_with_id(WidgetId::new("detail_section").index(index))
                                .num_columns(2)
                                .spacing([16.0, 4.0])
                                .striped(true)
                                .show(ui, |ui| {
                                    for field in fields {
                                        ui.label(RichText::new(field.label).color(muted_color()));
                                        value_ui(ui, &field.value);
                                        ui.end_row();
                                    }
                                });
                        }
                        SectionBody::Note(value, tone) => {
                            let color = tone_color(*tone);
                            egui::Frame::none()
                                .fill(color.linear_multiply(0.12))
                                .stroke(egui::Stroke::new(1.0, color))
                                .rounding(4.0)
                                .inner_margin(8.0)
                                .show(ui, |ui| {
                                    ui.set_width(ui.available_width());
                                    value_ui(ui, value);
                                });
                        }
                    }
                    ui.separator();
                }
            });

            ui.horizontal(|ui| {
                if ui.button(format!("{} Export", icons::EXPORT)).clicked() {
                    commands.push(Command::Export(ExportRequest::Record(view.id.clone())));
                }
                if ui.button(format!("{} View on map", icons::MAP)).clicked() {
                    commands.push(Command::ViewOnMap(view.id.clone()));
                }
            });
        });

    if !open {
        commands.push(Command::CloseDetail);
    }
}

/// Properties of the clicked map feature and its owning restriction
pub fn feature_info_ui(
    ui: &mut Ui,
    info: &FeatureInfo,
    record: Option<&Restriction>,
    commands: &mut Vec<Command>,
) {
    ui.horizontal(|ui| {
        match record {
            Some(record) => ui.heading(format!("{} · {}", record.country, record.id)),
            None => ui.heading(&info.feature.layer_id),
        };
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.small_button(icons::CLOSE).clicked() {
                commands.push(Command::MapBackgroundClicked);
            }
        });
    });

    if let Some(record) = record {
        ui.label(RichText::new(&record.restriction_type).color(muted_color()));
        ui.label(truncate(&record.description, 200));
        ui.horizontal(|ui| {
            if ui.button(format!("{} View on map", icons::MAP)).clicked() {
                commands.push(Command::ViewOnMap(record.id.clone()));
            }
            if ui.button(format!("{} View detail", icons::DETAIL)).clicked() {
                commands.push(Command::ShowDetail(record.id.clone()));
            }
        });
    }
    ui.separator();

    if info.properties.is_empty() {
        ui.label(RichText::new("This feature has no properties").italics().color(muted_color()));
        return;
    }

    egui::ScrollArea::vertical().max_height(240.0).show(ui, |ui| {
        egui::Grid::new_with_id(WidgetId::new("feature_info").with(&info.feature.layer_id).index(info.feature.feature))
            .num_columns(2)
            .striped(true)
            .show(ui, |ui| {
                for (key, value) in &info.properties {
                    ui.label(RichText::new(key).strong());
                    ui.label(value);
                    ui.end_row();
                }
            });
    });
}
