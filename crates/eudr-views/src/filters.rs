//! Filter bar: cascading combos, free-text search, reset and badges

use egui::{RichText, Ui};

use eudr_core::sync::Facets;
use eudr_core::{Command, FilterField, FilterState, FilterValue, ViewSnapshot};
use eudr_ui::theme::{accent_color, muted_color};
use eudr_ui::{filter_combo, icons, WidgetId};

const ALL: &str = "All";

/// One entry of a filter combo
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOption {
    pub label: String,
    pub value: Option<FilterValue>,
}

/// Entries offered for `field`: "All", the presence test for the EUDR
/// category, then the cascading candidates
pub fn options(field: FilterField, facets: &Facets) -> Vec<FilterOption> {
    let mut options = vec![FilterOption {
        label: ALL.to_string(),
        value: None,
    }];

    if field == FilterField::EudrCategory {
        options.push(FilterOption {
            label: "Any category".to_string(),
            value: Some(FilterValue::Present),
        });
    }

    options.extend(facets.candidates(field).iter().map(|candidate| FilterOption {
        label: candidate.clone(),
        value: Some(FilterValue::exact(candidate.as_str())),
    }));
    options
}

/// Text shown on a closed combo
pub fn selected_text(filter: &FilterState, field: FilterField) -> String {
    match filter.constraint(field) {
        None => ALL.to_string(),
        Some(FilterValue::Present) => "Any category".to_string(),
        Some(value) => value.to_string(),
    }
}

/// Keeps the search box text between frames
#[derive(Default)]
pub struct FilterBar {
    search: String,
}

impl FilterBar {
    pub fn ui(&mut self, ui: &mut Ui, filter: &FilterState, snapshot: &ViewSnapshot, commands: &mut Vec<Command>) {
        // Reset and stat cards change the search behind the text box
        if self.search != filter.search() && !ui.memory(|m| m.has_focus(WidgetId::new("filter").with("search").id())) {
            self.search = filter.search().to_string();
        }

        ui.horizontal_wrapped(|ui| {
            for field in FilterField::ALL {
                ui.vertical(|ui| {
                    ui.label(RichText::new(field.label()).small().color(muted_color()));
                    let current = filter.constraint(field).cloned();
                    filter_combo(field.key())
                        .selected_text(selected_text(filter, field))
                        .width(150.0)
                        .show_ui(ui, |ui| {
                            for option in options(field, &snapshot.facets) {
                                let selected = option.value == current;
                                if ui.selectable_label(selected, &option.label).clicked() && !selected {
                                    commands.push(Command::SetFilter(field, option.value));
                                }
                            }
                        });
                });
            }
        });

        ui.horizontal(|ui| {
            ui.label(icons::SEARCH);
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.search)
                    .id(WidgetId::new("filter").with("search").id())
                    .hint_text("Search by country, norm, description, ID, type or dataset")
                    .desired_width(360.0),
            );
            if response.changed() {
                commands.push(Command::SetSearch(self.search.clone()));
            }

            if ui.button("Reset filters").clicked() {
                self.search.clear();
                commands.push(Command::ResetFilters);
            }

            ui.separator();
            ui.label(RichText::new(snapshot.results_label()).strong());
        });

        if !snapshot.badges.is_empty() {
            ui.horizontal_wrapped(|ui| {
                ui.label(RichText::new("Active filters:").color(muted_color()));
                for badge in &snapshot.badges {
                    let text = RichText::new(format!("{} {}", badge.label, icons::CLOSE)).color(accent_color());
                    if ui.button(text).on_hover_text("Remove this filter").clicked() {
                        commands.push(Command::RemoveBadge(badge.kind));
                    }
                }
            });
        }
    }
}
