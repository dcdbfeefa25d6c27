//! Restriction table view
//!
//! Receives its rows wholesale through [`TableWidget`] and only owns
//! presentation state: sort column, direction and the current page.

use egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use eudr_core::detail::TypeCategory;
use eudr_core::table::{sort_rows, LinkCell};
use eudr_core::{Command, ExportRequest, SortColumn, TableRow, TableWidget, NOT_SPECIFIED};
use eudr_ui::theme::{category_color, muted_color};
use eudr_ui::{icon_button, icons, WidgetId};

/// Page sizes offered in the pager
pub const PAGE_SIZES: [usize; 4] = [5, 10, 25, 50];

const COLUMNS: [(&str, SortColumn); 8] = [
    ("País", SortColumn::Country),
    ("ID Restricción", SortColumn::Id),
    ("Norma Aplicable", SortColumn::Norm),
    ("Restricción", SortColumn::Description),
    ("Tipo", SortColumn::Type),
    ("Categoría EUDR", SortColumn::EudrCategory),
    ("Dataset", SortColumn::Dataset),
    ("Tipo Análisis", SortColumn::Analysis),
];

/// Table view over the visible subset
pub struct TableView {
    rows: Vec<TableRow>,
    sort: SortColumn,
    ascending: bool,
    page: usize,
    page_size: usize,
}

impl TableWidget for TableView {
    fn clear(&mut self) {
        self.rows.clear();
        self.page = 0;
    }

    fn add_rows(&mut self, rows: Vec<TableRow>) {
        self.rows.extend(rows);
    }

    fn redraw(&mut self) {
        sort_rows(&mut self.rows, self.sort, self.ascending);
        self.page = self.page.min(self.page_count().saturating_sub(1));
    }
}

impl TableView {
    pub fn new(page_size: usize) -> Self {
        Self {
            rows: Vec::new(),
            sort: SortColumn::Country,
            ascending: true,
            page: 0,
            page_size: if PAGE_SIZES.contains(&page_size) { page_size } else { 10 },
        }
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn sort(&self) -> (SortColumn, bool) {
        (self.sort, self.ascending)
    }

    /// Clicking the active column flips the direction
    pub fn sort_by(&mut self, column: SortColumn) {
        if self.sort == column {
            self.ascending = !self.ascending;
        } else {
            self.sort = column;
            self.ascending = true;
        }
        sort_rows(&mut self.rows, self.sort, self.ascending);
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        if PAGE_SIZES.contains(&page_size) {
            self.page_size = page_size;
            self.page = 0;
        }
    }

    pub fn page_count(&self) -> usize {
        self.rows.len().div_ceil(self.page_size).max(1)
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.min(self.page_count() - 1);
    }

    pub fn page_rows(&self) -> &[TableRow] {
        let start = (self.page * self.page_size).min(self.rows.len());
        let end = (start + self.page_size).min(self.rows.len());
        &self.rows[start..end]
    }

    /// "Showing a to b of n entries"
    pub fn range_label(&self) -> String {
        if self.rows.is_empty() {
            return "Showing 0 entries".to_string();
        }
        let start = self.page * self.page_size + 1;
        let end = start + self.page_rows().len() - 1;
        format!("Showing {} to {} of {} entries", start, end, self.rows.len())
    }

    pub fn ui(&mut self, ui: &mut Ui, commands: &mut Vec<Command>) {
        self.pager(ui);
        ui.separator();

        let text_height = egui::TextStyle::Body.resolve(ui.style()).size * 1.8;
        let mut clicked_header = None;

        let mut builder = TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .min_scrolled_height(0.0)
            .vscroll(true);

        for (index, _) in COLUMNS.iter().enumerate() {
            let width = if index == 3 { 320.0 } else { 130.0 };
            builder = builder.column(Column::initial(width).at_least(60.0).clip(true).resizable(true));
        }
        builder = builder.column(Column::initial(100.0).at_least(90.0));

        let rows = self.page_rows();
        builder
            .header(22.0, |mut header| {
                for (title, column) in COLUMNS {
                    header.col(|ui| {
                        let arrow = match (self.sort == column, self.ascending) {
                            (true, true) => " ⬆",
                            (true, false) => " ⬇",
                            _ => "",
                        };
                        let label = RichText::new(format!("{}{}", title, arrow)).strong();
                        if ui.add(egui::Label::new(label).sense(egui::Sense::click())).clicked() {
                            clicked_header = Some(column);
                        }
                    });
                }
                header.col(|ui| {
                    ui.strong("Actions");
                });
            })
            .body(|body| {
                body.rows(text_height, rows.len(), |row_index, mut row| {
                    let Some(record) = rows.get(row_index) else {
                        return;
                    };

                    row.col(|ui| {
                        ui.label(&record.country);
                    });
                    row.col(|ui| {
                        ui.code(&record.id);
                    });
                    row.col(|ui| link_cell(ui, &record.norm));
                    row.col(|ui| {
                        ui.label(&record.description).on_hover_text(&record.full_description);
                    });
                    row.col(|ui| {
                        let color = category_color(TypeCategory::classify(&record.restriction_type));
                        ui.label(RichText::new(&record.restriction_type).color(color));
                    });
                    row.col(|ui| {
                        ui.label(&record.eudr_category);
                    });
                    row.col(|ui| match &record.dataset {
                        Some(dataset) => link_cell(ui, dataset),
                        None => muted(ui),
                    });
                    row.col(|ui| match &record.analysis {
                        Some(analysis) => {
                            ui.label(analysis);
                        }
                        None => muted(ui),
                    });
                    row.col(|ui| {
                        ui.push_id(WidgetId::new("table_actions").record(&record.id).id(), |ui| {
                            if icon_button(ui, icons::DETAIL, "Show detail").clicked() {
                                commands.push(Command::ShowDetail(record.id.clone()));
                            }
                            if icon_button(ui, icons::EXPORT, "Export this restriction").clicked() {
                                commands.push(Command::Export(ExportRequest::Record(record.id.clone())));
                            }
                            if icon_button(ui, icons::MAP, "View on map").clicked() {
                                commands.push(Command::ViewOnMap(record.id.clone()));
                            }
                        });
                    });
                });
            });

        if let Some(column) = clicked_header {
            self.sort_by(column);
        }
    }

    fn pager(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.label("Show");
            let mut page_size = self.page_size;
            egui::ComboBox::from_id_source("table_page_size")
                .selected_text(page_size.to_string())
                .width(60.0)
                .show_ui(ui, |ui| {
                    for size in PAGE_SIZES {
                        ui.selectable_value(&mut page_size, size, size.to_string());
                    }
                });
            if page_size != self.page_size {
                self.set_page_size(page_size);
            }
            ui.label("entries");

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let last = self.page_count() - 1;
                if ui.add_enabled(self.page < last, egui::Button::new("Next")).clicked() {
                    self.set_page(self.page + 1);
                }
                ui.label(format!("Page {} of {}", self.page + 1, last + 1));
                if ui.add_enabled(self.page > 0, egui::Button::new("Previous")).clicked() {
                    self.set_page(self.page - 1);
                }
                ui.separator();
                ui.label(self.range_label());
            });
        });
    }
}

fn link_cell(ui: &mut Ui, cell: &LinkCell) {
    match &cell.url {
        Some(url) => {
            ui.hyperlink_to(&cell.text, url);
        }
        None => {
            ui.label(&cell.text);
        }
    }
}

fn muted(ui: &mut Ui) {
    ui.label(RichText::new(NOT_SPECIFIED).italics().color(muted_color()));
}
