//! The eframe application: owns the dashboard, its widgets and the runtime
//! that retrieves overlays

use std::path::PathBuf;
use std::sync::Arc;

use eframe::egui::{self, CentralPanel, Context, RichText, SidePanel, TopBottomPanel};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info};

use eudr_core::{
    Command, Dashboard, Dataset, Effect, ExportRequest, Notification, OverlayRegistry, Palette, Tab,
};
use eudr_data::{spawn_retrievals, DashboardConfig, OverlaySource};
use eudr_ui::theme::muted_color;
use eudr_ui::{apply_theme, icons, panel_ids, shell, show_alert, tab_bar, Theme, UiState};
use eudr_views::{
    feature_info_ui, save_with_dialog, show_detail, stat_cards, FilterBar, LayerPanel, MapView, TableView,
};

/// Main application state
pub struct DashboardApp {
    dashboard: Dashboard,
    table: TableView,
    map: MapView,
    filter_bar: FilterBar,
    layer_panel: LayerPanel,
    ui_state: UiState,

    /// Tokio runtime running overlay retrievals
    runtime: tokio::runtime::Runtime,
    fetcher: Arc<dyn OverlaySource>,
    sender: UnboundedSender<Command>,
    receiver: UnboundedReceiver<Command>,

    export_dir: Option<PathBuf>,
    egui_ctx: Context,
}

impl DashboardApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: DashboardConfig,
        dataset: Dataset,
        runtime: tokio::runtime::Runtime,
        fetcher: Arc<dyn OverlaySource>,
    ) -> Self {
        apply_theme(&cc.egui_ctx, &Theme::default());

        let palette = Palette::default().with_overrides(config.layer_colors.clone());
        let mut dashboard = Dashboard::new(dataset, OverlayRegistry::new(palette));
        let mut table = TableView::new(config.page_size);
        let effects = dashboard.start(&mut table);

        let (sender, receiver) = mpsc::unbounded_channel();
        let mut app = Self {
            dashboard,
            table,
            map: MapView::default(),
            filter_bar: FilterBar::default(),
            layer_panel: LayerPanel::default(),
            ui_state: UiState::new(config.notification_duration()),
            runtime,
            fetcher,
            sender,
            receiver,
            export_dir: config.export_dir.clone(),
            egui_ctx: cc.egui_ctx.clone(),
        };
        app.apply_effects(effects);
        app
    }

    fn dispatch(&mut self, command: Command) {
        let effects = self.dashboard.dispatch(command, &mut self.table, &mut self.map);
        self.apply_effects(effects);
    }

    fn apply_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchOverlays(requests) => {
                    info!("Retrieving {} overlay(s)", requests.len());
                    let ctx = self.egui_ctx.clone();
                    spawn_retrievals(
                        self.runtime.handle(),
                        Arc::clone(&self.fetcher),
                        requests,
                        self.sender.clone(),
                        Arc::new(move || ctx.request_repaint()),
                    );
                }
                Effect::Notify(notification) => self.ui_state.toasts.push(notification),
                Effect::SwitchTab(tab) => self.ui_state.active_tab = tab,
                Effect::Alert(message) => self.ui_state.alert = Some(message),
                Effect::Export(job) => match save_with_dialog(&job, self.export_dir.as_deref()) {
                    Ok(Some(path)) => {
                        self.ui_state
                            .toasts
                            .push(Notification::success(format!("Exported to {}", path.display())));
                    }
                    Ok(None) => debug!("Export of {} cancelled", job.file_name()),
                    Err(e) => {
                        error!("Failed to export {}: {}", job.file_name(), e);
                        self.ui_state.toasts.push(Notification::error(format!("Export failed: {}", e)));
                    }
                },
            }
        }
    }

    fn table_tab(&mut self, ctx: &Context, commands: &mut Vec<Command>) {
        let dashboard = &self.dashboard;
        let filter_bar = &mut self.filter_bar;
        TopBottomPanel::top(panel_ids::FILTERS).show(ctx, |ui| {
            filter_bar.ui(ui, dashboard.filter(), dashboard.snapshot(), commands);
            ui.horizontal(|ui| {
                ui.label(format!("{} Export:", icons::EXPORT));
                if ui.button("Summary (CSV)").clicked() {
                    commands.push(Command::Export(ExportRequest::SummarySheet));
                }
                if ui.button("All columns (CSV)").clicked() {
                    commands.push(Command::Export(ExportRequest::FullSheet));
                }
                if ui.button("Report (HTML)").clicked() {
                    commands.push(Command::Export(ExportRequest::SummaryReport));
                }
            });
            ui.add_space(4.0);
        });

        let table = &mut self.table;
        CentralPanel::default().show(ctx, |ui| {
            if dashboard.snapshot().no_results {
                ui.vertical_centered(|ui| {
                    ui.add_space(40.0);
                    ui.label(RichText::new("No restrictions match the current filters").color(muted_color()));
                    if ui.button("Reset filters").clicked() {
                        commands.push(Command::ResetFilters);
                    }
                });
            } else {
                table.ui(ui, commands);
            }
        });
    }

    fn map_tab(&mut self, ctx: &Context, commands: &mut Vec<Command>) {
        let dashboard = &self.dashboard;
        let layer_panel = &mut self.layer_panel;
        SidePanel::right(panel_ids::LAYERS)
            .default_width(300.0)
            .resizable(true)
            .show_animated(ctx, self.ui_state.show_layers, |ui| {
                layer_panel.ui(ui, dashboard.overlays(), commands);

                if let Some(info) = dashboard.feature_info() {
                    ui.separator();
                    ui.push_id(panel_ids::FEATURE_INFO, |ui| {
                        let record = info.record.and_then(|index| dashboard.dataset().get(index));
                        feature_info_ui(ui, info, record, commands);
                    });
                }
            });

        let map = &mut self.map;
        CentralPanel::default().show(ctx, |ui| map.ui(ui, commands));
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        // Overlay results arrive in completion order
        while let Ok(command) = self.receiver.try_recv() {
            self.dispatch(command);
        }

        let mut commands = Vec::new();

        TopBottomPanel::top(panel_ids::HEADER).show(ctx, |ui| {
            shell::header(ui, self.dashboard.dataset().len());
            ui.add_space(4.0);
            stat_cards(ui, &self.dashboard.snapshot().counters, &mut commands);
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                tab_bar(ui, &mut self.ui_state.active_tab);
                if self.ui_state.active_tab == Tab::Map {
                    let label = if self.ui_state.show_layers { "Hide layers" } else { "Show layers" };
                    if ui.selectable_label(self.ui_state.show_layers, format!("{} {}", icons::LAYERS, label)).clicked() {
                        self.ui_state.toggle_layers();
                    }
                }
                if self.dashboard.overlays().is_loading() {
                    ui.spinner();
                }
            });
        });

        match self.ui_state.active_tab {
            Tab::Table => self.table_tab(ctx, &mut commands),
            Tab::Map => self.map_tab(ctx, &mut commands),
        }

        if let Some(view) = self.dashboard.detail() {
            show_detail(ctx, view, &mut commands);
        }

        self.ui_state.toasts.show(ctx);
        show_alert(ctx, &mut self.ui_state.alert);

        for command in commands {
            self.dispatch(command);
        }
    }
}
