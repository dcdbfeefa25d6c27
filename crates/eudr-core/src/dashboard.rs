//! The dashboard controller
//!
//! One [`Dashboard`] owns the whole "current view": dataset, filter state,
//! the last published snapshot, the overlay registry, the feature highlight
//! and the open detail. It is mutated only through [`Dashboard::dispatch`].

use chrono::Local;
use tracing::{debug, info};

use crate::dataset::Dataset;
use crate::detail::{self, DetailView};
use crate::events::{Command, Effect, ExportRequest, StatCard, Tab};
use crate::export::{self, ExportJob};
use crate::filter::{FilterField, FilterState, FilterValue};
use crate::map::{country_view, FeatureRef, Highlight, MapSurface};
use crate::overlay::{FocusOutcome, OverlayRegistry, OverlayRequest};
use crate::sync::{BadgeKind, TableWidget, ViewSnapshot, ViewSynchronizer};

/// Contents of the feature-info panel
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureInfo {
    pub feature: FeatureRef,
    /// Record owning the overlay, when one does
    pub record: Option<usize>,
    pub properties: Vec<(String, String)>,
}

pub struct Dashboard {
    dataset: Dataset,
    filter: FilterState,
    synchronizer: ViewSynchronizer,
    snapshot: ViewSnapshot,
    overlays: OverlayRegistry,
    highlight: Highlight,
    detail: Option<DetailView>,
    feature_info: Option<FeatureInfo>,
}

impl Dashboard {
    pub fn new(dataset: Dataset, overlays: OverlayRegistry) -> Self {
        Self {
            dataset,
            filter: FilterState::new(),
            synchronizer: ViewSynchronizer::default(),
            snapshot: ViewSnapshot::default(),
            overlays,
            highlight: Highlight::default(),
            detail: None,
            feature_info: None,
        }
    }

    /// Publish the initial view and schedule every overlay
    pub fn start(&mut self, table: &mut dyn TableWidget) -> Vec<Effect> {
        info!("Starting dashboard with {} restrictions", self.dataset.len());
        self.refresh(table);
        let requests = self.overlays.begin_load(&self.dataset);
        fetch_effect(requests).into_iter().collect()
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn snapshot(&self) -> &ViewSnapshot {
        &self.snapshot
    }

    pub fn overlays(&self) -> &OverlayRegistry {
        &self.overlays
    }

    pub fn highlighted(&self) -> Option<&FeatureRef> {
        self.highlight.current()
    }

    pub fn detail(&self) -> Option<&DetailView> {
        self.detail.as_ref()
    }

    pub fn feature_info(&self) -> Option<&FeatureInfo> {
        self.feature_info.as_ref()
    }

    fn refresh(&mut self, table: &mut dyn TableWidget) {
        self.snapshot = self
            .synchronizer
            .synchronize(&mut self.filter, &self.dataset, table);
    }

    /// Apply one command and return what the shell has to do next
    pub fn dispatch(
        &mut self,
        command: Command,
        table: &mut dyn TableWidget,
        map: &mut dyn MapSurface,
    ) -> Vec<Effect> {
        debug!("Dispatching {:?}", command_name(&command));
        let mut effects = Vec::new();

        match command {
            Command::SetFilter(field, value) => {
                match value {
                    Some(value) => self.filter.set_field(field, value),
                    None => self.filter.clear_field(field),
                }
                self.refresh(table);
            }
            Command::SetSearch(text) => {
                self.filter.set_search(text);
                self.refresh(table);
            }
            Command::ResetFilters => {
                self.filter.reset();
                self.refresh(table);
            }
            Command::RemoveBadge(kind) => {
                match kind {
                    BadgeKind::Field(field) => self.filter.clear_field(field),
                    BadgeKind::Search => self.filter.clear_search(),
                }
                self.refresh(table);
            }
            Command::StatCard(card) => {
                self.filter.reset();
                match card {
                    StatCard::Total => {}
                    StatCard::Eudr => self.filter.set_field(FilterField::EudrCategory, FilterValue::Present),
                    StatCard::Environmental => self
                        .filter
                        .set_field(FilterField::DescriptionType, FilterValue::exact("ambiental")),
                    StatCard::Water => self
                        .filter
                        .set_field(FilterField::DescriptionType, FilterValue::exact("hidrica")),
                }
                self.refresh(table);
                effects.push(Effect::SwitchTab(Tab::Table));
            }
            Command::ToggleLayer(id) => {
                if self.overlays.toggle(&id, map) == Some(false) {
                    self.drop_layer_selection(&id);
                }
            }
            Command::RemoveLayer(id) => {
                if let Some(note) = self.overlays.remove(&id, map) {
                    self.drop_layer_selection(&id);
                    effects.push(Effect::Notify(note));
                }
            }
            Command::ReloadLayers => {
                self.highlight.forget();
                self.feature_info = None;
                let requests = self.overlays.reload_all(&self.dataset, map);
                effects.extend(fetch_effect(requests));
            }
            Command::LayerSettled { cycle, id, result } => {
                if let Some(note) = self.overlays.settle(cycle, &id, result) {
                    effects.push(Effect::Notify(note));
                }
            }
            Command::FeatureClicked(feature) => self.select_feature(feature, map),
            Command::MapBackgroundClicked => {
                self.highlight.clear(map);
                self.feature_info = None;
            }
            Command::ViewOnMap(id) => self.view_on_map(&id, map, &mut effects),
            Command::ShowDetail(id) => match self.dataset.position(&id) {
                Some(index) => {
                    self.detail = self.dataset.get(index).map(|record| detail::project(index, record));
                }
                None => debug!("Detail requested for unknown restriction {}", id),
            },
            Command::CloseDetail => self.detail = None,
            Command::Export(request) => effects.extend(self.export(request)),
        }

        effects
    }

    fn drop_layer_selection(&mut self, layer_id: &str) {
        self.highlight.forget_layer(layer_id);
        if self
            .feature_info
            .as_ref()
            .map(|info| info.feature.layer_id == layer_id)
            .unwrap_or(false)
        {
            self.feature_info = None;
        }
    }

    fn select_feature(&mut self, feature: FeatureRef, map: &mut dyn MapSurface) {
        let Some(entry) = self.overlays.entry(&feature.layer_id) else {
            debug!("Click on unknown overlay {}", feature.layer_id);
            return;
        };
        let Some(properties) = entry.layer.feature(feature.feature).map(|f| f.properties.clone()) else {
            return;
        };

        self.highlight.select(feature.clone(), entry.style(), map);
        self.feature_info = Some(FeatureInfo {
            record: self.dataset.owner_of_layer(&feature.layer_id),
            feature,
            properties,
        });
    }

    fn view_on_map(&mut self, id: &str, map: &mut dyn MapSurface, effects: &mut Vec<Effect>) {
        let Some(record) = self.dataset.find(id) else {
            debug!("View on map requested for unknown restriction {}", id);
            return;
        };

        self.detail = None;
        self.highlight.clear(map);
        self.feature_info = None;
        effects.push(Effect::SwitchTab(Tab::Map));

        let outcome = match record.layer_id.as_deref() {
            Some(layer_id) => self.overlays.focus(layer_id, map),
            None => FocusOutcome::Missing,
        };

        if outcome != FocusOutcome::Fitted {
            let view = country_view(&record.country);
            map.set_view(view.center, view.zoom);
        }
    }

    fn export(&self, request: ExportRequest) -> Option<Effect> {
        let visible = &self.snapshot.visible;
        let job = match request {
            ExportRequest::SummarySheet => export::summary_sheet(&self.dataset, visible).map(ExportJob::Sheet),
            ExportRequest::FullSheet => export::full_sheet(&self.dataset, visible).map(ExportJob::Sheet),
            ExportRequest::SummaryReport => {
                export::summary_report(&self.dataset, visible, Local::now().date_naive()).map(ExportJob::Report)
            }
            ExportRequest::Record(id) => match self.dataset.find(&id) {
                Some(record) => Ok(ExportJob::Report(export::record_report(record))),
                None => {
                    debug!("Export requested for unknown restriction {}", id);
                    return None;
                }
            },
        };

        Some(match job {
            Ok(job) => Effect::Export(job),
            Err(e) => Effect::Alert(e.to_string()),
        })
    }
}

fn fetch_effect(requests: Vec<OverlayRequest>) -> Option<Effect> {
    (!requests.is_empty()).then(|| Effect::FetchOverlays(requests))
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::SetFilter(..) => "SetFilter",
        Command::SetSearch(_) => "SetSearch",
        Command::ResetFilters => "ResetFilters",
        Command::RemoveBadge(_) => "RemoveBadge",
        Command::StatCard(_) => "StatCard",
        Command::ToggleLayer(_) => "ToggleLayer",
        Command::RemoveLayer(_) => "RemoveLayer",
        Command::ReloadLayers => "ReloadLayers",
        Command::LayerSettled { .. } => "LayerSettled",
        Command::FeatureClicked(_) => "FeatureClicked",
        Command::MapBackgroundClicked => "MapBackgroundClicked",
        Command::ViewOnMap(_) => "ViewOnMap",
        Command::ShowDetail(_) => "ShowDetail",
        Command::CloseDetail => "CloseDetail",
        Command::Export(_) => "Export",
    }
}
