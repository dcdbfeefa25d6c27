//! Recording doubles for the table and map collaborators

use std::sync::Arc;

use geo_types::Rect;

use crate::map::{FeatureRef, FeatureStyle, LatLon, MapSurface};
use crate::overlay::OverlayLayer;
use crate::sync::TableWidget;
use crate::table::TableRow;

#[derive(Default)]
pub struct RecordingTable {
    pub rows: Vec<TableRow>,
    pub clears: usize,
    pub redraws: usize,
}

impl TableWidget for RecordingTable {
    fn clear(&mut self) {
        self.rows.clear();
        self.clears += 1;
    }

    fn add_rows(&mut self, rows: Vec<TableRow>) {
        self.rows.extend(rows);
    }

    fn redraw(&mut self) {
        self.redraws += 1;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapCall {
    Add(String),
    Remove(String),
    Fit(Rect<f64>),
    View(LatLon, u8),
    Style(FeatureRef, FeatureStyle),
}

#[derive(Default)]
pub struct RecordingMap {
    pub calls: Vec<MapCall>,
    pub layers: Vec<String>,
}

impl MapSurface for RecordingMap {
    fn add_layer(&mut self, id: &str, _layer: Arc<OverlayLayer>, _style: FeatureStyle) {
        self.layers.push(id.to_string());
        self.calls.push(MapCall::Add(id.to_string()));
    }

    fn remove_layer(&mut self, id: &str) {
        self.layers.retain(|layer| layer != id);
        self.calls.push(MapCall::Remove(id.to_string()));
    }

    fn fit_bounds(&mut self, bounds: Rect<f64>) {
        self.calls.push(MapCall::Fit(bounds));
    }

    fn set_view(&mut self, center: LatLon, zoom: u8) {
        self.calls.push(MapCall::View(center, zoom));
    }

    fn set_feature_style(&mut self, feature: &FeatureRef, style: FeatureStyle) {
        self.calls.push(MapCall::Style(feature.clone(), style));
    }
}
