//! Map surface contract, feature highlighting and country framing

use std::sync::Arc;

use geo_types::Rect;
use tracing::{debug, warn};

use crate::overlay::{OverlayLayer, Rgb};

/// A geographic position in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Stroke and fill of a drawn feature
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureStyle {
    pub color: Rgb,
    pub weight: f32,
    pub fill_opacity: f32,
}

impl FeatureStyle {
    /// Default look of an overlay in its assigned colour
    pub fn base(color: Rgb) -> Self {
        Self {
            color,
            weight: 2.0,
            fill_opacity: 0.3,
        }
    }

    /// Emphasis applied to the selected feature
    pub fn highlight() -> Self {
        Self {
            color: Rgb::new(0xE7, 0x4C, 0x3C),
            weight: 5.0,
            fill_opacity: 0.9,
        }
    }
}

/// Identifies one feature of one overlay
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeatureRef {
    pub layer_id: String,
    pub feature: usize,
}

impl FeatureRef {
    pub fn new(layer_id: impl Into<String>, feature: usize) -> Self {
        Self {
            layer_id: layer_id.into(),
            feature,
        }
    }
}

/// What the dashboard needs from a map widget
pub trait MapSurface {
    fn add_layer(&mut self, id: &str, layer: Arc<OverlayLayer>, style: FeatureStyle);
    fn remove_layer(&mut self, id: &str);
    fn fit_bounds(&mut self, bounds: Rect<f64>);
    fn set_view(&mut self, center: LatLon, zoom: u8);
    fn set_feature_style(&mut self, feature: &FeatureRef, style: FeatureStyle);
}

/// Fixed framing for a country
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountryView {
    pub country: &'static str,
    pub center: LatLon,
    pub zoom: u8,
}

const fn view(country: &'static str, lat: f64, lon: f64, zoom: u8) -> CountryView {
    CountryView {
        country,
        center: LatLon::new(lat, lon),
        zoom,
    }
}

pub const COUNTRY_VIEWS: &[CountryView] = &[
    view("Belice", 17.0, -88.0, 8),
    view("Chile", -35.0, -71.0, 5),
    view("Perú", -13.0, -74.0, 6),
    view("Colombia", 4.0, -73.0, 6),
    view("Brasil", -10.0, -55.0, 5),
    view("México", 19.0, -99.0, 5),
    view("Argentina", -40.0, -72.0, 5),
    view("Ecuador", -2.0, -78.0, 7),
    view("Bolivia", -17.0, -65.0, 6),
    view("Venezuela", 8.0, -66.0, 6),
    view("Paraguay", -23.0, -58.0, 7),
    view("Uruguay", -33.0, -56.0, 8),
    view("Guyana", 5.0, -58.0, 7),
    view("Surinam", 4.0, -56.0, 7),
    view("Guayana Francesa", 4.0, -53.0, 8),
];

/// Continental framing used for unknown countries
pub const DEFAULT_VIEW: CountryView = view("South America", -15.0, -60.0, 4);

/// Framing for a country, falling back to the continental default
pub fn country_view(country: &str) -> CountryView {
    match COUNTRY_VIEWS.iter().find(|v| v.country == country) {
        Some(view) => *view,
        None => {
            warn!("No map framing for country {:?}, using default view", country);
            DEFAULT_VIEW
        }
    }
}

/// Map legend entries: restriction family and its swatch colour
pub const LEGEND: &[(&str, Rgb)] = &[
    ("Environmental/Forestry", Rgb::new(0x34, 0x98, 0xDB)),
    ("Water", Rgb::new(0xE7, 0x4C, 0x3C)),
    ("Fauna", Rgb::new(0x27, 0xAE, 0x60)),
    ("Urban", Rgb::new(0x8E, 0x44, 0xAD)),
    ("Cultural", Rgb::new(0x1A, 0xBC, 0x9C)),
    ("Other", Rgb::new(0x95, 0xA5, 0xA6)),
];

/// At most one emphasised feature at a time
#[derive(Debug, Clone, Default)]
pub struct Highlight {
    current: Option<(FeatureRef, FeatureStyle)>,
}

impl Highlight {
    pub fn current(&self) -> Option<&FeatureRef> {
        self.current.as_ref().map(|(feature, _)| feature)
    }

    /// Emphasise `feature`, first restoring whatever was emphasised before
    pub fn select(&mut self, feature: FeatureRef, base: FeatureStyle, map: &mut dyn MapSurface) {
        self.clear(map);
        map.set_feature_style(&feature, FeatureStyle::highlight());
        self.current = Some((feature, base));
    }

    /// Restore the emphasised feature, if any
    pub fn clear(&mut self, map: &mut dyn MapSurface) {
        if let Some((feature, base)) = self.current.take() {
            map.set_feature_style(&feature, base);
        }
    }

    /// Drop the emphasis without touching the map (its layer is gone)
    pub fn forget_layer(&mut self, layer_id: &str) {
        if self.current().map(|f| f.layer_id == layer_id).unwrap_or(false) {
            debug!("Dropping highlight on removed layer {}", layer_id);
            self.current = None;
        }
    }

    pub fn forget(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MapCall, RecordingMap};

    #[test]
    fn test_country_views() {
        assert_eq!(country_view("Belice").zoom, 8);
        assert_eq!(country_view("Ecuador").center, LatLon::new(-2.0, -78.0));
        assert_eq!(country_view("Narnia"), DEFAULT_VIEW);
    }

    #[test]
    fn test_highlight_restores_previous_feature() {
        let mut map = RecordingMap::default();
        let mut highlight = Highlight::default();
        let base = FeatureStyle::base(Rgb::new(0x4C, 0xAF, 0x50));

        highlight.select(FeatureRef::new("layer000", 0), base, &mut map);
        highlight.select(FeatureRef::new("layer000", 1), base, &mut map);

        assert_eq!(
            map.calls,
            vec![
                MapCall::Style(FeatureRef::new("layer000", 0), FeatureStyle::highlight()),
                MapCall::Style(FeatureRef::new("layer000", 0), base),
                MapCall::Style(FeatureRef::new("layer000", 1), FeatureStyle::highlight()),
            ]
        );

        highlight.clear(&mut map);
        assert_eq!(highlight.current(), None);
        assert_eq!(map.calls.last(), Some(&MapCall::Style(FeatureRef::new("layer000", 1), base)));
    }

    #[test]
    fn test_legend_lists_each_family_once() {
        let labels: Vec<&str> = LEGEND.iter().map(|(label, _)| *label).collect();
        assert_eq!(labels.len(), 6);
        assert_eq!(labels.first(), Some(&"Environmental/Forestry"));
        assert_eq!(labels.last(), Some(&"Other"));
        for (i, (_, a)) in LEGEND.iter().enumerate() {
            assert!(LEGEND[i + 1..].iter().all(|(_, b)| a != b));
        }
    }

    #[test]
    fn test_forget_layer_only_drops_matching_highlight() {
        let mut map = RecordingMap::default();
        let mut highlight = Highlight::default();
        highlight.select(FeatureRef::new("layer001", 0), FeatureStyle::base(Rgb::new(0, 0, 0)), &mut map);

        highlight.forget_layer("layer000");
        assert!(highlight.current().is_some());
        highlight.forget_layer("layer001");
        assert!(highlight.current().is_none());
    }
}
