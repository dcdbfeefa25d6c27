//! Renderable overlay layers parsed from GeoJSON

use geo::{BoundingRect, Closest, ClosestPoint, Contains};
use geo_types::{Coord, Geometry, Point, Rect};
use geojson::GeoJson;
use thiserror::Error;

use crate::model::value_to_text;

/// Why an overlay document could not become a layer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OverlayError {
    #[error("invalid GeoJSON: {0}")]
    Parse(String),

    #[error("unsupported geometry: {0}")]
    Geometry(String),
}

/// One drawable feature with its popup properties
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayFeature {
    pub geometry: Geometry<f64>,
    pub properties: Vec<(String, String)>,
}

/// The features of one overlay, in document order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayLayer {
    features: Vec<OverlayFeature>,
}

impl OverlayLayer {
    pub fn new(features: Vec<OverlayFeature>) -> Self {
        Self { features }
    }

    /// Parse a FeatureCollection, a single Feature or a bare Geometry
    pub fn parse(text: &str) -> Result<Self, OverlayError> {
        let geojson = text
            .parse::<GeoJson>()
            .map_err(|e| OverlayError::Parse(e.to_string()))?;
        Self::from_geojson(geojson)
    }

    pub fn from_geojson(geojson: GeoJson) -> Result<Self, OverlayError> {
        let features = match geojson {
            GeoJson::FeatureCollection(collection) => collection
                .features
                .into_iter()
                .filter_map(|feature| convert_feature(feature).transpose())
                .collect::<Result<Vec<_>, _>>()?,
            GeoJson::Feature(feature) => convert_feature(feature)?.into_iter().collect(),
            GeoJson::Geometry(geometry) => vec![OverlayFeature {
                geometry: convert_geometry(geometry.value)?,
                properties: Vec::new(),
            }],
        };

        Ok(Self { features })
    }

    pub fn features(&self) -> &[OverlayFeature] {
        &self.features
    }

    pub fn feature(&self, index: usize) -> Option<&OverlayFeature> {
        self.features.get(index)
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Bounding box over every feature; `None` for an empty layer
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.features
            .iter()
            .filter_map(|feature| feature.geometry.bounding_rect())
            .reduce(|a, b| {
                Rect::new(
                    Coord {
                        x: a.min().x.min(b.min().x),
                        y: a.min().y.min(b.min().y),
                    },
                    Coord {
                        x: a.max().x.max(b.max().x),
                        y: a.max().y.max(b.max().y),
                    },
                )
            })
    }

    /// Topmost feature containing `point`, or within `tolerance` of it
    pub fn hit_test(&self, point: Point<f64>, tolerance: f64) -> Option<usize> {
        self.features.iter().enumerate().rev().find_map(|(index, feature)| {
            if feature.geometry.contains(&point) {
                return Some(index);
            }
            let distance = match feature.geometry.closest_point(&point) {
                Closest::Intersection(p) | Closest::SinglePoint(p) => {
                    (p.x() - point.x()).hypot(p.y() - point.y())
                }
                Closest::Indeterminate => f64::INFINITY,
            };
            (distance <= tolerance).then_some(index)
        })
    }
}

fn convert_feature(feature: geojson::Feature) -> Result<Option<OverlayFeature>, OverlayError> {
    let Some(geometry) = feature.geometry else {
        return Ok(None);
    };

    let properties = feature
        .properties
        .map(|object| {
            object
                .into_iter()
                .map(|(key, value)| (key, value_to_text(value).unwrap_or_default()))
                .collect()
        })
        .unwrap_or_default();

    Ok(Some(OverlayFeature {
        geometry: convert_geometry(geometry.value)?,
        properties,
    }))
}

fn convert_geometry(value: geojson::Value) -> Result<Geometry<f64>, OverlayError> {
    Geometry::<f64>::try_from(value).map_err(|e| OverlayError::Geometry(e.to_string()))
}
