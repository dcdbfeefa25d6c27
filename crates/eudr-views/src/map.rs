//! Overlay map view
//!
//! Draws overlay geometries on an equirectangular plot (x = longitude,
//! y = latitude). Framing requests from the dashboard are queued and applied
//! on the next frame; clicks are hit-tested here and sent back as commands.

use std::collections::HashMap;
use std::sync::Arc;

use egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{Line, Plot, PlotBounds, PlotPoints, PlotUi, Points, Polygon};
use geo_types::{coord, Geometry, LineString, Point, Rect};

use eudr_core::map::{DEFAULT_VIEW, LEGEND};
use eudr_core::{Command, FeatureRef, FeatureStyle, LatLon, MapSurface, OverlayLayer};
use eudr_ui::theme::to_color32;

/// Fraction of the visible width within which a click hits a line or point
const HIT_TOLERANCE: f64 = 0.01;

struct DrawnLayer {
    id: String,
    layer: Arc<OverlayLayer>,
    style: FeatureStyle,
    overrides: HashMap<usize, FeatureStyle>,
}

impl DrawnLayer {
    fn style_of(&self, feature: usize) -> FeatureStyle {
        self.overrides.get(&feature).copied().unwrap_or(self.style)
    }
}

/// Map widget showing the visible overlays
pub struct MapView {
    /// In draw order; the last layer is on top
    layers: Vec<DrawnLayer>,
    pending_bounds: Option<Rect<f64>>,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            layers: Vec::new(),
            pending_bounds: Some(view_bounds(DEFAULT_VIEW.center, DEFAULT_VIEW.zoom)),
        }
    }
}

impl MapSurface for MapView {
    fn add_layer(&mut self, id: &str, layer: Arc<OverlayLayer>, style: FeatureStyle) {
        self.remove_layer(id);
        self.layers.push(DrawnLayer {
            id: id.to_string(),
            layer,
            style,
            overrides: HashMap::new(),
        });
    }

    fn remove_layer(&mut self, id: &str) {
        self.layers.retain(|drawn| drawn.id != id);
    }

    fn fit_bounds(&mut self, bounds: Rect<f64>) {
        self.pending_bounds = Some(pad_bounds(bounds));
    }

    fn set_view(&mut self, center: LatLon, zoom: u8) {
        self.pending_bounds = Some(view_bounds(center, zoom));
    }

    fn set_feature_style(&mut self, feature: &FeatureRef, style: FeatureStyle) {
        let Some(drawn) = self.layers.iter_mut().find(|d| d.id == feature.layer_id) else {
            return;
        };
        if style == drawn.style {
            drawn.overrides.remove(&feature.feature);
        } else {
            drawn.overrides.insert(feature.feature, style);
        }
    }
}

impl MapView {
    pub fn layer_ids(&self) -> impl Iterator<Item = &str> {
        self.layers.iter().map(|drawn| drawn.id.as_str())
    }

    /// Framing that will be applied on the next frame
    pub fn pending_bounds(&self) -> Option<Rect<f64>> {
        self.pending_bounds
    }

    pub fn feature_style(&self, feature: &FeatureRef) -> Option<FeatureStyle> {
        self.layers
            .iter()
            .find(|d| d.id == feature.layer_id)
            .map(|d| d.style_of(feature.feature))
    }

    /// Topmost feature under `point`, or a background click
    pub fn hit(&self, point: Point<f64>, tolerance: f64) -> Command {
        for drawn in self.layers.iter().rev() {
            if let Some(index) = drawn.layer.hit_test(point, tolerance) {
                return Command::FeatureClicked(FeatureRef::new(drawn.id.clone(), index));
            }
        }
        Command::MapBackgroundClicked
    }

    pub fn ui(&mut self, ui: &mut Ui, commands: &mut Vec<Command>) {
        let pending = self.pending_bounds.take();
        let layers = &self.layers;

        let response = Plot::new("overlay_map")
            .data_aspect(1.0)
            .allow_scroll(true)
            .allow_zoom(true)
            .allow_drag(true)
            .allow_boxed_zoom(true)
            .show_grid(true)
            .x_axis_label("Longitude")
            .y_axis_label("Latitude")
            .show(ui, |plot_ui| {
                if let Some(bounds) = pending {
                    plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                        [bounds.min().x, bounds.min().y],
                        [bounds.max().x, bounds.max().y],
                    ));
                }

                for drawn in layers {
                    for (index, feature) in drawn.layer.features().iter().enumerate() {
                        draw_geometry(plot_ui, &feature.geometry, drawn.style_of(index));
                    }
                }

                let clicked = plot_ui.response().clicked();
                if clicked {
                    plot_ui.pointer_coordinate()
                } else {
                    None
                }
            });

        legend_ui(ui.ctx(), response.response.rect);

        if let Some(coordinate) = response.inner {
            let tolerance = response.transform.bounds().width() * HIT_TOLERANCE;
            commands.push(self.hit(Point::new(coordinate.x, coordinate.y), tolerance));
        }
    }
}

/// Colour key pinned to the bottom-right corner of the plot
fn legend_ui(ctx: &egui::Context, plot_rect: egui::Rect) {
    egui::Area::new("map_legend")
        .order(egui::Order::Foreground)
        .pivot(egui::Align2::RIGHT_BOTTOM)
        .fixed_pos(plot_rect.right_bottom() - egui::vec2(10.0, 28.0))
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.label(RichText::new("Legend").strong());
                for (label, color) in LEGEND {
                    ui.horizontal(|ui| {
                        let (swatch, _) = ui.allocate_exact_size(egui::vec2(14.0, 14.0), egui::Sense::hover());
                        ui.painter().rect_filled(swatch, 2.0, to_color32(*color));
                        ui.label(*label);
                    });
                }
            });
        });
}

/// Bounds showing `center` at a web-map style zoom level
pub fn view_bounds(center: LatLon, zoom: u8) -> Rect<f64> {
    let width = 360.0 / 2f64.powi(i32::from(zoom.min(20)));
    let height = width / 2.0;
    Rect::new(
        coord! { x: center.lon - width / 2.0, y: center.lat - height / 2.0 },
        coord! { x: center.lon + width / 2.0, y: center.lat + height / 2.0 },
    )
}

/// Grow bounds by a tenth on each side, giving degenerate ones some extent
pub fn pad_bounds(bounds: Rect<f64>) -> Rect<f64> {
    let pad_x = (bounds.width() * 0.1).max(0.01);
    let pad_y = (bounds.height() * 0.1).max(0.01);
    Rect::new(
        coord! { x: bounds.min().x - pad_x, y: bounds.min().y - pad_y },
        coord! { x: bounds.max().x + pad_x, y: bounds.max().y + pad_y },
    )
}

fn ring_points(ring: &LineString<f64>) -> PlotPoints {
    PlotPoints::new(ring.coords().map(|c| [c.x, c.y]).collect())
}

fn draw_geometry(plot_ui: &mut PlotUi, geometry: &Geometry<f64>, style: FeatureStyle) {
    let color = to_color32(style.color);
    let fill = Color32::from_rgba_unmultiplied(
        color.r(),
        color.g(),
        color.b(),
        (style.fill_opacity.clamp(0.0, 1.0) * 255.0) as u8,
    );
    let stroke = Stroke::new(style.weight, color);

    match geometry {
        Geometry::Polygon(polygon) => {
            plot_ui.polygon(Polygon::new(ring_points(polygon.exterior())).fill_color(fill).stroke(stroke));
            for hole in polygon.interiors() {
                plot_ui.line(Line::new(ring_points(hole)).stroke(stroke));
            }
        }
        Geometry::MultiPolygon(polygons) => {
            for polygon in polygons {
                draw_geometry(plot_ui, &Geometry::Polygon(polygon.clone()), style);
            }
        }
        Geometry::LineString(line) => {
            plot_ui.line(Line::new(ring_points(line)).stroke(stroke));
        }
        Geometry::MultiLineString(lines) => {
            for line in lines {
                plot_ui.line(Line::new(ring_points(line)).stroke(stroke));
            }
        }
        Geometry::Line(line) => {
            plot_ui.line(Line::new(vec![[line.start.x, line.start.y], [line.end.x, line.end.y]]).stroke(stroke));
        }
        Geometry::Point(point) => {
            plot_ui.points(Points::new(vec![[point.x(), point.y()]]).color(color).radius(style.weight + 2.0));
        }
        Geometry::MultiPoint(points) => {
            let coords: Vec<[f64; 2]> = points.iter().map(|p| [p.x(), p.y()]).collect();
            plot_ui.points(Points::new(coords).color(color).radius(style.weight + 2.0));
        }
        Geometry::Rect(rect) => draw_geometry(plot_ui, &Geometry::Polygon(rect.to_polygon()), style),
        Geometry::Triangle(triangle) => {
            draw_geometry(plot_ui, &Geometry::Polygon(triangle.to_polygon()), style)
        }
        Geometry::GeometryCollection(collection) => {
            for geometry in collection {
                draw_geometry(plot_ui, geometry, style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eudr_core::Rgb;

    const SQUARE: &str = r#"{
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {"nombre": "Reserva"},
            "geometry": {"type": "Polygon", "coordinates": [[[-71, -35], [-70, -35], [-70, -34], [-71, -34], [-71, -35]]]}
        }]
    }"#;

    fn square() -> Arc<OverlayLayer> {
        Arc::new(OverlayLayer::parse(SQUARE).unwrap())
    }

    fn base() -> FeatureStyle {
        FeatureStyle::base(Rgb::new(0x4C, 0xAF, 0x50))
    }

    #[test]
    fn test_layers_stack_in_add_order() {
        let mut map = MapView::default();
        map.add_layer("layer000", square(), base());
        map.add_layer("layer001", square(), base());
        map.add_layer("layer000", square(), base());

        assert_eq!(map.layer_ids().collect::<Vec<_>>(), vec!["layer001", "layer000"]);
        assert_eq!(
            map.hit(Point::new(-70.5, -34.5), 0.01),
            Command::FeatureClicked(FeatureRef::new("layer000", 0))
        );

        map.remove_layer("layer000");
        map.remove_layer("layer001");
        assert!(matches!(map.hit(Point::new(-70.5, -34.5), 0.01), Command::MapBackgroundClicked));
    }

    #[test]
    fn test_feature_style_override() {
        let mut map = MapView::default();
        map.add_layer("layer000", square(), base());
        let feature = FeatureRef::new("layer000", 0);

        map.set_feature_style(&feature, FeatureStyle::highlight());
        assert_eq!(map.feature_style(&feature), Some(FeatureStyle::highlight()));

        map.set_feature_style(&feature, base());
        assert_eq!(map.feature_style(&feature), Some(base()));
    }

    #[test]
    fn test_framing_requests() {
        let mut map = MapView::default();
        map.set_view(LatLon::new(-35.0, -71.0), 5);
        let bounds = map.pending_bounds().unwrap();
        assert!((bounds.width() - 11.25).abs() < 1e-9);
        assert!((bounds.center().x + 71.0).abs() < 1e-9);

        map.fit_bounds(Rect::new(coord! { x: -71.0, y: -35.0 }, coord! { x: -70.0, y: -34.0 }));
        let bounds = map.pending_bounds().unwrap();
        assert!((bounds.min().x + 71.1).abs() < 1e-9);
        assert!((bounds.max().y + 33.9).abs() < 1e-9);
    }

    #[test]
    fn test_point_bounds_get_extent() {
        let padded = pad_bounds(Rect::new(coord! { x: 1.0, y: 1.0 }, coord! { x: 1.0, y: 1.0 }));
        assert!(padded.width() > 0.0 && padded.height() > 0.0);
    }
}
