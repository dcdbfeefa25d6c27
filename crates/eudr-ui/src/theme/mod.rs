//! Dark theme with a forest-green accent, plus the colours the views use for
//! categories, notes and notifications

use egui::{Color32, Context, FontFamily, FontId, Rounding, Stroke, Style, TextStyle, Visuals};
use std::collections::BTreeMap;

use eudr_core::detail::{Tone, TypeCategory};
use eudr_core::{NotificationLevel, Rgb};

pub struct Theme {
    pub name: String,
    pub dark_mode: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "EUDR Dark".to_string(),
            dark_mode: true,
        }
    }
}

/// Apply the dashboard theme
pub fn apply_theme(ctx: &Context, theme: &Theme) {
    let mut style = Style::default();
    let mut visuals = if theme.dark_mode { Visuals::dark() } else { Visuals::light() };

    let bg_color = Color32::from_rgb(22, 26, 24);
    let panel_bg = Color32::from_rgb(30, 35, 32);
    let widget_bg = Color32::from_rgb(40, 46, 42);
    let hover_color = Color32::from_rgb(52, 60, 55);
    let active_color = Color32::from_rgb(62, 72, 66);
    let text_color = Color32::from_rgb(222, 226, 223);

    if theme.dark_mode {
        visuals.window_fill = panel_bg;
        visuals.panel_fill = panel_bg;
        visuals.extreme_bg_color = bg_color;
        visuals.faint_bg_color = widget_bg;
        visuals.code_bg_color = Color32::from_rgb(36, 42, 38);

        let text = Stroke::new(1.0, text_color);
        for (widget, fill) in [
            (&mut visuals.widgets.noninteractive, widget_bg),
            (&mut visuals.widgets.inactive, widget_bg),
            (&mut visuals.widgets.hovered, hover_color),
            (&mut visuals.widgets.active, active_color),
        ] {
            widget.bg_fill = fill;
            widget.weak_bg_fill = fill;
            widget.fg_stroke = text;
        }
    }

    for widget in [
        &mut visuals.widgets.noninteractive,
        &mut visuals.widgets.inactive,
        &mut visuals.widgets.hovered,
        &mut visuals.widgets.active,
    ] {
        widget.rounding = Rounding::same(4.0);
    }
    visuals.widgets.active.bg_stroke = Stroke::new(1.0, accent_color());

    visuals.selection.bg_fill = accent_color().linear_multiply(0.3);
    visuals.selection.stroke = Stroke::new(1.0, accent_color());
    visuals.hyperlink_color = link_color();
    visuals.striped = true;
    visuals.window_rounding = Rounding::same(6.0);
    visuals.window_shadow.extrusion = 12.0;
    visuals.popup_shadow.extrusion = 6.0;

    // Dense rows for the restriction table
    style.spacing.item_spacing = egui::vec2(6.0, 3.0);
    style.spacing.button_padding = egui::vec2(6.0, 3.0);
    style.spacing.interact_size.y = 20.0;
    style.spacing.combo_width = 160.0;

    let proportional = |size| FontId::new(size, FontFamily::Proportional);
    style.text_styles = BTreeMap::from([
        (TextStyle::Small, proportional(10.5)),
        (TextStyle::Body, proportional(12.5)),
        (TextStyle::Button, proportional(12.5)),
        (TextStyle::Heading, proportional(17.0)),
        (TextStyle::Monospace, FontId::new(11.5, FontFamily::Monospace)),
    ]);

    ctx.set_style(style);
    ctx.set_visuals(visuals);
}

/// Forest green used for selection and active widgets
pub fn accent_color() -> Color32 {
    Color32::from_rgb(46, 160, 110)
}

pub fn link_color() -> Color32 {
    Color32::from_rgb(110, 168, 254)
}

pub fn error_color() -> Color32 {
    Color32::from_rgb(229, 83, 75)
}

pub fn warning_color() -> Color32 {
    Color32::from_rgb(240, 173, 78)
}

pub fn success_color() -> Color32 {
    Color32::from_rgb(80, 200, 120)
}

pub fn info_color() -> Color32 {
    Color32::from_rgb(90, 170, 230)
}

/// Secondary text and placeholders
pub fn muted_color() -> Color32 {
    Color32::from_rgb(150, 150, 150)
}

pub fn to_color32(color: Rgb) -> Color32 {
    Color32::from_rgb(color.r, color.g, color.b)
}

/// Badge colour of a restriction-type family
pub fn category_color(category: TypeCategory) -> Color32 {
    match category {
        TypeCategory::Environmental => Color32::from_rgb(56, 142, 60),
        TypeCategory::Water => Color32::from_rgb(30, 136, 229),
        TypeCategory::Fauna => Color32::from_rgb(251, 140, 0),
        TypeCategory::Other => Color32::from_rgb(117, 117, 117),
    }
}

pub fn tone_color(tone: Tone) -> Color32 {
    match tone {
        Tone::Info => info_color(),
        Tone::Success => success_color(),
        Tone::Muted => muted_color(),
    }
}

pub fn notification_color(level: NotificationLevel) -> Color32 {
    match level {
        NotificationLevel::Success => success_color(),
        NotificationLevel::Info => info_color(),
        NotificationLevel::Error => error_color(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_colors_convert() {
        let color = Rgb::from_hex("#FF5722").unwrap();
        assert_eq!(to_color32(color), Color32::from_rgb(0xFF, 0x57, 0x22));
    }

    #[test]
    fn test_category_colors_are_distinct() {
        let colors = [
            category_color(TypeCategory::Environmental),
            category_color(TypeCategory::Water),
            category_color(TypeCategory::Fauna),
            category_color(TypeCategory::Other),
        ];
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
