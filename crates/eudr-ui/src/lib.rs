//! User interface building blocks for the EUDR dashboard
//!
//! Theme, widget ID helpers and the application shell (header, tabs,
//! toasts, alert). Dashboard-specific views live in `eudr-views`.

pub mod shell;
pub mod theme;
pub mod widget_utils;

use std::time::Duration;

use eudr_core::Tab;

pub use shell::{show_alert, tab_bar, Toast, Toasts};
pub use theme::{apply_theme, Theme};
pub use widget_utils::{filter_combo, GridExt, ScrollAreaExt, WidgetId};

/// Shell state that persists across frames
pub struct UiState {
    pub active_tab: Tab,
    pub toasts: Toasts,
    /// Message of the blocking alert, when one is open
    pub alert: Option<String>,
    /// Whether the layer panel beside the map is open
    pub show_layers: bool,
}

impl UiState {
    pub fn new(toast_lifetime: Duration) -> Self {
        Self {
            active_tab: Tab::default(),
            toasts: Toasts::new(toast_lifetime),
            alert: None,
            show_layers: true,
        }
    }

    pub fn toggle_layers(&mut self) {
        self.show_layers = !self.show_layers;
    }
}

// Widget creation helpers
pub fn icon_button(ui: &mut egui::Ui, icon: &str, tooltip: &str) -> egui::Response {
    ui.add(egui::Button::new(icon)).on_hover_text(tooltip)
}

// Common icon definitions
pub mod icons {
    pub const SEARCH: &str = "🔍";
    pub const TABLE: &str = "📋";
    pub const MAP: &str = "🗺";
    pub const DETAIL: &str = "👁";
    pub const EXPORT: &str = "📄";
    pub const RELOAD: &str = "🔄";
    pub const CLOSE: &str = "✖";
    pub const WARNING: &str = "⚠";
    pub const LAYERS: &str = "🗂";
}

// Panel IDs
pub mod panel_ids {
    pub const HEADER: &str = "header_panel";
    pub const FILTERS: &str = "filters_panel";
    pub const LAYERS: &str = "layers_panel";
    pub const FEATURE_INFO: &str = "feature_info_panel";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_panel_starts_open_and_toggles() {
        let mut state = UiState::new(Duration::from_secs(5));
        assert!(state.show_layers);
        assert_eq!(state.active_tab, Tab::Table);

        state.toggle_layers();
        assert!(!state.show_layers);
        state.toggle_layers();
        assert!(state.show_layers);
    }
}
