//! Widget ID helpers
//!
//! Table rows, layer rows and filter combos are drawn in loops keyed by
//! restriction or overlay identifiers. These helpers derive stable, unique
//! egui IDs from those keys so repeated widgets never collide.

use egui::{ComboBox, Grid, Id, ScrollArea};
use std::fmt::Display;

/// Widget ID builder that ensures unique IDs by combining multiple components
pub struct WidgetId {
    components: Vec<String>,
}

impl WidgetId {
    pub fn new(base: impl Display) -> Self {
        Self {
            components: vec![base.to_string()],
        }
    }

    /// Add a component to the ID
    pub fn with(mut self, component: impl Display) -> Self {
        self.components.push(component.to_string());
        self
    }

    /// Add an index to the ID (useful in loops)
    pub fn index(self, idx: usize) -> Self {
        self.with(format!("idx_{}", idx))
    }

    /// Scope the ID to one restriction record
    pub fn record(self, id: &str) -> Self {
        self.with(format!("rec_{}", id))
    }

    /// Scope the ID to one overlay
    pub fn layer(self, id: &str) -> Self {
        self.with(format!("layer_{}", id))
    }

    /// Build the final ID string
    pub fn build(&self) -> String {
        self.components.join("_")
    }

    pub fn id(&self) -> Id {
        Id::new(self.build())
    }
}

/// Extension trait for ScrollArea to easily add unique IDs
pub trait ScrollAreaExt {
    fn id_builder(self, builder: WidgetId) -> Self;
}

impl ScrollAreaExt for ScrollArea {
    fn id_builder(self, builder: WidgetId) -> Self {
        self.id_source(builder.build())
    }
}

/// Extension trait for Grid to easily add unique IDs
pub trait GridExt {
    fn new_with_id(builder: WidgetId) -> Self;
}

impl GridExt for Grid {
    fn new_with_id(builder: WidgetId) -> Self {
        Grid::new(builder.build())
    }
}

/// Filter combo boxes, one per filterable field
pub fn filter_combo(field_key: &str) -> ComboBox {
    ComboBox::from_id_source(WidgetId::new("filter").with(field_key).build())
}
