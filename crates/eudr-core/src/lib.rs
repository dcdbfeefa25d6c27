//! Core functionality for the EUDR restrictions dashboard
//!
//! This crate holds the data model, the filter predicate, view
//! synchronization, the overlay registry and the detail and export
//! projections. Nothing here depends on a UI toolkit: widgets are reached
//! through the [`TableWidget`] and [`MapSurface`] traits.

pub mod dashboard;
pub mod dataset;
pub mod detail;
pub mod events;
pub mod export;
pub mod filter;
pub mod map;
pub mod model;
pub mod overlay;
pub mod sync;
pub mod table;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use dashboard::{Dashboard, FeatureInfo};
pub use dataset::{Dataset, DatasetError, LayerSource};
pub use detail::{DetailSection, DetailValue, DetailView, SectionBody, Tone, TypeCategory};
pub use events::{Command, Effect, ExportRequest, Notification, NotificationLevel, StatCard, Tab};
pub use export::{ExportError, ExportJob, Report, ReportSection, Sheet};
pub use filter::{FilterField, FilterState, FilterValue};
pub use map::{FeatureRef, FeatureStyle, Highlight, LatLon, MapSurface};
pub use model::{Restriction, NOT_SPECIFIED};
pub use overlay::{
    LoadCycle, OverlayEntry, OverlayError, OverlayLayer, OverlayRegistry, OverlayRequest, OverlayStatus, Palette, Rgb,
};
pub use sync::{Badge, BadgeKind, Counters, TableWidget, ViewSnapshot, ViewSynchronizer};
pub use table::{SortColumn, TableRow};
