//! Views for the EUDR dashboard
//!
//! egui renderings of the dashboard state. Views never mutate the
//! dashboard: they push [`eudr_core::Command`]s for the app to dispatch.
//! [`TableView`] and [`MapView`] are the concrete table and map widgets the
//! dashboard drives.

pub mod detail;
pub mod export;
pub mod filters;
pub mod layers;
pub mod map;
pub mod stats;
pub mod table;

pub use detail::{feature_info_ui, show_detail};
pub use export::{save_with_dialog, write_job, ExportWriteError};
pub use filters::FilterBar;
pub use layers::LayerPanel;
pub use map::MapView;
pub use stats::stat_cards;
pub use table::TableView;
