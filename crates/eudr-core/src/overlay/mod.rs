//! Map overlays: GeoJSON layers, their colours and the registry that tracks them

pub mod layer;
pub mod palette;
pub mod registry;

pub use layer::{OverlayError, OverlayFeature, OverlayLayer};
pub use palette::{Palette, Rgb, PREDEFINED_COLORS};
pub use registry::{
    FocusOutcome, LoadCycle, LoadIndicator, LoadProgress, OverlayEntry, OverlayRegistry,
    OverlayRequest, OverlayStatus,
};
