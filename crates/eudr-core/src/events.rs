//! Commands the UI sends to the dashboard, and the effects it gets back
//!
//! Widgets never mutate dashboard state directly: they emit a [`Command`],
//! the dashboard applies it and answers with [`Effect`]s the shell carries
//! out (spawning retrievals, writing exports, showing toasts).

use crate::export::ExportJob;
use crate::filter::{FilterField, FilterValue};
use crate::map::FeatureRef;
use crate::overlay::{LoadCycle, OverlayLayer, OverlayRequest};
use crate::sync::BadgeKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Info,
    Error,
}

/// Transient toast message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NotificationLevel::Success, message: message.into() }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NotificationLevel::Info, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NotificationLevel::Error, message: message.into() }
    }
}

/// Main tabs of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Table,
    Map,
}

/// Clickable summary cards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatCard {
    Total,
    Eudr,
    Environmental,
    Water,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportRequest {
    /// Fixed columns, visible subset
    SummarySheet,
    /// Every column, whole dataset
    FullSheet,
    /// Condensed document, visible subset
    SummaryReport,
    /// Document for one record
    Record(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `None` resets the field to "match all"
    SetFilter(FilterField, Option<FilterValue>),
    SetSearch(String),
    ResetFilters,
    RemoveBadge(BadgeKind),
    StatCard(StatCard),
    ToggleLayer(String),
    RemoveLayer(String),
    ReloadLayers,
    LayerSettled {
        cycle: LoadCycle,
        id: String,
        result: Result<OverlayLayer, String>,
    },
    FeatureClicked(FeatureRef),
    MapBackgroundClicked,
    ViewOnMap(String),
    ShowDetail(String),
    CloseDetail,
    Export(ExportRequest),
}

#[derive(Debug, Clone)]
pub enum Effect {
    FetchOverlays(Vec<OverlayRequest>),
    Notify(Notification),
    SwitchTab(Tab),
    Export(ExportJob),
    /// Blocking message box
    Alert(String),
}
