//! Dashboard configuration
//!
//! Every field has a default, so a config file only needs the keys it
//! changes. Command-line overrides are applied on top by the app.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::DataError;

/// Page sizes offered by the table
pub const PAGE_SIZES: [usize; 4] = [5, 10, 25, 50];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    /// JSON or CSV restriction dataset
    pub dataset_path: PathBuf,

    /// Base for relative overlay paths; the dataset's directory when unset
    pub overlay_base_dir: Option<PathBuf>,

    /// Colour overrides per overlay identifier, as `#RRGGBB`
    pub layer_colors: BTreeMap<String, String>,

    pub page_size: usize,

    /// How long toasts stay on screen
    pub notification_secs: u64,

    /// Request timeout for remote overlays; no timeout when unset
    pub http_timeout_secs: Option<u64>,

    /// Initial directory of the export dialog
    pub export_dir: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("restrictions.json"),
            overlay_base_dir: None,
            layer_colors: BTreeMap::new(),
            page_size: 10,
            notification_secs: 5,
            http_timeout_secs: Some(30),
            export_dir: None,
        }
    }
}

impl DashboardConfig {
    /// Looked up in the working directory when no path is given
    pub const DEFAULT_FILE: &'static str = "eudr-dashboard.json";

    pub fn load(path: &Path) -> Result<Self, DataError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        info!("Loaded configuration from {:?}", path);
        Ok(config.validated())
    }

    /// An explicit path must exist; otherwise fall back to the default file
    /// in `dir`, then to built-in defaults
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self, DataError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let candidate = dir.join(Self::DEFAULT_FILE);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            info!("No configuration file found, using defaults");
            Ok(Self::default())
        }
    }

    fn validated(mut self) -> Self {
        if !PAGE_SIZES.contains(&self.page_size) {
            warn!("Unsupported page size {}, using 10", self.page_size);
            self.page_size = 10;
        }
        self
    }

    pub fn overlay_base_dir(&self) -> PathBuf {
        match &self.overlay_base_dir {
            Some(dir) => dir.clone(),
            None => self
                .dataset_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
        }
    }

    pub fn notification_duration(&self) -> Duration {
        Duration::from_secs(self.notification_secs)
    }

    pub fn http_timeout(&self) -> Option<Duration> {
        self.http_timeout_secs.map(Duration::from_secs)
    }
}
