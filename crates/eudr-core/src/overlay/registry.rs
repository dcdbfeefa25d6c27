//! Overlay registry: per-identifier load state and map visibility
//!
//! Each overlay identifier moves `unloaded -> loading -> {loaded, failed}`
//! within a load cycle. A reload starts a new cycle; completions that belong
//! to an older cycle are discarded, so in-flight retrievals never need to be
//! cancelled.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use super::{OverlayLayer, Palette, Rgb};
use crate::dataset::Dataset;
use crate::events::Notification;
use crate::map::{FeatureStyle, MapSurface};

/// Generation number of a batch of overlay retrievals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadCycle(pub u64);

impl fmt::Display for LoadCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cycle {}", self.0)
    }
}

/// A retrieval the shell must perform and report back
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayRequest {
    pub cycle: LoadCycle,
    pub id: String,
    pub name: String,
    pub source: String,
}

/// A successfully loaded overlay
#[derive(Debug, Clone)]
pub struct OverlayEntry {
    pub id: String,
    pub name: String,
    pub source: String,
    pub color: Rgb,
    pub visible: bool,
    pub layer: Arc<OverlayLayer>,
}

impl OverlayEntry {
    pub fn style(&self) -> FeatureStyle {
        FeatureStyle::base(self.color)
    }
}

#[derive(Debug, Clone)]
pub enum OverlayStatus {
    Loading { name: String, source: String, color: Rgb },
    Loaded(OverlayEntry),
    Failed { name: String, source: String, error: String },
}

/// Counts for the current cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadProgress {
    pub loaded: usize,
    pub failed: usize,
    pub total: usize,
}

/// Text lines of the loading indicator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadIndicator {
    pub progress: String,
    pub remaining: Option<String>,
    pub errors: Option<String>,
}

impl LoadProgress {
    pub fn settled(&self) -> usize {
        self.loaded + self.failed
    }

    pub fn is_complete(&self) -> bool {
        self.settled() >= self.total
    }

    pub fn indicator(&self) -> LoadIndicator {
        let settled = self.settled();
        let errors = (self.failed > 0).then(|| format!("{} load error(s)", self.failed));

        if settled == 0 && self.total > 0 {
            LoadIndicator {
                progress: "Starting layer load...".to_string(),
                remaining: None,
                errors: None,
            }
        } else if settled < self.total {
            LoadIndicator {
                progress: format!("Loading layers... ({}/{})", settled, self.total),
                remaining: Some(format!("{} layers remaining", self.total - settled)),
                errors,
            }
        } else {
            LoadIndicator {
                progress: format!("Load complete ({}/{})", settled, self.total),
                remaining: None,
                errors,
            }
        }
    }
}

/// Outcome of framing an overlay on the map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusOutcome {
    /// Layer shown and viewport fitted to it
    Fitted,
    /// Layer shown but it has no usable bounds
    NoBounds,
    /// No loaded entry for the identifier
    Missing,
}

/// Registry of every overlay the dataset references
pub struct OverlayRegistry {
    palette: Palette,
    rng: StdRng,
    cycle: LoadCycle,
    statuses: BTreeMap<String, OverlayStatus>,
    progress: LoadProgress,
    completed: bool,
}

impl OverlayRegistry {
    pub fn new(palette: Palette) -> Self {
        Self::with_rng(palette, StdRng::from_entropy())
    }

    /// Registry with a fixed random source for colours
    pub fn with_rng(palette: Palette, rng: StdRng) -> Self {
        Self {
            palette,
            rng,
            cycle: LoadCycle::default(),
            statuses: BTreeMap::new(),
            progress: LoadProgress::default(),
            completed: true,
        }
    }

    pub fn cycle(&self) -> LoadCycle {
        self.cycle
    }

    pub fn progress(&self) -> LoadProgress {
        self.progress
    }

    /// Whether retrievals of the current cycle are still outstanding
    pub fn is_loading(&self) -> bool {
        !self.completed
    }

    pub fn status(&self, id: &str) -> Option<&OverlayStatus> {
        self.statuses.get(id)
    }

    pub fn entry(&self, id: &str) -> Option<&OverlayEntry> {
        match self.statuses.get(id) {
            Some(OverlayStatus::Loaded(entry)) => Some(entry),
            _ => None,
        }
    }

    /// Loaded entries in identifier order
    pub fn entries(&self) -> impl Iterator<Item = &OverlayEntry> {
        self.statuses.values().filter_map(|status| match status {
            OverlayStatus::Loaded(entry) => Some(entry),
            _ => None,
        })
    }

    /// Loaded entries whose name contains `query`, ignoring case
    pub fn search(&self, query: &str) -> Vec<&OverlayEntry> {
        let needle = query.trim().to_lowercase();
        self.entries()
            .filter(|entry| needle.is_empty() || entry.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Start a new cycle and schedule every distinct overlay of the dataset
    pub fn begin_load(&mut self, dataset: &Dataset) -> Vec<OverlayRequest> {
        self.cycle = LoadCycle(self.cycle.0 + 1);
        self.statuses.clear();

        let mut requests = Vec::new();
        for source in dataset.layer_sources() {
            let color = self.palette.color_for(&source.id, &mut self.rng);
            self.statuses.insert(
                source.id.clone(),
                OverlayStatus::Loading {
                    name: source.name.clone(),
                    source: source.source.clone(),
                    color,
                },
            );
            requests.push(OverlayRequest {
                cycle: self.cycle,
                id: source.id,
                name: source.name,
                source: source.source,
            });
        }

        self.progress = LoadProgress {
            loaded: 0,
            failed: 0,
            total: requests.len(),
        };
        self.completed = requests.is_empty();
        info!("Scheduling {} overlay(s) in {}", requests.len(), self.cycle);

        requests
    }

    /// Take every visible layer off the map, forget all entries and reload
    pub fn reload_all(&mut self, dataset: &Dataset, map: &mut dyn MapSurface) -> Vec<OverlayRequest> {
        for entry in self.entries().filter(|entry| entry.visible) {
            map.remove_layer(&entry.id);
        }
        self.begin_load(dataset)
    }

    /// Record the outcome of one retrieval.
    ///
    /// Returns the completion notification exactly once per cycle, when the
    /// last scheduled overlay settles.
    pub fn settle(
        &mut self,
        cycle: LoadCycle,
        id: &str,
        result: Result<OverlayLayer, String>,
    ) -> Option<Notification> {
        if cycle != self.cycle {
            debug!("Ignoring overlay {} from stale {}", id, cycle);
            return None;
        }

        let Some(OverlayStatus::Loading { name, source, color }) = self.statuses.get(id).cloned() else {
            debug!("Ignoring unexpected completion for overlay {}", id);
            return None;
        };

        let status = match result {
            Ok(layer) => {
                info!("Loaded overlay {} ({} features)", id, layer.features().len());
                self.progress.loaded += 1;
                OverlayStatus::Loaded(OverlayEntry {
                    id: id.to_string(),
                    name,
                    source,
                    color,
                    visible: false,
                    layer: Arc::new(layer),
                })
            }
            Err(error) => {
                warn!("Failed to load overlay {} from {}: {}", id, source, error);
                self.progress.failed += 1;
                OverlayStatus::Failed { name, source, error }
            }
        };
        self.statuses.insert(id.to_string(), status);

        if self.completed || !self.progress.is_complete() {
            return None;
        }
        self.completed = true;

        let LoadProgress { loaded, failed, total } = self.progress;
        Some(if failed == 0 {
            Notification::success(format!("All {} layers loaded", total))
        } else {
            Notification::error(format!(
                "Loaded {} of {} layers. {} layer(s) could not be loaded.",
                loaded, total, failed
            ))
        })
    }

    /// Flip visibility; returns the new state, or `None` without an entry
    pub fn toggle(&mut self, id: &str, map: &mut dyn MapSurface) -> Option<bool> {
        let Some(OverlayStatus::Loaded(entry)) = self.statuses.get_mut(id) else {
            debug!("Toggle ignored: overlay {} is not loaded", id);
            return None;
        };

        entry.visible = !entry.visible;
        if entry.visible {
            map.add_layer(&entry.id, entry.layer.clone(), entry.style());
            fit_to(entry, map);
        } else {
            map.remove_layer(&entry.id);
        }

        Some(entry.visible)
    }

    /// Make the overlay visible and frame it
    pub fn focus(&mut self, id: &str, map: &mut dyn MapSurface) -> FocusOutcome {
        let Some(OverlayStatus::Loaded(entry)) = self.statuses.get_mut(id) else {
            return FocusOutcome::Missing;
        };

        if !entry.visible {
            entry.visible = true;
            map.add_layer(&entry.id, entry.layer.clone(), entry.style());
        }

        if fit_to(entry, map) {
            FocusOutcome::Fitted
        } else {
            FocusOutcome::NoBounds
        }
    }

    /// Delete a loaded overlay, taking it off the map first if shown
    pub fn remove(&mut self, id: &str, map: &mut dyn MapSurface) -> Option<Notification> {
        let entry = self.entry(id)?;
        if entry.visible {
            map.remove_layer(id);
        }

        let name = entry.name.clone();
        self.statuses.remove(id);
        info!("Removed overlay {}", id);

        Some(Notification::info(format!("Layer \"{}\" removed", name)))
    }
}

fn fit_to(entry: &OverlayEntry, map: &mut dyn MapSurface) -> bool {
    match entry.layer.bounds() {
        Some(bounds) => {
            map.fit_bounds(bounds);
            true
        }
        None => {
            warn!("Overlay {} has no bounds; keeping the current view", entry.id);
            false
        }
    }
}
