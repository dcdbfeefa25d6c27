//! View synchronization
//!
//! Every predicate change flows through [`ViewSynchronizer::synchronize`],
//! which recomputes the visible subset and republishes, in order: cascading
//! facets, summary counters, active-filter badges, table contents and the
//! no-results flag. Nothing is patched incrementally.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::dataset::Dataset;
use crate::filter::{FilterField, FilterState, FilterValue};
use crate::model::Restriction;
use crate::table::TableRow;

/// Contract of the table widget: contents are replaced wholesale
pub trait TableWidget {
    fn clear(&mut self);
    fn add_rows(&mut self, rows: Vec<TableRow>);
    fn redraw(&mut self);
}

/// Substrings that classify a restriction-type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerSet(pub &'static [&'static str]);

impl MarkerSet {
    /// Case-sensitive substring match against any marker
    pub fn matches(&self, tag: &str) -> bool {
        self.0.iter().any(|marker| tag.contains(marker))
    }
}

pub const ENVIRONMENTAL_MARKERS: MarkerSet = MarkerSet(&["ambiental", "forestal", "Conservación"]);
pub const WATER_MARKERS: MarkerSet = MarkerSet(&["hidrica", "Hídrica"]);
pub const FAUNA_MARKERS: MarkerSet = MarkerSet(&["fauna"]);

/// Selectable values per filter field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Facets {
    candidates: BTreeMap<FilterField, Vec<String>>,
}

impl Facets {
    /// Sorted, de-duplicated, non-empty values present in the subset
    pub fn from_subset(dataset: &Dataset, visible: &[usize]) -> Self {
        let mut sets: BTreeMap<FilterField, BTreeSet<&str>> = BTreeMap::new();
        for record in visible.iter().filter_map(|&i| dataset.get(i)) {
            for field in FilterField::ALL {
                if let Some(value) = field.value(record).filter(|v| !v.is_empty()) {
                    sets.entry(field).or_default().insert(value);
                }
            }
        }

        let candidates = FilterField::ALL
            .iter()
            .map(|field| {
                let values = sets
                    .get(field)
                    .map(|set| set.iter().map(|v| v.to_string()).collect())
                    .unwrap_or_default();
                (*field, values)
            })
            .collect();

        Self { candidates }
    }

    pub fn candidates(&self, field: FilterField) -> &[String] {
        self.candidates.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether a selection can stay in force under these facets
    pub fn admits(&self, field: FilterField, value: &FilterValue) -> bool {
        let candidates = self.candidates(field);
        match value {
            FilterValue::Exact(value) => candidates.iter().any(|c| c == value),
            FilterValue::Present => !candidates.is_empty(),
        }
    }
}

/// Summary statistics over the visible subset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub total: usize,
    pub eudr: usize,
    pub environmental: usize,
    pub water: usize,
}

/// Which part of the predicate a badge stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeKind {
    Field(FilterField),
    Search,
}

/// One removable "active filter" chip
#[derive(Debug, Clone, PartialEq)]
pub struct Badge {
    pub kind: BadgeKind,
    pub label: String,
}

/// Everything the dashboard publishes for one predicate
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewSnapshot {
    pub visible: Vec<usize>,
    pub facets: Facets,
    pub counters: Counters,
    pub badges: Vec<Badge>,
    pub no_results: bool,
}

impl ViewSnapshot {
    pub fn results_label(&self) -> String {
        match self.visible.len() {
            1 => "1 result".to_string(),
            n => format!("{} results", n),
        }
    }
}

/// Recomputes every derived view from the filter state
#[derive(Debug, Clone)]
pub struct ViewSynchronizer {
    environmental: MarkerSet,
    water: MarkerSet,
}

impl Default for ViewSynchronizer {
    fn default() -> Self {
        Self {
            environmental: ENVIRONMENTAL_MARKERS,
            water: WATER_MARKERS,
        }
    }
}

impl ViewSynchronizer {
    pub fn new(environmental: MarkerSet, water: MarkerSet) -> Self {
        Self { environmental, water }
    }

    /// Run the full pipeline and push the new rows into the table.
    ///
    /// Selections that are no longer offered by the recomputed facets are
    /// reset, and the subset is recomputed until no selection changes, so the
    /// published snapshot always matches the predicate actually in force.
    pub fn synchronize(
        &self,
        filter: &mut FilterState,
        dataset: &Dataset,
        table: &mut dyn TableWidget,
    ) -> ViewSnapshot {
        let (visible, facets) = loop {
            let visible = filter.visible_subset(dataset);
            let facets = Facets::from_subset(dataset, &visible);

            let stale: Vec<FilterField> = filter
                .active()
                .filter(|(field, value)| !facets.admits(*field, value))
                .map(|(field, _)| field)
                .collect();

            if stale.is_empty() {
                break (visible, facets);
            }
            for field in stale {
                debug!("Resetting filter {:?}: value no longer offered", field);
                filter.clear_field(field);
            }
        };

        let counters = self.count(dataset, &visible);
        let active_badges = badges(filter);

        table.clear();
        table.add_rows(
            visible
                .iter()
                .filter_map(|&i| dataset.get(i).map(|record| TableRow::from_record(i, record)))
                .collect(),
        );
        table.redraw();

        let no_results = visible.is_empty();
        ViewSnapshot {
            visible,
            facets,
            counters,
            badges: active_badges,
            no_results,
        }
    }

    /// Summary counters over the given records
    pub fn count(&self, dataset: &Dataset, visible: &[usize]) -> Counters {
        let records: Vec<&Restriction> = visible.iter().filter_map(|&i| dataset.get(i)).collect();
        Counters {
            total: records.len(),
            eudr: records.iter().filter(|r| r.has_eudr_category()).count(),
            environmental: records
                .iter()
                .filter(|r| self.environmental.matches(&r.restriction_type))
                .count(),
            water: records
                .iter()
                .filter(|r| self.water.matches(&r.restriction_type))
                .count(),
        }
    }
}

/// One badge per non-default field, search last
pub fn badges(filter: &FilterState) -> Vec<Badge> {
    let mut badges: Vec<Badge> = filter
        .active()
        .map(|(field, value)| Badge {
            kind: BadgeKind::Field(field),
            label: match (field, value) {
                (FilterField::EudrCategory, FilterValue::Present) => "EUDR: Yes".to_string(),
                (field, value) => format!("{}: {}", field.label(), value),
            },
        })
        .collect();

    if !filter.search().is_empty() {
        badges.push(Badge {
            kind: BadgeKind::Search,
            label: format!("Search: \"{}\"", filter.search()),
        });
    }

    badges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::restriction;
    use crate::testing::RecordingTable;
    use proptest::prelude::*;

    fn three_records() -> Dataset {
        let mut a = restriction("A", "Chile", "Restricción hidrica");
        a.description_type = Some("hidrica".to_string());
        let mut b = restriction("B", "Chile", "Zona Hídrica protegida");
        b.description_type = Some("hidrica".to_string());
        b.eudr_category = Some("Bosques".to_string());
        let mut c = restriction("C", "Perú", "Restricción ambiental");
        c.description_type = Some("ambiental".to_string());
        Dataset::new(vec![a, b, c]).unwrap()
    }

    #[test]
    fn test_counters_and_eudr_present_filter() {
        let dataset = three_records();
        let sync = ViewSynchronizer::default();
        let mut table = RecordingTable::default();
        let mut filter = FilterState::new();

        let snapshot = sync.synchronize(&mut filter, &dataset, &mut table);
        assert_eq!(
            snapshot.counters,
            Counters { total: 3, eudr: 1, environmental: 1, water: 2 }
        );
        assert_eq!(table.rows.len(), 3);
        assert!(snapshot.badges.is_empty());
        assert!(!snapshot.no_results);

        filter.set_field(FilterField::EudrCategory, FilterValue::Present);
        let snapshot = sync.synchronize(&mut filter, &dataset, &mut table);
        assert_eq!(snapshot.visible, vec![1]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.clears, 2);
        assert_eq!(table.redraws, 2);
        assert_eq!(snapshot.badges[0].label, "EUDR: Yes");
    }

    #[test]
    fn test_facets_cascade() {
        let dataset = three_records();
        let sync = ViewSynchronizer::default();
        let mut table = RecordingTable::default();
        let mut filter = FilterState::new();

        filter.set_field(FilterField::Country, FilterValue::exact("Chile"));
        let snapshot = sync.synchronize(&mut filter, &dataset, &mut table);

        assert_eq!(snapshot.facets.candidates(FilterField::Country), ["Chile"]);
        assert_eq!(snapshot.facets.candidates(FilterField::DescriptionType), ["hidrica"]);
        assert!(snapshot.facets.candidates(FilterField::Scale).is_empty());
    }

    #[test]
    fn test_unreachable_selection_is_reset() {
        let dataset = three_records();
        let sync = ViewSynchronizer::default();
        let mut table = RecordingTable::default();
        let mut filter = FilterState::new();

        filter.set_field(FilterField::Country, FilterValue::exact("Perú"));
        filter.set_field(FilterField::DescriptionType, FilterValue::exact("hidrica"));
        let snapshot = sync.synchronize(&mut filter, &dataset, &mut table);

        assert!(filter.constraint(FilterField::Country).is_none());
        assert!(filter.constraint(FilterField::DescriptionType).is_none());
        assert_eq!(snapshot.visible, vec![0, 1, 2]);
        assert!(!snapshot.no_results);
    }

    #[test]
    fn test_search_without_hits_shows_no_results() {
        let dataset = three_records();
        let sync = ViewSynchronizer::default();
        let mut table = RecordingTable::default();
        let mut filter = FilterState::new();

        filter.set_search("no such thing");
        let snapshot = sync.synchronize(&mut filter, &dataset, &mut table);

        assert!(snapshot.no_results);
        assert!(table.rows.is_empty());
        assert_eq!(snapshot.results_label(), "0 results");
        assert_eq!(snapshot.badges.len(), 1);
        assert_eq!(snapshot.badges[0].kind, BadgeKind::Search);
    }

    #[test]
    fn test_badges_follow_field_order() {
        let mut filter = FilterState::new();
        filter.set_search("bosque");
        filter.set_field(FilterField::Scale, FilterValue::exact("Nacional"));
        filter.set_field(FilterField::Country, FilterValue::exact("Chile"));

        let labels: Vec<String> = badges(&filter).into_iter().map(|b| b.label).collect();
        assert_eq!(labels, vec!["Country: Chile", "Scale: Nacional", "Search: \"bosque\""]);
    }

    #[test]
    fn test_marker_sets_are_case_sensitive() {
        assert!(WATER_MARKERS.matches("Faja Hídrica"));
        assert!(!WATER_MARKERS.matches("HIDRICA"));
        assert!(ENVIRONMENTAL_MARKERS.matches("Área de Conservación"));
    }

    proptest! {
        #[test]
        fn prop_facets_only_offer_visible_values(
            rows in prop::collection::vec(
                (prop::sample::select(vec!["Chile", "Perú", "Belice"]),
                 prop::option::of(prop::sample::select(vec!["ambiental", "hidrica"])),
                 any::<bool>()),
                0..15),
            pick in prop::option::of(prop::sample::select(vec!["Chile", "Perú", "Belice"])),
        ) {
            let records = rows.iter().enumerate().map(|(i, (country, kind, eudr))| {
                let mut record = restriction(&format!("R{}", i), country, kind.unwrap_or("otro"));
                record.description_type = kind.map(str::to_string);
                record.eudr_category = eudr.then(|| "Bosques".to_string());
                record
            }).collect();
            let dataset = Dataset::new(records).unwrap();

            let sync = ViewSynchronizer::default();
            let mut table = RecordingTable::default();
            let mut filter = FilterState::new();
            if let Some(country) = pick {
                filter.set_field(FilterField::Country, FilterValue::exact(country));
            }
            let snapshot = sync.synchronize(&mut filter, &dataset, &mut table);

            for field in FilterField::ALL {
                for value in snapshot.facets.candidates(field) {
                    let offered = snapshot
                        .visible
                        .iter()
                        .any(|&i| dataset.get(i).and_then(|r| field.value(r)) == Some(value.as_str()));
                    prop_assert!(offered, "{:?} offers {:?}", field, value);
                }
            }
            prop_assert!(snapshot.counters.eudr <= snapshot.counters.total);
            prop_assert_eq!(snapshot.counters.total, snapshot.visible.len());
            prop_assert_eq!(table.rows.len(), snapshot.visible.len());
        }
    }
}
