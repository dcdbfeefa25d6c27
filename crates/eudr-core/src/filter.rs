//! Filter state: the single "current view" predicate over the dataset
//!
//! A predicate is a set of per-field constraints plus one free-text search.
//! Constraints AND-compose; an unset field matches everything. The visible
//! subset is always recomputed from scratch and keeps source order.

use std::collections::BTreeMap;
use std::fmt;

use crate::dataset::Dataset;
use crate::model::Restriction;

/// The fixed set of filterable columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterField {
    Country,
    DescriptionType,
    EudrCategory,
    Quantifiable,
    DatasetType,
    GeoProcess,
    Scale,
}

impl FilterField {
    pub const ALL: [FilterField; 7] = [
        FilterField::Country,
        FilterField::DescriptionType,
        FilterField::EudrCategory,
        FilterField::Quantifiable,
        FilterField::DatasetType,
        FilterField::GeoProcess,
        FilterField::Scale,
    ];

    /// Source column backing this field
    pub fn key(&self) -> &'static str {
        match self {
            FilterField::Country => "pais",
            FilterField::DescriptionType => "tipo_descrip",
            FilterField::EudrCategory => "eudr_cat",
            FilterField::Quantifiable => "cuantificable",
            FilterField::DatasetType => "tipo_dataset",
            FilterField::GeoProcess => "tipo_geoproceso",
            FilterField::Scale => "nivel_escala",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FilterField::Country => "Country",
            FilterField::DescriptionType => "Restriction type",
            FilterField::EudrCategory => "EUDR category",
            FilterField::Quantifiable => "Quantifiable",
            FilterField::DatasetType => "Dataset type",
            FilterField::GeoProcess => "Geo-process",
            FilterField::Scale => "Scale",
        }
    }

    /// The record's value for this field, `None` when absent
    pub fn value<'a>(&self, record: &'a Restriction) -> Option<&'a str> {
        match self {
            FilterField::Country => Some(record.country.as_str()).filter(|v| !v.is_empty()),
            FilterField::DescriptionType => record.description_type.as_deref(),
            FilterField::EudrCategory => record.eudr_category.as_deref(),
            FilterField::Quantifiable => record.quantifiable.as_deref(),
            FilterField::DatasetType => record.dataset_type.as_deref(),
            FilterField::GeoProcess => record.geoprocess_type.as_deref(),
            FilterField::Scale => record.scale.as_deref(),
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A constraint on one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    /// Field equals this value exactly
    Exact(String),
    /// Field holds any non-empty value
    Present,
}

impl FilterValue {
    pub fn exact(value: impl Into<String>) -> Self {
        FilterValue::Exact(value.into())
    }

    pub fn matches(&self, value: Option<&str>) -> bool {
        match (self, value) {
            (FilterValue::Exact(expected), Some(actual)) => expected == actual,
            (FilterValue::Present, Some(actual)) => !actual.is_empty(),
            (_, None) => false,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Exact(value) => f.write_str(value),
            FilterValue::Present => f.write_str("Yes"),
        }
    }
}

/// Current predicate: per-field constraints and a search string
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    fields: BTreeMap<FilterField, FilterValue>,
    search: String,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Constrain a field; an empty exact value clears it
    pub fn set_field(&mut self, field: FilterField, value: FilterValue) {
        match value {
            FilterValue::Exact(ref text) if text.is_empty() => {
                self.fields.remove(&field);
            }
            value => {
                self.fields.insert(field, value);
            }
        }
    }

    pub fn clear_field(&mut self, field: FilterField) {
        self.fields.remove(&field);
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    pub fn clear_search(&mut self) {
        self.search.clear();
    }

    /// Back to "match all"
    pub fn reset(&mut self) {
        self.fields.clear();
        self.search.clear();
    }

    pub fn constraint(&self, field: FilterField) -> Option<&FilterValue> {
        self.fields.get(&field)
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn is_default(&self) -> bool {
        self.fields.is_empty() && self.search.is_empty()
    }

    /// Set constraints, in field order
    pub fn active(&self) -> impl Iterator<Item = (FilterField, &FilterValue)> {
        self.fields.iter().map(|(field, value)| (*field, value))
    }

    /// Whether a single record passes the predicate
    pub fn matches(&self, record: &Restriction) -> bool {
        let fields_match = self
            .fields
            .iter()
            .all(|(field, value)| value.matches(field.value(record)));

        fields_match && self.matches_search(record)
    }

    fn matches_search(&self, record: &Restriction) -> bool {
        if self.search.is_empty() {
            return true;
        }

        let needle = self.search.to_lowercase();
        let contains = |haystack: &str| haystack.to_lowercase().contains(&needle);

        contains(&record.country)
            || contains(&record.norm)
            || contains(&record.description)
            || contains(&record.id)
            || contains(&record.restriction_type)
            || record.dataset_name.as_deref().map(contains).unwrap_or(false)
    }

    /// Positions of every matching record, in source order
    pub fn visible_subset(&self, dataset: &Dataset) -> Vec<usize> {
        dataset
            .records()
            .iter()
            .enumerate()
            .filter(|(_, record)| self.matches(record))
            .map(|(index, _)| index)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::restriction;
    use proptest::prelude::*;

    fn sample() -> Dataset {
        let mut a = restriction("CL-1", "Chile", "Restricción ambiental");
        a.description_type = Some("ambiental".to_string());
        a.eudr_category = Some("Bosques".to_string());
        a.dataset_name = Some("Catastro de bosque nativo".to_string());

        let mut b = restriction("CL-2", "Chile", "Restricción hidrica");
        b.description_type = Some("hidrica".to_string());

        let mut c = restriction("PE-1", "Perú", "Restricción hidrica");
        c.description_type = Some("hidrica".to_string());
        c.scale = Some("Nacional".to_string());

        Dataset::new(vec![a, b, c]).unwrap()
    }

    #[test]
    fn test_default_state_matches_everything() {
        let dataset = sample();
        let filter = FilterState::new();
        assert!(filter.is_default());
        assert_eq!(filter.visible_subset(&dataset), vec![0, 1, 2]);
    }

    #[test]
    fn test_constraints_compose() {
        let dataset = sample();
        let mut filter = FilterState::new();
        filter.set_field(FilterField::Country, FilterValue::exact("Chile"));
        filter.set_field(FilterField::DescriptionType, FilterValue::exact("hidrica"));
        assert_eq!(filter.visible_subset(&dataset), vec![1]);
    }

    #[test]
    fn test_present_constraint() {
        let dataset = sample();
        let mut filter = FilterState::new();
        filter.set_field(FilterField::EudrCategory, FilterValue::Present);
        assert_eq!(filter.visible_subset(&dataset), vec![0]);
    }

    #[test]
    fn test_missing_field_is_excluded() {
        let dataset = sample();
        let mut filter = FilterState::new();
        filter.set_field(FilterField::Scale, FilterValue::exact("Nacional"));
        assert_eq!(filter.visible_subset(&dataset), vec![2]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let dataset = sample();
        let mut filter = FilterState::new();

        filter.set_search("PERÚ");
        assert_eq!(filter.visible_subset(&dataset), vec![2]);

        filter.set_search("bosque nativo");
        assert_eq!(filter.visible_subset(&dataset), vec![0]);

        filter.set_search("cl-");
        assert_eq!(filter.visible_subset(&dataset), vec![0, 1]);
    }

    #[test]
    fn test_empty_exact_value_clears_field() {
        let mut filter = FilterState::new();
        filter.set_field(FilterField::Country, FilterValue::exact("Chile"));
        filter.set_field(FilterField::Country, FilterValue::exact(""));
        assert!(filter.constraint(FilterField::Country).is_none());
        assert!(filter.is_default());
    }

    #[test]
    fn test_reset_restores_full_dataset() {
        let dataset = sample();
        let mut filter = FilterState::new();
        filter.set_field(FilterField::Country, FilterValue::exact("Perú"));
        filter.set_search("zzz");
        assert!(filter.visible_subset(&dataset).is_empty());

        filter.reset();
        assert_eq!(filter.visible_subset(&dataset).len(), dataset.len());
    }

    fn arb_dataset() -> impl Strategy<Value = Dataset> {
        let countries = prop::sample::select(vec!["Chile", "Perú", "Belice"]);
        let kinds = prop::option::of(prop::sample::select(vec!["ambiental", "hidrica", "fauna"]));
        prop::collection::vec((countries, kinds), 0..20).prop_map(|rows| {
            let records = rows
                .into_iter()
                .enumerate()
                .map(|(i, (country, kind))| {
                    let mut record = restriction(&format!("R{}", i), country, "t");
                    record.description_type = kind.map(str::to_string);
                    record
                })
                .collect();
            Dataset::new(records).unwrap()
        })
    }

    proptest! {
        #[test]
        fn prop_subset_is_ordered_and_stable(
            dataset in arb_dataset(),
            country in prop::option::of(prop::sample::select(vec!["Chile", "Perú"])),
            search in "[a-zA-Z]{0,2}",
        ) {
            let mut filter = FilterState::new();
            if let Some(country) = country {
                filter.set_field(FilterField::Country, FilterValue::exact(country));
            }
            filter.set_search(search);

            let subset = filter.visible_subset(&dataset);
            prop_assert!(subset.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(subset.iter().all(|&i| i < dataset.len()));
            prop_assert_eq!(&subset, &filter.visible_subset(&dataset));

            filter.reset();
            prop_assert_eq!(filter.visible_subset(&dataset).len(), dataset.len());
        }
    }
}
