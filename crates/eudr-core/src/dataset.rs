//! The immutable, identifier-indexed restriction dataset

use ahash::{AHashMap, AHashSet};
use thiserror::Error;

use crate::model::Restriction;

/// Errors raised while assembling a dataset
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DatasetError {
    #[error("duplicate restriction identifier: {0}")]
    DuplicateId(String),
}

/// An overlay referenced by the dataset: one per distinct overlay identifier
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSource {
    pub id: String,
    pub name: String,
    pub source: String,
}

/// Full record set, loaded once and never mutated
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Restriction>,
    by_id: AHashMap<String, usize>,
}

impl Dataset {
    /// Index the records by identifier, rejecting duplicates
    pub fn new(records: Vec<Restriction>) -> Result<Self, DatasetError> {
        let mut by_id = AHashMap::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            if by_id.insert(record.id.clone(), index).is_some() {
                return Err(DatasetError::DuplicateId(record.id.clone()));
            }
        }

        Ok(Self { records, by_id })
    }

    pub fn records(&self) -> &[Restriction] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Restriction> {
        self.records.get(index)
    }

    /// Position of the record with the given identifier
    pub fn position(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    /// Record with the given identifier
    pub fn find(&self, id: &str) -> Option<&Restriction> {
        self.position(id).and_then(|index| self.records.get(index))
    }

    /// First record, in source order, that owns the given overlay
    pub fn owner_of_layer(&self, layer_id: &str) -> Option<usize> {
        self.records
            .iter()
            .position(|record| record.layer_id.as_deref() == Some(layer_id))
    }

    /// Distinct overlays with a source location, in first-seen order
    pub fn layer_sources(&self) -> Vec<LayerSource> {
        let mut seen = AHashSet::new();
        let mut sources = Vec::new();

        for record in &self.records {
            let Some((id, source)) = record.overlay_source() else {
                continue;
            };
            if !seen.insert(id.to_string()) {
                continue;
            }
            sources.push(LayerSource {
                id: id.to_string(),
                name: record.deliverable.clone().unwrap_or_else(|| id.to_string()),
                source: source.to_string(),
            });
        }

        sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::restriction;

    fn with_layer(id: &str, layer: &str, url: &str) -> Restriction {
        let mut record = restriction(id, "Chile", "Restricción ambiental");
        record.layer_id = Some(layer.to_string());
        record.geojson_url = Some(url.to_string());
        record
    }

    #[test]
    fn test_lookup_by_identifier() {
        let dataset = Dataset::new(vec![
            restriction("A", "Chile", "t"),
            restriction("B", "Perú", "t"),
        ])
        .unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.position("B"), Some(1));
        assert_eq!(dataset.find("A").map(|r| r.country.as_str()), Some("Chile"));
        assert!(dataset.find("missing").is_none());
    }

    #[test]
    fn test_duplicate_identifier_is_rejected() {
        let result = Dataset::new(vec![
            restriction("A", "Chile", "t"),
            restriction("A", "Perú", "t"),
        ]);
        assert_eq!(result.unwrap_err(), DatasetError::DuplicateId("A".to_string()));
    }

    #[test]
    fn test_layer_sources_are_distinct() {
        let mut named = with_layer("A", "layer000", "a.geojson");
        named.deliverable = Some("Áreas protegidas".to_string());
        let mut no_url = restriction("D", "Chile", "t");
        no_url.layer_id = Some("layer009".to_string());

        let dataset = Dataset::new(vec![
            named,
            with_layer("B", "layer001", "b.geojson"),
            with_layer("C", "layer000", "a.geojson"),
            no_url,
        ])
        .unwrap();

        let sources = dataset.layer_sources();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].name, "Áreas protegidas");
        assert_eq!(sources[1].name, "layer001");
        assert_eq!(dataset.owner_of_layer("layer000"), Some(0));
        assert_eq!(dataset.owner_of_layer("layer009"), Some(3));
    }
}
