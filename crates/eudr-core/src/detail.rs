//! Long-form detail projection of a single restriction
//!
//! The projection is UI-agnostic: the detail modal in `eudr-views` paints the
//! sections as they come, and the single-record report reuses the same text.

use chrono::{Duration, NaiveDate};

use crate::model::{Restriction, NOT_SPECIFIED};
use crate::sync::{ENVIRONMENTAL_MARKERS, FAUNA_MARKERS, WATER_MARKERS};

pub const NO_OBSERVATIONS: &str = "No observations";
pub const NOT_EUDR_RELEVANT: &str = "This restriction is not relevant for EUDR compliance";

/// Colour family of a restriction-type badge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCategory {
    Environmental,
    Water,
    Fauna,
    Other,
}

impl TypeCategory {
    /// First matching family wins, in the order environmental, water, fauna
    pub fn classify(tag: &str) -> Self {
        if ENVIRONMENTAL_MARKERS.matches(tag) {
            TypeCategory::Environmental
        } else if WATER_MARKERS.matches(tag) {
            TypeCategory::Water
        } else if FAUNA_MARKERS.matches(tag) {
            TypeCategory::Fauna
        } else {
            TypeCategory::Other
        }
    }
}

/// How a value is presented
#[derive(Debug, Clone, PartialEq)]
pub enum DetailValue {
    Text(String),
    Code(String),
    Link { text: String, url: String },
    Badge(String, TypeCategory),
    /// Muted placeholder for an absent field
    Missing(&'static str),
}

impl DetailValue {
    fn text_or(value: Option<&str>, placeholder: &'static str) -> Self {
        match value {
            Some(text) => DetailValue::Text(text.to_string()),
            None => DetailValue::Missing(placeholder),
        }
    }

    fn optional(value: Option<&str>) -> Self {
        Self::text_or(value, NOT_SPECIFIED)
    }

    fn link(value: Option<&str>) -> Self {
        match value {
            Some(url) => DetailValue::Link {
                text: url.to_string(),
                url: url.to_string(),
            },
            None => DetailValue::Missing(NOT_SPECIFIED),
        }
    }

    /// Plain text form, placeholders included
    pub fn as_text(&self) -> &str {
        match self {
            DetailValue::Text(text) | DetailValue::Code(text) | DetailValue::Badge(text, _) => text.as_str(),
            DetailValue::Link { text, .. } => text.as_str(),
            DetailValue::Missing(placeholder) => placeholder,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailField {
    pub label: &'static str,
    pub value: DetailValue,
}

fn field(label: &'static str, value: DetailValue) -> DetailField {
    DetailField { label, value }
}

/// Emphasis of a free-text block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Success,
    Muted,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SectionBody {
    Fields(Vec<DetailField>),
    Note(DetailValue, Tone),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailSection {
    pub title: &'static str,
    pub body: SectionBody,
}

/// Everything the detail modal shows for one record
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub record: usize,
    pub id: String,
    pub title: String,
    pub sections: Vec<DetailSection>,
}

impl DetailView {
    pub fn section(&self, title: &str) -> Option<&DetailSection> {
        self.sections.iter().find(|s| s.title == title)
    }
}

/// "Category: C. relevance", or the not-relevant message
pub fn eudr_statement(record: &Restriction) -> String {
    match record.eudr_category.as_deref() {
        Some(category) => format!(
            "Category: {}. {}",
            category,
            record.eudr_relevance.as_deref().unwrap_or_default()
        )
        .trim_end()
        .to_string(),
        None => NOT_EUDR_RELEVANT.to_string(),
    }
}

/// Convert a spreadsheet serial day number (1900 date system)
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    // 2958465 is 9999-12-31, the last date spreadsheets can represent
    if !serial.is_finite() || !(1.0..2_958_466.0).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial.floor() as i64))
}

/// Serial numbers become ISO dates; anything else is shown verbatim
pub fn format_dataset_date(raw: &str) -> String {
    raw.trim()
        .parse::<f64>()
        .ok()
        .and_then(excel_serial_to_date)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Project a record into the fixed detail layout
pub fn project(record_index: usize, record: &Restriction) -> DetailView {
    let norm = match record.norm_link.as_deref() {
        Some(url) => DetailValue::Link {
            text: record.norm.clone(),
            url: url.to_string(),
        },
        None => DetailValue::Text(record.norm.clone()),
    };

    let legal = vec![
        field("Country", DetailValue::Text(record.country.clone())),
        field("Restriction ID", DetailValue::Code(record.id.clone())),
        field("Norm", norm),
        field("Article", DetailValue::optional(record.norm_article.as_deref())),
        field("Norm date", DetailValue::optional(record.norm_date.as_deref())),
        field("Responsible institution", DetailValue::optional(record.institution.as_deref())),
        field("Level/Scale", DetailValue::optional(record.scale.as_deref())),
    ];

    let technical = vec![
        field(
            "Restriction type",
            DetailValue::Badge(
                record.restriction_type.clone(),
                TypeCategory::classify(&record.restriction_type),
            ),
        ),
        field(
            "Quantifiable",
            DetailValue::Text(if record.is_quantifiable() { "Yes" } else { "No" }.to_string()),
        ),
        field("Geographic parameters", DetailValue::optional(record.geo_parameters.as_deref())),
        field("Representation", DetailValue::optional(record.representation.as_deref())),
        field("Analysis type", DetailValue::optional(record.analysis_type.as_deref())),
    ];

    let eudr_tone = if record.has_eudr_category() { Tone::Success } else { Tone::Muted };

    let dataset_date = record.dataset_date.as_deref().map(format_dataset_date);
    let dataset = vec![
        field("Layer name", DetailValue::optional(record.dataset_name.as_deref())),
        field("Dataset date", DetailValue::optional(dataset_date.as_deref())),
        field("Dataset description", DetailValue::optional(record.dataset_description.as_deref())),
        field("Dataset provider", DetailValue::optional(record.dataset_provider.as_deref())),
        field("Spatial coverage", DetailValue::optional(record.spatial_coverage.as_deref())),
        field("Source", DetailValue::optional(record.source.as_deref())),
        field("License / terms of use", DetailValue::optional(record.license.as_deref())),
        field("Dataset link", DetailValue::link(record.dataset_link.as_deref())),
        field(
            "Observations",
            DetailValue::text_or(record.observations.as_deref(), NO_OBSERVATIONS),
        ),
    ];

    let additional = vec![
        field("EUDR category", DetailValue::optional(record.eudr_category.as_deref())),
        field("Description type", DetailValue::optional(record.description_type.as_deref())),
        field("Base cartography", DetailValue::optional(record.base_cartography.as_deref())),
        field("Geo-process type", DetailValue::optional(record.geoprocess_type.as_deref())),
        field("Deliverable", DetailValue::optional(record.deliverable.as_deref())),
        field("Deliverable link", DetailValue::link(record.deliverable_link.as_deref())),
    ];

    let sections = vec![
        DetailSection { title: "Legal information", body: SectionBody::Fields(legal) },
        DetailSection { title: "Technical details", body: SectionBody::Fields(technical) },
        DetailSection {
            title: "Description",
            body: SectionBody::Note(DetailValue::Text(record.description.clone()), Tone::Info),
        },
        DetailSection {
            title: "EUDR relevance",
            body: SectionBody::Note(DetailValue::Text(eudr_statement(record)), eudr_tone),
        },
        DetailSection { title: "Dataset and geo-process", body: SectionBody::Fields(dataset) },
        DetailSection {
            title: "Geo-process to perform",
            body: SectionBody::Note(DetailValue::optional(record.geoprocess.as_deref()), Tone::Muted),
        },
        DetailSection { title: "Additional information", body: SectionBody::Fields(additional) },
    ];

    DetailView {
        record: record_index,
        id: record.id.clone(),
        title: format!("Restriction detail: {}", record.id),
        sections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::restriction;

    fn fields<'a>(view: &'a DetailView, title: &str) -> &'a [DetailField] {
        match view.section(title).map(|s| &s.body) {
            Some(SectionBody::Fields(fields)) => fields,
            other => panic!("section {} has no fields: {:?}", title, other),
        }
    }

    fn value<'a>(view: &'a DetailView, title: &str, label: &str) -> &'a DetailValue {
        &fields(view, title)
            .iter()
            .find(|f| f.label == label)
            .unwrap_or_else(|| panic!("no field {}", label))
            .value
    }

    #[test]
    fn test_absent_fields_use_placeholders() {
        let view = project(0, &restriction("CL-1", "Chile", "Restricción forestal"));

        assert_eq!(view.title, "Restriction detail: CL-1");
        assert_eq!(view.sections.len(), 7);
        assert_eq!(
            value(&view, "Legal information", "Article"),
            &DetailValue::Missing(NOT_SPECIFIED)
        );
        assert_eq!(
            value(&view, "Dataset and geo-process", "Observations"),
            &DetailValue::Missing(NO_OBSERVATIONS)
        );
        assert_eq!(
            value(&view, "Technical details", "Restriction type"),
            &DetailValue::Badge("Restricción forestal".to_string(), TypeCategory::Environmental)
        );
        assert_eq!(value(&view, "Technical details", "Quantifiable").as_text(), "No");
    }

    #[test]
    fn test_eudr_statement() {
        let mut record = restriction("CL-1", "Chile", "t");
        assert_eq!(eudr_statement(&record), NOT_EUDR_RELEVANT);

        record.eudr_category = Some("Bosques".to_string());
        record.eudr_relevance = Some("Alta".to_string());
        assert_eq!(eudr_statement(&record), "Category: Bosques. Alta");

        let view = project(0, &record);
        assert!(matches!(
            view.section("EUDR relevance").map(|s| &s.body),
            Some(SectionBody::Note(_, Tone::Success))
        ));
    }

    #[test]
    fn test_links_and_dates() {
        let mut record = restriction("CL-1", "Chile", "t");
        record.norm_link = Some("https://bcn.cl".to_string());
        record.dataset_date = Some("44927".to_string());

        let view = project(3, &record);
        assert_eq!(view.record, 3);
        assert!(matches!(value(&view, "Legal information", "Norm"), DetailValue::Link { .. }));
        assert_eq!(value(&view, "Dataset and geo-process", "Dataset date").as_text(), "2023-01-01");
    }

    #[test]
    fn test_excel_serial_conversion() {
        assert_eq!(excel_serial_to_date(25569.0), NaiveDate::from_ymd_opt(1970, 1, 1));
        assert_eq!(excel_serial_to_date(44927.75), NaiveDate::from_ymd_opt(2023, 1, 1));
        assert_eq!(excel_serial_to_date(-3.0), None);
        assert_eq!(format_dataset_date("marzo 2021"), "marzo 2021");
    }

    #[test]
    fn test_type_categories() {
        assert_eq!(TypeCategory::classify("Faja Hídrica"), TypeCategory::Water);
        assert_eq!(TypeCategory::classify("Corredor de fauna"), TypeCategory::Fauna);
        assert_eq!(TypeCategory::classify("Uso urbano"), TypeCategory::Other);
    }
}
