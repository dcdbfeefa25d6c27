//! Export projections
//!
//! Builds the in-memory content of each export; writing files is left to
//! the views crate. Column headings keep the dataset's own vocabulary.

use chrono::NaiveDate;
use thiserror::Error;

use crate::dataset::Dataset;
use crate::detail::eudr_statement;
use crate::model::{Restriction, NOT_SPECIFIED};
use crate::table::truncate;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExportError {
    #[error("No data to export")]
    Empty,
}

pub const SUMMARY_HEADERS: [&str; 8] = [
    "País",
    "ID Restricción",
    "Normativa",
    "Descripción",
    "Tipo",
    "Pertinencia EUDR",
    "Dataset",
    "Geoproceso",
];

pub const REPORT_HEADERS: [&str; 6] = [
    "País",
    "ID Restricción",
    "Normativa",
    "Descripción",
    "Tipo",
    "Pertinencia EUDR",
];

/// Norm text is cut after this many characters in the report table
pub const REPORT_NORM_LIMIT: usize = 30;
/// Description text is cut after this many characters in the report table
pub const REPORT_DESCRIPTION_LIMIT: usize = 50;

/// Tabular export
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub file_name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReportSection {
    Table { headers: Vec<String>, rows: Vec<Vec<String>> },
    Fields(Vec<(String, String)>),
    Paragraph { heading: String, text: String },
}

/// Printable document export
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub file_name: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub sections: Vec<ReportSection>,
}

/// A ready-to-write export
#[derive(Debug, Clone, PartialEq)]
pub enum ExportJob {
    Sheet(Sheet),
    Report(Report),
}

impl ExportJob {
    pub fn file_name(&self) -> &str {
        match self {
            ExportJob::Sheet(sheet) => &sheet.file_name,
            ExportJob::Report(report) => &report.file_name,
        }
    }
}

fn visible_records<'a>(dataset: &'a Dataset, visible: &[usize]) -> Result<Vec<&'a Restriction>, ExportError> {
    let records: Vec<&Restriction> = visible.iter().filter_map(|&i| dataset.get(i)).collect();
    if records.is_empty() {
        return Err(ExportError::Empty);
    }
    Ok(records)
}

fn or_placeholder(value: Option<&str>) -> String {
    value.unwrap_or(NOT_SPECIFIED).to_string()
}

/// Fixed eight-column sheet over the visible subset
pub fn summary_sheet(dataset: &Dataset, visible: &[usize]) -> Result<Sheet, ExportError> {
    let rows = visible_records(dataset, visible)?
        .into_iter()
        .map(|record| {
            vec![
                record.country.clone(),
                record.id.clone(),
                record.norm.clone(),
                record.description.clone(),
                record.restriction_type.clone(),
                record.eudr_category.clone().unwrap_or_default(),
                or_placeholder(record.dataset_name.as_deref()),
                or_placeholder(record.geoprocess.as_deref()),
            ]
        })
        .collect();

    Ok(Sheet {
        file_name: "restricciones_eudr.csv".to_string(),
        headers: SUMMARY_HEADERS.iter().map(|h| h.to_string()).collect(),
        rows,
    })
}

/// Every column of the first visible record, over the whole dataset
pub fn full_sheet(dataset: &Dataset, visible: &[usize]) -> Result<Sheet, ExportError> {
    let first = visible_records(dataset, visible)?[0];
    let headers = first.keys();

    let rows = dataset
        .records()
        .iter()
        .map(|record| {
            headers
                .iter()
                .map(|key| record.raw_cell(key))
                .collect()
        })
        .collect();

    Ok(Sheet {
        file_name: "restricciones_todo.csv".to_string(),
        headers,
        rows,
    })
}

/// Condensed multi-record report over the visible subset
pub fn summary_report(dataset: &Dataset, visible: &[usize], generated: NaiveDate) -> Result<Report, ExportError> {
    let rows = visible_records(dataset, visible)?
        .into_iter()
        .map(|record| {
            vec![
                record.country.clone(),
                record.id.clone(),
                truncate(&record.norm, REPORT_NORM_LIMIT),
                truncate(&record.description, REPORT_DESCRIPTION_LIMIT),
                record.restriction_type.clone(),
                if record.has_eudr_category() { "Yes" } else { "No" }.to_string(),
            ]
        })
        .collect();

    Ok(Report {
        file_name: "restricciones_eudr.html".to_string(),
        title: "Legal Restrictions Report - EUDR".to_string(),
        subtitle: Some(format!("Generated on: {}", generated.format("%Y-%m-%d"))),
        sections: vec![ReportSection::Table {
            headers: REPORT_HEADERS.iter().map(|h| h.to_string()).collect(),
            rows,
        }],
    })
}

/// Single-record report
pub fn record_report(record: &Restriction) -> Report {
    Report {
        file_name: format!("restriccion_{}.html", sanitize_file_stem(&record.id)),
        title: format!("Restriction detail: {}", record.id),
        subtitle: None,
        sections: vec![
            ReportSection::Fields(vec![
                ("Country".to_string(), record.country.clone()),
                ("Norm".to_string(), record.norm.clone()),
                ("Type".to_string(), record.restriction_type.clone()),
            ]),
            ReportSection::Paragraph {
                heading: "Description".to_string(),
                text: record.description.clone(),
            },
            ReportSection::Paragraph {
                heading: "EUDR relevance".to_string(),
                text: eudr_statement(record),
            },
            ReportSection::Fields(vec![
                ("Dataset name".to_string(), or_placeholder(record.dataset_name.as_deref())),
                ("Dataset provider".to_string(), or_placeholder(record.dataset_provider.as_deref())),
            ]),
            ReportSection::Paragraph {
                heading: "Geo-process to perform".to_string(),
                text: or_placeholder(record.geoprocess.as_deref()),
            },
        ],
    }
}

/// Keep identifiers usable as file names
fn sanitize_file_stem(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::restriction;

    fn sample() -> Dataset {
        let mut a = restriction("CL-1", "Chile", "Restricción ambiental");
        a.eudr_category = Some("Bosques".to_string());
        a.dataset_name = Some("Catastro".to_string());
        a.extra.insert("comentario".to_string(), serde_json::json!("revisar"));
        a.norm = "n".repeat(40);
        let b = restriction("PE-1", "Perú", "Restricción hidrica");
        Dataset::new(vec![a, b]).unwrap()
    }

    #[test]
    fn test_empty_subset_is_refused() {
        let dataset = sample();
        assert_eq!(summary_sheet(&dataset, &[]), Err(ExportError::Empty));
        assert_eq!(full_sheet(&dataset, &[]), Err(ExportError::Empty));
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(summary_report(&dataset, &[], today), Err(ExportError::Empty));
    }

    #[test]
    fn test_summary_sheet_columns() {
        let sheet = summary_sheet(&sample(), &[1]).unwrap();
        assert_eq!(sheet.headers.len(), 8);
        assert_eq!(
            sheet.rows,
            vec![vec![
                "Perú".to_string(),
                "PE-1".to_string(),
                "Ley PE-1".to_string(),
                "Restricción PE-1".to_string(),
                "Restricción hidrica".to_string(),
                String::new(),
                NOT_SPECIFIED.to_string(),
                NOT_SPECIFIED.to_string(),
            ]]
        );
    }

    #[test]
    fn test_full_sheet_uses_first_visible_keys_over_whole_dataset() {
        let dataset = sample();
        let sheet = full_sheet(&dataset, &[0]).unwrap();

        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.headers.last().map(String::as_str), Some("comentario"));
        assert_eq!(sheet.rows[0].last().map(String::as_str), Some("revisar"));
        assert_eq!(sheet.rows[1].last().map(String::as_str), Some(NOT_SPECIFIED));
    }

    #[test]
    fn test_full_sheet_header_follows_sparse_first_record() {
        let sparse = Restriction::from_value(serde_json::json!({
            "pais": "Chile",
            "ip_restriccion": "CL-9",
            "normativa_aplicable": "Ley 19.300",
            "descripcion_restriccion": "Humedal",
            "tipo_restriccion": "Restricción hidrica"
        }))
        .unwrap();
        let full = Restriction::from_value(serde_json::json!({
            "pais": "Perú",
            "ip_restriccion": "PE-9",
            "normativa_aplicable": "DS 4",
            "descripcion_restriccion": "Faja marginal",
            "tipo_restriccion": "Restricción hidrica",
            "fuente": "",
            "eudr_cat": null
        }))
        .unwrap();
        let dataset = Dataset::new(vec![sparse, full]).unwrap();

        let sheet = full_sheet(&dataset, &[0]).unwrap();
        assert_eq!(
            sheet.headers,
            vec!["pais", "ip_restriccion", "normativa_aplicable", "descripcion_restriccion", "tipo_restriccion"]
        );
        assert_eq!(sheet.rows[1][0], "Perú");

        let sheet = full_sheet(&dataset, &[1]).unwrap();
        assert_eq!(sheet.headers.len(), 7);
        assert_eq!(sheet.rows[1][5], "");
        assert_eq!(sheet.rows[1][6], NOT_SPECIFIED);
        assert_eq!(sheet.rows[0][5], NOT_SPECIFIED);
    }

    #[test]
    fn test_summary_report_truncates() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let report = summary_report(&sample(), &[0, 1], today).unwrap();

        assert_eq!(report.subtitle.as_deref(), Some("Generated on: 2024-05-01"));
        let ReportSection::Table { rows, .. } = &report.sections[0] else {
            panic!("expected a table");
        };
        assert_eq!(rows[0][2], format!("{}...", "n".repeat(30)));
        assert_eq!(rows[0][5], "Yes");
        assert_eq!(rows[1][5], "No");
    }

    #[test]
    fn test_record_report() {
        let mut record = restriction("CL/7", "Chile", "t");
        record.dataset_provider = Some("CONAF".to_string());
        let report = record_report(&record);

        assert_eq!(report.file_name, "restriccion_CL_7.html");
        assert_eq!(report.title, "Restriction detail: CL/7");
        assert!(report.sections.contains(&ReportSection::Fields(vec![
            ("Dataset name".to_string(), NOT_SPECIFIED.to_string()),
            ("Dataset provider".to_string(), "CONAF".to_string()),
        ])));
    }
}
