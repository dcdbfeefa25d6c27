//! Table row projection
//!
//! Cell rules are pure so the egui table only has to paint them.

use crate::model::Restriction;

/// Description cells are cut after this many characters
pub const DESCRIPTION_LIMIT: usize = 100;

/// Analysis-type cells are cut after this many characters
pub const ANALYSIS_LIMIT: usize = 50;

/// Text that may render as a hyperlink
#[derive(Debug, Clone, PartialEq)]
pub struct LinkCell {
    pub text: String,
    pub url: Option<String>,
}

impl LinkCell {
    fn new(text: &str, url: Option<&str>) -> Self {
        Self {
            text: text.to_string(),
            url: url.filter(|u| !u.trim().is_empty()).map(str::to_string),
        }
    }
}

/// One rendered table row
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    /// Position of the record in the dataset
    pub record: usize,
    pub id: String,
    pub country: String,
    pub norm: LinkCell,
    pub description: String,
    pub full_description: String,
    pub restriction_type: String,
    pub eudr_category: String,
    /// `None` renders the muted placeholder
    pub dataset: Option<LinkCell>,
    pub analysis: Option<String>,
    pub has_layer: bool,
}

impl TableRow {
    pub fn from_record(record: usize, restriction: &Restriction) -> Self {
        Self {
            record,
            id: restriction.id.clone(),
            country: restriction.country.clone(),
            norm: LinkCell::new(&restriction.norm, restriction.norm_link.as_deref()),
            description: truncate(&restriction.description, DESCRIPTION_LIMIT),
            full_description: restriction.description.clone(),
            restriction_type: restriction.restriction_type.clone(),
            eudr_category: restriction.eudr_category.clone().unwrap_or_default(),
            dataset: restriction
                .dataset_name
                .as_deref()
                .map(|name| LinkCell::new(name, restriction.dataset_link.as_deref())),
            analysis: restriction
                .analysis_type
                .as_deref()
                .map(|text| truncate(text, ANALYSIS_LIMIT)),
            has_layer: restriction.layer_id.is_some(),
        }
    }
}

/// Cut `text` to `limit` characters, appending "..." when cut
pub fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        None => text.to_string(),
    }
}

/// Sortable table columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Country,
    Id,
    Norm,
    Description,
    Type,
    EudrCategory,
    Dataset,
    Analysis,
}

impl SortColumn {
    fn key<'a>(&self, row: &'a TableRow) -> &'a str {
        match self {
            SortColumn::Country => &row.country,
            SortColumn::Id => &row.id,
            SortColumn::Norm => &row.norm.text,
            SortColumn::Description => &row.full_description,
            SortColumn::Type => &row.restriction_type,
            SortColumn::EudrCategory => &row.eudr_category,
            SortColumn::Dataset => row.dataset.as_ref().map(|d| d.text.as_str()).unwrap_or(""),
            SortColumn::Analysis => row.analysis.as_deref().unwrap_or(""),
        }
    }
}

/// Stable sort of rows by one column
pub fn sort_rows(rows: &mut [TableRow], column: SortColumn, ascending: bool) {
    rows.sort_by(|a, b| {
        let ordering = column.key(a).to_lowercase().cmp(&column.key(b).to_lowercase());
        if ascending {
            ordering
        } else {
            ordering.reverse()
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::restriction;

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("abc", 5), "abc");
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("ñañaña", 2), "ña...");
        assert_eq!(truncate(&"x".repeat(100), 100), "x".repeat(100));
    }

    #[test]
    fn test_row_cells() {
        let mut record = restriction("CL-1", "Chile", "Restricción ambiental");
        record.description = "d".repeat(120);
        record.norm_link = Some("https://www.bcn.cl/ley".to_string());
        record.dataset_link = Some("https://ide.cl".to_string());
        record.analysis_type = Some("a".repeat(60));

        let row = TableRow::from_record(4, &record);
        assert_eq!(row.record, 4);
        assert_eq!(row.description.chars().count(), 103);
        assert_eq!(row.norm.url.as_deref(), Some("https://www.bcn.cl/ley"));
        assert!(row.dataset.is_none());
        assert_eq!(row.analysis.as_deref().map(|a| a.chars().count()), Some(53));
    }

    #[test]
    fn test_blank_link_is_plain_text() {
        let mut record = restriction("CL-1", "Chile", "t");
        record.norm_link = Some("  ".to_string());
        record.dataset_name = Some("Catastro".to_string());

        let row = TableRow::from_record(0, &record);
        assert_eq!(row.norm.url, None);
        assert_eq!(row.dataset, Some(LinkCell { text: "Catastro".to_string(), url: None }));
    }

    #[test]
    fn test_sort_by_country() {
        let mut rows = vec![
            TableRow::from_record(0, &restriction("A", "Perú", "t")),
            TableRow::from_record(1, &restriction("B", "belice", "t")),
            TableRow::from_record(2, &restriction("C", "Chile", "t")),
        ];

        sort_rows(&mut rows, SortColumn::Country, true);
        let order: Vec<usize> = rows.iter().map(|r| r.record).collect();
        assert_eq!(order, vec![1, 2, 0]);

        sort_rows(&mut rows, SortColumn::Country, false);
        assert_eq!(rows[0].record, 0);
    }
}
