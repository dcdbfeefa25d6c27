//! Dataset provider: JSON or CSV file into a [`Dataset`]

use std::fs::File;
use std::io::Read;
use std::path::Path;

use eudr_core::{Dataset, Restriction};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::info;

use crate::DataError;

/// Accepted JSON layouts
#[derive(Deserialize)]
#[serde(untagged)]
enum JsonDocument {
    Records(Vec<Value>),
    Wrapped {
        #[serde(rename = "restrictionsData")]
        restrictions_data: Vec<Value>,
    },
}

/// Load the whole dataset, picking the format from the file extension
pub fn load_dataset(path: &Path) -> Result<Dataset, DataError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    let records = match extension.as_deref() {
        Some("json") => parse_json(&std::fs::read_to_string(path)?)?,
        Some("csv") => parse_csv(File::open(path)?)?,
        _ => return Err(DataError::UnsupportedFormat(path.display().to_string())),
    };

    let dataset = Dataset::new(records)?;
    info!("Loaded {} restrictions from {:?}", dataset.len(), path);
    Ok(dataset)
}

/// A top-level array of flat objects, or an object wrapping one
pub fn parse_json(text: &str) -> Result<Vec<Restriction>, DataError> {
    let values = match serde_json::from_str::<JsonDocument>(text)? {
        JsonDocument::Records(values) => values,
        JsonDocument::Wrapped { restrictions_data } => restrictions_data,
    };

    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| to_restriction(index + 1, value))
        .collect()
}

/// A headed CSV file using the same column names as the JSON form
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<Restriction>, DataError> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row?;
        let object: Map<String, Value> = headers
            .iter()
            .zip(row.iter())
            .map(|(key, cell)| (key.trim().to_string(), Value::String(cell.to_string())))
            .collect();
        records.push(to_restriction(index + 1, Value::Object(object))?);
    }

    Ok(records)
}

fn to_restriction(row: usize, value: Value) -> Result<Restriction, DataError> {
    Restriction::from_value(value).map_err(|e| DataError::InvalidRecord {
        row,
        message: e.to_string(),
    })
}
