//! Restriction records
//!
//! A restriction is one row of the source dataset: a legal or environmental
//! land-use rule for a country, the regulation it comes from, the dataset
//! that represents it spatially, and the geo-process applied to it.
//!
//! Source columns keep their original (Spanish) names on the wire; the Rust
//! fields use English names. Optional columns treat `null`, a missing key and
//! the empty string the same way: absent.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Placeholder shown wherever an optional field is absent.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Every known source column, in dataset column order.
pub const COLUMNS: &[&str] = &[
    "pais",
    "ip_restriccion",
    "normativa_aplicable",
    "enlace_norma",
    "articulo_norma",
    "fecha_norma",
    "institucion_responsable",
    "nivel_escala",
    "descripcion_restriccion",
    "tipo_restriccion",
    "tipo_descrip",
    "eudr_cat",
    "pertinencia_eudr",
    "cuantificable",
    "parametros_geo",
    "representacion",
    "tipo_analisis",
    "nombre_del_dataset",
    "fecha_dataset",
    "descripcion_dataset",
    "proveedor_dataset",
    "cobertura_espacial",
    "fuente",
    "licencia_condiciones_de_uso",
    "enlace_dataset",
    "observaciones_relevantes",
    "geoproceso_a_realizar",
    "cartografia_base",
    "tipo_geoproceso",
    "tipo_dataset",
    "entregable",
    "link_entregable",
    "id_layer",
    "url_geojson",
];

/// A single land-use restriction record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restriction {
    #[serde(rename = "pais", deserialize_with = "required_text")]
    pub country: String,

    /// Unique, stable identifier; the only key used for lookups
    #[serde(rename = "ip_restriccion", deserialize_with = "required_text")]
    pub id: String,

    #[serde(rename = "normativa_aplicable", deserialize_with = "required_text")]
    pub norm: String,

    #[serde(rename = "enlace_norma", default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub norm_link: Option<String>,

    #[serde(rename = "articulo_norma", default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub norm_article: Option<String>,

    #[serde(rename = "fecha_norma", default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub norm_date: Option<String>,

    #[serde(rename = "institucion_responsable", default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,

    #[serde(rename = "nivel_escala", default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub scale: Option<String>,

    #[serde(rename = "descripcion_restriccion", deserialize_with = "required_text")]
    pub description: String,

    /// Free-form type tag, e.g. "Restricción ambiental"
    #[serde(rename = "tipo_restriccion", deserialize_with = "required_text")]
    pub restriction_type: String,

    #[serde(rename = "tipo_descrip", default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub description_type: Option<String>,

    /// EUDR classification; presence marks the record as EUDR-relevant
    #[serde(rename = "eudr_cat", default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub eudr_category: Option<String>,

    #[serde(rename = "pertinencia_eudr", default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub eudr_relevance: Option<String>,

    #[serde(rename = "cuantificable", default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub quantifiable: Option<String>,

    #[serde(rename = "parametros_geo", default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub geo_parameters: Option<String>,

    #[serde(rename = "representacion", default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub representation: Option<String>,

    #[serde(rename = "tipo_analisis", default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub analysis_type: Option<String>,

    #[serde(rename = "nombre_del_dataset", default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub dataset_name: Option<String>,

    /// Spreadsheet serial day number, or free text
    #[serde(rename = "fecha_dataset", default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub dataset_date: Option<String>,

    #[serde(rename = "descripcion_dataset", default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub dataset_description: Option<String>,

    #[serde(rename = "proveedor_dataset", default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub dataset_provider: Option<String>,

    #[serde(rename = "cobertura_espacial", default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub spatial_coverage: Option<String>,

    #[serde(rename = "fuente", default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(rename = "licencia_condiciones_de_uso", default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,

    #[serde(rename = "enlace_dataset", default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub dataset_link: Option<String>,

    #[serde(rename = "observaciones_relevantes", default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,

    #[serde(rename = "geoproceso_a_realizar", default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub geoprocess: Option<String>,

    #[serde(rename = "cartografia_base", default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub base_cartography: Option<String>,

    #[serde(rename = "tipo_geoproceso", default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub geoprocess_type: Option<String>,

    #[serde(rename = "tipo_dataset", default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub dataset_type: Option<String>,

    /// Deliverable name, also used as the overlay display name
    #[serde(rename = "entregable", default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub deliverable: Option<String>,

    #[serde(rename = "link_entregable", default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub deliverable_link: Option<String>,

    /// Overlay identifier linking this record to a map layer
    #[serde(rename = "id_layer", default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub layer_id: Option<String>,

    #[serde(rename = "url_geojson", default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub geojson_url: Option<String>,

    /// Columns not known to the dashboard, in source order
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,

    /// Keys the record was loaded with, in source order; `true` when the
    /// key held `null`. Empty for records built in code.
    #[serde(skip)]
    pub source_keys: IndexMap<String, bool>,
}

impl Restriction {
    /// Deserialize one source object, remembering which keys it carried
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        let source_keys = match &value {
            Value::Object(object) => object.iter().map(|(key, v)| (key.clone(), v.is_null())).collect(),
            _ => IndexMap::new(),
        };
        let mut record: Self = serde_json::from_value(value)?;
        record.source_keys = source_keys;
        Ok(record)
    }

    /// Look up a column by its source key, rendered as text
    pub fn field(&self, key: &str) -> Option<String> {
        let known = match key {
            "pais" => Some(&self.country),
            "ip_restriccion" => Some(&self.id),
            "normativa_aplicable" => Some(&self.norm),
            "descripcion_restriccion" => Some(&self.description),
            "tipo_restriccion" => Some(&self.restriction_type),
            "enlace_norma" => self.norm_link.as_ref(),
            "articulo_norma" => self.norm_article.as_ref(),
            "fecha_norma" => self.norm_date.as_ref(),
            "institucion_responsable" => self.institution.as_ref(),
            "nivel_escala" => self.scale.as_ref(),
            "tipo_descrip" => self.description_type.as_ref(),
            "eudr_cat" => self.eudr_category.as_ref(),
            "pertinencia_eudr" => self.eudr_relevance.as_ref(),
            "cuantificable" => self.quantifiable.as_ref(),
            "parametros_geo" => self.geo_parameters.as_ref(),
            "representacion" => self.representation.as_ref(),
            "tipo_analisis" => self.analysis_type.as_ref(),
            "nombre_del_dataset" => self.dataset_name.as_ref(),
            "fecha_dataset" => self.dataset_date.as_ref(),
            "descripcion_dataset" => self.dataset_description.as_ref(),
            "proveedor_dataset" => self.dataset_provider.as_ref(),
            "cobertura_espacial" => self.spatial_coverage.as_ref(),
            "fuente" => self.source.as_ref(),
            "licencia_condiciones_de_uso" => self.license.as_ref(),
            "enlace_dataset" => self.dataset_link.as_ref(),
            "observaciones_relevantes" => self.observations.as_ref(),
            "geoproceso_a_realizar" => self.geoprocess.as_ref(),
            "cartografia_base" => self.base_cartography.as_ref(),
            "tipo_geoproceso" => self.geoprocess_type.as_ref(),
            "tipo_dataset" => self.dataset_type.as_ref(),
            "entregable" => self.deliverable.as_ref(),
            "link_entregable" => self.deliverable_link.as_ref(),
            "id_layer" => self.layer_id.as_ref(),
            "url_geojson" => self.geojson_url.as_ref(),
            _ => return self.extra.get(key).cloned().and_then(value_to_text),
        };
        known.cloned()
    }

    /// Columns the record was loaded with, in source order. Records built
    /// in code report their populated known columns, then the extra ones.
    pub fn keys(&self) -> Vec<String> {
        if !self.source_keys.is_empty() {
            return self.source_keys.keys().cloned().collect();
        }
        COLUMNS
            .iter()
            .filter(|key| self.field(key).is_some())
            .map(|key| key.to_string())
            .chain(self.extra.keys().cloned())
            .collect()
    }

    /// Raw cell text: missing and `null` values take the placeholder, an
    /// empty string stays empty
    pub fn raw_cell(&self, key: &str) -> String {
        match self.source_keys.get(key) {
            Some(false) => self.field(key).unwrap_or_default(),
            _ => self.field(key).unwrap_or_else(|| NOT_SPECIFIED.to_string()),
        }
    }

    /// Whether the record carries an EUDR category
    pub fn has_eudr_category(&self) -> bool {
        self.eudr_category.is_some()
    }

    /// `Si`/`Sí` in the quantifiable column, in any case
    pub fn is_quantifiable(&self) -> bool {
        self.quantifiable
            .as_deref()
            .map(|value| matches!(value.trim().to_lowercase().as_str(), "si" | "sí"))
            .unwrap_or(false)
    }

    /// Overlay identifier and source location, when the record has both
    pub fn overlay_source(&self) -> Option<(&str, &str)> {
        match (self.layer_id.as_deref(), self.geojson_url.as_deref()) {
            (Some(id), Some(url)) => Some((id, url)),
            _ => None,
        }
    }
}

/// Render a JSON value as cell text; `null` and `""` are absent
pub fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        other => Some(other.to_string()),
    }
}

fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(value_to_text))
}

fn required_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        other => Err(serde::de::Error::custom(format!("expected text, found {}", other))),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Minimal record with the required columns filled in
    pub fn restriction(id: &str, country: &str, restriction_type: &str) -> Restriction {
        Restriction {
            country: country.to_string(),
            id: id.to_string(),
            norm: format!("Ley {}", id),
            norm_link: None,
            norm_article: None,
            norm_date: None,
            institution: None,
            scale: None,
            description: format!("Restricción {}", id),
            restriction_type: restriction_type.to_string(),
            description_type: None,
            eudr_category: None,
            eudr_relevance: None,
            quantifiable: None,
            geo_parameters: None,
            representation: None,
            analysis_type: None,
            dataset_name: None,
            dataset_date: None,
            dataset_description: None,
            dataset_provider: None,
            spatial_coverage: None,
            source: None,
            license: None,
            dataset_link: None,
            observations: None,
            geoprocess: None,
            base_cartography: None,
            geoprocess_type: None,
            dataset_type: None,
            deliverable: None,
            deliverable_link: None,
            layer_id: None,
            geojson_url: None,
            extra: IndexMap::new(),
            source_keys: IndexMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_treats_empty_as_absent() {
        let record: Restriction = serde_json::from_value(serde_json::json!({
            "pais": "Chile",
            "ip_restriccion": "CL-001",
            "normativa_aplicable": "Ley 20.283",
            "descripcion_restriccion": "Bosque nativo",
            "tipo_restriccion": "Restricción forestal",
            "eudr_cat": "",
            "nombre_del_dataset": null,
            "fecha_dataset": 44927,
            "cuantificable": "Si"
        }))
        .unwrap();

        assert_eq!(record.country, "Chile");
        assert_eq!(record.eudr_category, None);
        assert_eq!(record.dataset_name, None);
        assert_eq!(record.dataset_date.as_deref(), Some("44927"));
        assert!(record.is_quantifiable());
        assert!(!record.has_eudr_category());
    }

    #[test]
    fn test_unknown_columns_are_kept_in_order() {
        let record: Restriction = serde_json::from_str(
            r#"{"pais":"Perú","ip_restriccion":"PE-1","normativa_aplicable":"DS 1",
                "descripcion_restriccion":"d","tipo_restriccion":"t",
                "zeta":"z","alfa":3}"#,
        )
        .unwrap();

        let extra: Vec<&str> = record.extra.keys().map(String::as_str).collect();
        assert_eq!(extra, vec!["zeta", "alfa"]);
        assert_eq!(record.field("alfa").as_deref(), Some("3"));
        assert_eq!(record.keys().last().map(String::as_str), Some("alfa"));
    }

    #[test]
    fn test_loaded_record_remembers_its_keys() {
        let record = Restriction::from_value(serde_json::json!({
            "ip_restriccion": "BZ-9",
            "pais": "Belice",
            "normativa_aplicable": "SI 12",
            "descripcion_restriccion": "Manglar",
            "tipo_restriccion": "Restricción hidrica",
            "fuente": "",
            "eudr_cat": null
        }))
        .unwrap();

        assert_eq!(
            record.keys(),
            vec![
                "ip_restriccion",
                "pais",
                "normativa_aplicable",
                "descripcion_restriccion",
                "tipo_restriccion",
                "fuente",
                "eudr_cat"
            ]
        );
        assert_eq!(record.raw_cell("fuente"), "");
        assert_eq!(record.raw_cell("eudr_cat"), NOT_SPECIFIED);
        assert_eq!(record.raw_cell("entregable"), NOT_SPECIFIED);
        assert_eq!(record.raw_cell("pais"), "Belice");
    }

    #[test]
    fn test_missing_required_column_is_rejected() {
        let result = serde_json::from_str::<Restriction>(
            r#"{"pais":"Perú","normativa_aplicable":"DS 1","descripcion_restriccion":"d","tipo_restriccion":"t"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_field_lookup_by_source_key() {
        let mut record = fixtures::restriction("BZ-1", "Belice", "Restricción hidrica");
        record.layer_id = Some("layer000".to_string());
        record.geojson_url = Some("capas/layer000.geojson".to_string());

        assert_eq!(record.field("pais").as_deref(), Some("Belice"));
        assert_eq!(record.field("id_layer").as_deref(), Some("layer000"));
        assert_eq!(record.field("tipo_analisis"), None);
        assert_eq!(record.overlay_source(), Some(("layer000", "capas/layer000.geojson")));
    }

    #[test]
    fn test_quantifiable_variants() {
        let mut record = fixtures::restriction("X", "Chile", "t");
        for (value, expected) in [("Si", true), ("sí", true), ("No", false), ("", false)] {
            record.quantifiable = Some(value.to_string());
            assert_eq!(record.is_quantifiable(), expected, "value {:?}", value);
        }
    }
}
