use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

use crate::error::ExportError;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

/// Encode an export payload.
///
/// CSV output is one `path,value` row per scalar leaf, paths joined with `.`
/// and array indices inlined (`energyData.nodes.0.load`).
pub fn render_export(format: ExportFormat, payload: &Value) -> Result<Vec<u8>, ExportError> {
    match format {
        ExportFormat::Json => {
            serde_json::to_vec_pretty(payload).map_err(|e| ExportError::Encoding(e.to_string()))
        }
        ExportFormat::Csv => {
            let mut rows = Vec::new();
            flatten("", payload, &mut rows);
            let mut out = String::from("path,value\n");
            for (path, value) in rows {
                out.push_str(&csv_field(&path));
                out.push(',');
                out.push_str(&csv_field(&value));
                out.push('\n');
            }
            Ok(out.into_bytes())
        }
    }
}

fn flatten(prefix: &str, value: &Value, rows: &mut Vec<(String, String)>) {
    let join = |key: &str| {
        if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{prefix}.{key}")
        }
    };
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                flatten(&join(k), v, rows);
            }
        }
        Value::Array(items) => {
            for (i, v) in items.iter().enumerate() {
                flatten(&join(&i.to_string()), v, rows);
            }
        }
        Value::Null => rows.push((prefix.to_string(), String::new())),
        Value::String(s) => rows.push((prefix.to_string(), s.clone())),
        other => rows.push((prefix.to_string(), other.to_string())),
    }
}

fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_csv_flattens_nested_payload() {
        let payload = json!({
            "energyData": { "nodes": [ { "id": "n1", "load": 12.5 } ] },
            "gridStatus": null,
            "filters": { "selectedRegion": "north, east" }
        });
        let csv = String::from_utf8(render_export(ExportFormat::Csv, &payload).unwrap()).unwrap();
        assert!(csv.starts_with("path,value\n"));
        assert!(csv.contains("energyData.nodes.0.id,n1\n"));
        assert!(csv.contains("energyData.nodes.0.load,12.5\n"));
        assert!(csv.contains("gridStatus,\n"));
        assert!(csv.contains("filters.selectedRegion,\"north, east\"\n"));
    }

    #[test]
    fn test_json_is_pretty() {
        let bytes = render_export(ExportFormat::Json, &json!({"a": 1})).unwrap();
        let parsed: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed["a"], 1);
        assert!(String::from_utf8(bytes).unwrap().contains('\n'));
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert!("xml".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::Json.content_type(), "application/json");
    }
}
