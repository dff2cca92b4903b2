use crate::domain::model::{ProjectedRow, RawRecord, MISSING_VALUE};
use serde_json::Value;

/// Flatten a record into one value per attribute, in attribute order.
pub fn project(record: &RawRecord, attributes: &[String]) -> ProjectedRow {
    attributes
        .iter()
        .map(|attribute| {
            record
                .data
                .get(attribute)
                .map(value_to_cell)
                .unwrap_or_else(|| MISSING_VALUE.to_string())
        })
        .collect()
}

/// Nested objects and arrays are not flattened; they export as the sentinel.
fn value_to_cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => MISSING_VALUE.to_string(),
    }
}
