pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// The `result` inside a computation envelope, or the value itself.
pub(crate) fn unwrap_result(value: &Value) -> &Value {
    value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value)
}

/// Render a scalar for a cell; nested structures fall back to compact JSON.
pub(crate) fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "n/a".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// Rows for a comparison: (label, projection or null).
pub(crate) fn comparison_rows(result: &Value) -> Option<[(&'static str, &Value); 3]> {
    let map = result.as_object()?;
    Some([
        ("snowball", map.get("snowball")?),
        ("avalanche", map.get("avalanche")?),
        ("minimum_only", map.get("minimum_only")?),
    ])
}
