use serde_json::Value;
use std::io;

use super::{comparison_rows, scalar, unwrap_result};

const SCHEDULE_COLUMNS: [&str; 8] = [
    "debt_id",
    "balance_before",
    "interest_accrued",
    "payment",
    "interest_paid",
    "principal_paid",
    "balance_after",
    "is_focus",
];

/// Write output as CSV to stdout.
///
/// Projections emit the full month-by-debt schedule, comparisons one row per
/// strategy, anything else a two-column field/value listing.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());
    let result = unwrap_result(value);

    if let Some(rows) = comparison_rows(result) {
        let _ = wtr.write_record(["strategy", "total_months", "total_interest", "payoff_date"]);
        for (label, projection) in rows {
            let _ = wtr.write_record([
                label.to_string(),
                cell(projection, "total_months"),
                cell(projection, "total_interest"),
                cell(projection, "payoff_date"),
            ]);
        }
    } else if let Some(Value::Array(schedule)) = result.get("schedule") {
        let mut header = vec!["month", "date"];
        header.extend(SCHEDULE_COLUMNS);
        let _ = wtr.write_record(&header);

        for month in schedule {
            let prefix = [cell(month, "month"), cell(month, "date")];
            if let Some(Value::Array(debts)) = month.get("debts") {
                for debt in debts {
                    let row: Vec<String> = prefix
                        .iter()
                        .cloned()
                        .chain(SCHEDULE_COLUMNS.iter().map(|c| cell(debt, c)))
                        .collect();
                    let _ = wtr.write_record(&row);
                }
            }
        }
    } else if let Value::Object(map) = result {
        let _ = wtr.write_record(["field", "value"]);
        for (key, val) in map {
            let _ = wtr.write_record([key.as_str(), &csv_value(val)]);
        }
    } else {
        let _ = wtr.write_record([&csv_value(result)]);
    }

    let _ = wtr.flush();
}

fn cell(value: &Value, key: &str) -> String {
    value.get(key).map(csv_value).unwrap_or_default()
}

fn csv_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => scalar(other),
    }
}
