use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{comparison_rows, scalar, unwrap_result};

const SUMMARY_FIELDS: [&str; 6] = [
    "strategy",
    "monthly_extra",
    "total_months",
    "total_interest",
    "total_paid",
    "payoff_date",
];

/// Format output as tables: a summary, the payoff order, then notes.
pub fn print_table(value: &Value) {
    let result = unwrap_result(value);

    if let Some(rows) = comparison_rows(result) {
        print_comparison(result, &rows);
    } else if result.get("debt_payoff_order").is_some() {
        print_projection(result);
    } else {
        print_flat_object(result);
    }

    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {w}");
            }
        }
    }
    if let Some(Value::String(meth)) = value.get("methodology") {
        println!("\nMethodology: {meth}");
    }
}

fn print_projection(result: &Value) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for name in SUMMARY_FIELDS {
        if let Some(v) = result.get(name) {
            builder.push_record([name.to_string(), scalar(v)]);
        }
    }
    println!("{}", Table::from(builder));

    if let Some(Value::Array(order)) = result.get("debt_payoff_order") {
        println!("\nPayoff order:");
        print_payoff_order(order);
    }
}

fn print_payoff_order(order: &[Value]) {
    if order.is_empty() {
        println!("(no debts)");
        return;
    }
    let mut builder = Builder::default();
    builder.push_record([
        "Debt",
        "Original balance",
        "Paid off (month)",
        "Paid off (date)",
        "Interest paid",
    ]);
    for debt in order {
        builder.push_record([
            field(debt, "name"),
            field(debt, "original_balance"),
            field(debt, "payoff_month"),
            field(debt, "payoff_date"),
            field(debt, "interest_paid"),
        ]);
    }
    println!("{}", Table::from(builder));
}

fn print_comparison(result: &Value, rows: &[(&str, &Value); 3]) {
    let mut builder = Builder::default();
    builder.push_record(["Strategy", "Months", "Total interest", "Payoff date"]);
    for (label, projection) in rows {
        if projection.is_null() {
            builder.push_record([label.to_string(), "never".into(), "n/a".into(), "n/a".into()]);
        } else {
            builder.push_record([
                label.to_string(),
                field(projection, "total_months"),
                field(projection, "total_interest"),
                field(projection, "payoff_date"),
            ]);
        }
    }
    println!("{}", Table::from(builder));

    println!(
        "\nInterest saved with avalanche: {}",
        field(result, "interest_saved_with_avalanche")
    );
    println!(
        "Interest saved vs minimum payments: {}",
        field(result, "interest_saved_vs_minimum")
    );
    println!(
        "Months saved vs minimum payments: {}",
        field(result, "time_saved_vs_minimum")
    );
    if let Some(rec) = result.get("recommendation") {
        println!(
            "\nRecommendation: {} ({})",
            field(rec, "strategy"),
            field(rec, "reason")
        );
    }
}

fn print_flat_object(value: &Value) {
    match value {
        Value::Object(map) => {
            let mut builder = Builder::default();
            builder.push_record(["Field", "Value"]);
            for (key, val) in map {
                builder.push_record([key.clone(), scalar(val)]);
            }
            println!("{}", Table::from(builder));
        }
        other => println!("{}", scalar(other)),
    }
}

fn field(value: &Value, key: &str) -> String {
    value.get(key).map(scalar).unwrap_or_default()
}
