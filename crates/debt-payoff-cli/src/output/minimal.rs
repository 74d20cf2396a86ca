use serde_json::Value;

use super::{scalar, unwrap_result};

/// Print just the key answer: the recommended strategy for a comparison,
/// otherwise the payoff date.
pub fn print_minimal(value: &Value) {
    let result = unwrap_result(value);

    if let Some(strategy) = result
        .get("recommendation")
        .and_then(|r| r.get("strategy"))
    {
        println!("{}", scalar(strategy));
        return;
    }

    for key in ["payoff_date", "projected_payoff_date", "total_months"] {
        if let Some(val) = result.get(key).filter(|v| !v.is_null()) {
            println!("{}", scalar(val));
            return;
        }
    }

    match result {
        Value::Object(map) => {
            if let Some((key, val)) = map.iter().next() {
                println!("{}: {}", key, scalar(val));
            }
        }
        other => println!("{}", scalar(other)),
    }
}
