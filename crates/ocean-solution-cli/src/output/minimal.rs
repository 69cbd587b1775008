use serde_json::Value;

use super::cell;

/// Headline fields, most specific first.
const PRIORITY_KEYS: [&str; 6] = [
    "value",
    "abatement_cost",
    "total_co2_seq",
    "lifetime_cashflow_npv_all",
    "marginal_first_cost",
    "name",
];

/// Print just the key answer from the output.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Object(map) => {
            let headline = PRIORITY_KEYS
                .iter()
                .find_map(|key| map.get(*key).filter(|v| !v.is_null()));
            if let Some(val) = headline {
                println!("{}", cell(val));
            } else if let Some((key, val)) = map.iter().next() {
                println!("{}: {}", key, cell(val));
            }
        }
        // Scenario listings print one name per line.
        Value::Array(rows) => {
            for row in rows {
                match row.get("name") {
                    Some(name) => println!("{}", cell(name)),
                    None => println!("{}", cell(row)),
                }
            }
        }
        _ => println!("{}", cell(result)),
    }
}
