use serde_json::Value;

/// Headline figure for each command, most specific first.
const PRIORITY_KEYS: [&str; 6] = [
    "total_monthly_payment",
    "monthly_payment",
    "eligible",
    "output_value",
    "name",
    "loan_amount",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    println!("{}", render_minimal(value));
}

fn render_minimal(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result_obj {
        Value::Object(map) => {
            for key in &PRIORITY_KEYS {
                if let Some(val) = map.get(*key) {
                    if !val.is_null() {
                        return format_minimal(val);
                    }
                }
            }
            // Sensitivity grids carry their answers in `results`
            if let Some(Value::Array(rows)) = map.get("results") {
                return rows.iter().map(render_minimal).collect::<Vec<_>>().join("\n");
            }
            match map.iter().next() {
                Some((key, val)) => format!("{}: {}", key, format_minimal(val)),
                None => String::new(),
            }
        }
        Value::Array(items) => items.iter().map(render_minimal).collect::<Vec<_>>().join("\n"),
        other => format_minimal(other),
    }
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payment_headline() {
        let v = json!({"result": {"loan_amount": "240000", "total_monthly_payment": "1675.29"}});
        assert_eq!(render_minimal(&v), "1675.29");
    }

    #[test]
    fn test_program_list_prints_names() {
        let v = json!([{"id": 1, "name": "FHA Loans"}, {"id": 2, "name": "VA Loans"}]);
        assert_eq!(render_minimal(&v), "FHA Loans\nVA Loans");
    }
}
