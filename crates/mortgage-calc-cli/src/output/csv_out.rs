use serde_json::{Map, Value};
use std::io::{self, Write};

/// Tabular members of a result, in the order they are preferred for CSV.
const TABULAR_KEYS: [&str; 4] = ["rows", "yearly", "payment_breakdown", "results"];

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());
    if let Err(e) = write_csv(&mut wtr, value) {
        eprintln!("CSV write error: {}", e);
    }
}

fn write_csv<W: Write>(wtr: &mut csv::Writer<W>, value: &Value) -> csv::Result<()> {
    match value {
        Value::Object(map) => {
            let body = match map.get("result") {
                Some(Value::Object(result)) => result,
                _ => map,
            };
            match tabular_member(body) {
                Some(rows) => write_array_csv(wtr, rows)?,
                None => write_fields(wtr, body)?,
            }
        }
        Value::Array(arr) => write_array_csv(wtr, arr)?,
        _ => wtr.write_record([&format_csv_value(value)])?,
    }
    wtr.flush()?;
    Ok(())
}

/// The largest list of records a result carries, if any.
fn tabular_member(map: &Map<String, Value>) -> Option<&[Value]> {
    TABULAR_KEYS.iter().find_map(|key| match map.get(*key) {
        Some(Value::Array(items)) if items.first().is_some_and(Value::is_object) => {
            Some(items.as_slice())
        }
        _ => None,
    })
}

fn write_fields<W: Write>(wtr: &mut csv::Writer<W>, map: &Map<String, Value>) -> csv::Result<()> {
    wtr.write_record(["field", "value"])?;
    for (key, val) in map {
        wtr.write_record([key.as_str(), &format_csv_value(val)])?;
    }
    Ok(())
}

fn write_array_csv<W: Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) -> csv::Result<()> {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            wtr.write_record([&format_csv_value(item)])?;
        }
        return Ok(());
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    wtr.write_record(&headers)?;

    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                .collect();
            wtr.write_record(&row)?;
        }
    }
    Ok(())
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(value: &Value) -> String {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        write_csv(&mut wtr, value).unwrap();
        String::from_utf8(wtr.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_schedule_rows_become_records() {
        let v = json!({"result": {
            "monthly_payment": "100",
            "rows": [
                {"month": 1, "balance": "900"},
                {"month": 2, "balance": "800"}
            ]
        }});
        assert_eq!(render(&v), "balance,month\n900,1\n800,2\n");
    }

    #[test]
    fn test_scalar_result_is_field_value() {
        let v = json!({"result": {"loan_amount": "240000"}});
        assert_eq!(render(&v), "field,value\nloan_amount,240000\n");
    }
}
