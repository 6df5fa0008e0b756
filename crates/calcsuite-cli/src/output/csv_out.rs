use serde_json::Value;
use std::io;

use super::{cell, result_of, ROW_FIELDS};

type StdoutCsv<'a> = csv::Writer<io::StdoutLock<'a>>;

/// Write CSV to stdout.
///
/// Calculators with per-year or per-plan rows emit those rows; the rest
/// emit two columns, field and value.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match result_of(value) {
        Value::Object(result) => {
            let rows = ROW_FIELDS
                .iter()
                .find_map(|key| result.get(*key).and_then(Value::as_array));
            match rows {
                Some(rows) => write_rows(&mut wtr, rows),
                None => {
                    let _ = wtr.write_record(["field", "value"]);
                    for (key, val) in result {
                        let _ = wtr.write_record([key.as_str(), &cell(val)]);
                    }
                }
            }
        }
        Value::Array(rows) => write_rows(&mut wtr, rows),
        other => {
            let _ = wtr.write_record([&cell(other)]);
        }
    }

    if let Err(e) = wtr.flush() {
        tracing::warn!(error = %e, "failed to flush CSV output");
    }
}

fn write_rows(wtr: &mut StdoutCsv<'_>, rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        for row in rows {
            let _ = wtr.write_record([&cell(row)]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    let _ = wtr.write_record(&headers);
    for row in rows.iter().filter_map(Value::as_object) {
        let record: Vec<String> = headers
            .iter()
            .map(|h| row.get(*h).map(cell).unwrap_or_default())
            .collect();
        let _ = wtr.write_record(&record);
    }
}
