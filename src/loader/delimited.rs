//! Delimited text serialization of row batches for the bulk path.

use crate::models::TableRow;
use crate::schema::TableSpec;
use rusqlite::types::Value;

fn push_field(out: &mut String, value: &Value, delimiter: char) {
    let text = match value {
        Value::Null => return,
        Value::Integer(i) => i.to_string(),
        Value::Real(r) => r.to_string(),
        Value::Text(s) => s.clone(),
        Value::Blob(b) => String::from_utf8_lossy(b).into_owned(),
    };
    let needs_quoting = text
        .chars()
        .any(|c| c == delimiter || c == '"' || c == '\n' || c == '\r');
    if needs_quoting {
        out.push('"');
        out.push_str(&text.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(&text);
    }
}

/// One line per row, fields separated by the table's delimiter. NULL is the
/// empty field.
pub fn to_delimited<R: TableRow>(spec: &TableSpec, rows: &[R]) -> String {
    let delimiter = spec.delimiter.as_char();
    let mut out = String::new();
    for row in rows {
        for (index, value) in row.values().iter().enumerate() {
            if index > 0 {
                out.push(delimiter);
            }
            push_field(&mut out, value, delimiter);
        }
        out.push('\n');
    }
    out
}
