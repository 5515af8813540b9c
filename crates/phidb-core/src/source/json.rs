use crate::{
    source::{Record, Relation, Schema, SourceError},
    value::Value,
};
use std::io::BufRead;

impl Relation {
    /// Load a relation from JSON lines, one object per line.
    ///
    /// The schema is the union of object keys in first-seen order; keys
    /// absent from a line read as `Null`. Blank lines are skipped.
    pub fn from_json_lines<R: BufRead>(reader: R) -> Result<Self, SourceError> {
        let mut schema = Schema::default();
        let mut rows: Vec<Vec<Value>> = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line_no = index + 1;
            let line = line?;
            let text = line.trim();
            if text.is_empty() {
                continue;
            }

            let parsed: serde_json::Value =
                serde_json::from_str(text).map_err(|source| SourceError::Json {
                    line: line_no,
                    source,
                })?;
            let serde_json::Value::Object(object) = parsed else {
                return Err(SourceError::NotAnObject { line: line_no });
            };

            let mut values = vec![Value::Null; schema.len()];
            for (column, json) in object {
                let value = value_from_json(json).ok_or_else(|| SourceError::UnsupportedValue {
                    line: line_no,
                    column: column.clone(),
                })?;
                let slot = match schema.slot(&column) {
                    Some(slot) => slot,
                    None => {
                        values.push(Value::Null);
                        schema.push(column)
                    }
                };
                values[slot] = value;
            }
            rows.push(values);
        }

        // Rows read before a column first appeared are padded to full width.
        let width = schema.len();
        let records: Vec<Record> = rows
            .into_iter()
            .map(|mut values| {
                values.resize(width, Value::Null);
                Record::new(values)
            })
            .collect();

        log::debug!(
            "loaded JSON-lines relation: {} columns, {} rows",
            width,
            records.len()
        );

        Ok(Self::from_parts(schema, records))
    }
}

// Convert one scalar JSON value; nested arrays and objects are rejected.
#[expect(clippy::cast_precision_loss)]
fn value_from_json(json: serde_json::Value) -> Option<Value> {
    match json {
        serde_json::Value::Null => Some(Value::Null),
        serde_json::Value::Bool(v) => Some(Value::Bool(v)),
        serde_json::Value::Number(number) => number
            .as_i64()
            .map(Value::Int)
            .or_else(|| number.as_u64().map(|v| Value::Float(v as f64)))
            .or_else(|| number.as_f64().map(Value::Float)),
        serde_json::Value::String(text) => Some(Value::Text(text)),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
    }
}
