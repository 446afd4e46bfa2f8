use chrono::NaiveDate;
use serde_json::{Map, Number, Value};

use crate::engine::errors::RecordError;
use crate::engine::index::mapping::{FieldType, IndexMapping};
use crate::engine::types::RawRecord;

/// A JSON document ready for bulk indexing, fields in record order.
pub type Document = Map<String, Value>;

/// Types every field of `record` according to `mapping`.
///
/// Unmapped fields are kept as strings. Empty numeric or date cells become
/// `null`. Booleans are true only for a case-insensitive `"true"`.
pub fn to_document(mapping: &IndexMapping, record: &RawRecord) -> Result<Document, RecordError> {
    let mut doc = Map::with_capacity(record.len());
    for (field, raw) in record.iter() {
        let value = match mapping.get(field) {
            Some(field_type) => typed_value(field, raw, field_type)?,
            None => Value::String(raw.to_string()),
        };
        doc.insert(field.to_string(), value);
    }
    Ok(doc)
}

fn typed_value(field: &str, raw: &str, field_type: &FieldType) -> Result<Value, RecordError> {
    let text = raw.trim();
    match field_type {
        FieldType::Keyword => Ok(Value::String(raw.to_string())),
        FieldType::Boolean => Ok(Value::Bool(text.eq_ignore_ascii_case("true"))),
        _ if text.is_empty() => Ok(Value::Null),
        FieldType::Integer => parse_integer(field, text).map(Value::from),
        FieldType::Float => parse_float(field, text),
        FieldType::Date { format } => {
            let pattern = chrono_pattern(format);
            NaiveDate::parse_from_str(text, &pattern)
                .map(|_| Value::String(text.to_string()))
                .map_err(|e| RecordError::malformed(field, raw, format!("not a {format} date: {e}")))
        }
    }
}

/// Integers, including integral decimals such as `12.0`.
fn parse_integer(field: &str, text: &str) -> Result<i64, RecordError> {
    if let Ok(value) = text.parse::<i64>() {
        return Ok(value);
    }
    let value: f64 = text
        .parse()
        .map_err(|_| RecordError::malformed(field, text, "not an integer"))?;
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Ok(value as i64)
    } else {
        Err(RecordError::malformed(field, text, "not an integer"))
    }
}

fn parse_float(field: &str, text: &str) -> Result<Value, RecordError> {
    text.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| RecordError::malformed(field, text, "not a finite number"))
}

/// Translates an index date pattern into a chrono format string.
fn chrono_pattern(format: &str) -> String {
    format
        .replace("yyyy", "%Y")
        .replace("MM", "%m")
        .replace("dd", "%d")
        .replace("HH", "%H")
        .replace("mm", "%M")
        .replace("ss", "%S")
}
