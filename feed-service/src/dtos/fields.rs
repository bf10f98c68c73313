//! Lenient field readers for reshaping schemaless documents.
//!
//! A value of the wrong JSON type is treated as absent instead of failing the
//! whole response.

use chrono::DateTime;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Typed value of `field`, or `None` when missing, null, or of another type.
pub fn optional<T: DeserializeOwned>(fields: &Map<String, Value>, field: &str) -> Option<T> {
    match fields.get(field) {
        None | Some(Value::Null) => None,
        Some(value) => serde_json::from_value(value.clone()).ok(),
    }
}

/// Whole number from an integer, or from a float with no fractional part.
pub fn integer(fields: &Map<String, Value>, field: &str) -> Option<i64> {
    match fields.get(field)? {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        _ => None,
    }
}

/// Epoch milliseconds from an integer, a float, or an Extended JSON date.
pub fn timestamp_millis(fields: &Map<String, Value>, field: &str) -> Option<i64> {
    match fields.get(field)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::Object(obj) => match obj.get("$date")? {
            Value::String(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.timestamp_millis()),
            // Canonical form: { "$date": { "$numberLong": "..." } }
            Value::Object(inner) => inner.get("$numberLong")?.as_str()?.parse().ok(),
            Value::Number(n) => n.as_i64(),
            _ => None,
        },
        _ => None,
    }
}
