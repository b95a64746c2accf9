//! Response envelopes used by the backend.

use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;

/// A list response: a bare array, `{ "data": [..] }` or `{ "items": [..] }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope {
    Bare(Vec<Value>),
    Data { data: Vec<Value> },
    Items { items: Vec<Value> },
}

impl ListEnvelope {
    /// Parse a list response body.
    pub fn parse(body: &str) -> Result<Vec<Value>, ApiError> {
        serde_json::from_str::<ListEnvelope>(body)
            .map(ListEnvelope::into_rows)
            .map_err(|e| ApiError::parse_with_body(e.to_string(), body))
    }

    pub fn into_rows(self) -> Vec<Value> {
        match self {
            ListEnvelope::Bare(rows) => rows,
            ListEnvelope::Data { data } => data,
            ListEnvelope::Items { items } => items,
        }
    }
}

/// Unwrap a single-record response.
///
/// `{ "data": { .. } }` yields the inner object; anything else is returned
/// as-is.
pub fn unwrap_record(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.get("data").is_some_and(Value::is_object) => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_shapes() {
        assert_eq!(ListEnvelope::parse(r#"[1, 2]"#).unwrap().len(), 2);
        assert_eq!(ListEnvelope::parse(r#"{"data": [1]}"#).unwrap(), vec![json!(1)]);
        assert_eq!(ListEnvelope::parse(r#"{"items": ["a"]}"#).unwrap(), vec![json!("a")]);
    }

    #[test]
    fn test_parse_rejects_object_without_list() {
        let err = ListEnvelope::parse(r#"{"total": 3}"#).unwrap_err();
        assert!(matches!(err, ApiError::Parse { body: Some(_), .. }));
    }

    #[test]
    fn test_unwrap_record() {
        assert_eq!(unwrap_record(json!({"data": {"id": 1}})), json!({"id": 1}));
        assert_eq!(unwrap_record(json!({"id": 1})), json!({"id": 1}));
        // A scalar `data` field is part of the record, not an envelope.
        assert_eq!(unwrap_record(json!({"data": "x"})), json!({"data": "x"}));
    }
}
