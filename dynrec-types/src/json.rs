use chrono::SecondsFormat;
use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde_json::Value as JsonValue;

use crate::value::{Value, DATE_FORMAT};

/// Converts a JSON value into a [`Value`]. Objects keep their key order.
pub fn json_to_value(value: JsonValue) -> Value {
    match value {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Boolean(b),
        JsonValue::Number(n) => {
            if let Some(n) = n.as_u64() {
                Value::UInt(n)
            } else if let Some(n) = n.as_i64() {
                Value::Int(n)
            } else {
                n.as_f64()
                    .map_or(Value::Null, |n| Value::Float(OrderedFloat(n)))
            }
        }
        JsonValue::String(s) => Value::String(s),
        JsonValue::Array(values) => {
            Value::Array(values.into_iter().map(json_to_value).collect())
        }
        JsonValue::Object(object) => Value::Map(
            object
                .into_iter()
                .map(|(key, value)| (key, json_to_value(value)))
                .collect::<IndexMap<_, _>>(),
        ),
    }
}

/// Converts a [`Value`] into JSON. Decimals, timestamps and dates render as
/// strings, binary as a number array.
pub fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::UInt(n) => JsonValue::from(*n),
        Value::Int(n) => JsonValue::from(*n),
        Value::Float(n) => JsonValue::from(n.0),
        Value::Boolean(b) => JsonValue::from(*b),
        Value::String(s) => JsonValue::String(s.clone()),
        Value::Binary(b) => JsonValue::from(b.clone()),
        Value::Decimal(d) => JsonValue::String(d.to_string()),
        Value::Timestamp(ts) => {
            JsonValue::String(ts.to_rfc3339_opts(SecondsFormat::Millis, true))
        }
        Value::Date(d) => JsonValue::String(d.format(DATE_FORMAT).to_string()),
        Value::Array(values) => JsonValue::Array(values.iter().map(value_to_json).collect()),
        Value::Map(map) => {
            let mut object = serde_json::Map::new();
            for (key, value) in map {
                object.insert(key.clone(), value_to_json(value));
            }
            JsonValue::Object(object)
        }
        Value::Null => JsonValue::Null,
    }
}

impl From<JsonValue> for Value {
    fn from(value: JsonValue) -> Self {
        json_to_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_number_branching() {
        assert_eq!(json_to_value(json!(1)), Value::UInt(1));
        assert_eq!(json_to_value(json!(-1)), Value::Int(-1));
        assert_eq!(json_to_value(json!(1.5)), Value::Float(OrderedFloat(1.5)));
    }

    #[test]
    fn test_json_object_keeps_key_order() {
        let value = json_to_value(json!({"b": 1, "a": 2}));
        let map = value.as_map().unwrap();
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, ["b", "a"]);
    }

    #[test]
    fn test_json_round_trip() {
        let json = json!({"b": [1, -2, 2.5], "a": {"nested": null, "ok": true}});
        let value = json_to_value(json.clone());
        assert_eq!(value_to_json(&value), json);
    }

    #[test]
    fn test_value_to_json_renders_exotic_types_as_strings() {
        use chrono::DateTime;
        use rust_decimal::Decimal;

        assert_eq!(
            value_to_json(&Value::Decimal(Decimal::new(25, 1))),
            json!("2.5")
        );
        let ts = DateTime::parse_from_rfc3339("2020-01-01T00:13:00Z").unwrap();
        assert_eq!(
            value_to_json(&Value::Timestamp(ts)),
            json!("2020-01-01T00:13:00.000Z")
        );
        assert_eq!(value_to_json(&Value::Binary(vec![1, 2])), json!([1, 2]));
    }
}
