//! Standard serializers for common payload shapes
//!
//! - `err`: error objects, keeping `type`, `message`, `stack` and any other fields
//! - `req`: HTTP request objects, reduced to the fields worth logging
//! - `res`: HTTP response objects, reduced to status and headers

use super::serializer::Serializer;
use serde_json::{Map, Value};

const REQ_FIELDS: [&str; 6] = ["id", "method", "url", "headers", "remoteAddress", "remotePort"];
const RES_FIELDS: [&str; 2] = ["statusCode", "headers"];

/// Names accepted by [`by_name`]
pub const STANDARD_NAMES: [&str; 3] = ["err", "req", "res"];

/// Look up a standard serializer by name
pub fn by_name(name: &str) -> Option<Serializer> {
    match name {
        "err" => Some(err()),
        "req" => Some(req()),
        "res" => Some(res()),
        _ => None,
    }
}

/// Serializer for error values
pub fn err() -> Serializer {
    Serializer::new(serialize_err)
}

/// Serializer for HTTP request values
pub fn req() -> Serializer {
    Serializer::new(|value| pick(value, &REQ_FIELDS))
}

/// Serializer for HTTP response values
pub fn res() -> Serializer {
    Serializer::new(|value| pick(value, &RES_FIELDS))
}

fn serialize_err(value: &Value) -> Value {
    match value {
        Value::String(message) => {
            let mut out = Map::new();
            out.insert("type".to_string(), Value::String("Error".to_string()));
            out.insert("message".to_string(), Value::String(message.clone()));
            Value::Object(out)
        }
        Value::Object(fields) => {
            let mut out = Map::with_capacity(fields.len() + 1);
            let kind = fields
                .get("type")
                .or_else(|| fields.get("name"))
                .cloned()
                .unwrap_or_else(|| Value::String("Error".to_string()));
            out.insert("type".to_string(), kind);
            for key in ["message", "stack"] {
                if let Some(v) = fields.get(key) {
                    out.insert(key.to_string(), v.clone());
                }
            }
            for (key, v) in fields {
                if !out.contains_key(key) && key != "name" {
                    out.insert(key.clone(), v.clone());
                }
            }
            Value::Object(out)
        }
        other => other.clone(),
    }
}

fn pick(value: &Value, keys: &[&str]) -> Value {
    let Value::Object(fields) = value else {
        return value.clone();
    };
    let picked = keys
        .iter()
        .filter_map(|key| fields.get(*key).map(|v| (key.to_string(), v.clone())))
        .collect::<Map<String, Value>>();
    Value::Object(picked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_err_from_object() {
        let input = json!({
            "name": "TypeError",
            "message": "x is undefined",
            "stack": "at foo (bar.js:1:1)",
            "code": "E_UNDEF"
        });
        let out = err().apply(&input).unwrap();
        assert_eq!(
            out,
            json!({
                "type": "TypeError",
                "message": "x is undefined",
                "stack": "at foo (bar.js:1:1)",
                "code": "E_UNDEF"
            })
        );
        let keys: Vec<_> = out.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["type", "message", "stack", "code"]);
    }

    #[test]
    fn test_err_from_string() {
        let out = err().apply(&json!("disk full")).unwrap();
        assert_eq!(out, json!({"type": "Error", "message": "disk full"}));
    }

    #[test]
    fn test_req_picks_known_fields() {
        let input = json!({
            "method": "GET",
            "url": "/health",
            "headers": {"host": "localhost"},
            "body": "secret",
            "remotePort": 5432
        });
        let out = req().apply(&input).unwrap();
        assert_eq!(
            out,
            json!({
                "method": "GET",
                "url": "/health",
                "headers": {"host": "localhost"},
                "remotePort": 5432
            })
        );
    }

    #[test]
    fn test_res_and_passthrough() {
        let out = res()
            .apply(&json!({"statusCode": 200, "headers": {}, "socket": "..."}))
            .unwrap();
        assert_eq!(out, json!({"statusCode": 200, "headers": {}}));

        assert_eq!(res().apply(&json!(42)).unwrap(), json!(42));
    }

    #[test]
    fn test_by_name() {
        for name in STANDARD_NAMES {
            assert!(by_name(name).is_some(), "missing standard serializer {name}");
        }
        assert!(by_name("error").is_none());
    }
}
