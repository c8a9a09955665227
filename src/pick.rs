//! Field extraction helpers for the loosely-typed feed payloads. Both wire
//! families mix numbers, numeric strings and empty strings freely, so every
//! accessor here coerces rather than trusting the JSON type.

use serde_json::Value;

pub fn pick_str(value: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(v) = value.get(*key) {
            if let Some(s) = as_string(v) {
                return Some(s);
            }
        }
    }
    None
}

pub fn pick_i64(value: &Value, keys: &[&str]) -> Option<i64> {
    for key in keys {
        if let Some(v) = value.get(*key) {
            if let Some(num) = as_i64(v) {
                return Some(num);
            }
        }
    }
    None
}

pub fn pick_f64(value: &Value, keys: &[&str]) -> Option<f64> {
    for key in keys {
        if let Some(v) = value.get(*key) {
            if let Some(num) = v.as_f64() {
                return Some(num);
            }
            if let Some(s) = v.as_str() {
                if let Ok(num) = s.trim().parse::<f64>() {
                    return Some(num);
                }
            }
        }
    }
    None
}

pub fn pick_bool(value: &Value, keys: &[&str]) -> Option<bool> {
    for key in keys {
        if let Some(v) = value.get(*key) {
            match v {
                Value::Bool(b) => return Some(*b),
                Value::Number(n) => {
                    if let Some(num) = n.as_i64() {
                        return Some(num != 0);
                    }
                }
                Value::String(s) => match s.trim().to_lowercase().as_str() {
                    "true" | "1" => return Some(true),
                    "false" | "0" => return Some(false),
                    _ => {}
                },
                _ => {}
            }
        }
    }
    None
}

/// Returns the named sub-object if it is a non-empty JSON object. Feeds
/// often emit `""` or `[]` in place of a missing participant record.
pub fn sub_object<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    let v = value.get(key)?;
    match v {
        Value::Object(map) if !map.is_empty() => Some(v),
        _ => None,
    }
}

fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    }
}
