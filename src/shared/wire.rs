//! Wire Conventions
//!
//! Every backend reply carries a `status` flag and, on failure, a `message`
//! meant for direct display. The backend is loose about JSON types: ids,
//! counts and coordinates arrive either as numbers or as strings, and
//! booleans sometimes arrive as `0`/`1`. The helpers here absorb that so the
//! model structs can use plain Rust types.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The backend `status` flag. `1` and `"1"` mean success, anything else is a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusFlag(bool);

impl StatusFlag {
    pub fn is_success(self) -> bool {
        self.0
    }
}

impl<'de> Deserialize<'de> for StatusFlag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let ok = match value {
            Value::Number(n) => n.as_i64() == Some(1) || n.as_u64() == Some(1),
            Value::String(s) => s.trim() == "1",
            _ => false,
        };
        Ok(StatusFlag(ok))
    }
}

/// The part of every reply the client inspects before decoding the payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub status: StatusFlag,
    #[serde(default)]
    pub message: Option<String>,
}

/// Reply for calls that only acknowledge (mark, subscribe, delete, ...).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: Option<String>,
}

/// Identifier that the backend may send as a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId(value.to_string())
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId(value.to_string())
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(RecordId(s)),
            Value::Number(n) => Ok(RecordId(n.to_string())),
            other => Err(de::Error::custom(format!("expected id, got {other}"))),
        }
    }
}

/// Integer that may arrive as `55` or `"55"`.
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| de::Error::custom(format!("integer out of range: {n}"))),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("not an integer: {s:?}"))),
        other => Err(de::Error::custom(format!("expected integer, got {other}"))),
    }
}

/// Text that may arrive as `"300"` or `300`; missing or null reads as empty.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}

/// Non-negative count; missing, null or unparsable values read as zero.
pub fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

/// Floating point value that may be a number, a numeric string, empty or null.
pub fn lenient_f64_opt<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    })
}

/// Boolean that may be `true`, `1`, `"1"` or `"true"`. Everything else is false.
pub fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_i64() == Some(1),
        Some(Value::String(s)) => matches!(s.trim(), "1" | "true"),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(deserialize_with = "lenient_i64")]
        id: i64,
        #[serde(default, deserialize_with = "lenient_count")]
        count: u64,
        #[serde(default, deserialize_with = "lenient_f64_opt")]
        lat: Option<f64>,
        #[serde(default, deserialize_with = "lenient_bool")]
        flag: bool,
    }

    #[test]
    fn test_status_flag_accepts_number_and_string_one() {
        let a: Envelope = serde_json::from_value(json!({"status": 1})).unwrap();
        let b: Envelope = serde_json::from_value(json!({"status": "1"})).unwrap();
        assert!(a.status.is_success());
        assert!(b.status.is_success());
    }

    #[test]
    fn test_status_flag_rejects_everything_else() {
        for status in [json!(0), json!("0"), json!(true), json!(2), json!(null)] {
            let env: Envelope =
                serde_json::from_value(json!({"status": status, "message": "nope"})).unwrap();
            assert!(!env.status.is_success(), "status {status} should fail");
            assert_eq!(env.message.as_deref(), Some("nope"));
        }
    }

    #[test]
    fn test_missing_status_is_failure() {
        let env: Envelope = serde_json::from_value(json!({})).unwrap();
        assert!(!env.status.is_success());
    }

    #[test]
    fn test_lenient_fields() {
        let s: Sample = serde_json::from_value(
            json!({"id": "55", "count": "12", "lat": "7.22", "flag": 1}),
        )
        .unwrap();
        assert_eq!(s.id, 55);
        assert_eq!(s.count, 12);
        assert_eq!(s.lat, Some(7.22));
        assert!(s.flag);

        let s: Sample = serde_json::from_value(json!({"id": 3, "lat": "", "flag": "0"})).unwrap();
        assert_eq!(s.count, 0);
        assert_eq!(s.lat, None);
        assert!(!s.flag);
    }

    #[test]
    fn test_record_id_from_number_or_string() {
        let a: RecordId = serde_json::from_value(json!(42)).unwrap();
        let b: RecordId = serde_json::from_value(json!("42")).unwrap();
        assert_eq!(a, b);
        assert!(serde_json::from_value::<RecordId>(json!([1])).is_err());
    }
}
