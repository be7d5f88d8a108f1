//! Typed detail values and the coercion rules used when writing them.

use derive_more::Display;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::collections::BTreeMap;
use std::fmt::{Formatter, Result as FmtResult};

/// A typed metadata value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

/// The type of a [`Value`], without its content.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    #[display("null")]
    Null,
    #[display("boolean")]
    Boolean,
    #[display("number")]
    Number,
    #[display("string")]
    String,
    #[display("array")]
    Array,
    #[display("object")]
    Object,
}

/// A value that could not be converted to the type already stored under a
/// detail key.
#[derive(Debug, Display, Clone, PartialEq)]
#[display("expected {expected}, found {found}")]
pub struct Rejection {
    pub expected: ValueKind,
    pub found: ValueKind,
    pub value: Value,
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Converts `incoming` to whatever type `existing` already has.
    ///
    /// | existing        | String                | Number        | Boolean       | Array / Object / Null |
    /// |-----------------|-----------------------|---------------|---------------|-----------------------|
    /// | String          | as-is                 | decimal text  | `Yes` / `No`  | rejected              |
    /// | Number          | parsed, else rejected | as-is         | `1` / `0`     | rejected              |
    /// | Boolean         | yes/true, no/false    | non-zero      | as-is         | rejected              |
    /// | Array           | appended              | appended      | appended      | appended              |
    /// | Object / absent | replaces              | replaces      | replaces      | replaces              |
    pub fn coerce(existing: Option<&Value>, incoming: Value) -> Result<Value, Rejection> {
        use Value::*;
        let reject = |expected: ValueKind, value: Value| Rejection {
            expected,
            found: value.kind(),
            value,
        };
        match (existing, incoming) {
            (None | Some(Null) | Some(Object(_)), value) => Ok(value),
            (Some(Array(items)), value) => {
                let mut items = items.clone();
                items.push(value);
                Ok(Array(items))
            },

            (Some(String(_)), String(s)) => Ok(String(s)),
            (Some(String(_)), Number(n)) => Ok(String(format_number(n))),
            (Some(String(_)), Boolean(b)) => Ok(String(if b { "Yes" } else { "No" }.to_string())),
            (Some(String(_)), value @ (Array(_) | Object(_) | Null)) => Err(reject(ValueKind::String, value)),

            (Some(Number(_)), String(s)) => match parse_number(&s) {
                Some(n) => Ok(Number(n)),
                None => Err(reject(ValueKind::Number, String(s))),
            },
            (Some(Number(_)), Number(n)) => Ok(Number(n)),
            (Some(Number(_)), Boolean(b)) => Ok(Number(if b { 1.0 } else { 0.0 })),
            (Some(Number(_)), value @ (Array(_) | Object(_) | Null)) => Err(reject(ValueKind::Number, value)),

            (Some(Boolean(_)), String(s)) => match parse_boolean(&s) {
                Some(b) => Ok(Boolean(b)),
                None => Err(reject(ValueKind::Boolean, String(s))),
            },
            (Some(Boolean(_)), Number(n)) => Ok(Boolean(n != 0.0)),
            (Some(Boolean(_)), Boolean(b)) => Ok(Boolean(b)),
            (Some(Boolean(_)), value @ (Array(_) | Object(_) | Null)) => Err(reject(ValueKind::Boolean, value)),
        }
    }

    /// Converts a scalar to text using the same rules as a String detail.
    pub fn into_text(self) -> Result<String, Rejection> {
        match Self::coerce(Some(&Value::String(String::new())), self)? {
            Value::String(s) => Ok(s),
            other => Err(Rejection {
                expected: ValueKind::String,
                found: other.kind(),
                value: other,
            }),
        }
    }
}

/// Integral numbers print without a fractional part (`2010`, not `2010.0`).
fn format_number(n: f64) -> String {
    format!("{n}")
}

/// Only finite, decimal numbers count; `NaN` and `inf` are rejected.
fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn parse_boolean(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "yes" | "true" => Some(true),
        "no" | "false" => Some(false),
        _ => None,
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}
impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}
impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}
impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(f64::from(value))
    }
}
impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}
impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}
impl From<BTreeMap<String, Value>> for Value {
    fn from(value: BTreeMap<String, Value>) -> Self {
        Value::Object(value)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            // Keep whole numbers whole in the output document.
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 9.0e15 => serializer.serialize_i64(*n as i64),
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            },
            Value::Object(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            },
        }
    }
}

struct ValueVisitor;
impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("a string, number, boolean, array, object or null")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Boolean(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Number(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(Value::Number(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Number(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let mut out = BTreeMap::new();
        while let Some((key, value)) = map.next_entry::<String, Value>()? {
            out.insert(key, value);
        }
        Ok(Value::Object(out))
    }
}
impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn array() -> Value {
        Value::Array(vec![Value::from("Drama")])
    }

    fn object() -> Value {
        Value::Object(BTreeMap::from([("k".to_string(), Value::from(1))]))
    }

    #[rstest]
    // existing String
    #[case(Value::from(""), Value::from("Heat"), Some(Value::from("Heat")))]
    #[case(Value::from(""), Value::from(2.5), Some(Value::from("2.5")))]
    #[case(Value::from(""), Value::from(2010), Some(Value::from("2010")))]
    #[case(Value::from(""), Value::from(true), Some(Value::from("Yes")))]
    #[case(Value::from(""), Value::from(false), Some(Value::from("No")))]
    #[case(Value::from(""), array(), None)]
    #[case(Value::from(""), object(), None)]
    #[case(Value::from(""), Value::Null, None)]
    // existing Number
    #[case(Value::from(0), Value::from("2010"), Some(Value::from(2010)))]
    #[case(Value::from(0), Value::from(" 7.25 "), Some(Value::from(7.25)))]
    #[case(Value::from(0), Value::from("-3e2"), Some(Value::from(-300)))]
    #[case(Value::from(0), Value::from("twenty"), None)]
    #[case(Value::from(0), Value::from("NaN"), None)]
    #[case(Value::from(0), Value::from(""), None)]
    #[case(Value::from(0), Value::from(4), Some(Value::from(4)))]
    #[case(Value::from(0), Value::from(true), Some(Value::from(1)))]
    #[case(Value::from(0), Value::from(false), Some(Value::from(0)))]
    #[case(Value::from(0), array(), None)]
    #[case(Value::from(0), Value::Null, None)]
    // existing Boolean
    #[case(Value::from(false), Value::from("Yes"), Some(Value::from(true)))]
    #[case(Value::from(false), Value::from("YES"), Some(Value::from(true)))]
    #[case(Value::from(false), Value::from("True"), Some(Value::from(true)))]
    #[case(Value::from(true), Value::from("no"), Some(Value::from(false)))]
    #[case(Value::from(true), Value::from("FALSE"), Some(Value::from(false)))]
    #[case(Value::from(true), Value::from("maybe"), None)]
    #[case(Value::from(true), Value::from("1"), None)]
    #[case(Value::from(false), Value::from(3), Some(Value::from(true)))]
    #[case(Value::from(true), Value::from(0), Some(Value::from(false)))]
    #[case(Value::from(true), Value::from(false), Some(Value::from(false)))]
    #[case(Value::from(true), object(), None)]
    // existing Object and Null are replaced outright
    #[case(object(), Value::from("anything"), Some(Value::from("anything")))]
    #[case(Value::Null, array(), Some(array()))]
    fn test_coerce(#[case] existing: Value, #[case] incoming: Value, #[case] expected: Option<Value>) {
        assert_eq!(Value::coerce(Some(&existing), incoming).ok(), expected);
    }

    #[test]
    fn test_coerce_absent_replaces() {
        assert_eq!(Value::coerce(None, Value::from(5)).unwrap(), Value::from(5));
    }

    #[test]
    fn test_array_appends_any_type() {
        let mut current = array();
        for incoming in [Value::from("Crime"), Value::from(1), Value::Null, object()] {
            let before = match &current {
                Value::Array(items) => items.clone(),
                _ => unreachable!(),
            };
            current = Value::coerce(Some(&current), incoming.clone()).unwrap();
            let Value::Array(after) = &current else { unreachable!() };
            assert_eq!(after.len(), before.len() + 1);
            assert_eq!(&after[..before.len()], &before[..]);
            assert_eq!(after.last(), Some(&incoming));
        }
    }

    #[test]
    fn test_rejection_reports_kinds() {
        let rejection = Value::coerce(Some(&Value::from(true)), Value::from("maybe")).unwrap_err();
        assert_eq!(rejection.expected, ValueKind::Boolean);
        assert_eq!(rejection.found, ValueKind::String);
        assert_eq!(rejection.to_string(), "expected boolean, found string");
    }

    #[rstest]
    #[case(Value::from("Heat"), Some("Heat"))]
    #[case(Value::from(1995), Some("1995"))]
    #[case(Value::from(true), Some("Yes"))]
    #[case(Value::Null, None)]
    #[case(array(), None)]
    fn test_into_text(#[case] value: Value, #[case] expected: Option<&str>) {
        assert_eq!(value.into_text().ok().as_deref(), expected);
    }

    #[test]
    fn test_json_shape() {
        let value: Value = serde_json::from_str(r#"{"year": 2010, "tags": ["a", true, null], "rating": 8.5}"#).unwrap();
        let Value::Object(map) = &value else { panic!("expected object") };
        assert_eq!(map["year"], Value::from(2010));
        assert_eq!(map["rating"], Value::from(8.5));
        assert_eq!(map["tags"], Value::Array(vec![Value::from("a"), Value::from(true), Value::Null]));
        assert_eq!(serde_json::to_string(&value).unwrap(), r#"{"rating":8.5,"tags":["a",true,null],"year":2010}"#);
    }
}
