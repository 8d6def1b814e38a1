//! Property value type for person and relationship attributes.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A property value as stored on graph nodes and relationships.
///
/// Serialized untagged so that an assembled tree renders as plain JSON.
/// Variant order matters for deserialization: a date string is read back
/// as `String`, never as `Date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Date(NaiveDate),
}

// ============================================================================
// Accessors
// ============================================================================

impl Value {
    /// Attempt to extract as i64
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }

    /// Attempt to extract as &str
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Read a calendar year out of whatever shape the source data used.
    ///
    /// Genealogical imports store years as integers, as numeric strings
    /// ("1887") or as full dates.
    pub fn as_year(&self) -> Option<i64> {
        match self {
            Value::String(s) => s.trim().parse().ok(),
            Value::Date(d) => Some(i64::from(d.year())),
            other => other.as_int(),
        }
    }
}

// ============================================================================
// Conversions (From impls)
// ============================================================================

impl From<bool> for Value { fn from(v: bool) -> Self { Value::Bool(v) } }
impl From<i32> for Value { fn from(v: i32) -> Self { Value::Int(v as i64) } }
impl From<i64> for Value { fn from(v: i64) -> Self { Value::Int(v) } }
impl From<f64> for Value { fn from(v: f64) -> Self { Value::Float(v) } }
impl From<String> for Value { fn from(v: String) -> Self { Value::String(v) } }
impl From<&str> for Value { fn from(v: &str) -> Self { Value::String(v.to_owned()) } }
impl From<NaiveDate> for Value { fn from(v: NaiveDate) -> Self { Value::Date(v) } }
impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self { Value::List(v.into_iter().map(Into::into).collect()) }
}
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self { v.map(Into::into).unwrap_or(Value::Null) }
}

// ============================================================================
// Display
// ============================================================================

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::String(s) => write!(f, "\"{}\"", s.replace('"', "\\\"")),
            Value::List(l) => {
                write!(f, "[")?;
                for (i, v) in l.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
            Value::Map(m) => {
                write!(f, "{{")?;
                for (i, (k, v)) in m.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
            Value::Date(d) => write!(f, "{d}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_from() {
        assert_eq!(Value::from("hello"), Value::String("hello".into()));
        assert_eq!(Value::from(42), Value::Int(42));
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(None::<i64>), Value::Null);
    }

    #[test]
    fn test_year_extraction() {
        assert_eq!(Value::Int(1887).as_year(), Some(1887));
        assert_eq!(Value::Float(1901.0).as_year(), Some(1901));
        assert_eq!(Value::from(" 1920 ").as_year(), Some(1920));
        let d = NaiveDate::from_ymd_opt(1944, 6, 6).unwrap();
        assert_eq!(Value::Date(d).as_year(), Some(1944));
        assert_eq!(Value::from("unknown").as_year(), None);
        assert_eq!(Value::Float(1901.5).as_year(), None);
        assert_eq!(Value::Null.as_year(), None);
    }

    #[test]
    fn test_map_serializes_in_key_order() {
        let v = Value::Map(BTreeMap::from([
            ("place".to_string(), Value::from("Haifa")),
            ("date".to_string(), Value::from(1960)),
        ]));
        assert_eq!(serde_json::to_string(&v).unwrap(), r#"{"date":1960,"place":"Haifa"}"#);
        assert_eq!(v.to_string(), r#"{date: 1960, place: "Haifa"}"#);
    }

    #[test]
    fn test_untagged_json() {
        let v = Value::from(vec![Value::from(1), Value::from("a"), Value::Null]);
        assert_eq!(serde_json::to_string(&v).unwrap(), r#"[1,"a",null]"#);
    }
}
