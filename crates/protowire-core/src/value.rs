//! Runtime values handed to the codecs.
//!
//! `Record` is the dynamic message shape: an ordered list of
//! `(field number, value)` entries keyed by the numbers declared in the
//! model, so encode order follows declaration order.

use crate::types::{Decimal, Duration, Guid, Instant};
use derive_more::From;
use serde::Serialize;

///
/// Value
///

#[remain::sorted]
#[derive(Clone, Debug, From, PartialEq, Serialize)]
pub enum Value {
    Bool(bool),
    Bytes(Vec<u8>),
    Decimal(Decimal),
    Duration(Duration),
    F32(f32),
    F64(f64),
    Guid(Guid),
    I32(i32),
    I64(i64),
    Instant(Instant),
    List(Vec<Value>),
    Map(Vec<(Value, Value)>),
    Record(Record),
    Str(String),
    U32(u32),
    U64(u64),
}

impl Value {
    /// Short type label used in diagnostics.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Bytes(_) => "bytes",
            Self::Decimal(_) => "decimal",
            Self::Duration(_) => "duration",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::Guid(_) => "guid",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::Instant(_) => "instant",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Record(_) => "record",
            Self::Str(_) => "string",
            Self::U32(_) => "u32",
            Self::U64(_) => "u64",
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

///
/// Record
///
/// Entries keep first-set order. Setting an already-present field number
/// replaces its value in place.
///

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Record {
    fields: Vec<(u32, Value)>,
}

impl Record {
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    #[must_use]
    pub fn with(mut self, number: u32, value: impl Into<Value>) -> Self {
        self.set(number, value);
        self
    }

    pub fn set(&mut self, number: u32, value: impl Into<Value>) {
        let value = value.into();

        match self.fields.iter_mut().find(|(n, _)| *n == number) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((number, value)),
        }
    }

    #[must_use]
    pub fn get(&self, number: u32) -> Option<&Value> {
        self.fields
            .iter()
            .find_map(|(n, v)| (*n == number).then_some(v))
    }

    #[must_use]
    pub fn get_mut(&mut self, number: u32) -> Option<&mut Value> {
        self.fields
            .iter_mut()
            .find_map(|(n, v)| (*n == number).then_some(v))
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &Value)> {
        self.fields.iter().map(|(n, v)| (*n, v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_keeps_first_set_order() {
        let mut record = Record::new();
        record.set(3, true);
        record.set(1, "hello");
        record.set(2, 42_i32);

        let numbers: Vec<u32> = record.iter().map(|(n, _)| n).collect();
        assert_eq!(numbers, vec![3, 1, 2]);
    }

    #[test]
    fn set_replaces_in_place() {
        let mut record = Record::new().with(1, "old").with(2, false);
        record.set(1, "new");

        assert_eq!(record.get(1), Some(&Value::Str("new".to_string())));
        assert_eq!(record.len(), 2);

        let numbers: Vec<u32> = record.iter().map(|(n, _)| n).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn missing_fields_are_none() {
        let record = Record::new().with(1, 5_u32);
        assert_eq!(record.get(9), None);
    }

    #[test]
    fn conversions_pick_the_right_variant() {
        assert_eq!(Value::from(true).label(), "bool");
        assert_eq!(Value::from("text").label(), "string");
        assert_eq!(Value::from(Instant::UNIX_EPOCH).label(), "instant");
        assert_eq!(Value::from(Duration::ZERO).label(), "duration");
        assert_eq!(Value::from(Guid::NIL).label(), "guid");
        assert_eq!(Value::from(Decimal::ZERO).label(), "decimal");
        assert_eq!(Value::from(vec![0_u8, 1]).label(), "bytes");
    }

    #[test]
    fn records_serialize_for_tooling_dumps() {
        let record = Record::new()
            .with(1, "hi")
            .with(2, 42_i32)
            .with(3, Value::List(vec![Value::Bool(true)]));

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            serde_json::json!({
                "fields": [
                    [1, { "Str": "hi" }],
                    [2, { "I32": 42 }],
                    [3, { "List": [{ "Bool": true }] }],
                ]
            })
        );
    }
}
