//! Nested-mapping seeds for building configuration trees
//!
//! A seed table mirrors the shape of a parsed document: every nested
//! mapping becomes a section, every other value becomes an option.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::value::Value;

/// Marker key the `toml` deserializer uses to hand out datetimes.
const TOML_DATETIME_KEY: &str = "$__toml_private_datetime";

/// A nested mapping from names to seed values.
pub type InitTable = BTreeMap<String, InitValue>;

/// One entry of a seed table.
#[derive(Debug, Clone, PartialEq)]
pub enum InitValue {
    Value(Value),
    Table(InitTable),
}

impl InitValue {
    /// A leaf seed holding `value`.
    pub fn value(value: impl Into<Value>) -> Self {
        InitValue::Value(value.into())
    }

    /// An empty nested table, i.e. an empty section.
    pub fn table() -> Self {
        InitValue::Table(InitTable::new())
    }
}

impl From<Value> for InitValue {
    fn from(value: Value) -> Self {
        InitValue::Value(value)
    }
}

impl From<InitTable> for InitValue {
    fn from(table: InitTable) -> Self {
        InitValue::Table(table)
    }
}

struct InitValueVisitor;

impl<'de> Visitor<'de> for InitValueVisitor {
    type Value = InitValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a scalar, a list or a mapping")
    }

    fn visit_bool<E: de::Error>(self, b: bool) -> Result<InitValue, E> {
        Ok(Value::Bool(b).into())
    }

    fn visit_i64<E: de::Error>(self, i: i64) -> Result<InitValue, E> {
        Ok(Value::Integer(i).into())
    }

    fn visit_u64<E: de::Error>(self, u: u64) -> Result<InitValue, E> {
        i64::try_from(u)
            .map(|i| Value::Integer(i).into())
            .map_err(|_| E::custom(format!("integer {u} does not fit in i64")))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<InitValue, E> {
        Ok(Value::Float(v).into())
    }

    fn visit_str<E: de::Error>(self, s: &str) -> Result<InitValue, E> {
        Ok(Value::from(s).into())
    }

    fn visit_string<E: de::Error>(self, s: String) -> Result<InitValue, E> {
        Ok(Value::String(s).into())
    }

    fn visit_unit<E: de::Error>(self) -> Result<InitValue, E> {
        Ok(Value::Null.into())
    }

    fn visit_none<E: de::Error>(self) -> Result<InitValue, E> {
        Ok(Value::Null.into())
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<InitValue, D::Error> {
        InitValue::deserialize(d)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<InitValue, A::Error> {
        let list = Value::deserialize(de::value::SeqAccessDeserializer::new(seq))?;
        Ok(InitValue::Value(list))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<InitValue, A::Error> {
        let mut table = InitTable::new();
        while let Some(name) = map.next_key::<String>()? {
            // TOML datetimes arrive as a single-key map; keep them as scalars
            if name == TOML_DATETIME_KEY && table.is_empty() {
                let datetime: String = map.next_value()?;
                return match map.next_key::<String>()? {
                    None => Ok(Value::String(datetime).into()),
                    Some(extra) => Err(de::Error::custom(format!(
                        "unexpected key {extra} after datetime"
                    ))),
                };
            }
            let value: InitValue = map.next_value()?;
            table.insert(name, value);
        }
        Ok(InitValue::Table(table))
    }
}

impl<'de> Deserialize<'de> for InitValue {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        d.deserialize_any(InitValueVisitor)
    }
}
