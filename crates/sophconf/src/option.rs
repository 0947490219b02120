//! Standalone typed option holder
//!
//! A [`TypedOption`] carries a declared [`OptionType`] and casts its stored
//! value to that type on every read. Writes to [`TypedOption::value`] are
//! never validated. This is a different discipline from a typed
//! [`Config`](crate::Config) node, which infers the required type from the
//! value currently stored.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::value::Value;

/// The declared target type of a [`TypedOption`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Bool,
    Int,
    Float,
    Str,
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Bool => write!(f, "bool"),
            OptionType::Int => write!(f, "int"),
            OptionType::Float => write!(f, "float"),
            OptionType::Str => write!(f, "str"),
        }
    }
}

impl FromStr for OptionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bool" | "boolean" => Ok(OptionType::Bool),
            "int" | "integer" => Ok(OptionType::Int),
            "float" | "double" => Ok(OptionType::Float),
            "str" | "string" => Ok(OptionType::Str),
            _ => Err(format!("unknown option type: {s}")),
        }
    }
}

/// A named value read back through a declared type.
///
/// # Example
///
/// ```
/// use sophconf::{OptionType, TypedOption, Value};
///
/// let mut weight = TypedOption::new("weight", 32.1, OptionType::Int);
/// assert_eq!(weight.get().unwrap(), Value::Integer(32));
///
/// weight.value = Value::Float(43.5);
/// assert_eq!(weight.get().unwrap(), Value::Integer(43));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedOption {
    pub name: String,
    /// Stored as given; coercion happens in [`TypedOption::get`].
    pub value: Value,
    pub typ: OptionType,
}

impl TypedOption {
    /// Create a typed option. The value is not checked against `typ`.
    pub fn new(name: impl Into<String>, value: impl Into<Value>, typ: OptionType) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            typ,
        }
    }

    /// Read the stored value cast to the declared type.
    pub fn get(&self) -> Result<Value> {
        self.value.coerce(&self.name, self.typ)
    }
}
