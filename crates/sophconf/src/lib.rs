//! Sophisticated configuration objects.
//!
//! A [`Config`] is a tree of nodes. Each node holds options (leaf
//! [`Value`]s) and sections (child nodes) and may restrict plain
//! assignment through its [`Policy`]:
//!
//! - **protected** nodes refuse to create new options via [`Config::set`]
//! - **typed** nodes refuse to change the runtime type of an existing option
//!
//! [`Config::create_option`] and [`Config::create_section`] bypass both
//! checks. Policies belong to a single node and are never inherited.
//!
//! [`TypedOption`] is a separate holder that casts its value to a declared
//! [`OptionType`] on every read.
//!
//! # Example
//!
//! ```
//! use sophconf::{Config, InitTable, InitValue, Policy, Value};
//!
//! let mut seed = InitTable::new();
//! seed.insert("option1".into(), InitValue::value(5));
//! seed.insert("section1".into(), InitValue::table());
//!
//! let mut c = Config::from_table_with_policy(seed, Policy::typed());
//! assert!(c.set("option1", "five").is_err());
//! c.section_mut("section1").unwrap().set("anything", 1.5).unwrap();
//! assert_eq!(c.lookup("section1.anything").unwrap().as_value(), Some(&Value::Float(1.5)));
//! ```
//!
//! # Threading
//!
//! A tree has no interior mutability: writes need `&mut Config`. Share a
//! tree across threads behind a `Mutex` or `RwLock` of the caller's choice.

pub mod config;
pub mod error;
pub mod option;
pub mod seed;
pub mod value;

pub use config::{Config, Entry, Policy};
pub use error::{Error, Lookup, Result};
pub use option::{OptionType, TypedOption};
pub use seed::{InitTable, InitValue};
pub use value::{Value, ValueKind};

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_config_is_send_and_sync() {
        assert_send_sync::<Config>();
        assert_send_sync::<TypedOption>();
    }
}
