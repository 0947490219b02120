//! The configuration node
//!
//! A [`Config`] holds options (leaf values) and sections (child nodes) in a
//! single name-keyed map, so a name can never be both. Reads look for an
//! option first and a section second. Writes through [`Config::set`] are
//! gated by the node's [`Policy`].

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Lookup, Result};
use crate::seed::{InitTable, InitValue};
use crate::value::Value;

/// Write policy of a single node. Fixed at construction and never inherited
/// by child sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Policy {
    /// Forbid creating new options through [`Config::set`].
    pub protected: bool,
    /// Require [`Config::set`] to keep the runtime type of an existing option.
    pub typed: bool,
}

impl Policy {
    pub fn protected() -> Self {
        Self {
            protected: true,
            typed: false,
        }
    }

    pub fn typed() -> Self {
        Self {
            protected: false,
            typed: true,
        }
    }

    pub fn strict() -> Self {
        Self {
            protected: true,
            typed: true,
        }
    }
}

/// What a name resolves to within a node.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Option(Value),
    Section(Config),
}

impl Entry {
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Entry::Option(value) => Some(value),
            Entry::Section(_) => None,
        }
    }

    pub fn as_section(&self) -> Option<&Config> {
        match self {
            Entry::Section(section) => Some(section),
            Entry::Option(_) => None,
        }
    }

    pub fn is_section(&self) -> bool {
        matches!(self, Entry::Section(_))
    }
}

/// A node of a configuration tree.
///
/// # Example
///
/// ```
/// use sophconf::{Config, Error, Value};
///
/// let mut c = Config::new();
/// assert!(matches!(c.get("verbose"), Err(Error::NotFound { .. })));
///
/// c.create_option("verbose", false);
/// c.set("verbose", true).unwrap();
/// assert_eq!(c.option("verbose").unwrap(), &Value::Bool(true));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    entries: BTreeMap<String, Entry>,
    policy: Policy,
}

impl Config {
    /// Create an empty, unprotected, untyped node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty node with the given policy.
    pub fn with_policy(policy: Policy) -> Self {
        Self {
            entries: BTreeMap::new(),
            policy,
        }
    }

    /// Build an unprotected, untyped tree from a nested mapping.
    pub fn from_table(table: InitTable) -> Self {
        Self::from_table_with_policy(table, Policy::default())
    }

    /// Build a tree from a nested mapping; `policy` applies to the root only.
    ///
    /// Nested tables become sections with the default policy.
    pub fn from_table_with_policy(table: InitTable, policy: Policy) -> Self {
        let mut config = Self::with_policy(policy);
        config.seed(table);
        config
    }

    fn seed(&mut self, table: InitTable) {
        for (name, value) in table {
            let entry = match value {
                InitValue::Value(value) => Entry::Option(value),
                InitValue::Table(nested) => Entry::Section(Config::from_table(nested)),
            };
            self.entries.insert(name, entry);
        }
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    pub fn is_protected(&self) -> bool {
        self.policy.protected
    }

    pub fn is_typed(&self) -> bool {
        self.policy.typed
    }

    /// Resolve `name` to an option value or a section.
    pub fn get(&self, name: &str) -> Result<&Entry> {
        tracing::trace!(name, "Config::get");
        self.entries
            .get(name)
            .ok_or_else(|| Error::not_found(name, Lookup::Any))
    }

    /// Read an option value. Sections do not count.
    pub fn option(&self, name: &str) -> Result<&Value> {
        self.entries
            .get(name)
            .and_then(Entry::as_value)
            .ok_or_else(|| Error::not_found(name, Lookup::Option))
    }

    /// Borrow a child section.
    pub fn section(&self, name: &str) -> Result<&Config> {
        self.entries
            .get(name)
            .and_then(Entry::as_section)
            .ok_or_else(|| Error::not_found(name, Lookup::Section))
    }

    /// Mutably borrow a child section. Its own policy governs writes into it.
    pub fn section_mut(&mut self, name: &str) -> Result<&mut Config> {
        match self.entries.get_mut(name) {
            Some(Entry::Section(section)) => Ok(section),
            _ => Err(Error::not_found(name, Lookup::Section)),
        }
    }

    /// Assign `value` to `name` under this node's policy.
    ///
    /// - An existing option is overwritten; on a typed node the new value
    ///   must have the same kind as the stored one.
    /// - An unknown name creates a new option unless the node is protected.
    /// - A section is never overwritten.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let typed = self.policy.typed;

        match self.entries.get_mut(name) {
            Some(Entry::Option(current)) => {
                if typed && current.kind() != value.kind() {
                    return Err(Error::TypeMismatch {
                        name: name.to_string(),
                        expected: current.kind(),
                        found: value.kind(),
                    });
                }
                tracing::trace!(name, "Config::set overwrite");
                *current = value;
                Ok(())
            }
            Some(Entry::Section(_)) => Err(Error::SectionImmutable {
                name: name.to_string(),
            }),
            None => {
                if self.policy.protected {
                    return Err(Error::CreationForbidden {
                        name: name.to_string(),
                    });
                }
                self.create_option(name, value);
                Ok(())
            }
        }
    }

    /// Insert or overwrite an option, bypassing the node's policy.
    ///
    /// Replaces a section of the same name.
    pub fn create_option(&mut self, name: &str, value: impl Into<Value>) {
        let previous = self
            .entries
            .insert(name.to_string(), Entry::Option(value.into()));
        if let Some(Entry::Section(_)) = previous {
            tracing::debug!(name, "Section replaced by option");
        }
    }

    /// Insert a fresh section, bypassing the node's policy.
    ///
    /// Any existing entry of the same name is dropped; the new section has
    /// the default policy. Reach it afterwards through [`Config::section_mut`].
    pub fn create_section(&mut self, name: &str, init_values: Option<InitTable>) {
        let section = init_values.map_or_else(Config::new, Config::from_table);
        if self
            .entries
            .insert(name.to_string(), Entry::Section(section))
            .is_some()
        {
            tracing::debug!(name, "Replaced existing entry with new section");
        }
    }

    /// Remove an option and return its value.
    pub fn remove_option(&mut self, name: &str) -> Result<Value> {
        if !self.has_option(name) {
            return Err(Error::not_found(name, Lookup::Option));
        }
        tracing::debug!(name, "Removing option");
        match self.entries.remove(name) {
            Some(Entry::Option(value)) => Ok(value),
            _ => Err(Error::not_found(name, Lookup::Option)),
        }
    }

    /// Remove a section and return it.
    pub fn remove_section(&mut self, name: &str) -> Result<Config> {
        if !self.has_section(name) {
            return Err(Error::not_found(name, Lookup::Section));
        }
        tracing::debug!(name, "Removing section");
        match self.entries.remove(name) {
            Some(Entry::Section(section)) => Ok(section),
            _ => Err(Error::not_found(name, Lookup::Section)),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn has_option(&self, name: &str) -> bool {
        matches!(self.entries.get(name), Some(Entry::Option(_)))
    }

    pub fn has_section(&self, name: &str) -> bool {
        matches!(self.entries.get(name), Some(Entry::Section(_)))
    }

    /// Number of options and sections directly held by this node.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a dotted path such as `section1.option2`.
    ///
    /// Every segment but the last must name a section.
    pub fn lookup(&self, path: &str) -> Result<&Entry> {
        let (parents, leaf) = match path.rsplit_once('.') {
            Some((parents, leaf)) => (Some(parents), leaf),
            None => (None, path),
        };
        let mut node = self;
        for segment in parents.into_iter().flat_map(|p| p.split('.')) {
            node = node.section(segment)?;
        }
        node.get(leaf)
    }

    /// Mutably resolve a dotted path of sections.
    pub fn lookup_section_mut(&mut self, path: &str) -> Result<&mut Config> {
        let mut node = self;
        for segment in path.split('.') {
            node = node.section_mut(segment)?;
        }
        Ok(node)
    }

    /// All entries of this node in name order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// The options of this node in name order.
    pub fn options(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .filter_map(|(name, entry)| entry.as_value().map(|value| (name.as_str(), value)))
    }

    /// The child sections of this node in name order.
    pub fn sections(&self) -> impl Iterator<Item = (&str, &Config)> {
        self.entries
            .iter()
            .filter_map(|(name, entry)| entry.as_section().map(|section| (name.as_str(), section)))
    }

    /// Every option of the tree keyed by its dotted path.
    ///
    /// Options of a node precede those of its sections.
    pub fn flatten(&self) -> Vec<(String, &Value)> {
        let mut out = Vec::new();
        self.flatten_into("", &mut out);
        out
    }

    fn flatten_into<'a>(&'a self, prefix: &str, out: &mut Vec<(String, &'a Value)>) {
        for (name, value) in self.options() {
            out.push((join_path(prefix, name), value));
        }
        for (name, section) in self.sections() {
            section.flatten_into(&join_path(prefix, name), out);
        }
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

impl Serialize for Config {
    /// Options first, then sections, so table-oriented formats never see a
    /// plain key after a sub-table.
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in self.options() {
            map.serialize_entry(name, value)?;
        }
        for (name, section) in self.sections() {
            map.serialize_entry(name, section)?;
        }
        map.end()
    }
}

struct ConfigVisitor;

impl<'de> Visitor<'de> for ConfigVisitor {
    type Value = Config;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a mapping of options and sections")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Config, A::Error> {
        let mut table = InitTable::new();
        while let Some((name, value)) = map.next_entry::<String, InitValue>()? {
            table.insert(name, value);
        }
        Ok(Config::from_table(table))
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Config, E> {
        Ok(Config::new())
    }
}

impl<'de> Deserialize<'de> for Config {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        d.deserialize_map(ConfigVisitor)
    }
}
