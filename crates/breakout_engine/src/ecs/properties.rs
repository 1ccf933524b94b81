//! Free-form archetype properties
//!
//! Top-level fields of an archetype definition the engine has no schema for
//! (a brick's `lives`, a wall's `losing_wall` flag) are kept here so game code
//! can read them without the loader knowing about every game.

use serde_json::{Map, Value};

/// Property bag carried by archetypes and entities
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    values: Map<String, Value>,
}

impl Properties {
    /// Create an empty bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value of a property
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Integer property
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.values.get(name).and_then(Value::as_i64)
    }

    /// Numeric property
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.values.get(name).and_then(Value::as_f64)
    }

    /// Boolean property
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.values.get(name).and_then(Value::as_bool)
    }

    /// String property
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(Value::as_str)
    }

    /// Set a property, returning the previous value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(name.into(), value.into())
    }

    /// Overlay every property of `other` onto this bag
    pub fn merge(&mut self, other: &Properties) {
        for (name, value) in &other.values {
            self.values.insert(name.clone(), value.clone());
        }
    }

    /// Property names and values
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of properties
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no properties are set
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Map<String, Value>> for Properties {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}
