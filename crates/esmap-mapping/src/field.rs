//! Compiled mapping field nodes.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Attribute holding the child fields of an object mapping.
pub const PROPERTIES: &str = "properties";

/// Attribute holding the mapping type.
pub const TYPE: &str = "type";

/// Field name to mapping, in document order.
pub type Properties = IndexMap<String, MappingField>;

/// Value of one attribute of a [`MappingField`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MappingValue {
    /// Child fields of an object mapping.
    Properties(Properties),
    Json(Value),
}

impl From<Properties> for MappingValue {
    fn from(properties: Properties) -> Self {
        MappingValue::Properties(properties)
    }
}

impl From<Value> for MappingValue {
    fn from(value: Value) -> Self {
        MappingValue::Json(value)
    }
}

impl From<&str> for MappingValue {
    fn from(value: &str) -> Self {
        MappingValue::Json(Value::String(value.to_string()))
    }
}

/// The mapping of one field: attribute name to value, in insertion order.
///
/// Object mappings carry `properties`; everything else carries `type`.
/// Overwriting an attribute keeps its original position.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct MappingField {
    entries: IndexMap<String, MappingValue>,
}

impl MappingField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(field_type: &str) -> Self {
        let mut field = Self::new();
        field.insert(TYPE, field_type);
        field
    }

    /// A plain JSON attribute.
    pub fn json(&self, name: &str) -> Option<&Value> {
        match self.entries.get(name)? {
            MappingValue::Json(value) => Some(value),
            MappingValue::Properties(_) => None,
        }
    }

    pub fn field_type(&self) -> Option<&str> {
        self.json(TYPE).and_then(Value::as_str)
    }

    pub fn properties(&self) -> Option<&Properties> {
        match self.entries.get(PROPERTIES)? {
            MappingValue::Properties(properties) => Some(properties),
            MappingValue::Json(_) => None,
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<MappingValue>) {
        self.entries.insert(name.into(), value.into());
    }

    pub fn set_properties(&mut self, properties: Properties) {
        self.insert(PROPERTIES, properties);
    }

    /// Copies every attribute of `other` onto `self`.
    ///
    /// Attributes already present are overwritten in place; new ones are
    /// appended in `other`'s order.
    pub fn assign(&mut self, other: MappingField) {
        self.entries.extend(other.entries);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MappingValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<'de> Deserialize<'de> for MappingField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = IndexMap::<String, Value>::deserialize(deserializer)?;
        let mut field = MappingField::new();
        for (name, value) in raw {
            if name == PROPERTIES {
                let properties: Properties =
                    serde_json::from_value(value).map_err(serde::de::Error::custom)?;
                field.set_properties(properties);
            } else {
                field.insert(name, value);
            }
        }
        Ok(field)
    }
}
