//! Schema field nodes as exported by the data-modeling tool.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::field_type::FieldType;

/// One node of the modeling tool's field tree.
///
/// Only the structural keys are typed. Everything else (analyzers, formats,
/// `GUID`, descriptions, ...) lands in `attributes` in document order.
///
/// `mode`, `items`, `path` and `relations` only matter to some types; a value
/// of the wrong shape reads as absent instead of failing the whole tree.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SchemaField {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,

    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub mode: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, SchemaField>>,

    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub items: Option<Items>,

    /// Target of an `alias` field.
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub path: Option<Vec<Reference>>,

    /// Parent/child groups of a `join` field.
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub relations: Option<Vec<JoinRelation>>,

    #[serde(flatten)]
    pub attributes: IndexMap<String, Value>,
}

impl SchemaField {
    pub fn new(field_type: impl Into<FieldType>) -> Self {
        Self {
            field_type: Some(field_type.into()),
            ..Default::default()
        }
    }

    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    /// The subtype refinement, ignoring an empty `mode`.
    pub fn mode(&self) -> Option<&str> {
        self.mode.as_deref().filter(|mode| !mode.is_empty())
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }
}

/// Reads an optional structural key, treating a malformed value as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match serde_json::from_value(value) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(err) => {
            debug!(%err, "ignoring malformed structural key");
            Ok(None)
        }
    }
}

/// Element definition of an array field.
///
/// The modeling tool writes either a single node or a list of candidate
/// nodes. Only the first candidate takes part in the mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Items {
    Many(Vec<SchemaField>),
    One(Box<SchemaField>),
}

impl Items {
    pub fn first(&self) -> Option<&SchemaField> {
        match self {
            Items::Many(candidates) => candidates.first(),
            Items::One(item) => Some(item),
        }
    }
}

impl From<SchemaField> for Items {
    fn from(item: SchemaField) -> Self {
        Items::One(Box::new(item))
    }
}

impl From<Vec<SchemaField>> for Items {
    fn from(candidates: Vec<SchemaField>) -> Self {
        Items::Many(candidates)
    }
}

/// A pointer to another field definition by key identifier.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "keyId", default, skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,
}

impl Reference {
    /// Extracts the key identifier of a reference record held as a raw value.
    pub fn key_id_of(value: &Value) -> Option<&str> {
        value
            .get("keyId")
            .and_then(Value::as_str)
            .filter(|key_id| !key_id.is_empty())
    }

    /// Whether an attribute value is a list of reference records.
    ///
    /// Only the first element is inspected.
    pub fn is_reference_list(value: &Value) -> bool {
        value
            .as_array()
            .and_then(|items| items.first())
            .and_then(Reference::key_id_of)
            .is_some()
    }
}

/// One parent of a `join` field and the relation names under it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JoinRelation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<JoinChild>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JoinChild {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl JoinChild {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_nested_field() {
        let field: SchemaField = serde_json::from_value(json!({
            "type": "object",
            "GUID": "a1",
            "properties": {
                "tags": {
                    "type": "array",
                    "items": [{ "type": "string", "mode": "keyword" }, { "type": "number" }]
                }
            }
        }))
        .unwrap();

        assert_eq!(field.field_type, Some(FieldType::Object));
        assert_eq!(field.attribute("GUID"), Some(&json!("a1")));

        let tags = &field.properties.as_ref().unwrap()["tags"];
        let first = tags.items.as_ref().and_then(Items::first).unwrap();
        assert_eq!(first.field_type, Some(FieldType::String));
        assert_eq!(first.mode(), Some("keyword"));
    }

    #[test]
    fn test_single_item() {
        let field: SchemaField = serde_json::from_value(json!({
            "type": "array",
            "items": { "type": "boolean" }
        }))
        .unwrap();
        let item = field.items.as_ref().and_then(Items::first).unwrap();
        assert_eq!(item.field_type, Some(FieldType::Boolean));
    }

    #[test]
    fn test_empty_mode_is_ignored() {
        let field = SchemaField::new("number").with_mode("");
        assert_eq!(field.mode(), None);
    }

    #[test]
    fn test_malformed_structural_keys_read_as_absent() {
        let field: SchemaField = serde_json::from_value(json!({
            "type": "object",
            "properties": {
                "a": {
                    "type": "string",
                    "mode": 3,
                    "relations": "x",
                    "path": { "keyId": "k" },
                    "items": "y",
                    "analyzer": "english"
                }
            }
        }))
        .unwrap();

        let a = &field.properties.as_ref().unwrap()["a"];
        assert_eq!(a.mode, None);
        assert_eq!(a.relations, None);
        assert_eq!(a.path, None);
        assert!(a.items.is_none());
        assert_eq!(a.attribute("analyzer"), Some(&json!("english")));
    }

    #[test]
    fn test_reference_list_detection() {
        assert!(Reference::is_reference_list(&json!([{ "keyId": "k1" }, {}])));
        assert!(!Reference::is_reference_list(&json!([{ "name": "x" }])));
        assert!(!Reference::is_reference_list(&json!([])));
        assert!(!Reference::is_reference_list(&json!("k1")));
    }
}
