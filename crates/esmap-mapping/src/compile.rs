//! Schema field to mapping field compilation.

use esmap_schema::{FieldType, Items, Reference, ReferenceResolver, SchemaField};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use crate::attributes::{RAW_SUB_FIELDS, SUB_FIELDS, is_mapping_attribute};
use crate::field::{MappingField, Properties, TYPE};
use crate::mapping_type::MappingType;

/// Document wrapper holding the fields of an entity schema.
const SOURCE_WRAPPER: &str = "_source";

/// Compiles schema fields into mapping fields.
///
/// Key identifiers found in alias paths and reference attributes are turned
/// into field names through the resolver.
pub struct Compiler<'a, R: ?Sized> {
    resolver: &'a R,
}

impl<'a, R: ReferenceResolver + ?Sized> Compiler<'a, R> {
    pub fn new(resolver: &'a R) -> Self {
        Self { resolver }
    }

    /// Compiles the fields under `properties._source.properties` of an
    /// entity schema. A schema without them compiles to no fields.
    pub fn compile_document(&self, root: &SchemaField) -> Properties {
        root.properties
            .as_ref()
            .and_then(|properties| properties.get(SOURCE_WRAPPER))
            .and_then(|source| source.properties.as_ref())
            .map(|fields| self.compile_properties(fields))
            .unwrap_or_default()
    }

    pub fn compile_properties(&self, properties: &IndexMap<String, SchemaField>) -> Properties {
        properties
            .iter()
            .map(|(name, field)| (name.clone(), self.compile(field)))
            .collect()
    }

    pub fn compile(&self, field: &SchemaField) -> MappingField {
        let mapping_type = MappingType::of(field);
        let mut mapping = MappingField::new();

        if let Some(mapping_type) = &mapping_type {
            if !mapping_type.is_structural() {
                mapping.insert(TYPE, mapping_type.as_str());
            }
            if *mapping_type == MappingType::Object {
                mapping.set_properties(Properties::new());
            }
            self.copy_attributes(field, &mut mapping);
        }

        match mapping_type {
            Some(MappingType::Alias) => mapping.assign(self.alias_mapping(field)),
            Some(MappingType::Join) => mapping.assign(join_mapping(field)),
            Some(mapping_type) if mapping_type.is_opaque() => {}
            _ => {
                let is_range = field.field_type == Some(FieldType::Range);
                match (&field.properties, field.items.as_ref().and_then(Items::first)) {
                    (Some(properties), _) if !is_range => {
                        mapping.set_properties(self.compile_properties(properties));
                    }
                    // An array maps exactly like its element.
                    (_, Some(item)) => mapping.assign(self.compile(item)),
                    _ => {}
                }
            }
        }

        mapping
    }

    /// Copies the field's mapping parameters in document order.
    fn copy_attributes(&self, field: &SchemaField, mapping: &mut MappingField) {
        let attributes = field
            .attributes
            .iter()
            .filter(|(name, _)| is_mapping_attribute(name));

        for (name, value) in attributes {
            if name == RAW_SUB_FIELDS {
                match value.as_str().map(serde_json::from_str::<Value>) {
                    Some(Ok(fields)) => mapping.insert(SUB_FIELDS, fields),
                    Some(Err(err)) => debug!(%err, "skipping malformed sub-field definitions"),
                    None => debug!("skipping non-string sub-field definitions"),
                }
            } else if Reference::is_reference_list(value) {
                if let Some(resolved) = self.resolve_reference_list(value) {
                    mapping.insert(name.as_str(), resolved);
                } else {
                    debug!(attribute = %name, "no reference resolved, omitting attribute");
                }
            } else {
                mapping.insert(name.as_str(), value.clone());
            }
        }
    }

    /// A single name, or the list of names when several resolve.
    fn resolve_reference_list(&self, value: &Value) -> Option<Value> {
        let key_ids: Vec<&str> = value
            .as_array()?
            .iter()
            .filter_map(Reference::key_id_of)
            .collect();
        let mut names = self.resolver.resolve_names(&key_ids);

        match names.len() {
            0 => None,
            1 => names.pop().map(Value::String),
            _ => Some(Value::Array(names.into_iter().map(Value::String).collect())),
        }
    }

    fn alias_mapping(&self, field: &SchemaField) -> MappingField {
        let mut mapping = MappingField::new();
        let target = field
            .path
            .as_ref()
            .and_then(|path| path.first())
            .and_then(|reference| reference.key_id.as_deref());

        if let Some(key_id) = target {
            match self.resolver.resolve_path(key_id) {
                Some(path) => mapping.insert("path", Value::String(path)),
                None => debug!(key_id, "alias target not resolved"),
            }
        }
        mapping
    }
}

/// `relations` of a join field: parent name to one child name or a list.
fn join_mapping(field: &SchemaField) -> MappingField {
    let mut mapping = MappingField::new();
    let Some(relations) = &field.relations else {
        return mapping;
    };

    let mut groups = serde_json::Map::new();
    for relation in relations {
        let Some(parent) = relation.parent.as_deref().filter(|parent| !parent.is_empty()) else {
            continue;
        };
        let Some(children) = &relation.children else {
            continue;
        };

        match children.as_slice() {
            [only] => match &only.name {
                Some(name) => {
                    groups.insert(parent.to_string(), Value::String(name.clone()));
                }
                // A nameless only child leaves the parent without relations.
                None => {
                    groups.shift_remove(parent);
                }
            },
            many => {
                let names = many
                    .iter()
                    .map(|child| Value::String(child.name.clone().unwrap_or_default()))
                    .collect();
                groups.insert(parent.to_string(), Value::Array(names));
            }
        }
    }

    mapping.insert("relations", Value::Object(groups));
    mapping
}

/// Compiles one field against a resolver.
pub fn compile_field<R: ReferenceResolver + ?Sized>(
    field: &SchemaField,
    resolver: &R,
) -> MappingField {
    Compiler::new(resolver).compile(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use esmap_schema::{JoinChild, JoinRelation, SchemaScopes};
    use serde_json::json;

    fn compile_json(field: Value) -> Value {
        let field: SchemaField = serde_json::from_value(field).unwrap();
        let mapping = compile_field(&field, &SchemaScopes::default());
        serde_json::to_value(&mapping).unwrap()
    }

    #[test]
    fn test_object_always_has_properties() {
        assert_eq!(compile_json(json!({ "type": "object" })), json!({ "properties": {} }));
    }

    #[test]
    fn test_nested_object() {
        let mapping = compile_json(json!({
            "type": "object",
            "properties": {
                "name": { "type": "string", "mode": "keyword" },
                "age": { "type": "number", "mode": "integer" }
            }
        }));
        assert_eq!(
            mapping,
            json!({
                "properties": {
                    "name": { "type": "keyword" },
                    "age": { "type": "integer" }
                }
            })
        );
    }

    #[test]
    fn test_range_properties_are_not_compiled() {
        let mapping = compile_json(json!({
            "type": "range",
            "mode": "date_range",
            "properties": { "gte": { "type": "date" } }
        }));
        assert_eq!(mapping, json!({ "type": "date_range" }));
    }

    #[test]
    fn test_array_of_objects_is_an_object() {
        let mapping = compile_json(json!({
            "type": "array",
            "items": [
                { "type": "object", "properties": { "x": { "type": "number" } } },
                { "type": "string" }
            ]
        }));
        assert_eq!(mapping, json!({ "properties": { "x": { "type": "long" } } }));
    }

    #[test]
    fn test_empty_item_candidates() {
        assert_eq!(compile_json(json!({ "type": "array", "items": [] })), json!({}));
    }

    #[test]
    fn test_geo_point_skips_children() {
        let mapping = compile_json(json!({
            "type": "geo-point",
            "ignore_malformed": true,
            "properties": { "lat": { "type": "number" } }
        }));
        assert_eq!(mapping, json!({ "type": "geo_point", "ignore_malformed": true }));
    }

    #[test]
    fn test_modeling_metadata_is_dropped() {
        let mapping = compile_json(json!({
            "type": "string",
            "GUID": "abc",
            "description": "a note",
            "analyzer": "english"
        }));
        assert_eq!(mapping, json!({ "type": "text", "analyzer": "english" }));
    }

    #[test]
    fn test_raw_sub_fields() {
        let mapping = compile_json(json!({
            "type": "string",
            "stringfields": "{\"raw\": {\"type\": \"keyword\"}}"
        }));
        assert_eq!(
            mapping,
            json!({ "type": "text", "fields": { "raw": { "type": "keyword" } } })
        );

        let malformed = compile_json(json!({ "type": "string", "stringfields": "{raw" }));
        assert_eq!(malformed, json!({ "type": "text" }));
    }

    #[test]
    fn test_engine_parameters_pass_through() {
        assert_eq!(
            compile_json(json!({ "type": "string", "mode": "constant_keyword", "value": "x" })),
            json!({ "type": "constant_keyword", "value": "x" })
        );
        assert_eq!(
            compile_json(json!({
                "type": "string",
                "mode": "search_as_you_type",
                "analyzer": "english",
                "max_shingle_size": 3
            })),
            json!({ "type": "search_as_you_type", "analyzer": "english", "max_shingle_size": 3 })
        );
        assert_eq!(
            compile_json(json!({ "type": "flattened", "depth_limit": 5 })),
            json!({ "type": "flattened", "depth_limit": 5 })
        );
        assert_eq!(
            compile_json(json!({ "type": "string", "meta": { "unit": "ms" } })),
            json!({ "type": "text", "meta": { "unit": "ms" } })
        );
    }

    #[test]
    fn test_join_without_relations() {
        assert_eq!(compile_json(json!({ "type": "join" })), json!({ "type": "join" }));
    }

    #[test]
    fn test_join_skips_incomplete_relations() {
        let field = SchemaField {
            relations: Some(vec![
                JoinRelation {
                    parent: None,
                    children: Some(vec![JoinChild::new("orphan")]),
                },
                JoinRelation {
                    parent: Some("question".to_string()),
                    children: None,
                },
                JoinRelation {
                    parent: Some("post".to_string()),
                    children: Some(vec![JoinChild::default()]),
                },
                JoinRelation {
                    parent: Some("thread".to_string()),
                    children: Some(vec![JoinChild::new("reply"), JoinChild::default()]),
                },
            ]),
            ..SchemaField::new("join")
        };

        let mapping = compile_field(&field, &SchemaScopes::default());
        assert_eq!(
            serde_json::to_value(&mapping).unwrap(),
            json!({ "type": "join", "relations": { "thread": ["reply", ""] } })
        );
    }

    #[test]
    fn test_alias_without_path() {
        assert_eq!(compile_json(json!({ "type": "alias" })), json!({ "type": "alias" }));
        assert_eq!(
            compile_json(json!({ "type": "alias", "path": [] })),
            json!({ "type": "alias" })
        );
    }
}
