//! Key identifier resolution across schema scopes.

use serde_json::Value;
use tracing::debug;

/// Turns key identifiers into field names.
///
/// The compiler only ever reads through this trait, so tests can hand it a
/// fixed table instead of real schema documents.
pub trait ReferenceResolver {
    /// Resolves every identifier to a field name, in input order.
    ///
    /// Identifiers without a match are dropped.
    fn resolve_names(&self, key_ids: &[&str]) -> Vec<String>;

    /// Resolves an identifier to the dotted path of the field it names.
    fn resolve_path(&self, key_id: &str) -> Option<String>;
}

impl<R: ReferenceResolver + ?Sized> ReferenceResolver for &R {
    fn resolve_names(&self, key_ids: &[&str]) -> Vec<String> {
        (**self).resolve_names(key_ids)
    }

    fn resolve_path(&self, key_id: &str) -> Option<String> {
        (**self).resolve_path(key_id)
    }
}

/// Document wrapper the modeling tool puts around entity fields.
const SOURCE_WRAPPER: &str = "_source";

/// The four schema documents a field can point into.
///
/// Scopes are searched in order: entity-local, internal definitions,
/// model-level definitions, external definitions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaScopes {
    pub entity: Value,
    pub internal: Value,
    pub model: Value,
    pub external: Value,
}

/// Where a key identifier was found.
#[derive(Debug, Clone, PartialEq)]
struct Located {
    name: String,
    path: Vec<String>,
}

impl SchemaScopes {
    pub fn new(entity: Value, internal: Value, model: Value, external: Value) -> Self {
        Self {
            entity,
            internal,
            model,
            external,
        }
    }

    fn scopes(&self) -> [&Value; 4] {
        [&self.entity, &self.internal, &self.model, &self.external]
    }

    fn locate(&self, key_id: &str) -> Option<Located> {
        let found = self
            .scopes()
            .into_iter()
            .find_map(|scope| locate_in(scope, key_id, &mut Vec::new()));
        if found.is_none() {
            debug!(key_id, "key identifier not found in any schema scope");
        }
        found
    }
}

impl ReferenceResolver for SchemaScopes {
    fn resolve_names(&self, key_ids: &[&str]) -> Vec<String> {
        key_ids
            .iter()
            .filter_map(|key_id| self.locate(key_id))
            .map(|located| located.name)
            .collect()
    }

    fn resolve_path(&self, key_id: &str) -> Option<String> {
        self.locate(key_id).map(|located| located.path.join("."))
    }
}

/// Depth-first search for the node whose `GUID` is `key_id`.
///
/// `trail` holds the `properties` keys leading to `node`.
fn locate_in(node: &Value, key_id: &str, trail: &mut Vec<String>) -> Option<Located> {
    let object = node.as_object()?;

    if let Some(properties) = object.get("properties").and_then(Value::as_object) {
        for (name, child) in properties {
            let is_wrapper = trail.is_empty() && name == SOURCE_WRAPPER;
            if !is_wrapper {
                trail.push(name.clone());
            }

            let found = if has_guid(child, key_id) {
                Some(Located {
                    name: name.clone(),
                    path: trail.clone(),
                })
            } else {
                locate_in(child, key_id, trail)
            };

            if !is_wrapper {
                trail.pop();
            }
            if found.is_some() {
                return found;
            }
        }
    }

    if let Some(definitions) = object.get("definitions").and_then(Value::as_object) {
        for (name, definition) in definitions {
            if has_guid(definition, key_id) {
                return Some(Located {
                    name: name.clone(),
                    path: vec![name.clone()],
                });
            }
            if let Some(found) = locate_in(definition, key_id, &mut Vec::new()) {
                return Some(found);
            }
        }
    }

    match object.get("items") {
        Some(Value::Array(candidates)) => candidates
            .iter()
            .find_map(|candidate| locate_in(candidate, key_id, trail)),
        Some(item) => locate_in(item, key_id, trail),
        None => None,
    }
}

fn has_guid(node: &Value, key_id: &str) -> bool {
    node.get("GUID").and_then(Value::as_str) == Some(key_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entity_schema() -> Value {
        json!({
            "properties": {
                "_source": {
                    "properties": {
                        "user": {
                            "GUID": "user-id",
                            "type": "object",
                            "properties": {
                                "first": { "GUID": "first-id", "type": "string" }
                            }
                        },
                        "tags": {
                            "type": "array",
                            "items": [{
                                "type": "object",
                                "properties": {
                                    "label": { "GUID": "label-id", "type": "string" }
                                }
                            }]
                        }
                    }
                }
            }
        })
    }

    #[test]
    fn test_resolve_names_in_order() {
        let scopes = SchemaScopes {
            entity: entity_schema(),
            model: json!({
                "definitions": { "address": { "GUID": "address-id", "type": "object" } }
            }),
            ..Default::default()
        };

        let names = scopes.resolve_names(&["address-id", "missing", "first-id"]);
        assert_eq!(names, vec!["address".to_string(), "first".to_string()]);
    }

    #[test]
    fn test_resolve_path_skips_source_wrapper() {
        let scopes = SchemaScopes {
            entity: entity_schema(),
            ..Default::default()
        };

        assert_eq!(scopes.resolve_path("first-id").as_deref(), Some("user.first"));
        assert_eq!(scopes.resolve_path("user-id").as_deref(), Some("user"));
    }

    #[test]
    fn test_items_add_no_path_segment() {
        let scopes = SchemaScopes {
            entity: entity_schema(),
            ..Default::default()
        };

        assert_eq!(scopes.resolve_path("label-id").as_deref(), Some("tags.label"));
    }

    #[test]
    fn test_earlier_scope_wins() {
        let scopes = SchemaScopes {
            internal: json!({ "definitions": { "inner": { "GUID": "dup" } } }),
            external: json!({ "definitions": { "outer": { "GUID": "dup" } } }),
            ..Default::default()
        };

        assert_eq!(scopes.resolve_names(&["dup"]), vec!["inner".to_string()]);
    }

    #[test]
    fn test_unresolved_path() {
        let scopes = SchemaScopes::default();
        assert_eq!(scopes.resolve_path("nope"), None);
        assert!(scopes.resolve_names(&["nope"]).is_empty());
    }
}
