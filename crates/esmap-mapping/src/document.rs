//! Index-level mapping documents.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::field::Properties;

/// Index settings copied from the container descriptor when set.
pub const INDEX_SETTINGS: &[&str] = &[
    "number_of_shards",
    "number_of_replicas",
    "refresh_interval",
    "max_result_window",
    "max_inner_result_window",
    "max_rescore_window",
    "max_docvalue_fields_search",
    "max_script_fields",
    "max_ngram_diff",
    "max_shingle_diff",
    "max_refresh_listeners",
    "max_terms_count",
    "max_regex_length",
    "routing_partition_size",
    "auto_expand_replicas",
    "codec",
    "shard.check_on_startup",
    "analysis",
];

/// An entity whose fields form one mapping type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic: Option<Value>,
}

impl EntityDescriptor {
    /// Lower-cased collection name, empty when unnamed.
    pub fn container_key(&self) -> String {
        self.collection_name
            .as_deref()
            .unwrap_or_default()
            .to_lowercase()
    }
}

/// An index: its name, settings and aliases.
///
/// Settings are read from the descriptor's other keys; only the names in
/// [`INDEX_SETTINGS`] are used.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContainerDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aliases: Option<Vec<AliasDefinition>>,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl ContainerDescriptor {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Lower-cased index name, empty when unnamed.
    pub fn index_name(&self) -> String {
        self.name.as_deref().unwrap_or_default().to_lowercase()
    }

    pub fn settings(&self) -> Option<serde_json::Map<String, Value>> {
        let settings: serde_json::Map<String, Value> = INDEX_SETTINGS
            .iter()
            .filter_map(|&name| {
                self.extra
                    .get(name)
                    .filter(|value| is_truthy(value))
                    .map(|value| (name.to_string(), value.clone()))
            })
            .collect();
        (!settings.is_empty()).then_some(settings)
    }

    pub fn alias_bodies(&self) -> Option<IndexMap<String, AliasBody>> {
        let aliases: IndexMap<String, AliasBody> = self
            .aliases
            .iter()
            .flatten()
            .filter_map(|alias| {
                let name = alias.name.as_deref().filter(|name| !name.is_empty())?;
                Some((name.to_string(), alias.body()))
            })
            .collect();
        (!aliases.is_empty()).then_some(aliases)
    }
}

/// One alias as entered in the modeling tool.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AliasDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Term filter as a raw JSON string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing: Option<Value>,
}

impl AliasDefinition {
    fn body(&self) -> AliasBody {
        let filter = self
            .filter
            .as_deref()
            .filter(|filter| !filter.is_empty())
            .map(|filter| {
                let term = serde_json::from_str(filter).unwrap_or_else(|err| {
                    debug!(%err, alias = ?self.name, "alias filter is not valid JSON");
                    Value::String(String::new())
                });
                AliasFilter { term }
            });

        AliasBody {
            filter,
            routing: self.routing.clone().filter(is_truthy),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AliasBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<AliasFilter>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub routing: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AliasFilter {
    pub term: Value,
}

/// Mapping of one type: its dynamic mode and fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TypeMapping {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic: Option<Value>,

    pub properties: Properties,
}

impl TypeMapping {
    pub fn new(properties: Properties) -> Self {
        Self {
            dynamic: None,
            properties,
        }
    }

    pub fn for_entity(entity: &EntityDescriptor, properties: Properties) -> Self {
        Self {
            dynamic: entity.dynamic.clone().filter(is_truthy),
            properties,
        }
    }
}

/// The `mappings` section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Mappings {
    /// Keyed by container key: `{ "users": { "properties": ... } }`.
    Typed(IndexMap<String, TypeMapping>),
    /// Typeless index: `{ "properties": ... }`.
    Typeless(TypeMapping),
}

/// The document sent to the search engine to create an index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappingDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<serde_json::Map<String, Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub aliases: Option<IndexMap<String, AliasBody>>,

    pub mappings: Mappings,
}

impl MappingDocument {
    pub fn new(container: &ContainerDescriptor, mappings: Mappings) -> Self {
        Self {
            settings: container.settings(),
            aliases: container.alias_bodies(),
            mappings,
        }
    }

    /// Document for one entity, keyed by its container key.
    pub fn for_entity(
        container: &ContainerDescriptor,
        entity: &EntityDescriptor,
        properties: Properties,
    ) -> Self {
        let mut typed = IndexMap::new();
        typed.insert(
            entity.container_key(),
            TypeMapping::for_entity(entity, properties),
        );
        Self::new(container, Mappings::Typed(typed))
    }

    /// Typeless document for an index shared by several entities.
    pub fn for_container(container: &ContainerDescriptor, properties: Properties) -> Self {
        Self::new(container, Mappings::Typeless(TypeMapping::new(properties)))
    }
}

/// `false`, `null`, `0` and `""` count as unset.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
