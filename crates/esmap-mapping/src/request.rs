//! Script requests as exported by the modeling tool.
//!
//! Schema documents arrive either as JSON text embedded in a string or as
//! inline JSON; [`EmbeddedJson`] accepts both.

use esmap_schema::{SchemaField, SchemaScopes};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::compile::Compiler;
use crate::document::{ContainerDescriptor, EntityDescriptor, MappingDocument};
use crate::error::RequestError;
use crate::field::Properties;
use crate::merge::merge_all;
use crate::script::{ModelData, ScriptKind, render};

/// A JSON document, possibly serialized into a string.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmbeddedJson(pub Value);

impl EmbeddedJson {
    /// The document, parsing it first when it is embedded as text.
    pub fn parse(&self, what: &str) -> Result<Value, RequestError> {
        match &self.0 {
            Value::String(text) => {
                serde_json::from_str(text).map_err(|source| RequestError::MalformedJson {
                    what: what.to_string(),
                    source,
                })
            }
            other => Ok(other.clone()),
        }
    }
}

impl From<Value> for EmbeddedJson {
    fn from(value: Value) -> Self {
        EmbeddedJson(value)
    }
}

/// Script for the mapping of a single entity.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntityScriptRequest {
    pub json_schema: EmbeddedJson,
    pub internal_definitions: EmbeddedJson,
    pub model_definitions: EmbeddedJson,
    pub external_definitions: EmbeddedJson,
    pub entity_data: EntityDescriptor,
    pub container_data: ContainerDescriptor,
    pub model_data: ModelData,
    pub is_update_script: bool,
}

impl EntityScriptRequest {
    pub fn script_kind(&self) -> ScriptKind {
        script_kind(self.is_update_script)
    }

    pub fn compile(&self) -> Result<Properties, RequestError> {
        let scopes = SchemaScopes::new(
            self.json_schema.parse("jsonSchema")?,
            self.internal_definitions.parse("internalDefinitions")?,
            self.model_definitions.parse("modelDefinitions")?,
            self.external_definitions.parse("externalDefinitions")?,
        );
        compile_scope(&scopes, "jsonSchema")
    }

    pub fn mapping_document(&self) -> Result<MappingDocument, RequestError> {
        let properties = self.compile()?;
        Ok(MappingDocument::for_entity(
            &self.container_data,
            &self.entity_data,
            properties,
        ))
    }

    pub fn generate(&self, kind: ScriptKind) -> Result<String, RequestError> {
        let document = self.mapping_document()?;
        let index_name = self.container_data.index_name();
        info!(index = %index_name, ?kind, "rendering entity script");
        Ok(render(kind, &document, &self.model_data, &index_name)?)
    }
}

/// Script for an index shared by several entities.
///
/// Per-entity documents are keyed by entity id. Container and model data are
/// lists of which only the first element is used.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContainerScriptRequest {
    pub entities: Vec<String>,
    pub json_schema: IndexMap<String, EmbeddedJson>,
    pub internal_definitions: IndexMap<String, EmbeddedJson>,
    pub model_definitions: EmbeddedJson,
    pub external_definitions: EmbeddedJson,
    pub container_data: Vec<ContainerDescriptor>,
    pub model_data: Vec<ModelData>,
    pub is_update_script: bool,
}

impl ContainerScriptRequest {
    pub fn script_kind(&self) -> ScriptKind {
        script_kind(self.is_update_script)
    }

    pub fn container(&self) -> ContainerDescriptor {
        self.container_data.first().cloned().unwrap_or_default()
    }

    pub fn model(&self) -> ModelData {
        self.model_data.first().cloned().unwrap_or_default()
    }

    /// Compiles every entity and folds the results left to right.
    pub fn compile(&self) -> Result<Properties, RequestError> {
        let model = self.model_definitions.parse("modelDefinitions")?;
        let external = self.external_definitions.parse("externalDefinitions")?;

        let schemas = self
            .entities
            .iter()
            .map(|entity_id| {
                let what = format!("jsonSchema of entity {entity_id}");
                let scopes = SchemaScopes::new(
                    parse_entry(&self.json_schema, entity_id, &what)?,
                    parse_entry(
                        &self.internal_definitions,
                        entity_id,
                        &format!("internalDefinitions of entity {entity_id}"),
                    )?,
                    model.clone(),
                    external.clone(),
                );
                compile_scope(&scopes, &what)
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(entities = schemas.len(), "merging entity schemas");
        Ok(merge_all(schemas))
    }

    pub fn mapping_document(&self) -> Result<MappingDocument, RequestError> {
        let properties = self.compile()?;
        Ok(MappingDocument::for_container(&self.container(), properties))
    }

    pub fn generate(&self, kind: ScriptKind) -> Result<String, RequestError> {
        let document = self.mapping_document()?;
        let index_name = self.container().index_name();
        info!(index = %index_name, ?kind, "rendering container script");
        Ok(render(kind, &document, &self.model(), &index_name)?)
    }
}

fn script_kind(is_update_script: bool) -> ScriptKind {
    if is_update_script {
        ScriptKind::Curl
    } else {
        ScriptKind::Console
    }
}

fn parse_entry(
    documents: &IndexMap<String, EmbeddedJson>,
    entity_id: &str,
    what: &str,
) -> Result<Value, RequestError> {
    documents
        .get(entity_id)
        .map(|document| document.parse(what))
        .transpose()
        .map(Option::unwrap_or_default)
}

/// Compiles the entity schema held in the entity-local scope.
fn compile_scope(scopes: &SchemaScopes, what: &str) -> Result<Properties, RequestError> {
    if !scopes.entity.is_object() {
        return Ok(Properties::new());
    }

    let root: SchemaField =
        serde_json::from_value(scopes.entity.clone()).map_err(|source| {
            RequestError::InvalidSchema {
                what: what.to_string(),
                source,
            }
        })?;
    Ok(Compiler::new(scopes).compile_document(&root))
}
