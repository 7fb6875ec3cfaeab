#![doc = include_str!("../README.md")]

pub mod attributes;
pub mod compile;
pub mod document;
mod error;
pub mod field;
pub mod mapping_type;
pub mod merge;
pub mod request;
pub mod script;

pub use compile::{Compiler, compile_field};
pub use document::{
    AliasBody, AliasDefinition, ContainerDescriptor, EntityDescriptor, MappingDocument, Mappings,
    TypeMapping,
};
pub use error::{Failure, RequestError};
pub use field::{MappingField, MappingValue, Properties};
pub use mapping_type::MappingType;
pub use merge::{merge_all, merge_schemas};
pub use request::{ContainerScriptRequest, EmbeddedJson, EntityScriptRequest};
pub use script::{ModelData, ScriptKind};
