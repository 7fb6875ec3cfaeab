#![doc = include_str!("../README.md")]

pub mod field;
pub mod field_type;
pub mod resolve;

pub use field::{Items, JoinChild, JoinRelation, Reference, SchemaField};
pub use field_type::FieldType;
pub use resolve::{ReferenceResolver, SchemaScopes};
