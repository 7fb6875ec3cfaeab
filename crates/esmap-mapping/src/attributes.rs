//! Attributes that pass from a schema field into its mapping.
//!
//! Every attribute of a schema field is a mapping parameter unless the
//! modeling tool uses it for its own bookkeeping.

/// Schema attribute holding sub-field definitions as a raw JSON string.
///
/// Its parsed value is written to the mapping's `fields` attribute.
pub const RAW_SUB_FIELDS: &str = "stringfields";

/// Mapping attribute the raw sub-fields are parsed into.
pub const SUB_FIELDS: &str = "fields";

/// Keys the modeling tool keeps on every field node that mean nothing to the
/// search engine: identity, documentation, validation constraints and
/// relationship metadata.
pub const MODELING_METADATA: &[&str] = &[
    "GUID",
    "$ref",
    "code",
    "name",
    "title",
    "description",
    "comments",
    "isActivated",
    "required",
    "primaryKey",
    "hackoladeMeta",
    "default",
    "sample",
    "enum",
    "pattern",
    "minLength",
    "maxLength",
    "minimum",
    "maximum",
    "exclusiveMinimum",
    "exclusiveMaximum",
    "multipleOf",
    "minItems",
    "maxItems",
    "uniqueItems",
    "minProperties",
    "maxProperties",
    "additionalItems",
    "additionalProperties",
    "patternProperties",
    "dependencies",
    "definitions",
    "childType",
    "subtype",
    "foreignCollection",
    "foreignField",
    "relationshipType",
    "childRelationships",
    "parentRelationship",
    "error",
];

/// Whether a schema attribute is carried into the mapping.
pub fn is_mapping_attribute(name: &str) -> bool {
    !MODELING_METADATA.contains(&name)
}
