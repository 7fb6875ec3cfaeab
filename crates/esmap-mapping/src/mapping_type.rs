//! Effective mapping types.

use std::fmt;

use esmap_schema::{FieldType, SchemaField};

/// The type a field ends up with in the index mapping.
///
/// Variants exist for every type the compiler treats specially; plain scalar
/// types (`keyword`, `integer`, `date_range`, ...) are [`MappingType::Named`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MappingType {
    Object,
    Array,
    Alias,
    Join,
    Completion,
    SparseVector,
    DenseVector,
    GeoShape,
    GeoPoint,
    RankFeature,
    RankFeatures,
    Long,
    Text,
    IntegerRange,
    Named(String),
}

impl MappingType {
    /// Effective type of a schema field.
    ///
    /// | input type | effective type              |
    /// |------------|-----------------------------|
    /// | geo-shape  | `geo_shape`                 |
    /// | geo-point  | `geo_point`                 |
    /// | number     | mode, else `long`           |
    /// | string     | mode, else `text`           |
    /// | range      | mode, else `integer_range`  |
    /// | null       | `long`                      |
    /// | other      | the input type verbatim     |
    pub fn of(field: &SchemaField) -> Option<Self> {
        let field_type = field.field_type.as_ref()?;
        let mode_or = |default: MappingType| {
            field
                .mode()
                .map(MappingType::from_name)
                .unwrap_or(default)
        };

        Some(match field_type {
            FieldType::GeoShape => MappingType::GeoShape,
            FieldType::GeoPoint => MappingType::GeoPoint,
            FieldType::Number => mode_or(MappingType::Long),
            FieldType::String => mode_or(MappingType::Text),
            FieldType::Range => mode_or(MappingType::IntegerRange),
            FieldType::Null => MappingType::Long,
            other => MappingType::from_name(other.as_str()),
        })
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "object" => MappingType::Object,
            "array" => MappingType::Array,
            "alias" => MappingType::Alias,
            "join" => MappingType::Join,
            "completion" => MappingType::Completion,
            "sparse_vector" => MappingType::SparseVector,
            "dense_vector" => MappingType::DenseVector,
            "geo_shape" => MappingType::GeoShape,
            "geo_point" => MappingType::GeoPoint,
            "rank_feature" => MappingType::RankFeature,
            "rank_features" => MappingType::RankFeatures,
            "long" => MappingType::Long,
            "text" => MappingType::Text,
            "integer_range" => MappingType::IntegerRange,
            other => MappingType::Named(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            MappingType::Object => "object",
            MappingType::Array => "array",
            MappingType::Alias => "alias",
            MappingType::Join => "join",
            MappingType::Completion => "completion",
            MappingType::SparseVector => "sparse_vector",
            MappingType::DenseVector => "dense_vector",
            MappingType::GeoShape => "geo_shape",
            MappingType::GeoPoint => "geo_point",
            MappingType::RankFeature => "rank_feature",
            MappingType::RankFeatures => "rank_features",
            MappingType::Long => "long",
            MappingType::Text => "text",
            MappingType::IntegerRange => "integer_range",
            MappingType::Named(name) => name,
        }
    }

    /// Objects and arrays carry no `type` attribute of their own.
    pub fn is_structural(&self) -> bool {
        matches!(self, MappingType::Object | MappingType::Array)
    }

    /// Types whose mapping is complete after attribute copy.
    pub fn is_opaque(&self) -> bool {
        matches!(
            self,
            MappingType::Completion
                | MappingType::SparseVector
                | MappingType::DenseVector
                | MappingType::GeoShape
                | MappingType::GeoPoint
                | MappingType::RankFeature
                | MappingType::RankFeatures
        )
    }
}

impl fmt::Display for MappingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
