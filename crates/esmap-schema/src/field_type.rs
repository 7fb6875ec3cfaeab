//! Type tags used by the data-modeling tool.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The `type` tag of a schema field.
///
/// Tags the modeling tool spells differently from the search engine
/// (`geo-point`, `geo-shape`) keep the modeling tool's spelling here; the
/// translation happens when the field is compiled. Tags this enum does not
/// know are kept verbatim in [`FieldType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    Object,
    Array,
    String,
    Number,
    Boolean,
    Date,
    Null,
    Range,
    GeoPoint,
    GeoShape,
    Alias,
    Join,
    Completion,
    SparseVector,
    DenseVector,
    RankFeature,
    RankFeatures,
    Other(String),
}

impl FieldType {
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Object => "object",
            FieldType::Array => "array",
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Null => "null",
            FieldType::Range => "range",
            FieldType::GeoPoint => "geo-point",
            FieldType::GeoShape => "geo-shape",
            FieldType::Alias => "alias",
            FieldType::Join => "join",
            FieldType::Completion => "completion",
            FieldType::SparseVector => "sparse_vector",
            FieldType::DenseVector => "dense_vector",
            FieldType::RankFeature => "rank_feature",
            FieldType::RankFeatures => "rank_features",
            FieldType::Other(name) => name,
        }
    }
}

impl From<&str> for FieldType {
    fn from(tag: &str) -> Self {
        match tag {
            "object" => FieldType::Object,
            "array" => FieldType::Array,
            "string" => FieldType::String,
            "number" => FieldType::Number,
            "boolean" => FieldType::Boolean,
            "date" => FieldType::Date,
            "null" => FieldType::Null,
            "range" => FieldType::Range,
            "geo-point" => FieldType::GeoPoint,
            "geo-shape" => FieldType::GeoShape,
            "alias" => FieldType::Alias,
            "join" => FieldType::Join,
            "completion" => FieldType::Completion,
            "sparse_vector" => FieldType::SparseVector,
            "dense_vector" => FieldType::DenseVector,
            "rank_feature" => FieldType::RankFeature,
            "rank_features" => FieldType::RankFeatures,
            other => FieldType::Other(other.to_string()),
        }
    }
}

impl From<String> for FieldType {
    fn from(tag: String) -> Self {
        match FieldType::from(tag.as_str()) {
            FieldType::Other(_) => FieldType::Other(tag),
            known => known,
        }
    }
}

impl From<FieldType> for String {
    fn from(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
