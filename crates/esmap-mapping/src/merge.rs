//! Merging the field trees of entities that share one index.

use tracing::warn;

use crate::field::{MappingField, Properties};

/// Merges two compiled field trees.
///
/// Fields of `a` come first, in `a`'s order, followed by the fields only `b`
/// has. When both define a field:
///
/// - both objects: their `properties` are merged recursively, every other
///   attribute is taken from `a`;
/// - only `b` is an object: `b`'s mapping replaces `a`'s;
/// - otherwise `a`'s mapping is kept.
///
/// Neither input is modified.
pub fn merge_schemas(a: &Properties, b: &Properties) -> Properties {
    let mut merged = Properties::with_capacity(a.len() + b.len());

    for (name, a_field) in a {
        let field = match b.get(name) {
            None => a_field.clone(),
            Some(b_field) => merge_field(name, a_field, b_field),
        };
        merged.insert(name.clone(), field);
    }

    for (name, b_field) in b {
        if !a.contains_key(name) {
            merged.insert(name.clone(), b_field.clone());
        }
    }

    merged
}

fn merge_field(name: &str, a: &MappingField, b: &MappingField) -> MappingField {
    match (a.properties(), b.properties()) {
        (Some(a_properties), Some(b_properties)) => {
            let mut field = a.clone();
            field.set_properties(merge_schemas(a_properties, b_properties));
            field
        }
        (None, Some(_)) => {
            warn!(
                field = name,
                replaced_type = a.field_type().unwrap_or("<none>"),
                "object definition replaces a scalar definition of the same field"
            );
            b.clone()
        }
        _ => a.clone(),
    }
}

/// Left fold of [`merge_schemas`] over entity field trees, starting empty.
pub fn merge_all<I>(schemas: I) -> Properties
where
    I: IntoIterator<Item = Properties>,
{
    schemas
        .into_iter()
        .fold(Properties::new(), |merged, schema| merge_schemas(&merged, &schema))
}
