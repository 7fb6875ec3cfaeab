use std::path::PathBuf;

use anyhow::Context;
use esmap_mapping::Compiler;
use esmap_mapping::script::to_pretty_json;
use esmap_schema::{SchemaField, SchemaScopes};
use serde_json::Value;

use crate::util::{read_input, write_output};

#[derive(clap::Args)]
pub struct Args {
    /// Entity schema (JSON), or `-` for stdin
    pub schema: String,

    /// Definitions local to the entity
    #[arg(long)]
    pub internal: Option<String>,

    /// Definitions shared by the model
    #[arg(long)]
    pub model: Option<String>,

    /// Definitions from external libraries
    #[arg(long)]
    pub external: Option<String>,

    /// Write the field tree to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: Args) -> anyhow::Result<()> {
    let entity = read_document(&args.schema)?;
    let root: SchemaField = serde_json::from_value(entity.clone())
        .with_context(|| format!("Invalid entity schema {}", args.schema))?;

    let scopes = SchemaScopes::new(
        entity,
        read_optional(args.internal.as_deref())?,
        read_optional(args.model.as_deref())?,
        read_optional(args.external.as_deref())?,
    );
    let properties = Compiler::new(&scopes).compile_document(&root);

    write_output(args.output.as_deref(), &to_pretty_json(&properties)?)
}

fn read_document(file: &str) -> anyhow::Result<Value> {
    let contents = read_input(file)?;
    serde_json::from_str(&contents).with_context(|| format!("Error parsing JSON {file}"))
}

fn read_optional(file: Option<&str>) -> anyhow::Result<Value> {
    file.map(read_document)
        .transpose()
        .map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_scope_is_null() {
        assert_eq!(read_optional(None).unwrap(), Value::Null);
    }
}
