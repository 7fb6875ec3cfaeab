use anyhow::Context;
use esmap_config::EsmapConfig;
use esmap_mapping::EntityScriptRequest;
use tracing::debug;

use crate::util::{ScriptArgs, finish_script, read_input, write_output};

#[derive(clap::Args)]
pub struct Args {
    /// Entity script request (JSON), or `-` for stdin
    pub file: String,

    #[command(flatten)]
    pub script: ScriptArgs,
}

pub fn run(args: Args, config: &EsmapConfig) -> anyhow::Result<()> {
    let contents = read_input(&args.file)?;
    let mut request: EntityScriptRequest = serde_json::from_str(&contents)
        .with_context(|| format!("Error parsing entity request {}", args.file))?;
    request.model_data = config.complete_model_data(&request.model_data);

    let kind = args.script.script_kind(request.is_update_script, config);
    debug!(?kind, collection = ?request.entity_data.collection_name, "generating entity script");

    let script = finish_script(request.generate(kind), &args.script)?;
    write_output(args.script.output.as_deref(), &script)
}
