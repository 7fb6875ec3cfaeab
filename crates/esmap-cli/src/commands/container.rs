use anyhow::Context;
use esmap_config::EsmapConfig;
use esmap_mapping::ContainerScriptRequest;
use tracing::debug;

use crate::util::{ScriptArgs, finish_script, read_input, write_output};

#[derive(clap::Args)]
pub struct Args {
    /// Container script request (JSON), or `-` for stdin
    pub file: String,

    #[command(flatten)]
    pub script: ScriptArgs,
}

pub fn run(args: Args, config: &EsmapConfig) -> anyhow::Result<()> {
    let contents = read_input(&args.file)?;
    let mut request: ContainerScriptRequest = serde_json::from_str(&contents)
        .with_context(|| format!("Error parsing container request {}", args.file))?;

    // Only the first model entry is ever consulted.
    let model = config.complete_model_data(&request.model());
    match request.model_data.first_mut() {
        Some(first) => *first = model,
        None => request.model_data.push(model),
    }

    let kind = args.script.script_kind(request.is_update_script, config);
    debug!(?kind, entities = request.entities.len(), "generating container script");

    let script = finish_script(request.generate(kind), &args.script)?;
    write_output(args.script.output.as_deref(), &script)
}
