use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::Context;
use esmap_config::EsmapConfig;
use esmap_mapping::{Failure, RequestError, ScriptKind};
use tracing::debug;

/// Options shared by the script commands.
#[derive(clap::Args, Clone, Default)]
pub struct ScriptArgs {
    /// Emit a curl command instead of a console request
    #[arg(short, long)]
    pub update: bool,

    /// Write the script to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Report request errors as a JSON `{message, stack}` object on stderr
    #[arg(long)]
    pub json_errors: bool,
}

impl ScriptArgs {
    /// `--update` and the request's update flag force curl; otherwise the
    /// configured script kind applies.
    pub fn script_kind(&self, request_wants_update: bool, config: &EsmapConfig) -> ScriptKind {
        if self.update || request_wants_update {
            ScriptKind::Curl
        } else {
            config.script
        }
    }
}

/// Read input from file path or stdin.
/// - `-` reads from stdin
/// - anything else is a file path
pub fn read_input(file: &str) -> anyhow::Result<String> {
    if file == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Error reading from stdin")?;
        Ok(buffer)
    } else {
        fs::read_to_string(file).with_context(|| format!("Error reading file {file}"))
    }
}

pub fn write_output(output: Option<&Path>, content: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => fs::write(path, format!("{content}\n"))
            .with_context(|| format!("Error writing {}", path.display())),
        None => {
            println!("{content}");
            Ok(())
        }
    }
}

/// The explicit config file, else the nearest `Esmap.toml`, else defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<EsmapConfig> {
    if let Some(path) = path {
        return EsmapConfig::load(path)
            .with_context(|| format!("Error loading config {}", path.display()));
    }

    let cwd = std::env::current_dir().context("Error reading working directory")?;
    match EsmapConfig::load_from_dir(&cwd)? {
        Some((path, config)) => {
            debug!(path = %path.display(), "using configuration");
            Ok(config)
        }
        None => Ok(EsmapConfig::default()),
    }
}

/// Unwraps a generated script, reporting request errors as asked.
pub fn finish_script(
    result: Result<String, RequestError>,
    args: &ScriptArgs,
) -> anyhow::Result<String> {
    match result {
        Ok(script) => Ok(script),
        Err(err) if args.json_errors => {
            let failure = Failure::from(&err);
            eprintln!("{}", serde_json::to_string_pretty(&failure)?);
            std::process::exit(1);
        }
        Err(err) => Err(err).context("Error generating script"),
    }
}
