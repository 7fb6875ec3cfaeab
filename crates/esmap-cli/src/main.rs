use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands {
    automod::dir!(pub "src/commands");
}
mod util;

#[derive(Parser)]
#[command(name = "esmap", about = "Elasticsearch mappings from data-modeling exports")]
struct Cli {
    /// Configuration file (default: nearest Esmap.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Script for the mapping of a single entity
    Entity(commands::entity::Args),
    /// Script for an index shared by several entities
    Container(commands::container::Args),
    /// Print the compiled field tree of an entity schema
    Compile(commands::compile::Args),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = util::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Entity(args) => commands::entity::run(args, &config),
        Commands::Container(args) => commands::container::run(args, &config),
        Commands::Compile(args) => commands::compile::run(args),
    }
}
