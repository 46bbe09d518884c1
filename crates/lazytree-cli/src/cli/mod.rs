//! CLI entry and dispatch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use lazytree_core::config::{self, Config};
use lazytree_core::logging;
use tokio::runtime::Runtime;

mod commands;

#[derive(Parser)]
#[command(name = "lazytree")]
#[command(version)]
#[command(about = "Browse a hierarchy as a lazily expanded tree")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Hierarchy file to display (default: config `hierarchy_file`, then the built-in sample)
    #[arg(long, global = true, value_name = "FILE")]
    data: Option<PathBuf>,

    /// Simulated load latency per toggle, in milliseconds
    #[arg(long, global = true, value_name = "MS", env = "LAZYTREE_LATENCY_MS")]
    latency_ms: Option<u64>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Print the visible sequence after expanding the given nodes
    Print {
        /// Record id to expand, in order (repeatable)
        #[arg(long = "expand", value_name = "ID")]
        expand: Vec<u32>,

        /// Print the sequence as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the built-in sample hierarchy as a hierarchy file
    Sample,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Print the config file path
    Path,
    /// Write a default config file
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // one tokio runtime for everything
    let rt = Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let Cli {
        command,
        data,
        latency_ms,
    } = cli;

    match command {
        // default to the interactive tree view
        None => {
            let config = load_config(data, latency_ms)?;
            let _guard =
                logging::init_file(&config::paths::logs_dir(), config.log_filter.as_deref())?;
            commands::view::run(&config).await
        }
        Some(Commands::Print { expand, json }) => {
            let config = load_config(data, latency_ms)?;
            logging::init_stderr(config.log_filter.as_deref())?;
            commands::print::run(&config, &expand, json).await
        }
        Some(Commands::Sample) => commands::sample::run(),
        // Config commands work even when the existing config does not parse.
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        },
    }
}

/// Loads the config file and applies the global flag overrides.
fn load_config(data: Option<PathBuf>, latency_ms: Option<u64>) -> Result<Config> {
    let mut config = Config::load().context("load config")?;
    if let Some(ms) = latency_ms {
        config.load_latency_ms = ms;
    }
    if let Some(path) = data {
        config.hierarchy_file = Some(path.display().to_string());
    }
    Ok(config)
}
