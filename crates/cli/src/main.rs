//! rcs - keep every version of your text files

use anyhow::Result;
use clap::{Parser, Subcommand};
use rcs_cli::{cmd, system_config, util};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// rcs - Versioned text files with compact reverse-delta history
#[derive(Parser)]
#[command(name = "rcs")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding versioned files (overrides store.data_dir)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Config file (default: ~/.config/rcs/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Commit a new version of a file
    Put {
        /// File name inside the data directory
        name: String,
        /// Read the text from this file instead of stdin
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Commit comment
        #[arg(short, long, default_value = "")]
        message: String,
    },
    /// Print the latest version, or an older one
    Get {
        /// File name inside the data directory
        name: String,
        /// Version identifier or unique prefix
        #[arg(short, long)]
        version: Option<String>,
    },
    /// Show version history, newest first
    Log {
        /// File name inside the data directory
        name: String,
        /// Number of versions to show
        #[arg(long)]
        limit: Option<usize>,
        /// One line per version
        #[arg(long)]
        oneline: bool,
    },
    /// List versioned files
    Ls {
        /// Shell-style pattern on file names, e.g. '*.py'
        #[arg(long)]
        mask: Option<String>,
    },
    /// Check a file's version chain and every stored delta
    Verify {
        /// File name inside the data directory
        name: String,
    },
    /// Remove temp files left by interrupted commits
    Recover,
    /// Show effective configuration
    Config {
        /// Print the config file path only
        #[arg(long)]
        path: bool,
        /// Print the default configuration
        #[arg(long)]
        example: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = system_config::load(cli.config.as_deref())?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log.level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let data_dir = util::data_dir(cli.data, &config);
    tracing::debug!(data_dir = %data_dir.display(), "resolved data directory");

    match cli.command {
        Commands::Put { name, file, message } => {
            cmd::put::run(&data_dir, &name, file.as_deref(), &message)
        }
        Commands::Get { name, version } => cmd::get::run(&data_dir, &name, version.as_deref()),
        Commands::Log { name, limit, oneline } => {
            cmd::log::run(&data_dir, &name, cmd::log::LogOptions { limit, oneline })
        }
        Commands::Ls { mask } => cmd::ls::run(&data_dir, mask.as_deref()),
        Commands::Verify { name } => cmd::verify::run(&data_dir, &name),
        Commands::Recover => cmd::recover::run(&data_dir),
        Commands::Config { path, example } => {
            cmd::config::run(&config, cli.config.as_deref(), path, example)
        }
    }
}
