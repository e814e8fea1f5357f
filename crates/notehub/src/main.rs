//! notehub CLI - configuration and preflight for the notes hub site.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "notehub")]
#[command(about = "Configuration and build preflight for the notes hub site")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to notehub.toml config file
    #[arg(short, long, default_value = notehub_config::CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Use the built-in notes hub configuration instead of a config file
    #[arg(long, global = true)]
    builtin: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a config file and starter content in the current directory
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Validate the config and check assets and links
    Check,

    /// Print the resolved configuration
    Show {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Toml)]
        format: Format,
    },

    /// Write the resolved configuration as JSON for the build tool
    Export {
        /// Output file (defaults to build/notehub.config.json under the site root)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip the asset and link checks
        #[arg(long)]
        no_check: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Toml,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let source = commands::ConfigSource {
        path: cli.config,
        builtin: cli.builtin,
    };

    // Execute command
    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&source, yes)?;
        }
        Commands::Check => {
            commands::check::run(&source)?;
        }
        Commands::Show { format } => {
            commands::show::run(&source, format)?;
        }
        Commands::Export { output, no_check } => {
            commands::export::run(&source, output, !no_check)?;
        }
    }

    Ok(())
}
