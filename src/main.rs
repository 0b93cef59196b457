//! # gvx CLI Entry Point
//!
//! Parses arguments with clap, sets up logging, and routes to the command
//! handlers in [`gvx::commands`].

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use tracing_subscriber::EnvFilter;

use gvx::commands;

#[derive(Parser)]
#[command(name = "gvx")]
#[command(about = "Vendor every remote import of a Go source tree", version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
struct Cli {
    /// Print debug diagnostics (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read source imports and vendor all upstream dependencies
    ///
    /// Removes everything in ./vendor/ and rebuilds the manifest from the
    /// imports of the current tree, fetching dependencies of dependencies too.
    Imports {
        /// Allow the use of insecure protocols
        #[arg(long, visible_alias = "precaire")]
        insecure: bool,
    },
    /// List vendored packages from the manifest
    List,
    /// Generate shell completions
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "gvx=debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Imports { insecure } => {
            let root = std::env::current_dir().context("Could not determine current directory")?;
            commands::imports::run_imports(&root, *insecure)
        }
        Commands::List => {
            let root = std::env::current_dir().context("Could not determine current directory")?;
            commands::list::list_vendored(&root)
        }
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let bin_name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, bin_name, &mut std::io::stdout());
            Ok(())
        }
    }
}
