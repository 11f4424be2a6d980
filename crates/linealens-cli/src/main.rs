//! LineaLens CLI - Table lineage graphs from analyzed query history
//!
//! A command-line interface for building table-level lineage graphs from a
//! pre-analyzed warehouse query log and exporting them for visualization.
//!
//! # Usage
//!
//! ```bash
//! # Build the full lineage graph and write lineage.json
//! linealens graph --input query_log.jsonl --output lineage.json
//!
//! # Everything feeding the orders table, up to three hops away
//! linealens graph --input query_log.jsonl --table orders --direction upstream --depth 3
//!
//! # Show the merged configuration
//! linealens config show
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod commands;
mod progress;

/// LineaLens - table lineage and freshness analysis
#[derive(Parser, Debug)]
#[command(name = "linealens")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOptions,
}

/// Global options available to all commands
#[derive(Args, Debug, Clone)]
struct GlobalOptions {
    /// Path to configuration file
    #[arg(long, short = 'c', global = true, env = "LINEALENS_CONFIG")]
    config: Option<PathBuf>,

    /// Profile database the lineage is scoped to
    #[arg(long, global = true, env = "LINEALENS_PROFILE_DATABASE")]
    profile_database: Option<String>,

    /// Profile schema narrowing the scope to an exact database.schema
    #[arg(long, global = true, env = "LINEALENS_PROFILE_SCHEMA")]
    profile_schema: Option<String>,

    /// Keep tables with no dependencies in the graph
    #[arg(long, global = true)]
    show_isolated_nodes: bool,

    /// Use fully qualified database.schema.table names
    #[arg(long, global = true)]
    full_table_names: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    quiet: bool,
}

impl GlobalOptions {
    /// Convert global options to config overrides
    fn to_config_overrides(&self) -> linealens_config::ConfigOverrides {
        linealens_config::ConfigOverrides {
            profile_database: self.profile_database.clone(),
            profile_schema: self.profile_schema.clone(),
            show_isolated_nodes: self.show_isolated_nodes.then_some(true),
            full_table_names: self.full_table_names.then_some(true),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the lineage graph from a query log and export it
    Graph(commands::graph::GraphArgs),

    /// View configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let log_level = if cli.global.quiet {
        Level::ERROR
    } else if cli.global.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Execute the command
    match cli.command {
        Commands::Graph(args) => commands::graph::execute(args, cli.global),
        Commands::Config(cmd) => commands::config::execute(cmd, cli.global),
    }
}
