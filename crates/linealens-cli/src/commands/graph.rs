//! Graph command - build, filter and export the lineage graph

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::{debug, info};

use linealens_core::{Direction, LineageGraph, QueryRecord};

use super::load_config;
use crate::progress;
use crate::GlobalOptions;

/// Arguments for the graph command
#[derive(Args, Debug)]
pub struct GraphArgs {
    /// Pre-analyzed query log (JSON Lines, one record per query, in query
    /// end-time order)
    #[arg(long, short = 'i')]
    input: PathBuf,

    /// Table to select a neighborhood around (whole graph when omitted)
    #[arg(long, short = 't')]
    table: Option<String>,

    /// Traversal direction for the selection
    #[arg(long, short = 'd', default_value = "both", value_parser = parse_direction)]
    direction: Direction,

    /// Maximum traversal depth (unbounded when omitted)
    #[arg(long)]
    depth: Option<usize>,

    /// Output file for the lineage document (stdout when omitted)
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

fn parse_direction(s: &str) -> Result<Direction, String> {
    s.parse()
        .map_err(|e: linealens_core::LineageError| e.to_string())
}

/// Execute the graph command
pub fn execute(args: GraphArgs, global: GlobalOptions) -> Result<()> {
    let config = load_config(&global)?;
    let records = read_query_log(&args.input)?;

    let mut lineage = LineageGraph::new(
        config.profile_database()?,
        config.profile.schema_name.clone(),
        config.graph.show_isolated_nodes,
        config.graph.full_table_names,
    );

    let pb = progress::progress_bar(records.len() as u64, "Updating lineage graph", global.quiet);
    for record in records {
        lineage.ingest_record(&record);
        if let Some(ref pb) = pb {
            pb.inc(1);
        }
    }
    progress::finish_progress(pb);
    info!(
        nodes = lineage.graph().node_count(),
        edges = lineage.graph().edge_count(),
        "lineage graph built"
    );

    if let Some(ref table) = args.table {
        lineage
            .filter_on_table(table, args.direction, args.depth)
            .context("Failed to filter the lineage graph")?;
    }

    lineage.enrich_with_catalog();
    let document = lineage.to_document();
    let json = serde_json::to_string_pretty(&document)
        .context("Failed to serialize lineage document")?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            if !global.quiet {
                println!("Wrote lineage document to {}", path.display());
            }
        }
        None => println!("{json}"),
    }

    Ok(())
}

/// Read a JSONL query log, one pre-analyzed record per line.
fn read_query_log(path: &Path) -> Result<Vec<QueryRecord>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open query log {}", path.display()))?;

    let mut records = Vec::new();
    for (lineno, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read {}", path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        let record: QueryRecord = serde_json::from_str(&line)
            .with_context(|| format!("Invalid query record at {}:{}", path.display(), lineno + 1))?;
        records.push(record);
    }
    debug!(count = records.len(), "loaded query log");
    Ok(records)
}
