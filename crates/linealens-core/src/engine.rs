//! The lineage graph engine: ingestion, selection and catalog overlay.

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::analysis::{QueryRecord, StatementAnalysis};
use crate::catalog::{TableCatalog, VolumeSample};
use crate::context::QueryContext;
use crate::document::LineageDocument;
use crate::error::{LineageError, Result};
use crate::graph::DiGraph;
use crate::qualify::TableQualifier;
use crate::table::TableRef;

/// Highlight color of the selected table.
pub const SELECTED_NODE_COLOR: &str = "#0925C7";
/// Marker prepended to the selected table's title.
pub const SELECTED_NODE_TITLE: &str = "Selected table<br/>";
/// Highlight color of tables whose last written volume is anomalously low.
pub const ANOMALY_NODE_COLOR: &str = "red";

const LOW_VOLUME_WARNING: &str = r#"<div style="font-family:arial;color:tomato;font-size:110%;"><strong>Warning - last update volume is too low<br/><br/></strong></div>"#;

/// Traversal direction of a lineage selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Upstream,
    Downstream,
    Both,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Upstream => "upstream",
            Direction::Downstream => "downstream",
            Direction::Both => "both",
        }
    }
}

impl FromStr for Direction {
    type Err = LineageError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "upstream" => Ok(Direction::Upstream),
            "downstream" => Ok(Direction::Downstream),
            "both" => Ok(Direction::Both),
            other => Err(LineageError::InvalidDirection(other.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Directed dependency graph among tables, built incrementally from a
/// time-ordered, pre-analyzed query log.
///
/// The engine owns the graph, the per-table catalog and the qualifier;
/// everything runs on the caller's thread and nothing is shared.
///
/// ## Example
///
/// ```ignore
/// use linealens_core::{Direction, LineageGraph};
///
/// let mut lineage = LineageGraph::new("analytics", None, false, false);
/// lineage.ingest(records);
/// lineage.filter_on_table("orders", Direction::Upstream, Some(3))?;
/// lineage.enrich_with_catalog();
/// let document = lineage.to_document();
/// ```
#[derive(Debug, Clone)]
pub struct LineageGraph {
    graph: DiGraph,
    catalog: TableCatalog,
    qualifier: TableQualifier,
    show_isolated_nodes: bool,
}

impl LineageGraph {
    pub fn new(
        profile_database_name: impl Into<String>,
        profile_schema_name: Option<String>,
        show_isolated_nodes: bool,
        full_table_names: bool,
    ) -> Self {
        Self {
            graph: DiGraph::new(),
            catalog: TableCatalog::new(),
            qualifier: TableQualifier::new(
                profile_database_name,
                profile_schema_name,
                full_table_names,
            ),
            show_isolated_nodes,
        }
    }

    pub fn graph(&self) -> &DiGraph {
        &self.graph
    }

    pub fn catalog(&self) -> &TableCatalog {
        &self.catalog
    }

    // ------------------------------------------------------------------------
    // Ingestion
    // ------------------------------------------------------------------------

    /// Load an ordered query log into the graph.
    ///
    /// Records whose analysis failed are skipped one by one, never fatal to
    /// the batch. The caller is responsible for supplying records in query
    /// end-time order.
    pub fn ingest<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = QueryRecord>,
    {
        let mut loaded = 0usize;
        let mut skipped = 0usize;
        for record in records {
            if self.ingest_record(&record) {
                loaded += 1;
            } else {
                skipped += 1;
            }
        }
        debug!(loaded, skipped, "finished updating lineage graph");
    }

    /// Apply one query record to the graph.
    ///
    /// Returns `false` when the record was skipped because its analysis
    /// failed.
    pub fn ingest_record(&mut self, record: &QueryRecord) -> bool {
        if let Some(error) = &record.analysis_error {
            debug!(error = %error, "skipping query that failed analysis");
            return false;
        }
        for statement in &record.statements {
            self.apply_statement(statement, &record.context);
        }
        true
    }

    fn apply_statement(&mut self, statement: &StatementAnalysis, context: &QueryContext) {
        let database = context.queried_database.as_deref();
        let schema = context.queried_schema.as_deref();

        for dropped in &statement.dropped {
            if let Some(node) = self.qualifier.qualify(dropped, database, schema) {
                self.drop_table(&node);
            }
        }

        for (old, new) in &statement.renamed {
            let old = self.qualifier.qualify(old, database, schema);
            let new = self.qualifier.qualify(new, database, schema);
            if let (Some(old), Some(new)) = (old, new) {
                self.rename_table(&old, &new);
            }
        }

        // CTEs show up in the read set marked as intermediates; they are not
        // real tables and never become vertices.
        let intermediates: HashSet<&TableRef> = statement.intermediates.iter().collect();
        let sources: BTreeSet<String> = statement
            .reads
            .iter()
            .filter(|read| !intermediates.contains(read))
            .filter_map(|read| self.qualifier.qualify(read, database, schema))
            .collect();
        let targets: BTreeSet<String> = statement
            .writes
            .iter()
            .filter_map(|write| self.qualifier.qualify(write, database, schema))
            .collect();

        self.add_nodes_and_edges(&sources, &targets, context);
    }

    /// Remove a dropped table, then prune direct former neighbors the
    /// removal left isolated. One pass over direct neighbors only; pruning
    /// does not cascade.
    fn drop_table(&mut self, node: &str) {
        let Some(neighbors) = self.graph.remove_node(node) else {
            return;
        };
        debug!(table = node, "removed dropped table from the graph");

        if !self.show_isolated_nodes {
            for neighbor in &neighbors {
                if self.graph.contains_node(neighbor) && self.graph.degree(neighbor) == 0 {
                    self.graph.remove_node(neighbor);
                }
            }
        }

        self.catalog.remove(node);
    }

    fn rename_table(&mut self, old: &str, new: &str) {
        if !self.graph.contains_node(old) {
            return;
        }
        self.graph.rename_node(old, new);
        self.catalog.rename(old, new);
        debug!(old, new, "renamed table");
    }

    fn add_nodes_and_edges(
        &mut self,
        sources: &BTreeSet<String>,
        targets: &BTreeSet<String>,
        context: &QueryContext,
    ) {
        if sources.is_empty() && targets.is_empty() {
            return;
        }

        if targets.is_empty() {
            // Reads with no write target only matter when isolated vertices
            // are shown; sources alone never get attributes.
            if self.show_isolated_nodes {
                for source in sources {
                    self.graph.add_node(source.clone());
                }
            }
        } else if sources.is_empty() {
            if self.show_isolated_nodes {
                for target in targets {
                    self.record_target(target, context);
                }
            }
        } else {
            for source in sources {
                self.graph.add_node(source.clone());
            }
            for target in targets {
                self.record_target(target, context);
            }
            for source in sources {
                for target in targets {
                    self.graph.add_edge(source.clone(), target.clone());
                }
            }
        }
    }

    /// Add a written table, overwrite its display title and append to its
    /// catalog history.
    fn record_target(&mut self, target: &str, context: &QueryContext) {
        self.graph.add_node(target);
        self.graph.set_title(target, context.to_html());
        self.catalog.record(target, context);
    }

    // ------------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------------

    /// Replace the held graph with the bounded neighborhood of a selected
    /// table and highlight the selection.
    ///
    /// The table name is qualified against the profile scope; a name that
    /// does not resolve is a configuration error naming the input. Meant to
    /// run once, after ingestion completes.
    pub fn filter_on_table(
        &mut self,
        table: &str,
        direction: Direction,
        depth: Option<usize>,
    ) -> Result<()> {
        let selected = self
            .qualifier
            .qualify_selection(&TableRef::parse(table))
            .ok_or_else(|| LineageError::UnresolvedTable(table.to_string()))?;
        debug!(table = %selected, direction = %direction, ?depth, "filtering lineage graph");

        self.graph = match direction {
            Direction::Downstream => self.downstream_graph(&selected, depth),
            Direction::Upstream => self.upstream_graph(&selected, depth),
            Direction::Both => self
                .upstream_graph(&selected, depth)
                .union(&self.downstream_graph(&selected, depth)),
        };

        self.mark_selected(&selected);
        Ok(())
    }

    fn downstream_graph(&self, root: &str, depth: Option<usize>) -> DiGraph {
        self.graph.bfs_tree(root, depth)
    }

    /// Upstream is a BFS on the reversed graph, reversed back afterwards.
    fn upstream_graph(&self, root: &str, depth: Option<usize>) -> DiGraph {
        self.graph.reversed().bfs_tree(root, depth).reversed()
    }

    fn mark_selected(&mut self, selected: &str) {
        if self.graph.contains_node(selected) {
            let title = self.graph.title(selected).unwrap_or("").to_string();
            self.graph.set_color(selected, SELECTED_NODE_COLOR);
            self.graph
                .set_title(selected, format!("{SELECTED_NODE_TITLE}{title}"));
        }
    }

    // ------------------------------------------------------------------------
    // Catalog Overlay
    // ------------------------------------------------------------------------

    /// Rebuild node titles from the catalog and flag anomalously low
    /// last-write volumes.
    ///
    /// Read-only over the catalog; run once right before handing the graph
    /// to the renderer.
    pub fn enrich_with_catalog(&mut self) {
        let nodes: Vec<String> = self.graph.iter_nodes().map(str::to_string).collect();
        for node in nodes {
            let Some(entry) = self.catalog.get(&node) else {
                continue;
            };
            let detail = entry.last_detail().unwrap_or("").to_string();
            let history = render_volume_history(entry.recent_samples());
            if entry.is_anomalous() {
                debug!(table = %node, "last update volume is anomalously low");
                self.graph.set_color(&node, ANOMALY_NODE_COLOR);
                self.graph
                    .set_title(&node, format!("{LOW_VOLUME_WARNING}{detail}{history}"));
            } else {
                self.graph.set_title(&node, format!("{detail}{history}"));
            }
        }
    }

    /// Export the held graph for the external renderer.
    pub fn to_document(&self) -> LineageDocument {
        LineageDocument::from_graph(&self.graph)
    }
}

/// Render the trailing samples as a plain list.
///
/// Chart images are the renderer's job; the samples only travel with the
/// title so the freshness panel has something to show without one.
fn render_volume_history(samples: &[VolumeSample]) -> String {
    if samples.is_empty() {
        return String::new();
    }
    let mut block = String::from(
        r#"<br/><div style="font-family:arial;color:DarkSlateGrey;font-size:110%;"><strong>Freshness &amp; volume<br/></strong>"#,
    );
    for sample in samples {
        let time = sample.recorded_at.as_deref().unwrap_or("unknown");
        block.push_str(&format!("{} - {} rows<br/>", time, sample.volume));
    }
    block.push_str("</div>");
    block
}
