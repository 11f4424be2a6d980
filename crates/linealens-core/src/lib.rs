//! LineaLens Core - Table lineage graph engine
//!
//! This crate provides the core functionality for table-level data lineage:
//! - Table reference qualification against a configured profile scope
//! - Incremental directed-graph mutation from an analyzed query log
//!   (writes, drops, renames)
//! - A per-table volume/freshness catalog with anomaly flagging
//! - Bounded upstream/downstream subgraph extraction for visualization
//!
//! SQL parsing is not performed here: ingestion consumes the output of an
//! external SQL-lineage analyzer, one [`QueryRecord`] per executed query.

pub mod analysis;
pub mod catalog;
pub mod context;
pub mod document;
pub mod engine;
pub mod error;
pub mod graph;
pub mod qualify;
pub mod table;

// Re-exports for convenience
pub use analysis::{QueryRecord, StatementAnalysis};
pub use catalog::{CatalogEntry, TableCatalog, VolumeSample, VOLUME_SAMPLE_WINDOW};
pub use context::{QueryContext, UPDATE_TIME_FORMAT};
pub use document::{EdgeDoc, LineageDocument, NodeDoc};
pub use engine::{
    Direction, LineageGraph, ANOMALY_NODE_COLOR, SELECTED_NODE_COLOR, SELECTED_NODE_TITLE,
};
pub use error::{LineageError, Result};
pub use graph::{DiGraph, NodeAttributes};
pub use qualify::TableQualifier;
pub use table::TableRef;
