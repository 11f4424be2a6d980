//! Error types for the lineage engine.

use thiserror::Error;

/// Result type for lineage operations.
pub type Result<T> = std::result::Result<T, LineageError>;

/// Errors surfaced by the lineage engine.
///
/// Both variants are configuration errors: they abort the selection that
/// raised them and echo the offending input. Ingestion itself has no fatal
/// errors; queries that failed analysis are skipped one by one.
#[derive(Debug, Error)]
pub enum LineageError {
    /// A selected table name does not resolve against the profile scope.
    #[error(
        "could not resolve table name '{0}', please make sure to specify a table \
         that exists in the configured profile database"
    )]
    UnresolvedTable(String),

    /// An unrecognized traversal direction was supplied.
    #[error("direction must be one of upstream|downstream|both, got '{0}' instead")]
    InvalidDirection(String),
}
