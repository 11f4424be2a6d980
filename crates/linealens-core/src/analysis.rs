//! Input boundary to the external SQL-lineage analyzer.
//!
//! The engine never parses SQL itself. Ingestion consumes [`QueryRecord`]s:
//! the analyzer's structured result for one executed query, paired with the
//! query's execution context. Records deserialize from JSON Lines, one
//! record per line, in query end-time order.

use serde::Deserialize;

use crate::context::QueryContext;
use crate::table::TableRef;

/// The analyzer's output for a single SQL statement.
///
/// A query may contain several statements; each gets its own analysis.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StatementAnalysis {
    /// Tables dropped by the statement.
    pub dropped: Vec<TableRef>,
    /// `(old, new)` rename pairs.
    pub renamed: Vec<(TableRef, TableRef)>,
    /// Tables read by the statement.
    pub reads: Vec<TableRef>,
    /// Common-table-expression names the analyzer marked as intermediate.
    /// These show up in the read set but are not real tables.
    pub intermediates: Vec<TableRef>,
    /// Tables written by the statement.
    pub writes: Vec<TableRef>,
}

/// One pre-analyzed query of the history log.
///
/// A query the analyzer could not parse carries `analysis_error` instead of
/// statements; ingestion skips such records without aborting the batch.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QueryRecord {
    pub statements: Vec<StatementAnalysis>,
    pub analysis_error: Option<String>,
    pub context: QueryContext,
}

impl QueryRecord {
    /// A successfully analyzed query.
    pub fn analyzed(statements: Vec<StatementAnalysis>, context: QueryContext) -> Self {
        Self {
            statements,
            analysis_error: None,
            context,
        }
    }

    /// A query the analyzer failed on.
    pub fn failed(error: impl Into<String>, context: QueryContext) -> Self {
        Self {
            statements: Vec::new(),
            analysis_error: Some(error.into()),
            context,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_deserializes_from_query_log_json() {
        let raw = r#"{
            "statements": [{
                "reads": ["analytics.public.raw_orders", "cte_orders"],
                "intermediates": ["cte_orders"],
                "writes": ["analytics.public.orders"]
            }],
            "context": {
                "queried_database": "analytics",
                "queried_schema": "public",
                "query_type": "insert",
                "query_volume": 1200,
                "query_time": "2022-03-01T10:21:05",
                "user_name": "etl",
                "role_name": "loader"
            }
        }"#;

        let record: QueryRecord = serde_json::from_str(raw).unwrap();
        assert!(record.analysis_error.is_none());
        assert_eq!(record.statements.len(), 1);

        let statement = &record.statements[0];
        assert_eq!(statement.reads.len(), 2);
        assert_eq!(statement.intermediates, vec![TableRef::parse("cte_orders")]);
        assert_eq!(
            statement.writes,
            vec![TableRef::parse("analytics.public.orders")]
        );
        assert!(statement.dropped.is_empty());
        assert_eq!(record.context.query_volume, Some(1200));
    }

    #[test]
    fn test_rename_pairs_deserialize_from_arrays() {
        let raw = r#"{"statements": [{"renamed": [["public.old_orders", "public.orders"]]}]}"#;
        let record: QueryRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(
            record.statements[0].renamed,
            vec![(
                TableRef::parse("public.old_orders"),
                TableRef::parse("public.orders")
            )]
        );
    }

    #[test]
    fn test_failed_record_keeps_error() {
        let raw = r#"{"analysis_error": "unexpected token at line 3"}"#;
        let record: QueryRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(
            record.analysis_error.as_deref(),
            Some("unexpected token at line 3")
        );
        assert!(record.statements.is_empty());
    }
}
