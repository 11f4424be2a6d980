//! Table name qualification against the configured profile scope.

use crate::table::TableRef;

/// Resolves raw table references to graph identifiers.
///
/// Qualification fills in missing database/schema parts from the statement's
/// execution context, then tests the resolved table against the profile
/// scope. References outside the scope qualify to `None` and never enter the
/// graph.
#[derive(Debug, Clone)]
pub struct TableQualifier {
    profile_database: String,
    profile_schema: Option<String>,
    full_table_names: bool,
}

impl TableQualifier {
    pub fn new(
        profile_database: impl Into<String>,
        profile_schema: Option<String>,
        full_table_names: bool,
    ) -> Self {
        Self {
            profile_database: profile_database.into().to_lowercase(),
            profile_schema: profile_schema.map(|schema| schema.to_lowercase()),
            full_table_names,
        }
    }

    /// Qualify a reference using the statement's database/schema context.
    ///
    /// Returns the graph identifier (short or fully qualified, per
    /// configuration), or `None` when the resolved table falls outside the
    /// profile scope.
    pub fn qualify(
        &self,
        table: &TableRef,
        database: Option<&str>,
        schema: Option<&str>,
    ) -> Option<String> {
        let resolved = resolve_qualification(table, database, schema);
        if self.should_ignore(&resolved) {
            return None;
        }

        if self.full_table_names {
            Some(resolved.qualified_name())
        } else {
            Some(resolved.name().to_string())
        }
    }

    /// Qualify a user-selected table, with the profile itself as context.
    pub fn qualify_selection(&self, table: &TableRef) -> Option<String> {
        self.qualify(
            table,
            Some(self.profile_database.as_str()),
            self.profile_schema.as_deref(),
        )
    }

    fn should_ignore(&self, table: &TableRef) -> bool {
        match &self.profile_schema {
            // Exact scope: only tables in profile_database.profile_schema.
            Some(profile_schema) => {
                table.schema() != format!("{}.{}", self.profile_database, profile_schema)
            }
            // Database-only scope is a substring match. Loose on purpose:
            // `analytics` also matches `analytics_staging.public`, which is
            // the documented legacy behavior of this filter.
            None => !table.schema().contains(&self.profile_database),
        }
    }
}

/// Fill in the missing parts of a reference from the statement context.
///
/// An already dotted `database.schema` part is left untouched, so a fully
/// qualified reference resolves identically under any context.
fn resolve_qualification(
    table: &TableRef,
    database: Option<&str>,
    schema: Option<&str>,
) -> TableRef {
    if !table.has_schema() {
        if let (Some(database), Some(schema)) = (database, schema) {
            return table.with_schema(format!("{database}.{schema}"));
        }
        return table.clone();
    }

    if !table.schema().contains('.') {
        // Bare schema name: scope it to the queried database, or treat the
        // reference as unscoped when the database is unknown.
        return match database {
            Some(database) => table.with_schema(format!("{}.{}", database, table.schema())),
            None => table.with_schema(""),
        };
    }

    table.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qualifier() -> TableQualifier {
        TableQualifier::new("analytics", None, false)
    }

    fn full_qualifier() -> TableQualifier {
        TableQualifier::new("analytics", None, true)
    }

    #[test]
    fn test_bare_name_takes_context_schema() {
        let q = full_qualifier();
        let table = TableRef::parse("orders");
        assert_eq!(
            q.qualify(&table, Some("analytics"), Some("public")),
            Some("analytics.public.orders".to_string())
        );
    }

    #[test]
    fn test_bare_name_without_context_is_excluded() {
        let q = qualifier();
        let table = TableRef::parse("orders");
        assert_eq!(q.qualify(&table, None, None), None);
        assert_eq!(q.qualify(&table, Some("analytics"), None), None);
    }

    #[test]
    fn test_bare_schema_is_prefixed_with_database() {
        let q = full_qualifier();
        let table = TableRef::parse("public.orders");
        assert_eq!(
            q.qualify(&table, Some("analytics"), Some("ignored")),
            Some("analytics.public.orders".to_string())
        );
    }

    #[test]
    fn test_bare_schema_without_database_is_unscoped() {
        let q = qualifier();
        let table = TableRef::parse("public.orders");
        assert_eq!(q.qualify(&table, None, Some("public")), None);
    }

    #[test]
    fn test_qualification_idempotence() {
        // A fully qualified reference resolves the same under any context.
        let q = full_qualifier();
        let table = TableRef::parse("analytics.public.orders");
        let expected = Some("analytics.public.orders".to_string());
        assert_eq!(q.qualify(&table, Some("analytics"), Some("public")), expected);
        assert_eq!(q.qualify(&table, Some("other_db"), Some("other")), expected);
        assert_eq!(q.qualify(&table, None, None), expected);
    }

    #[test]
    fn test_out_of_scope_table_is_excluded() {
        let q = qualifier();
        let table = TableRef::parse("warehouse.public.orders");
        assert_eq!(q.qualify(&table, None, None), None);
    }

    #[test]
    fn test_schema_scope_requires_exact_match() {
        let q = TableQualifier::new("analytics", Some("public".to_string()), true);
        let included = TableRef::parse("analytics.public.orders");
        let excluded = TableRef::parse("analytics.staging.orders");
        assert_eq!(
            q.qualify(&included, None, None),
            Some("analytics.public.orders".to_string())
        );
        assert_eq!(q.qualify(&excluded, None, None), None);
    }

    #[test]
    fn test_database_scope_substring_over_match() {
        // Documented looseness: the database-only scope matches any schema
        // string containing the profile database name.
        let q = qualifier();
        let table = TableRef::parse("analytics_staging.public.orders");
        assert_eq!(q.qualify(&table, None, None), Some("orders".to_string()));
    }

    #[test]
    fn test_short_names_keep_last_segment_only() {
        let q = qualifier();
        let table = TableRef::parse("analytics.public.orders");
        assert_eq!(q.qualify(&table, None, None), Some("orders".to_string()));
    }

    #[test]
    fn test_case_insensitive_scope() {
        let q = TableQualifier::new("ANALYTICS", Some("PUBLIC".to_string()), false);
        let table = TableRef::parse("Analytics.Public.Orders");
        assert_eq!(q.qualify(&table, None, None), Some("orders".to_string()));
    }
}
