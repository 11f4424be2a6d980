//! Raw table references as produced by SQL statement analysis.

use std::fmt;

use serde::Deserialize;

/// A possibly unqualified table reference extracted from a statement.
///
/// The schema part may be empty, a bare schema name, or a dotted
/// `database.schema` pair. Identifiers are normalized to lowercase on
/// construction so that references differing only in case resolve to the
/// same graph vertex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub struct TableRef {
    schema: String,
    name: String,
}

impl TableRef {
    /// Create a reference from an explicit schema part and simple name.
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into().to_lowercase(),
            name: name.into().to_lowercase(),
        }
    }

    /// Parse a dotted reference: `table`, `schema.table` or
    /// `database.schema.table`. Everything before the last dot becomes the
    /// schema part.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().rsplit_once('.') {
            Some((schema, name)) => Self::new(schema, name),
            None => Self::new("", raw.trim()),
        }
    }

    /// The schema part, possibly empty, possibly `database.schema`.
    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// The simple table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_schema(&self) -> bool {
        !self.schema.is_empty()
    }

    /// A copy of this reference under a different schema part.
    pub(crate) fn with_schema(&self, schema: impl Into<String>) -> Self {
        Self::new(schema, self.name.clone())
    }

    /// The dotted name, without a leading dot when the schema part is empty.
    pub fn qualified_name(&self) -> String {
        if self.schema.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.schema, self.name)
        }
    }
}

impl From<String> for TableRef {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<&str> for TableRef {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_name() {
        let table = TableRef::parse("orders");
        assert_eq!(table.schema(), "");
        assert_eq!(table.name(), "orders");
        assert!(!table.has_schema());
    }

    #[test]
    fn test_parse_schema_and_name() {
        let table = TableRef::parse("public.orders");
        assert_eq!(table.schema(), "public");
        assert_eq!(table.name(), "orders");
    }

    #[test]
    fn test_parse_fully_qualified() {
        let table = TableRef::parse("analytics.public.orders");
        assert_eq!(table.schema(), "analytics.public");
        assert_eq!(table.name(), "orders");
        assert_eq!(table.qualified_name(), "analytics.public.orders");
    }

    #[test]
    fn test_identifiers_are_lowercased() {
        let table = TableRef::parse("ANALYTICS.Public.Orders");
        assert_eq!(table.qualified_name(), "analytics.public.orders");
        assert_eq!(table, TableRef::parse("analytics.public.orders"));
    }

    #[test]
    fn test_display_matches_qualified_name() {
        assert_eq!(TableRef::parse("a.b.c").to_string(), "a.b.c");
        assert_eq!(TableRef::parse("c").to_string(), "c");
    }

    #[test]
    fn test_from_string_for_serde() {
        let table: TableRef = String::from("Public.Orders").into();
        assert_eq!(table, TableRef::new("public", "orders"));
    }
}
