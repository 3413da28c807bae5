use derive_more::{Constructor, Display};
use uuid::Uuid;

use crate::cluster::Consistency;

/// A query with optional per-statement overrides. Values and row decoding
/// belong to the driver; this layer only routes statements and results.
#[derive(Clone, Debug, Display, Eq, PartialEq)]
#[display("{query}")]
pub struct Statement {
    query: String,
    consistency: Option<Consistency>,
}

impl Statement {
    pub fn new(query: impl Into<String>) -> Self {
        Statement {
            query: query.into(),
            consistency: None,
        }
    }

    /// Overrides the consistency level for this statement only.
    pub fn with_consistency(mut self, consistency: Consistency) -> Self {
        self.consistency = Some(consistency);
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn consistency(&self) -> Option<Consistency> {
        self.consistency
    }
}

impl From<&str> for Statement {
    fn from(query: &str) -> Self {
        Statement::new(query)
    }
}

impl From<String> for Statement {
    fn from(query: String) -> Self {
        Statement::new(query)
    }
}

/// Server-side prepared statement handle produced by the driver.
#[derive(Clone, Constructor, Debug, Eq, PartialEq)]
pub struct PreparedStatement {
    id: Uuid,
    query: String,
}

impl PreparedStatement {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

/// Rows returned by a query.
#[derive(Clone, Constructor, Debug, Default, Eq, PartialEq)]
pub struct ResultSet {
    rows: Vec<Row>,
}

impl ResultSet {
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A single row of driver-decoded column values.
#[derive(Clone, Constructor, Debug, Default, Eq, PartialEq)]
pub struct Row {
    columns: Vec<String>,
}

impl Row {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}
