use chrono::NaiveDate;
use serde::Serialize;

use crate::schema::{ColumnType, TableSchema};

/// One typed value in a canonical table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Date(NaiveDate),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    pub fn ty(&self) -> ColumnType {
        match self {
            Cell::Date(_) => ColumnType::Date,
            Cell::Int(_) => ColumnType::Int,
            Cell::Float(_) => ColumnType::Float,
            Cell::Text(_) => ColumnType::Text,
        }
    }

    /// Numeric view for summaries; `None` for dates and text.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(v) => Some(*v as f64),
            Cell::Float(v) => Some(*v),
            Cell::Date(_) | Cell::Text(_) => None,
        }
    }
}

impl std::fmt::Display for Cell {
    /// Wire form: ISO dates, plain numerics, bare text. Round-trips through
    /// `normalize` for conforming values.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Cell::Int(v) => write!(f, "{}", v),
            Cell::Float(v) => write!(f, "{}", v),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

/// A fully-typed table conforming to one canonical schema.
///
/// Invariant: every row holds exactly one cell per schema column, each of the
/// column's declared type. `normalize` and the sample generators are the only
/// producers and both uphold this.
#[derive(Debug, Clone)]
pub struct CanonicalTable {
    pub schema: &'static TableSchema,
    pub rows: Vec<Vec<Cell>>,
}

impl CanonicalTable {
    pub fn empty(schema: &'static TableSchema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.schema.columns.iter().position(|c| c.name == name)
    }

    /// Iterate one column's cells, by canonical name.
    pub fn column_values<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Cell> {
        let idx = self.column_index(name);
        self.rows
            .iter()
            .filter_map(move |row| idx.and_then(|i| row.get(i)))
    }

    /// Check the schema-conformance invariant. Cheap, used by tests.
    pub fn conforms(&self) -> bool {
        self.rows.iter().all(|row| {
            row.len() == self.schema.columns.len()
                && row
                    .iter()
                    .zip(self.schema.columns)
                    .all(|(cell, col)| cell.ty() == col.ty)
        })
    }
}

impl PartialEq for CanonicalTable {
    fn eq(&self, other: &Self) -> bool {
        self.schema.kind == other.schema.kind && self.rows == other.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SALES;

    fn sales_row(day: u32) -> Vec<Cell> {
        vec![
            Cell::Date(NaiveDate::from_ymd_opt(2025, 1, day).unwrap()),
            Cell::Float(100.0),
            Cell::Int(3),
            Cell::Int(2),
        ]
    }

    #[test]
    fn empty_table_conforms() {
        let t = CanonicalTable::empty(&SALES);
        assert!(t.is_empty());
        assert!(t.conforms());
    }

    #[test]
    fn column_values_follow_schema_order() {
        let t = CanonicalTable {
            schema: &SALES,
            rows: vec![sales_row(1), sales_row(2)],
        };
        assert!(t.conforms());
        let revenue: Vec<_> = t.column_values("Revenue").collect();
        assert_eq!(revenue, vec![&Cell::Float(100.0), &Cell::Float(100.0)]);
        assert_eq!(t.column_values("NoSuchColumn").count(), 0);
    }

    #[test]
    fn conforms_rejects_type_drift() {
        let mut row = sales_row(1);
        row[1] = Cell::Text("oops".into());
        let t = CanonicalTable {
            schema: &SALES,
            rows: vec![row],
        };
        assert!(!t.conforms());
    }
}
