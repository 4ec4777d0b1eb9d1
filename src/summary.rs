//! Descriptive statistics over a canonical table, feeding the CLI status
//! output. Numeric columns only; dates and text are skipped.

use crate::schema::SchemaKind;
use crate::table::{CanonicalTable, Cell};

/// Min/max/mean of one numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStats {
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableSummary {
    pub kind: SchemaKind,
    pub rows: usize,
    pub numeric: Vec<ColumnStats>,
}

pub fn summarize(table: &CanonicalTable) -> TableSummary {
    let mut numeric = Vec::new();
    for col in table.schema.columns {
        let values: Vec<f64> = table
            .column_values(col.name)
            .filter_map(Cell::as_f64)
            .collect();
        if values.is_empty() {
            continue;
        }
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        numeric.push(ColumnStats {
            name: col.name,
            min,
            max,
            mean,
        });
    }
    TableSummary {
        kind: table.schema.kind,
        rows: table.len(),
        numeric,
    }
}
