//! Typed normalization of a mapped upload into one canonical table.

use anyhow::{anyhow, Result};
use tracing::{debug, warn};

use super::{clean_str, date_parser, roles::RoleMap, RawTable};
use crate::schema::{ColumnType, TableSchema};
use crate::table::{CanonicalTable, Cell};

/// Output of `normalize`: the conforming table plus how many source rows
/// were dropped for failing coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub table: CanonicalTable,
    pub dropped_rows: usize,
}

/// Rename mapped source columns to canonical names and coerce every cell to
/// its column's type.
///
/// Requires `roles` to bind each column of `schema` to a column present in
/// `raw`; `resolve_dataset` checks satisfaction before calling. A row with
/// any uncoercible cell is dropped whole — no partial-row nulls — and the
/// drop count is reported alongside the table.
pub fn normalize(
    raw: &RawTable,
    roles: &RoleMap,
    schema: &'static TableSchema,
) -> Result<Normalized> {
    // resolve source column indexes up front so row handling is a plain scan
    let mut indexes = Vec::with_capacity(schema.columns.len());
    for col in schema.columns {
        let source = roles.source_for(col.name).ok_or_else(|| {
            anyhow!("role map for {} leaves `{}` unbound", schema.kind, col.name)
        })?;
        let idx = raw.column_index(source).ok_or_else(|| {
            anyhow!(
                "{}: mapped column `{}` not present in upload",
                schema.kind,
                source
            )
        })?;
        indexes.push((idx, col.ty));
    }

    let mut rows = Vec::with_capacity(raw.rows.len());
    let mut dropped = 0usize;
    'row: for raw_row in &raw.rows {
        let mut out = Vec::with_capacity(indexes.len());
        for &(idx, ty) in &indexes {
            let cell = raw_row.get(idx).map(String::as_str).unwrap_or("");
            match coerce(cell, ty) {
                Some(value) => out.push(value),
                None => {
                    dropped += 1;
                    continue 'row;
                }
            }
        }
        rows.push(out);
    }

    if dropped > 0 {
        warn!(
            schema = %schema.kind,
            dropped,
            kept = rows.len(),
            "dropped rows failing coercion"
        );
    } else {
        debug!(schema = %schema.kind, rows = rows.len(), "normalized upload");
    }

    Ok(Normalized {
        table: CanonicalTable { schema, rows },
        dropped_rows: dropped,
    })
}

/// Coerce one raw cell. Empty after trim/unquote is never valid.
fn coerce(raw: &str, ty: ColumnType) -> Option<Cell> {
    let v = clean_str(raw);
    if v.is_empty() {
        return None;
    }
    match ty {
        ColumnType::Date => date_parser::parse_date(&v).map(Cell::Date),
        ColumnType::Int => v.parse::<i64>().ok().map(Cell::Int),
        ColumnType::Float => v.parse::<f64>().ok().map(Cell::Float),
        ColumnType::Text => Some(Cell::Text(v)),
    }
}
