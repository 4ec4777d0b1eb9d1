//! Synthetic fallback tables: fixed shape, plausible random values.
//!
//! Used whenever an upload cannot be confidently mapped onto a schema (or no
//! upload exists at all) so the dashboard always has something to render.

use chrono::{Duration, NaiveDate, Utc};
use rand::Rng;

use crate::schema::{ColumnDef, ColumnType, TableSchema};
use crate::table::{CanonicalTable, Cell};

/// Every sample table has exactly this many rows, one per calendar day,
/// ending today.
pub const SAMPLE_ROWS: usize = 5;

const TASKS: [&str; SAMPLE_ROWS] = [
    "Design review",
    "Supplier onboarding",
    "Quarterly report",
    "Site audit",
    "Campaign launch",
];
const STATUSES: [&str; 3] = ["todo", "in_progress", "done"];

/// Build one synthetic table for `schema`.
///
/// Shape is deterministic — row count, column set, the date column walking
/// the last `SAMPLE_ROWS` days — while the measures are random within
/// plausible ranges.
pub fn sample_table(schema: &'static TableSchema) -> CanonicalTable {
    let mut rng = rand::thread_rng();
    let today = Utc::now().date_naive();

    let rows = (0..SAMPLE_ROWS)
        .map(|i| {
            let date = today - Duration::days((SAMPLE_ROWS - 1 - i) as i64);
            schema
                .columns
                .iter()
                .map(|col| sample_cell(&mut rng, col, date, i))
                .collect()
        })
        .collect();

    CanonicalTable { schema, rows }
}

fn sample_cell<R: Rng>(rng: &mut R, col: &ColumnDef, date: NaiveDate, row: usize) -> Cell {
    match col.ty {
        ColumnType::Date => Cell::Date(date),
        ColumnType::Int => Cell::Int(match col.name {
            "Orders" => rng.gen_range(10..=250),
            "Customers" => rng.gen_range(5..=120),
            "Stock" => rng.gen_range(0..=500),
            _ => rng.gen_range(1..=100),
        }),
        ColumnType::Float => Cell::Float(match col.name {
            "Revenue" => round2(rng.gen_range(1_000.0..20_000.0)),
            "Hours" => round2(rng.gen_range(0.5..40.0)),
            _ => round2(rng.gen_range(0.0..100.0)),
        }),
        ColumnType::Text => Cell::Text(match col.name {
            "Sku" => format!("SKU-{:03}", rng.gen_range(1..=999)),
            "Task" => TASKS[row % TASKS.len()].to_string(),
            "Status" => STATUSES[rng.gen_range(0..STATUSES.len())].to_string(),
            _ => "sample".to_string(),
        }),
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;

    #[test]
    fn every_schema_gets_a_conformant_fixed_shape_table() {
        for s in schema::all() {
            let table = sample_table(s);
            assert_eq!(table.len(), SAMPLE_ROWS, "{} sample shape", s.kind);
            assert!(table.conforms(), "{} sample must conform", s.kind);
        }
    }

    #[test]
    fn sample_dates_walk_up_to_today() {
        let table = sample_table(&schema::SALES);
        let dates: Vec<NaiveDate> = table
            .column_values("Date")
            .map(|c| match c {
                Cell::Date(d) => *d,
                other => panic!("expected date, got {:?}", other),
            })
            .collect();

        let today = Utc::now().date_naive();
        assert_eq!(dates.last(), Some(&today));
        for pair in dates.windows(2) {
            assert_eq!(pair[1] - pair[0], Duration::days(1));
        }
    }

    #[test]
    fn measures_stay_in_plausible_ranges() {
        let table = sample_table(&schema::INVENTORY);
        for cell in table.column_values("Stock") {
            match cell {
                Cell::Int(v) => assert!((0..=500).contains(v)),
                other => panic!("expected int, got {:?}", other),
            }
        }
        for cell in table.column_values("Sku") {
            match cell {
                Cell::Text(s) => assert!(s.starts_with("SKU-")),
                other => panic!("expected text, got {:?}", other),
            }
        }
    }
}
