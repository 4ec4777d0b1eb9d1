// src/schema/types.rs

use serde::{Deserialize, Serialize};

/// The three canonical tables the dashboard renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaKind {
    Sales,
    Inventory,
    Workflow,
}

impl SchemaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SchemaKind::Sales => "sales",
            SchemaKind::Inventory => "inventory",
            SchemaKind::Workflow => "workflow",
        }
    }
}

impl std::fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cell type a canonical column requires after coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Date,
    Int,
    Float,
    Text,
}

/// A single canonical column definition.
///
/// `synonyms` are the accepted upload header names *besides* the canonical
/// name itself, which always matches. Comparison is trimmed and
/// case-insensitive (see `schema::synonyms`).
#[derive(Debug)]
pub struct ColumnDef {
    pub name: &'static str,
    pub ty: ColumnType,
    pub synonyms: &'static [&'static str],
}

/// Fixed column set for one canonical table.
#[derive(Debug)]
pub struct TableSchema {
    pub kind: SchemaKind,
    pub columns: &'static [ColumnDef],
}

impl TableSchema {
    pub fn column(&self, name: &str) -> Option<&'static ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|c| c.name)
    }
}

pub static SALES: TableSchema = TableSchema {
    kind: SchemaKind::Sales,
    columns: &[
        ColumnDef {
            name: "Date",
            ty: ColumnType::Date,
            synonyms: &["txn_date", "order_date", "day", "period", "timestamp"],
        },
        ColumnDef {
            name: "Revenue",
            ty: ColumnType::Float,
            synonyms: &["amt", "amount", "sales", "total", "turnover"],
        },
        ColumnDef {
            name: "Orders",
            ty: ColumnType::Int,
            synonyms: &["order_count", "num_orders", "transactions"],
        },
        ColumnDef {
            name: "Customers",
            ty: ColumnType::Int,
            synonyms: &["customer_count", "clients", "buyers", "unique_customers"],
        },
    ],
};

pub static INVENTORY: TableSchema = TableSchema {
    kind: SchemaKind::Inventory,
    columns: &[
        ColumnDef {
            name: "Date",
            ty: ColumnType::Date,
            synonyms: &["stock_date", "day", "recorded", "timestamp"],
        },
        ColumnDef {
            name: "Sku",
            ty: ColumnType::Text,
            synonyms: &["product", "item", "product_id", "part_no"],
        },
        ColumnDef {
            name: "Stock",
            ty: ColumnType::Int,
            synonyms: &["on_hand", "units", "quantity", "qty"],
        },
    ],
};

pub static WORKFLOW: TableSchema = TableSchema {
    kind: SchemaKind::Workflow,
    columns: &[
        ColumnDef {
            name: "Date",
            ty: ColumnType::Date,
            synonyms: &["day", "started", "created", "timestamp"],
        },
        ColumnDef {
            name: "Task",
            ty: ColumnType::Text,
            synonyms: &["name", "title", "ticket", "item"],
        },
        ColumnDef {
            name: "Status",
            ty: ColumnType::Text,
            synonyms: &["state", "stage", "phase"],
        },
        ColumnDef {
            name: "Hours",
            ty: ColumnType::Float,
            synonyms: &["effort", "time_spent", "duration"],
        },
    ],
};

/// Every canonical schema, in the order the dashboard lists them.
pub fn all() -> [&'static TableSchema; 3] {
    [&SALES, &INVENTORY, &WORKFLOW]
}

pub fn by_kind(kind: SchemaKind) -> &'static TableSchema {
    match kind {
        SchemaKind::Sales => &SALES,
        SchemaKind::Inventory => &INVENTORY,
        SchemaKind::Workflow => &WORKFLOW,
    }
}
