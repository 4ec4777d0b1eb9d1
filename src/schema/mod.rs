pub mod synonyms;
pub mod types;

pub use types::{all, by_kind, ColumnDef, ColumnType, SchemaKind, TableSchema};
pub use types::{INVENTORY, SALES, WORKFLOW};
