//! dashfeed — the data side of a KPI dashboard.
//!
//! Ingests an uploaded (or fetched) delimited file, maps its columns onto
//! the canonical Sales/Inventory/Workflow schemas, coerces cell types, and
//! always returns a full set of well-formed tables — real where mapping
//! succeeded, synthetic placeholders otherwise.

pub mod ingest;
pub mod refresh;
pub mod sample;
pub mod schema;
pub mod source;
pub mod summary;
pub mod table;

pub use ingest::resolve::{resolve_dataset, Origin, Resolved, Snapshot};
pub use ingest::roles::{infer_roles, ExplicitRoles, RoleMap};
pub use ingest::{read_csv, read_csv_path, RawTable};
pub use table::{CanonicalTable, Cell};
