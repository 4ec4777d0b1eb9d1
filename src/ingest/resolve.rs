//! Per-schema resolution: explicit role map, else inferred roles, else
//! synthetic sample data. The dashboard's total-function contract lives
//! here — every schema always comes back with a usable table.

use tracing::{debug, info, warn};

use super::normalize::normalize;
use super::roles::{infer_roles, ExplicitRoles, RoleMap};
use super::RawTable;
use crate::sample;
use crate::schema::{self, SchemaKind, TableSchema};
use crate::table::CanonicalTable;

/// Where a resolved table's rows came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Real upload rows. `explicit` is true when the caller-supplied role
    /// map was used rather than an inferred one.
    Uploaded { explicit: bool, dropped_rows: usize },
    /// Mapping failed, or there was no upload; synthetic placeholder rows.
    Sample,
}

impl Origin {
    pub fn is_sample(self) -> bool {
        matches!(self, Origin::Sample)
    }
}

/// One canonical table plus the provenance callers can assert on without
/// parsing log text.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub table: CanonicalTable,
    pub origin: Origin,
}

impl Resolved {
    pub fn is_sample(&self) -> bool {
        self.origin.is_sample()
    }

    /// One-line notice for the dashboard's status area.
    pub fn notice(&self) -> String {
        let kind = self.table.schema.kind;
        match self.origin {
            Origin::Uploaded {
                explicit,
                dropped_rows,
            } => {
                let via = if explicit { "explicit map" } else { "inferred map" };
                if dropped_rows > 0 {
                    format!(
                        "{}: {} rows from upload via {} ({} dropped)",
                        kind,
                        self.table.len(),
                        via,
                        dropped_rows
                    )
                } else {
                    format!("{}: {} rows from upload via {}", kind, self.table.len(), via)
                }
            }
            Origin::Sample => format!("{}: sample data ({} rows)", kind, self.table.len()),
        }
    }
}

/// The full dataset the rendering layer consumes: exactly one resolved
/// table per schema, recomputed wholesale on every refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub sales: Resolved,
    pub inventory: Resolved,
    pub workflow: Resolved,
}

impl Snapshot {
    pub fn get(&self, kind: SchemaKind) -> &Resolved {
        match kind {
            SchemaKind::Sales => &self.sales,
            SchemaKind::Inventory => &self.inventory,
            SchemaKind::Workflow => &self.workflow,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Resolved> {
        [&self.sales, &self.inventory, &self.workflow].into_iter()
    }
}

/// Resolve an optional upload, plus optional explicit role selections, into
/// one table per schema.
///
/// Never fails: every failure mode inside (unmapped columns, unusable
/// explicit map, uncoercible rows) degrades to row drops or to the sample
/// fallback for that schema alone.
pub fn resolve_dataset(raw: Option<&RawTable>, explicit: Option<&ExplicitRoles>) -> Snapshot {
    Snapshot {
        sales: resolve_schema(raw, explicit, &schema::SALES),
        inventory: resolve_schema(raw, explicit, &schema::INVENTORY),
        workflow: resolve_schema(raw, explicit, &schema::WORKFLOW),
    }
}

fn resolve_schema(
    raw: Option<&RawTable>,
    explicit: Option<&ExplicitRoles>,
    schema: &'static TableSchema,
) -> Resolved {
    // 1) caller-supplied role map, when it covers the whole schema
    if let (Some(raw_table), Some(supplied)) = (raw, explicit) {
        let roles = RoleMap::from_explicit(schema, supplied.for_schema(schema.kind));
        if roles.satisfies(schema) {
            match normalize(raw_table, &roles, schema) {
                Ok(n) => {
                    info!(
                        schema = %schema.kind,
                        rows = n.table.len(),
                        dropped = n.dropped_rows,
                        "resolved via explicit role map"
                    );
                    return Resolved {
                        table: n.table,
                        origin: Origin::Uploaded {
                            explicit: true,
                            dropped_rows: n.dropped_rows,
                        },
                    };
                }
                Err(err) => warn!(
                    schema = %schema.kind,
                    error = %err,
                    "explicit role map unusable, trying inference"
                ),
            }
        }
    }

    // 2) automatic inference over the upload headers
    if let Some(raw_table) = raw {
        let roles = infer_roles(raw_table, schema);
        if roles.satisfies(schema) {
            match normalize(raw_table, &roles, schema) {
                Ok(n) => {
                    info!(
                        schema = %schema.kind,
                        rows = n.table.len(),
                        dropped = n.dropped_rows,
                        "resolved via inferred role map"
                    );
                    return Resolved {
                        table: n.table,
                        origin: Origin::Uploaded {
                            explicit: false,
                            dropped_rows: n.dropped_rows,
                        },
                    };
                }
                Err(err) => warn!(
                    schema = %schema.kind,
                    error = %err,
                    "inferred role map unusable"
                ),
            }
        } else {
            debug!(
                schema = %schema.kind,
                resolved = roles.len(),
                required = schema.columns.len(),
                "upload does not satisfy schema"
            );
        }
    }

    // 3) synthetic fallback keeps the dashboard rendering
    info!(schema = %schema.kind, "falling back to sample data");
    Resolved {
        table: sample::sample_table(schema),
        origin: Origin::Sample,
    }
}
