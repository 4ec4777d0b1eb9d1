//! Role maps: which upload column plays which canonical column.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::warn;

use super::RawTable;
use crate::schema::{synonyms, SchemaKind, TableSchema};

/// Bindings from canonical column names to source headers, for one schema.
///
/// Partial maps are valid — inference binds what it can and leaves the rest
/// unbound. Only `satisfies` gates whether normalization may run.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleMap {
    kind: SchemaKind,
    bindings: BTreeMap<&'static str, String>,
}

impl RoleMap {
    pub fn empty(kind: SchemaKind) -> Self {
        Self {
            kind,
            bindings: BTreeMap::new(),
        }
    }

    pub fn kind(&self) -> SchemaKind {
        self.kind
    }

    pub fn bind(&mut self, canonical: &'static str, source: impl Into<String>) {
        self.bindings.insert(canonical, source.into());
    }

    pub fn source_for(&self, canonical: &str) -> Option<&str> {
        self.bindings.get(canonical).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// True only when every column of `schema` is bound.
    pub fn satisfies(&self, schema: &TableSchema) -> bool {
        schema
            .columns
            .iter()
            .all(|c| self.bindings.contains_key(c.name))
    }

    /// Validate a user-supplied canonical→source map against `schema`.
    ///
    /// Canonical keys follow the same matching policy as headers (trimmed,
    /// case-insensitive). Keys naming no canonical column are dropped with a
    /// warning rather than failing the upload.
    pub fn from_explicit(
        schema: &'static TableSchema,
        supplied: &BTreeMap<String, String>,
    ) -> Self {
        let mut roles = Self::empty(schema.kind);
        for (canonical, source) in supplied {
            let want = synonyms::normalize(canonical);
            match schema
                .columns
                .iter()
                .find(|c| synonyms::normalize(c.name) == want)
            {
                Some(col) => roles.bind(col.name, source.clone()),
                None => warn!(
                    schema = %schema.kind,
                    column = %canonical,
                    "explicit role names no canonical column, ignoring"
                ),
            }
        }
        roles
    }
}

/// For each canonical column of `schema`, scan the upload headers in order
/// and bind the first exact-or-synonym match. Unmatched columns stay
/// unbound; no error for partial results.
pub fn infer_roles(raw: &RawTable, schema: &'static TableSchema) -> RoleMap {
    let mut roles = RoleMap::empty(schema.kind);
    for col in schema.columns {
        let hit = raw
            .headers
            .iter()
            .find(|h| synonyms::canonical_for(schema.kind, h) == Some(col.name));
        if let Some(header) = hit {
            roles.bind(col.name, header.clone());
        }
    }
    roles
}

/// Explicit per-schema role selections, as supplied by the caller:
///
/// ```json
/// {"sales": {"Date": "txn_date", "Revenue": "amt"}, "inventory": {}}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExplicitRoles {
    #[serde(default)]
    pub sales: BTreeMap<String, String>,
    #[serde(default)]
    pub inventory: BTreeMap<String, String>,
    #[serde(default)]
    pub workflow: BTreeMap<String, String>,
}

impl ExplicitRoles {
    pub fn for_schema(&self, kind: SchemaKind) -> &BTreeMap<String, String> {
        match kind {
            SchemaKind::Sales => &self.sales,
            SchemaKind::Inventory => &self.inventory,
            SchemaKind::Workflow => &self.workflow,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sales.is_empty() && self.inventory.is_empty() && self.workflow.is_empty()
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("parsing explicit role map")
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading role map {:?}", path.as_ref()))?;
        Self::from_json(&text)
    }
}
