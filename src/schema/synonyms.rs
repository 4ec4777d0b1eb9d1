//! Header-name matching: maps whatever an upload calls its columns onto
//! canonical column names, one lookup per schema.
//!
//! Policy: both sides are trimmed and lowercased before comparison. The
//! canonical name itself always matches; the per-column synonym lists cover
//! the spellings seen in the wild.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::types::{self, SchemaKind};

/// Lowercased header → canonical column name, per schema kind.
static LOOKUP: Lazy<HashMap<SchemaKind, HashMap<String, &'static str>>> = Lazy::new(|| {
    let mut by_kind = HashMap::new();
    for schema in types::all() {
        let mut map: HashMap<String, &'static str> = HashMap::new();
        for col in schema.columns {
            map.insert(normalize(col.name), col.name);
            for syn in col.synonyms {
                map.insert(normalize(syn), col.name);
            }
        }
        by_kind.insert(schema.kind, map);
    }
    by_kind
});

/// Trim + lowercase, the single normalization rule for header comparison.
pub fn normalize(header: &str) -> String {
    header.trim().to_lowercase()
}

/// Which canonical column of `kind` does this upload header name, if any?
pub fn canonical_for(kind: SchemaKind, header: &str) -> Option<&'static str> {
    LOOKUP
        .get(&kind)
        .and_then(|map| map.get(&normalize(header)))
        .copied()
}
