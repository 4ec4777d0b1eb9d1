// src/ingest/mod.rs
pub mod date_parser;
pub mod normalize;
pub mod resolve;
pub mod roles;

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::{fs::File, io::Read, path::Path};
use tracing::debug;

use crate::schema::synonyms;

/// An uploaded table before any typing or mapping.
///
/// Headers are whatever the file claims, trimmed. Rows may be ragged
/// (`flexible` reader); normalization treats a missing cell the same as an
/// uncoercible one.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let headers = headers.into_iter().map(|h| h.trim().to_string()).collect();
        Self { headers, rows }
    }

    /// Locate a column by name under the single matching policy
    /// (trimmed, case-insensitive). First hit wins on duplicates.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let want = synonyms::normalize(name);
        self.headers
            .iter()
            .position(|h| synonyms::normalize(h) == want)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Trim whitespace + strip one pair of outer quotes if present.
pub fn clean_str(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.to_string()
    }
}

/// Read one delimited upload into a `RawTable`.
///
/// The first record is the header row. Records with a different field count
/// than the header are kept as-is rather than rejected.
pub fn read_csv<R: Read>(reader: R) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .context("reading header row")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record =
            result.with_context(|| format!("CSV parse error at record {}", idx))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    debug!(columns = headers.len(), rows = rows.len(), "parsed upload");
    Ok(RawTable { headers, rows })
}

#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn read_csv_path<P: AsRef<Path>>(path: P) -> Result<RawTable> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open upload: {:?}", path.as_ref()))?;
    read_csv(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    pub(crate) fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,dashfeed=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    #[test]
    fn reads_headers_and_quoted_cells() -> Result<()> {
        init_test_logging();
        let content = "txn_date , amt,orders\n2025-01-01,\"1,234.5\",10\n2025-01-02,200,12\n";
        let table = read_csv(content.as_bytes())?;

        assert_eq!(table.headers, vec!["txn_date", "amt", "orders"]);
        assert_eq!(table.rows.len(), 2);
        // quoted cell comes back unquoted, inner comma intact
        assert_eq!(table.rows[0][1], "1,234.5");
        Ok(())
    }

    #[test]
    fn header_only_upload_is_empty_not_an_error() -> Result<()> {
        let table = read_csv("date,revenue,orders,customers\n".as_bytes())?;
        assert_eq!(table.headers.len(), 4);
        assert!(table.is_empty());
        Ok(())
    }

    #[test]
    fn ragged_rows_are_kept() -> Result<()> {
        let table = read_csv("a,b,c\n1,2\n1,2,3,4\n".as_bytes())?;
        assert_eq!(table.rows[0].len(), 2);
        assert_eq!(table.rows[1].len(), 4);
        Ok(())
    }

    #[test]
    fn column_index_uses_matching_policy() {
        let table = RawTable::new(vec![" Date ".into(), "Amt".into()], vec![]);
        assert_eq!(table.column_index("date"), Some(0));
        assert_eq!(table.column_index("AMT"), Some(1));
        assert_eq!(table.column_index("missing"), None);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = read_csv_path("/no/such/upload.csv").unwrap_err();
        assert!(format!("{:#}", err).contains("upload.csv"));
    }

    #[test]
    fn reads_from_disk() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        tmp.write_all(b"date,stock,sku\n2025-03-01,5,SKU-1\n")?;
        let table = read_csv_path(tmp.path())?;
        assert_eq!(table.len(), 1);
        assert_eq!(table.headers[2], "sku");
        Ok(())
    }

    #[test]
    fn clean_str_strips_outer_quotes_once() {
        assert_eq!(clean_str("  \"42\"  "), "42");
        assert_eq!(clean_str("\"\"x\"\""), "\"x\"");
        assert_eq!(clean_str("plain"), "plain");
        assert_eq!(clean_str("\""), "\"");
    }
}
