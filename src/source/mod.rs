//! Named external data sources. Each source yields a `RawTable` or fails
//! with an error tagged by source name; one failing source never blocks the
//! others or the rest of the dashboard.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use reqwest::Client;
use url::Url;

use crate::ingest::{self, RawTable};

#[derive(Debug, Clone)]
pub enum SourceKind {
    /// A published CSV endpoint (e.g. a sheet's export URL).
    CsvUrl(Url),
    /// A CSV file on local disk, re-read every cycle.
    CsvPath(PathBuf),
}

#[derive(Debug, Clone)]
pub struct Source {
    pub name: String,
    pub kind: SourceKind,
}

impl Source {
    /// Parse a `name=target` spec, where `target` is an `http(s)` URL or a
    /// local path.
    pub fn parse(spec: &str) -> Result<Self> {
        let Some((name, target)) = spec.split_once('=') else {
            bail!("source spec `{}` is not name=target", spec);
        };
        let (name, target) = (name.trim(), target.trim());
        if name.is_empty() || target.is_empty() {
            bail!("source spec `{}` is not name=target", spec);
        }

        let kind = if target.starts_with("http://") || target.starts_with("https://") {
            let url = Url::parse(target)
                .with_context(|| format!("source `{}` has an invalid URL", name))?;
            SourceKind::CsvUrl(url)
        } else {
            SourceKind::CsvPath(PathBuf::from(target))
        };

        Ok(Self {
            name: name.to_string(),
            kind,
        })
    }
}

/// Fetch one source into a `RawTable`. Errors carry the source name so the
/// status log can report per source.
pub async fn fetch(client: &Client, source: &Source) -> Result<RawTable> {
    match &source.kind {
        SourceKind::CsvUrl(url) => fetch_csv_url(client, url)
            .await
            .with_context(|| format!("source `{}`", source.name)),
        SourceKind::CsvPath(path) => {
            let bytes = tokio::fs::read(path)
                .await
                .with_context(|| format!("source `{}`: reading {:?}", source.name, path))?;
            ingest::read_csv(bytes.as_slice())
                .with_context(|| format!("source `{}`", source.name))
        }
    }
}

async fn fetch_csv_url(client: &Client, url: &Url) -> Result<RawTable> {
    let resp = client.get(url.as_str()).send().await?.error_for_status()?;
    let bytes = resp.bytes().await?;
    ingest::read_csv(&bytes[..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn parses_url_and_path_targets() -> Result<()> {
        let url = Source::parse("sheet=https://example.com/export?format=csv")?;
        assert_eq!(url.name, "sheet");
        assert!(matches!(url.kind, SourceKind::CsvUrl(_)));

        let path = Source::parse("upload=/tmp/data.csv")?;
        assert_eq!(path.name, "upload");
        assert!(matches!(path.kind, SourceKind::CsvPath(_)));
        Ok(())
    }

    #[test]
    fn rejects_malformed_specs() {
        assert!(Source::parse("no-separator").is_err());
        assert!(Source::parse("=https://example.com").is_err());
        assert!(Source::parse("sheet=").is_err());
        assert!(Source::parse("sheet=https://exa mple.com/x").is_err());
    }

    #[tokio::test]
    async fn fetches_local_csv_source() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        tmp.write_all(b"date,revenue,orders,customers\n2025-01-01,10,1,1\n")?;

        let source = Source::parse(&format!("upload={}", tmp.path().display()))?;
        let table = fetch(&Client::new(), &source).await?;
        assert_eq!(table.len(), 1);
        assert_eq!(table.headers[0], "date");
        Ok(())
    }

    #[tokio::test]
    async fn missing_local_source_reports_its_name() {
        let source = Source::parse("warehouse=/no/such/file.csv").unwrap();
        let err = fetch(&Client::new(), &source).await.unwrap_err();
        assert!(format!("{:#}", err).contains("warehouse"));
    }
}
