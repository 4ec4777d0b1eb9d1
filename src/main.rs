use anyhow::{bail, Context, Result};
use dashfeed::ingest::{self, resolve::resolve_dataset, roles::ExplicitRoles};
use dashfeed::refresh::{Refresher, SnapshotSlot, UpdateLog};
use dashfeed::source::Source;
use dashfeed::summary;
use reqwest::Client;
use std::{path::PathBuf, time::Duration};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

const USAGE: &str =
    "usage: dashfeed [data.csv] [--roles roles.json] [--watch name=target]... [--every secs]";

#[derive(Debug)]
struct Args {
    upload: Option<PathBuf>,
    roles: Option<PathBuf>,
    watch: Vec<String>,
    every: u64,
}

fn parse_args(argv: &[String]) -> Result<Args> {
    let mut args = Args {
        upload: None,
        roles: None,
        watch: Vec::new(),
        every: 600,
    };

    let mut it = argv.iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--roles" => {
                let value = it.next().with_context(|| USAGE.to_string())?;
                args.roles = Some(PathBuf::from(value));
            }
            "--watch" => {
                let value = it.next().with_context(|| USAGE.to_string())?;
                args.watch.push(value.clone());
            }
            "--every" => {
                let value = it.next().with_context(|| USAGE.to_string())?;
                args.every = value
                    .parse()
                    .with_context(|| format!("--every expects seconds, got `{}`", value))?;
            }
            other if other.starts_with("--") => bail!("unknown flag `{}`\n{}", other, USAGE),
            other => {
                if args.upload.is_some() {
                    bail!("more than one upload path\n{}", USAGE);
                }
                args.upload = Some(PathBuf::from(other));
            }
        }
    }
    Ok(args)
}

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,dashfeed=info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    // ─── 2) parse arguments ──────────────────────────────────────────
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let args = parse_args(&argv)?;

    // ─── 3) explicit role selections, if any ─────────────────────────
    let explicit = match &args.roles {
        Some(path) => Some(ExplicitRoles::from_path(path)?),
        None => None,
    };

    if args.watch.is_empty() {
        run_once(&args, explicit.as_ref())
    } else {
        run_watch(&args, explicit).await
    }
}

/// One-shot: read the upload (if any), resolve, report what the dashboard
/// would render.
fn run_once(args: &Args, explicit: Option<&ExplicitRoles>) -> Result<()> {
    // an unreadable upload is reported and degrades to the sample fallback
    let raw = match &args.upload {
        Some(path) => match ingest::read_csv_path(path) {
            Ok(table) => Some(table),
            Err(err) => {
                error!(
                    error = format!("{:#}", err),
                    "upload unreadable, using sample data"
                );
                None
            }
        },
        None => None,
    };

    let snapshot = resolve_dataset(raw.as_ref(), explicit);
    for resolved in snapshot.iter() {
        info!("{}", resolved.notice());
        let stats = summary::summarize(&resolved.table);
        for col in &stats.numeric {
            info!(
                "  {}.{}: min {:.2}  max {:.2}  mean {:.2}",
                stats.kind, col.name, col.min, col.max, col.mean
            );
        }
    }
    Ok(())
}

/// Watch mode: keep re-fetching the named sources until ctrl-c.
async fn run_watch(args: &Args, explicit: Option<ExplicitRoles>) -> Result<()> {
    let mut sources = Vec::with_capacity(args.watch.len());
    for spec in &args.watch {
        sources.push(Source::parse(spec)?);
    }

    let client = Client::new();
    let slot = SnapshotSlot::new(resolve_dataset(None, explicit.as_ref()));
    let log = UpdateLog::new(50);
    let refresher = Refresher::spawn(
        client,
        sources,
        explicit,
        Duration::from_secs(args.every),
        slot.clone(),
        log.clone(),
    );

    info!(every_secs = args.every, "watching sources; ctrl-c to stop");
    tokio::signal::ctrl_c().await?;
    refresher.stop();
    refresher.join().await;

    // ─── final status ────────────────────────────────────────────────
    for line in log.recent(10) {
        info!("{}", line);
    }
    for resolved in slot.load().iter() {
        info!("{}", resolved.notice());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn parses_one_shot_invocation() -> Result<()> {
        let args = parse_args(&argv(&["data.csv", "--roles", "roles.json"]))?;
        assert_eq!(args.upload, Some(PathBuf::from("data.csv")));
        assert_eq!(args.roles, Some(PathBuf::from("roles.json")));
        assert!(args.watch.is_empty());
        assert_eq!(args.every, 600);
        Ok(())
    }

    #[test]
    fn parses_watch_invocation() -> Result<()> {
        let args = parse_args(&argv(&[
            "--watch",
            "sheet=https://example.com/export.csv",
            "--watch",
            "local=data.csv",
            "--every",
            "30",
        ]))?;
        assert_eq!(args.watch.len(), 2);
        assert_eq!(args.every, 30);
        Ok(())
    }

    #[test]
    fn rejects_unknown_flags_and_double_uploads() {
        assert!(parse_args(&argv(&["--frobnicate"])).is_err());
        assert!(parse_args(&argv(&["a.csv", "b.csv"])).is_err());
        assert!(parse_args(&argv(&["--every", "soon"])).is_err());
    }
}
