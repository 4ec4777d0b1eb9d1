//! Background auto-refresh: periodically re-fetch every named source,
//! re-resolve the dataset, and publish the whole snapshot into a shared
//! slot. Readers never see a half-updated dataset; the slot is replaced
//! wholesale, never merged.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use reqwest::Client;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::ingest::resolve::{resolve_dataset, Snapshot};
use crate::ingest::roles::ExplicitRoles;
use crate::ingest::RawTable;
use crate::source::{self, Source};

/// Bounded, shared log of refresh events for the dashboard's status area.
#[derive(Debug, Clone)]
pub struct UpdateLog {
    inner: Arc<Mutex<VecDeque<String>>>,
    cap: usize,
}

impl UpdateLog {
    pub fn new(cap: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(VecDeque::with_capacity(cap))),
            cap,
        }
    }

    pub fn push(&self, message: impl Into<String>) {
        let mut log = self.inner.lock().expect("update log poisoned");
        log.push_back(message.into());
        while log.len() > self.cap {
            log.pop_front();
        }
    }

    /// Most recent `n` messages, oldest first.
    pub fn recent(&self, n: usize) -> Vec<String> {
        let log = self.inner.lock().expect("update log poisoned");
        log.iter().rev().take(n).rev().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("update log poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Single-writer snapshot slot. The refresher publishes, any number of
/// readers `load` a cheap handle to the latest dataset.
#[derive(Debug, Clone)]
pub struct SnapshotSlot {
    inner: Arc<RwLock<Arc<Snapshot>>>,
}

impl SnapshotSlot {
    pub fn new(initial: Snapshot) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(initial))),
        }
    }

    pub fn publish(&self, snapshot: Snapshot) {
        *self.inner.write().expect("snapshot slot poisoned") = Arc::new(snapshot);
    }

    pub fn load(&self) -> Arc<Snapshot> {
        self.inner.read().expect("snapshot slot poisoned").clone()
    }
}

/// Handle to the background refresh task.
pub struct Refresher {
    stop: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl Refresher {
    /// Spawn the refresh loop. The first cycle runs immediately, then one
    /// per `every`.
    pub fn spawn(
        client: Client,
        sources: Vec<Source>,
        explicit: Option<ExplicitRoles>,
        every: Duration,
        slot: SnapshotSlot,
        log: UpdateLog,
    ) -> Self {
        let (stop, mut stopped) = watch::channel(false);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        refresh_cycle(&client, &sources, explicit.as_ref(), &slot, &log).await;
                    }
                    _ = stopped.changed() => {
                        info!("refresh loop stopping");
                        break;
                    }
                }
            }
        });
        Self { stop, handle }
    }

    /// Stop scheduling further cycles. An in-flight cycle is allowed to
    /// complete; there is no hard cancellation.
    pub fn stop(&self) {
        let _ = self.stop.send(true);
    }

    pub async fn join(self) {
        let _ = self.handle.await;
    }
}

/// One refresh pass: fetch every source, resolve off the first one that
/// yielded a table, publish the result wholesale.
async fn refresh_cycle(
    client: &Client,
    sources: &[Source],
    explicit: Option<&ExplicitRoles>,
    slot: &SnapshotSlot,
    log: &UpdateLog,
) {
    let mut active: Option<RawTable> = None;
    for source in sources {
        match source::fetch(client, source).await {
            Ok(table) => {
                log.push(format!("{}: ok ({} rows)", source.name, table.len()));
                if active.is_none() {
                    active = Some(table);
                }
            }
            Err(err) => {
                warn!(
                    source = %source.name,
                    error = format!("{:#}", err),
                    "source fetch failed"
                );
                log.push(format!("{}: error: {:#}", source.name, err));
            }
        }
    }

    let snapshot = resolve_dataset(active.as_ref(), explicit);
    for resolved in snapshot.iter() {
        log.push(resolved.notice());
    }
    slot.publish(snapshot);
}
