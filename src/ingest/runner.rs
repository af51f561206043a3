use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Result};
use crossbeam::channel::{bounded, Receiver};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::database::repo::Store;
use crate::ingest::coordinator::{ingest, IngestReport};
use crate::ingest::record::CanonicalRecord;
use crate::sources::{self, RawPayload, SourceKind};
use crate::utils::config::Settings;

const CHANNEL_CAPACITY: usize = 64;

/// Fetches every source in its own thread and stores the results from the
/// calling thread, one source at a time, in `kinds` order.
///
/// Store failures abort the run; everything else is skipped and logged.
pub fn run(store: &Store, settings: &Settings, kinds: &[SourceKind]) -> Result<Vec<IngestReport>> {
    let mut params = settings.fetch_params();
    params.met_start_index = store.count_for_museum(SourceKind::Met.name())?;

    let mut fetchers = Vec::new();
    for &kind in kinds {
        let (tx, rx) = bounded::<RawPayload>(CHANNEL_CAPACITY);
        let params = params.clone();
        let handle = thread::spawn(move || {
            info!("Fetcher for {} started", kind.name());
            let sent = sources::fetch(kind, &params, &tx);
            info!("Fetcher for {} finished ({} items)", kind.name(), sent);
            sent
        });
        fetchers.push((kind, rx, handle));
    }

    let mut reports = Vec::with_capacity(fetchers.len());
    for (kind, rx, handle) in fetchers {
        let report = drain(store, kind, rx, settings.caps.for_source(kind))?;
        handle
            .join()
            .map_err(|_| anyhow!("Fetcher thread for {} panicked", kind.name()))?;
        reports.push(report);
    }

    Ok(reports)
}

/// Feeds one source's channel through the coordinator. Dropping the receiver
/// on return tells the fetcher to stop.
fn drain(store: &Store, kind: SourceKind, rx: Receiver<RawPayload>, cap: usize) -> Result<IngestReport> {
    let progress = spinner(kind);
    let records = normalized(rx.iter()).inspect(|_| progress.inc(1));

    let report = ingest(store, kind.name(), records, cap)?;

    progress.finish_with_message(format!(
        "{}: {} inserted, {} already stored",
        kind.name(),
        report.inserted,
        report.skipped_existing
    ));
    Ok(report)
}

pub fn normalized(payloads: impl Iterator<Item = RawPayload>) -> impl Iterator<Item = CanonicalRecord> {
    payloads.filter_map(|payload| match payload.normalize() {
        Ok(record) => Some(record),
        Err(e) => {
            debug!("Skipping: {}", e);
            None
        }
    })
}

fn spinner(kind: SourceKind) -> ProgressBar {
    let progress = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg} ({pos} received)") {
        progress.set_style(style);
    }
    progress.set_message(kind.name());
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}
