//! Museum adapters.
//!
//! Each museum publishes its own JSON shape. A fetch pushes that shape,
//! wrapped in [`RawPayload`], into a channel; [`RawPayload::normalize`]
//! projects it onto a [`CanonicalRecord`]. Adapters never fail past their
//! boundary: a failed request is logged and skipped.

pub mod aic;
pub mod cleveland;
pub mod harvard;
pub mod http;
pub mod met;

use std::time::Duration;

use crossbeam::channel::Sender;

use crate::error::{LedgerError, LedgerResult};
use crate::ingest::record::CanonicalRecord;
use crate::sources::http::HttpClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SourceKind {
    Aic,
    Met,
    Harvard,
    Cleveland,
}

impl SourceKind {
    pub const ALL: [SourceKind; 4] = [
        SourceKind::Aic,
        SourceKind::Met,
        SourceKind::Harvard,
        SourceKind::Cleveland,
    ];

    /// Museum name as stored in the `museum` table.
    pub fn name(self) -> &'static str {
        match self {
            SourceKind::Aic => "Art Institute of Chicago",
            SourceKind::Met => "Metropolitan Museum of Art",
            SourceKind::Harvard => "Harvard Art Museum",
            SourceKind::Cleveland => "Cleveland Museum of Art",
        }
    }
}

/// One raw item as delivered by a museum API.
#[derive(Debug, Clone)]
pub enum RawPayload {
    Aic(aic::AicArtwork),
    Met(met::MetObject),
    Harvard(harvard::HarvardObject),
    Cleveland(cleveland::ClevelandArtwork),
}

impl RawPayload {
    pub fn source(&self) -> SourceKind {
        match self {
            RawPayload::Aic(_) => SourceKind::Aic,
            RawPayload::Met(_) => SourceKind::Met,
            RawPayload::Harvard(_) => SourceKind::Harvard,
            RawPayload::Cleveland(_) => SourceKind::Cleveland,
        }
    }

    /// Projects the payload onto the canonical record.
    /// Fails with `MalformedRecord` when the id or a usable title is missing.
    pub fn normalize(&self) -> LedgerResult<CanonicalRecord> {
        let record = match self {
            RawPayload::Aic(item) => item.normalize(),
            RawPayload::Met(item) => item.normalize(),
            RawPayload::Harvard(item) => item.normalize(),
            RawPayload::Cleveland(item) => item.normalize(),
        };

        record.ok_or_else(|| {
            LedgerError::MalformedRecord(format!(
                "{} payload without usable id or title",
                self.source().name()
            ))
        })
    }
}

/// Request parameters for every adapter.
#[derive(Debug, Clone)]
pub struct FetchParams {
    pub aic_pages: u32,
    pub met_start_index: usize,
    pub met_batch_size: usize,
    pub harvard_target: usize,
    pub harvard_api_key: Option<String>,
    pub timeout: Duration,
    pub pacing: Duration,
}

impl Default for FetchParams {
    fn default() -> Self {
        Self {
            aic_pages: 6,
            met_start_index: 0,
            met_batch_size: 25,
            harvard_target: 600,
            harvard_api_key: None,
            timeout: Duration::from_secs(10),
            pacing: Duration::from_millis(100),
        }
    }
}

/// Runs the adapter for `kind`, sending raw items into `tx` until the source
/// is exhausted or the receiver hangs up. Returns the number of items sent.
pub fn fetch(kind: SourceKind, params: &FetchParams, tx: &Sender<RawPayload>) -> usize {
    let http = match HttpClient::new(kind.name(), params.timeout, params.pacing) {
        Ok(http) => http,
        Err(e) => {
            tracing::error!("{}", e);
            return 0;
        }
    };

    match kind {
        SourceKind::Aic => aic::fetch(&http, params.aic_pages, tx),
        SourceKind::Met => met::fetch(&http, params.met_start_index, params.met_batch_size, tx),
        SourceKind::Harvard => match params.harvard_api_key.as_deref() {
            Some(key) => harvard::fetch(&http, key, params.harvard_target, tx),
            None => {
                tracing::warn!("HARVARD_API_KEY is not set, skipping Harvard Art Museum");
                0
            }
        },
        SourceKind::Cleveland => cleveland::fetch(&http, tx),
    }
}

/// Decodes items one by one so a single odd item does not sink its page.
pub(crate) fn decode_items<T: serde::de::DeserializeOwned>(
    museum: &'static str,
    items: Vec<serde_json::Value>,
) -> Vec<T> {
    items
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(museum, "Skipping undecodable item: {}", e);
                None
            }
        })
        .collect()
}
