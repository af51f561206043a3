//! Metropolitan Museum of Art: an id index, then one request per object.
//!
//! The API is rate limited, so a run fetches a small batch starting where
//! the previous run stopped.

use crossbeam::channel::Sender;
use serde::Deserialize;
use tracing::{info, warn};

use crate::ingest::record::{non_blank, CanonicalRecord};
use crate::sources::http::HttpClient;
use crate::sources::{RawPayload, SourceKind};

const OBJECTS_URL: &str = "https://collectionapi.metmuseum.org/public/collection/v1/objects";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetObject {
    #[serde(rename = "objectID")]
    pub object_id: Option<i64>,
    pub title: Option<String>,
    pub artist_display_name: Option<String>,
    pub culture: Option<String>,
    pub medium: Option<String>,
    pub classification: Option<String>,
    pub object_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ObjectIndex {
    #[serde(rename = "objectIDs", default)]
    object_ids: Option<Vec<i64>>,
}

impl MetObject {
    pub fn has_title(&self) -> bool {
        self.title.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    pub fn normalize(&self) -> Option<CanonicalRecord> {
        let original_id = self.object_id?;
        let title = non_blank(self.title.clone())?;

        Some(CanonicalRecord {
            source_id: SourceKind::Met.name().to_string(),
            original_id,
            title: Some(title),
            artist: non_blank(self.artist_display_name.clone()),
            medium: non_blank(self.medium.clone()),
            classification: non_blank(self.classification.clone()),
            culture: non_blank(self.culture.clone()),
            date_text: non_blank(self.object_date.clone()),
        })
    }
}

/// Sends up to `batch_size` titled objects, walking the id index from `start_index`.
pub fn fetch(http: &HttpClient, start_index: usize, batch_size: usize, tx: &Sender<RawPayload>) -> usize {
    let ids = match http.get_json::<ObjectIndex>(OBJECTS_URL, &[]) {
        Ok(index) => index.object_ids.unwrap_or_default(),
        Err(e) => {
            warn!("Failed to fetch object ids: {}", e);
            return 0;
        }
    };

    let mut sent = 0;
    for &object_id in ids.iter().skip(start_index) {
        if sent >= batch_size {
            break;
        }

        let object: MetObject = match http.get_json(&format!("{OBJECTS_URL}/{object_id}"), &[]) {
            Ok(object) => object,
            Err(e) => {
                warn!(object_id, "{}", e);
                continue;
            }
        };

        if !object.has_title() {
            continue;
        }

        if tx.send(RawPayload::Met(object)).is_err() {
            break;
        }
        sent += 1;
    }

    info!(museum = http.museum(), start_index, sent, "Fetched objects");
    sent
}
