//! Harvard Art Museums: keyed API, paged `records`, people as a list.

use crossbeam::channel::Sender;
use serde::Deserialize;
use tracing::{info, warn};

use crate::ingest::record::{non_blank, CanonicalRecord};
use crate::sources::http::HttpClient;
use crate::sources::{decode_items, RawPayload, SourceKind};

const OBJECT_URL: &str = "https://api.harvardartmuseums.org/object";
const MAX_PAGE_SIZE: usize = 25;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HarvardPerson {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HarvardObject {
    pub objectid: Option<i64>,
    pub title: Option<String>,
    pub people: Option<Vec<HarvardPerson>>,
    pub culture: Option<String>,
    pub medium: Option<String>,
    pub classification: Option<String>,
    pub dated: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PageInfo {
    page: Option<u32>,
    pages: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    records: Vec<serde_json::Value>,
    #[serde(default)]
    info: PageInfo,
}

impl HarvardObject {
    pub fn normalize(&self) -> Option<CanonicalRecord> {
        let original_id = self.objectid?;
        let title = non_blank(self.title.clone())?;
        let artist = self
            .people
            .as_ref()
            .and_then(|people| people.first())
            .and_then(|person| non_blank(person.name.clone()));

        Some(CanonicalRecord {
            source_id: SourceKind::Harvard.name().to_string(),
            original_id,
            title: Some(title),
            artist,
            medium: non_blank(self.medium.clone()),
            classification: non_blank(self.classification.clone()),
            culture: non_blank(self.culture.clone()),
            date_text: non_blank(self.dated.clone()),
        })
    }
}

/// Pages through the object listing until `target` items were sent or the
/// listing runs out.
pub fn fetch(http: &HttpClient, api_key: &str, target: usize, tx: &Sender<RawPayload>) -> usize {
    let size = target.min(MAX_PAGE_SIZE).max(1);
    let mut page = 1;
    let mut total_pages = None;
    let mut sent = 0;

    while sent < target {
        let query = [
            ("apikey", api_key.to_string()),
            ("size", size.to_string()),
            ("page", page.to_string()),
        ];
        let listing: Page = match http.get_json(OBJECT_URL, &query) {
            Ok(listing) => listing,
            Err(e) => {
                warn!(page, "{}", e);
                match page_after_failure(page, total_pages) {
                    Some(next) => {
                        page = next;
                        continue;
                    }
                    None => break,
                }
            }
        };
        total_pages = listing.info.pages.or(total_pages);

        if listing.records.is_empty() {
            info!(museum = http.museum(), "No more records returned");
            break;
        }

        for item in decode_items::<HarvardObject>(http.museum(), listing.records) {
            if tx.send(RawPayload::Harvard(item)).is_err() {
                return sent;
            }
            sent += 1;
            if sent >= target {
                break;
            }
        }

        match next_page(&listing.info) {
            Some(next) => page = next,
            None => break,
        }
    }

    info!(museum = http.museum(), sent, "Fetched objects");
    sent
}

fn next_page(info: &PageInfo) -> Option<u32> {
    match (info.page, info.pages) {
        (Some(current), Some(total)) if current < total => Some(current + 1),
        _ => None,
    }
}

/// A failed page is skipped while the last listing said more pages exist.
fn page_after_failure(page: u32, total_pages: Option<u32>) -> Option<u32> {
    total_pages.filter(|&total| page < total).map(|_| page + 1)
}
