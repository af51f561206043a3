//! Cleveland Museum of Art: culture and creators arrive as lists.

use crossbeam::channel::Sender;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::ingest::record::{non_blank, CanonicalRecord};
use crate::sources::http::HttpClient;
use crate::sources::{decode_items, RawPayload, SourceKind};

const ARTWORKS_URL: &str = "https://openaccess-api.clevelandart.org/api/artworks/";

lazy_static! {
    static ref CREATOR_NAME: Regex = Regex::new(r"^([^,(]+)").expect("valid creator pattern");
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClevelandCreator {
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClevelandArtwork {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub culture: Option<Vec<String>>,
    pub technique: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub creation_date_latest: Option<Value>,
    pub creators: Option<Vec<ClevelandCreator>>,
}

#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    data: Vec<Value>,
}

/// Name part of a creator description such as "Claude Monet (French, 1840–1926)".
pub fn creator_name(description: &str) -> Option<String> {
    CREATOR_NAME
        .captures(description)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|name| !name.is_empty())
}

fn date_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => non_blank(Some(s.clone())),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl ClevelandArtwork {
    pub fn normalize(&self) -> Option<CanonicalRecord> {
        let original_id = self.id?;
        let title = non_blank(self.title.clone())?;

        let culture = self
            .culture
            .as_ref()
            .and_then(|cultures| cultures.first())
            .and_then(|c| non_blank(Some(c.clone())));
        let artist = self
            .creators
            .as_ref()
            .and_then(|creators| creators.first())
            .and_then(|creator| creator.description.as_deref())
            .and_then(creator_name);

        Some(CanonicalRecord {
            source_id: SourceKind::Cleveland.name().to_string(),
            original_id,
            title: Some(title),
            artist,
            medium: non_blank(self.technique.clone()),
            classification: non_blank(self.kind.clone()),
            culture,
            date_text: self.creation_date_latest.as_ref().and_then(date_text),
        })
    }
}

pub fn fetch(http: &HttpClient, tx: &Sender<RawPayload>) -> usize {
    let listing: Page = match http.get_json(ARTWORKS_URL, &[]) {
        Ok(listing) => listing,
        Err(e) => {
            warn!("{}", e);
            return 0;
        }
    };

    let mut sent = 0;
    for item in decode_items::<ClevelandArtwork>(http.museum(), listing.data) {
        if tx.send(RawPayload::Cleveland(item)).is_err() {
            break;
        }
        sent += 1;
    }

    info!(museum = http.museum(), sent, "Fetched artworks");
    sent
}
