//! Art Institute of Chicago: flat objects, paged listing.

use crossbeam::channel::Sender;
use serde::Deserialize;
use tracing::{info, warn};

use crate::ingest::record::{non_blank, CanonicalRecord};
use crate::sources::http::HttpClient;
use crate::sources::{decode_items, RawPayload, SourceKind};

const ARTWORKS_URL: &str = "https://api.artic.edu/api/v1/artworks";
const PAGE_LIMIT: u32 = 100;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AicArtwork {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub artist_title: Option<String>,
    pub place_of_origin: Option<String>,
    pub medium_display: Option<String>,
    pub classification_title: Option<String>,
    pub date_display: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    data: Vec<serde_json::Value>,
}

impl AicArtwork {
    pub fn normalize(&self) -> Option<CanonicalRecord> {
        let original_id = self.id?;
        let title = non_blank(self.title.clone())?;

        Some(CanonicalRecord {
            source_id: SourceKind::Aic.name().to_string(),
            original_id,
            title: Some(title),
            artist: non_blank(self.artist_title.clone()),
            medium: non_blank(self.medium_display.clone()),
            classification: non_blank(self.classification_title.clone()),
            culture: non_blank(self.place_of_origin.clone()),
            date_text: non_blank(self.date_display.clone()),
        })
    }
}

pub fn fetch(http: &HttpClient, pages: u32, tx: &Sender<RawPayload>) -> usize {
    let mut sent = 0;

    for page in 0..pages {
        info!(museum = http.museum(), page, "Requesting artworks page");
        let query = [("page", page.to_string()), ("limit", PAGE_LIMIT.to_string())];
        let listing: Page = match http.get_json(ARTWORKS_URL, &query) {
            Ok(listing) => listing,
            Err(e) => {
                warn!(page, "{}", e);
                continue;
            }
        };

        for item in decode_items::<AicArtwork>(http.museum(), listing.data) {
            if tx.send(RawPayload::Aic(item)).is_err() {
                return sent;
            }
            sent += 1;
        }
    }

    sent
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn artwork(value: serde_json::Value) -> AicArtwork {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_normalize_full_item() {
        let item = artwork(json!({
            "id": 27992,
            "title": "A Sunday on La Grande Jatte — 1884",
            "artist_title": "Georges Seurat",
            "place_of_origin": "France",
            "medium_display": "Oil on canvas",
            "classification_title": "painting",
            "date_display": "1884–86",
            "thumbnail": {"width": 3000}
        }));

        let record = item.normalize().unwrap();
        assert_eq!(record.original_id, 27992);
        assert_eq!(record.artist.as_deref(), Some("Georges Seurat"));
        assert_eq!(record.culture.as_deref(), Some("France"));
        assert_eq!(record.medium.as_deref(), Some("Oil on canvas"));
        assert_eq!(record.classification.as_deref(), Some("painting"));
        assert_eq!(record.date_text.as_deref(), Some("1884–86"));
    }

    #[test]
    fn test_missing_optional_fields_are_tolerated() {
        let record = artwork(json!({"id": 5, "title": "Fragment", "artist_title": null}))
            .normalize()
            .unwrap();
        assert_eq!(record.artist, None);
        assert_eq!(record.culture, None);
    }

    #[test]
    fn test_missing_id_or_title_is_skipped() {
        assert!(artwork(json!({"title": "No id"})).normalize().is_none());
        assert!(artwork(json!({"id": 9})).normalize().is_none());
        assert!(artwork(json!({"id": 9, "title": "   "})).normalize().is_none());
    }
}
