use tracing::{debug, info};

use crate::database::lookup::Dictionary;
use crate::database::repo::{ArtworkRow, Store};
use crate::error::{LedgerError, LedgerResult};
use crate::ingest::record::CanonicalRecord;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub museum: String,
    pub inserted: usize,
    pub skipped_existing: usize,
}

/// Stores `records` for `museum` in input order, inserting at most `cap` new artworks.
///
/// Records already stored for the museum, or whose `source_id` names a
/// different museum, are skipped and do not count towards the cap. The cap is checked before every insertion, so the
/// iterator is never advanced past the record that filled it.
pub fn ingest<I>(store: &Store, museum: &str, records: I, cap: usize) -> LedgerResult<IngestReport>
where
    I: IntoIterator<Item = CanonicalRecord>,
{
    let museum_id = store.register_museum(museum)?;
    let mut report = IngestReport {
        museum: museum.to_string(),
        ..Default::default()
    };

    if cap == 0 {
        info!(museum, "Insertion cap is zero, nothing to do");
        return Ok(report);
    }

    for record in records {
        if record.source_id != museum {
            debug!(museum, source = %record.source_id, "Record from another source, skipping");
            continue;
        }
        if store.artwork_exists(museum_id, record.original_id)? {
            report.skipped_existing += 1;
            continue;
        }

        let row = resolve_row(store, museum_id, &record)?;
        match store.insert_artwork(&row) {
            Ok(id) => {
                debug!(museum, original_id = record.original_id, id, "Inserted artwork");
                report.inserted += 1;
            }
            Err(LedgerError::ConstraintViolation(what)) => {
                debug!(museum, %what, "Artwork already stored");
                report.skipped_existing += 1;
            }
            Err(e) => return Err(e),
        }

        if report.inserted >= cap {
            break;
        }
    }

    info!(
        museum,
        inserted = report.inserted,
        skipped = report.skipped_existing,
        "Ingestion complete"
    );
    Ok(report)
}

fn resolve_row(store: &Store, museum_id: i64, record: &CanonicalRecord) -> LedgerResult<ArtworkRow> {
    let resolve = |dictionary: Dictionary, value: &Option<String>| {
        store.resolve_default(dictionary, value.as_deref())
    };

    Ok(ArtworkRow {
        original_id: record.original_id,
        museum_id,
        title_id: resolve(Dictionary::Title, &record.title)?,
        artist_id: resolve(Dictionary::Artist, &record.artist)?,
        medium_id: resolve(Dictionary::Medium, &record.medium)?,
        classification_id: resolve(Dictionary::Classification, &record.classification)?,
        culture_id: resolve(Dictionary::Culture, &record.culture)?,
        date_id: resolve(Dictionary::Date, &record.date_text)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const AIC: &str = "Art Institute of Chicago";

    fn records(ids: &[i64]) -> Vec<CanonicalRecord> {
        ids.iter()
            .map(|&id| CanonicalRecord::new(AIC, id).with_title(format!("Work {id}")))
            .collect()
    }

    #[test]
    fn test_reingest_with_new_id_adds_only_the_new_row() {
        let store = Store::open_in_memory().unwrap();

        let first = ingest(&store, AIC, records(&[1, 2, 3]), 25).unwrap();
        assert_eq!(first.inserted, 3);

        let second = ingest(&store, AIC, records(&[1, 2, 3, 4]), 25).unwrap();
        assert_eq!(second.inserted, 1);
        assert_eq!(second.skipped_existing, 3);

        assert_eq!(store.count_for_museum(AIC).unwrap(), 4);
    }

    #[test]
    fn test_identical_rerun_is_idempotent() {
        let store = Store::open_in_memory().unwrap();
        ingest(&store, AIC, records(&[10, 11, 12]), 25).unwrap();
        let once = store.count_artworks().unwrap();

        let again = ingest(&store, AIC, records(&[10, 11, 12]), 25).unwrap();
        assert_eq!(again.inserted, 0);
        assert_eq!(store.count_artworks().unwrap(), once);
    }

    #[test]
    fn test_cap_is_exact() {
        let store = Store::open_in_memory().unwrap();
        let report = ingest(&store, AIC, records(&[1, 2, 3, 4, 5]), 2).unwrap();
        assert_eq!(report.inserted, 2);
        assert_eq!(store.count_for_museum(AIC).unwrap(), 2);
    }

    #[test]
    fn test_existing_rows_do_not_consume_cap() {
        let store = Store::open_in_memory().unwrap();
        ingest(&store, AIC, records(&[1, 2]), 25).unwrap();

        let report = ingest(&store, AIC, records(&[1, 2, 3, 4, 5]), 2).unwrap();
        assert_eq!(report.inserted, 2);
        assert_eq!(report.skipped_existing, 2);
        assert_eq!(store.count_for_museum(AIC).unwrap(), 4);
    }

    #[test]
    fn test_cap_stops_consuming_input() {
        let store = Store::open_in_memory().unwrap();
        let mut pulled = 0;
        let stream = records(&[1, 2, 3, 4]).into_iter().inspect(|_| pulled += 1);

        ingest(&store, AIC, stream, 2).unwrap();
        assert_eq!(pulled, 2);
    }

    #[test]
    fn test_zero_cap_inserts_nothing() {
        let store = Store::open_in_memory().unwrap();
        let report = ingest(&store, AIC, records(&[1]), 0).unwrap();
        assert_eq!(report.inserted, 0);
        assert_eq!(store.count_artworks().unwrap(), 0);
    }

    #[test]
    fn test_duplicate_ids_within_one_batch() {
        let store = Store::open_in_memory().unwrap();
        let report = ingest(&store, AIC, records(&[5, 5, 6]), 25).unwrap();
        assert_eq!(report.inserted, 2);
        assert_eq!(report.skipped_existing, 1);
    }

    #[test]
    fn test_first_seen_row_is_not_updated() {
        let store = Store::open_in_memory().unwrap();
        ingest(&store, AIC, vec![CanonicalRecord::new(AIC, 1).with_title("Original")], 25).unwrap();
        ingest(&store, AIC, vec![CanonicalRecord::new(AIC, 1).with_title("Corrected")], 25).unwrap();

        let rows = store.load_joined_rows().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title.as_deref(), Some("Original"));
    }

    #[test]
    fn test_missing_attributes_never_store_blank_text() {
        let store = Store::open_in_memory().unwrap();
        let mut record = CanonicalRecord::new(AIC, 1);
        record.artist = Some("  ".to_string());
        record.culture = Some(String::new());
        ingest(&store, AIC, vec![record], 25).unwrap();

        for dictionary in Dictionary::ALL {
            for value in store.dictionary_values(dictionary).unwrap() {
                let value = value.expect("dictionary entry is null");
                assert!(!value.trim().is_empty(), "blank entry in {}", dictionary.table());
            }
        }
        let row = &store.load_joined_rows().unwrap()[0];
        assert_eq!(row.artist.as_deref(), Some("Unknown Artist"));
        assert_eq!(row.culture.as_deref(), Some("Unknown Culture"));
    }

    #[test]
    fn test_store_failure_is_surfaced() {
        let store = Store::open_in_memory().unwrap();
        store.conn.execute_batch("DROP TABLE artworks").unwrap();
        let err = ingest(&store, AIC, records(&[1]), 25).unwrap_err();
        assert!(matches!(err, LedgerError::StoreUnavailable(_)));
    }

    #[test]
    fn test_records_from_another_source_are_not_filed() {
        let store = Store::open_in_memory().unwrap();
        let mut batch = records(&[1, 2]);
        batch.insert(1, CanonicalRecord::new("Cleveland Museum of Art", 99).with_title("Stray"));

        let report = ingest(&store, AIC, batch, 25).unwrap();
        assert_eq!(report.inserted, 2);
        assert_eq!(store.count_for_museum(AIC).unwrap(), 2);
        assert!(!store.artwork_exists(store.museum_id(AIC).unwrap().unwrap(), 99).unwrap());
    }
}
