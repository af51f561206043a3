use rusqlite::{Connection, OptionalExtension, params};
use anyhow::{Result, Context};
use crate::database::schema::SCHEMA;
use crate::error::{LedgerError, LedgerResult};

/// One stored artwork, every attribute already resolved to its dictionary id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtworkRow {
    pub original_id: i64,
    pub museum_id: i64,
    pub title_id: i64,
    pub artist_id: i64,
    pub medium_id: i64,
    pub classification_id: i64,
    pub culture_id: i64,
    pub date_id: i64,
}

/// Denormalized artwork as read back for analytics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedRow {
    pub museum: String,
    pub classification: Option<String>,
    pub culture: Option<String>,
    pub artist: Option<String>,
    pub title: Option<String>,
    pub date_text: Option<String>,
}

/// SQLite-backed store. Every write is its own autocommit statement, so rows
/// committed before a failure stay durable.
pub struct Store {
    pub(crate) conn: Connection,
}

impl Store {
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path).context("Failed to open database")?;
        Self::init(conn)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA).context("Failed to initialize schema")?;
        Ok(Self { conn })
    }

    /// Registers a museum by name if absent and returns its id.
    pub fn register_museum(&self, name: &str) -> LedgerResult<i64> {
        if name.trim().is_empty() {
            return Err(LedgerError::MalformedRecord("empty museum name".to_string()));
        }
        self.conn
            .prepare_cached("INSERT OR IGNORE INTO museum (name) VALUES (?1)")?
            .execute(params![name])?;
        let id = self
            .conn
            .prepare_cached("SELECT id FROM museum WHERE name = ?1")?
            .query_row(params![name], |row| row.get(0))?;
        Ok(id)
    }

    #[cfg(test)]
    pub fn museum_id(&self, name: &str) -> LedgerResult<Option<i64>> {
        let id = self
            .conn
            .prepare_cached("SELECT id FROM museum WHERE name = ?1")?
            .query_row(params![name], |row| row.get(0))
            .optional()?;
        Ok(id)
    }

    pub fn artwork_exists(&self, museum_id: i64, original_id: i64) -> LedgerResult<bool> {
        let found: Option<i64> = self
            .conn
            .prepare_cached("SELECT 1 FROM artworks WHERE museum_id = ?1 AND original_id = ?2")?
            .query_row(params![museum_id, original_id], |row| row.get(0))
            .optional()?;
        Ok(found.is_some())
    }

    /// Inserts an artwork row. A row that already exists for the same
    /// (museum, original id) is reported as `ConstraintViolation` and left untouched.
    pub fn insert_artwork(&self, row: &ArtworkRow) -> LedgerResult<i64> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO artworks
             (original_id, museum_id, title_id, artist_id, medium_id, classification_id, culture_id, date_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             RETURNING id",
        )?;

        stmt.query_row(
            params![
                row.original_id,
                row.museum_id,
                row.title_id,
                row.artist_id,
                row.medium_id,
                row.classification_id,
                row.culture_id,
                row.date_id
            ],
            |r| r.get(0),
        )
        .map_err(|e| {
            LedgerError::from_insert(
                e,
                format!("artwork {} of museum {}", row.original_id, row.museum_id),
            )
        })
    }

    /// Number of artworks stored for a museum; zero for an unknown museum.
    pub fn count_for_museum(&self, name: &str) -> LedgerResult<usize> {
        let count: i64 = self
            .conn
            .prepare_cached(
                "SELECT COUNT(*) FROM artworks aw
                 JOIN museum m ON aw.museum_id = m.id
                 WHERE m.name = ?1",
            )?
            .query_row(params![name], |row| row.get(0))?;
        Ok(count as usize)
    }

    #[cfg(test)]
    pub fn count_artworks(&self) -> LedgerResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM artworks", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Reads every artwork joined to its museum and attribute text, in insertion order.
    pub fn load_joined_rows(&self) -> LedgerResult<Vec<JoinedRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT m.name, cl.classification_text, c.culture_text, a.artist_name,
                    t.title_text, d.date_text
             FROM artworks aw
             JOIN museum m ON aw.museum_id = m.id
             JOIN classifications cl ON aw.classification_id = cl.id
             JOIN cultures c ON aw.culture_id = c.id
             JOIN artists a ON aw.artist_id = a.id
             JOIN titles t ON aw.title_id = t.id
             JOIN dates d ON aw.date_id = d.id
             ORDER BY aw.id",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok(JoinedRow {
                    museum: row.get(0)?,
                    classification: row.get(1)?,
                    culture: row.get(2)?,
                    artist: row.get(3)?,
                    title: row.get(4)?,
                    date_text: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::lookup::Dictionary;

    fn row_for(store: &Store, museum_id: i64, original_id: i64) -> ArtworkRow {
        let id = |d: Dictionary| store.resolve_default(d, None).unwrap();
        ArtworkRow {
            original_id,
            museum_id,
            title_id: id(Dictionary::Title),
            artist_id: id(Dictionary::Artist),
            medium_id: id(Dictionary::Medium),
            classification_id: id(Dictionary::Classification),
            culture_id: id(Dictionary::Culture),
            date_id: id(Dictionary::Date),
        }
    }

    #[test]
    fn test_register_museum_is_idempotent() {
        let store = Store::open_in_memory().unwrap();
        let first = store.register_museum("Cleveland Museum of Art").unwrap();
        let second = store.register_museum("Cleveland Museum of Art").unwrap();
        let other = store.register_museum("Harvard Art Museum").unwrap();

        assert_eq!(first, second);
        assert_ne!(first, other);
        assert_eq!(store.museum_id("Harvard Art Museum").unwrap(), Some(other));
        assert_eq!(store.museum_id("Nowhere").unwrap(), None);
    }

    #[test]
    fn test_register_museum_rejects_blank_name() {
        let store = Store::open_in_memory().unwrap();
        assert!(matches!(
            store.register_museum("  "),
            Err(LedgerError::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_duplicate_artwork_is_constraint_violation() {
        let store = Store::open_in_memory().unwrap();
        let museum = store.register_museum("Art Institute of Chicago").unwrap();
        let row = row_for(&store, museum, 42);

        store.insert_artwork(&row).unwrap();
        assert!(store.artwork_exists(museum, 42).unwrap());

        let err = store.insert_artwork(&row).unwrap_err();
        assert!(matches!(err, LedgerError::ConstraintViolation(_)));
        assert_eq!(store.count_artworks().unwrap(), 1);
    }

    #[test]
    fn test_same_original_id_in_two_museums() {
        let store = Store::open_in_memory().unwrap();
        let a = store.register_museum("Art Institute of Chicago").unwrap();
        let b = store.register_museum("Harvard Art Museum").unwrap();

        store.insert_artwork(&row_for(&store, a, 7)).unwrap();
        store.insert_artwork(&row_for(&store, b, 7)).unwrap();

        assert_eq!(store.count_for_museum("Art Institute of Chicago").unwrap(), 1);
        assert_eq!(store.count_for_museum("Harvard Art Museum").unwrap(), 1);
        assert_eq!(store.count_for_museum("Unknown").unwrap(), 0);
    }

    #[test]
    fn test_load_joined_rows() {
        let store = Store::open_in_memory().unwrap();
        let museum = store.register_museum("Metropolitan Museum of Art").unwrap();
        let mut row = row_for(&store, museum, 1);
        row.culture_id = store.resolve_default(Dictionary::Culture, Some("French")).unwrap();
        row.date_id = store.resolve_default(Dictionary::Date, Some("1750")).unwrap();
        store.insert_artwork(&row).unwrap();

        let rows = store.load_joined_rows().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].museum, "Metropolitan Museum of Art");
        assert_eq!(rows[0].culture.as_deref(), Some("French"));
        assert_eq!(rows[0].artist.as_deref(), Some("Unknown Artist"));
        assert_eq!(rows[0].title.as_deref(), Some("Untitled"));
        assert_eq!(rows[0].date_text.as_deref(), Some("1750"));
    }

    #[test]
    fn test_rows_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("museums.db");
        let path = path.to_str().unwrap();

        {
            let store = Store::open(path).unwrap();
            let museum = store.register_museum("Harvard Art Museum").unwrap();
            store.insert_artwork(&row_for(&store, museum, 99)).unwrap();
        }

        let store = Store::open(path).unwrap();
        let museum = store.register_museum("Harvard Art Museum").unwrap();
        assert!(store.artwork_exists(museum, 99).unwrap());
        assert_eq!(store.count_artworks().unwrap(), 1);
    }
}
