//! Attribute dictionaries: deduplicated text → id tables shared by every museum.

use rusqlite::params;
use tracing::debug;

use crate::database::repo::Store;
use crate::error::{LedgerError, LedgerResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dictionary {
    Title,
    Artist,
    Medium,
    Classification,
    Culture,
    Date,
}

impl Dictionary {
    #[cfg(test)]
    pub const ALL: [Dictionary; 6] = [
        Dictionary::Title,
        Dictionary::Artist,
        Dictionary::Medium,
        Dictionary::Classification,
        Dictionary::Culture,
        Dictionary::Date,
    ];

    pub fn table(self) -> &'static str {
        match self {
            Dictionary::Title => "titles",
            Dictionary::Artist => "artists",
            Dictionary::Medium => "mediums",
            Dictionary::Classification => "classifications",
            Dictionary::Culture => "cultures",
            Dictionary::Date => "dates",
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            Dictionary::Title => "title_text",
            Dictionary::Artist => "artist_name",
            Dictionary::Medium => "medium_text",
            Dictionary::Classification => "classification_text",
            Dictionary::Culture => "culture_text",
            Dictionary::Date => "date_text",
        }
    }

    /// Text stored when a source leaves the attribute out.
    pub fn fallback(self) -> &'static str {
        match self {
            Dictionary::Title => "Untitled",
            Dictionary::Artist => "Unknown Artist",
            Dictionary::Medium => "Unknown Medium",
            Dictionary::Classification => "Unclassified",
            Dictionary::Culture => "Unknown Culture",
            Dictionary::Date => "Unknown Date",
        }
    }
}

/// Blank (absent, empty or whitespace-only) values become the fallback.
/// Anything else is kept verbatim.
pub fn effective_value<'a>(raw: Option<&'a str>, fallback: &'a str) -> &'a str {
    match raw {
        Some(value) if !value.trim().is_empty() => value,
        _ => fallback,
    }
}

impl Store {
    /// Returns the id for `raw` (or `fallback`) in `dictionary`, creating the entry on first sight.
    ///
    /// The insert is `INSERT OR IGNORE` against the column's UNIQUE constraint
    /// followed by a re-select, so two resolutions racing on the same new
    /// value still end up with a single row.
    pub fn resolve(
        &self,
        dictionary: Dictionary,
        raw: Option<&str>,
        fallback: &str,
    ) -> LedgerResult<i64> {
        if fallback.trim().is_empty() {
            return Err(LedgerError::MalformedRecord(format!(
                "blank fallback for {}",
                dictionary.table()
            )));
        }
        let value = effective_value(raw, fallback);

        let inserted = self
            .conn
            .prepare_cached(&format!(
                "INSERT OR IGNORE INTO {} ({}) VALUES (?1)",
                dictionary.table(),
                dictionary.column()
            ))?
            .execute(params![value])?;

        let id = self
            .conn
            .prepare_cached(&format!(
                "SELECT id FROM {} WHERE {} = ?1",
                dictionary.table(),
                dictionary.column()
            ))?
            .query_row(params![value], |row| row.get(0))?;

        if inserted > 0 {
            debug!(table = dictionary.table(), id, value, "New dictionary entry");
        }
        Ok(id)
    }

    /// `resolve` with the dictionary's own fallback.
    pub fn resolve_default(&self, dictionary: Dictionary, raw: Option<&str>) -> LedgerResult<i64> {
        self.resolve(dictionary, raw, dictionary.fallback())
    }

    #[cfg(test)]
    pub fn dictionary_values(&self, dictionary: Dictionary) -> LedgerResult<Vec<Option<String>>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM {} ORDER BY id",
            dictionary.column(),
            dictionary.table()
        ))?;
        let values = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(values)
    }
}
