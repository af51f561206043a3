use thiserror::Error;

/// Failures the ingestion engine distinguishes between.
///
/// Only `StoreUnavailable` aborts a run. The other variants are recovered
/// locally: the affected item, page or record is skipped.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("{museum} unavailable: {detail}")]
    SourceUnavailable { museum: &'static str, detail: String },

    #[error("malformed record: {0}")]
    MalformedRecord(String),

    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] rusqlite::Error),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

impl LedgerError {
    /// Maps a failed INSERT, separating unique-key conflicts from real store failures.
    pub fn from_insert(err: rusqlite::Error, what: impl Into<String>) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(ref e, _)
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                LedgerError::ConstraintViolation(what.into())
            }
            other => LedgerError::StoreUnavailable(other),
        }
    }
}
