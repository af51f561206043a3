/// Source-independent shape of one artwork before persistence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalRecord {
    pub source_id: String,
    pub original_id: i64,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub medium: Option<String>,
    pub classification: Option<String>,
    pub culture: Option<String>,
    pub date_text: Option<String>,
}

#[cfg(test)]
impl CanonicalRecord {
    pub fn new(source_id: impl Into<String>, original_id: i64) -> Self {
        Self {
            source_id: source_id.into(),
            original_id,
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Drops blank strings so "no value" has a single representation.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
