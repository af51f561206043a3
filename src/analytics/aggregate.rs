use std::collections::HashMap;

use serde::Serialize;

use crate::analytics::century::classify;
use crate::database::repo::JoinedRow;

pub const DEFAULT_TOP_N: usize = 8;
pub const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ranked {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MuseumBreakdown {
    pub museum: String,
    pub counts: Vec<Ranked>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Aggregates {
    pub culture_by_museum: Vec<MuseumBreakdown>,
    pub top_artists: Vec<Ranked>,
    pub top_classifications: Vec<Ranked>,
    pub century_by_museum: Vec<MuseumBreakdown>,
}

#[cfg(test)]
impl Aggregates {
    pub fn cultures_for(&self, museum: &str) -> Option<&[Ranked]> {
        find(&self.culture_by_museum, museum)
    }

    pub fn centuries_for(&self, museum: &str) -> Option<&[Ranked]> {
        find(&self.century_by_museum, museum)
    }
}

#[cfg(test)]
fn find<'a>(breakdowns: &'a [MuseumBreakdown], museum: &str) -> Option<&'a [Ranked]> {
    breakdowns
        .iter()
        .find(|b| b.museum == museum)
        .map(|b| b.counts.as_slice())
}

/// Trims and title-cases `text`; missing or blank text becomes "Unknown".
///
/// A letter starts a word when the character before it is not a letter,
/// so "o'keeffe" becomes "O'Keeffe" and "19th" becomes "19Th".
pub fn normalize_label(text: Option<&str>) -> String {
    let trimmed = text.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return UNKNOWN.to_string();
    }

    let mut out = String::with_capacity(trimmed.len());
    let mut previous_is_letter = false;
    for ch in trimmed.chars() {
        if ch.is_alphabetic() {
            if previous_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(ch);
            previous_is_letter = false;
        }
    }
    out
}

/// Counter that remembers first-seen order, used to break ties.
#[derive(Debug, Default)]
struct Tally {
    entries: Vec<Ranked>,
    index: HashMap<String, usize>,
}

impl Tally {
    fn add(&mut self, label: String) {
        match self.index.get(&label) {
            Some(&i) => self.entries[i].count += 1,
            None => {
                self.index.insert(label.clone(), self.entries.len());
                self.entries.push(Ranked { label, count: 1 });
            }
        }
    }

    /// Descending by count; `sort_by` is stable so equal counts keep first-seen order.
    fn ranked(mut self, top_n: usize) -> Vec<Ranked> {
        self.entries.sort_by(|a, b| b.count.cmp(&a.count));
        self.entries.truncate(top_n);
        self.entries
    }

    fn into_entries(self) -> Vec<Ranked> {
        self.entries
    }
}

/// Per-museum tallies, museums in first-seen order.
#[derive(Debug, Default)]
struct GroupedTally {
    groups: Vec<(String, Tally)>,
    index: HashMap<String, usize>,
}

impl GroupedTally {
    fn add(&mut self, museum: String, label: String) {
        let i = match self.index.get(&museum) {
            Some(&i) => i,
            None => {
                self.index.insert(museum.clone(), self.groups.len());
                self.groups.push((museum, Tally::default()));
                self.groups.len() - 1
            }
        };
        self.groups[i].1.add(label);
    }

    fn finish(self, f: impl Fn(Tally) -> Vec<Ranked>) -> Vec<MuseumBreakdown> {
        self.groups
            .into_iter()
            .map(|(museum, tally)| MuseumBreakdown { museum, counts: f(tally) })
            .collect()
    }
}

pub fn culture_distribution(rows: &[JoinedRow], top_n: usize) -> Vec<MuseumBreakdown> {
    let mut grouped = GroupedTally::default();
    for row in rows {
        grouped.add(
            normalize_label(Some(&row.museum)),
            normalize_label(row.culture.as_deref()),
        );
    }
    grouped.finish(|tally| tally.ranked(top_n))
}

pub fn top_artists(rows: &[JoinedRow], top_n: usize) -> Vec<Ranked> {
    let mut tally = Tally::default();
    for row in rows {
        tally.add(normalize_label(row.artist.as_deref()));
    }
    tally.ranked(top_n)
}

pub fn top_classifications(rows: &[JoinedRow], top_n: usize) -> Vec<Ranked> {
    let mut tally = Tally::default();
    for row in rows {
        tally.add(normalize_label(row.classification.as_deref()));
    }
    tally.ranked(top_n)
}

/// Rows whose date cannot be classified are left out entirely.
pub fn century_distribution(rows: &[JoinedRow]) -> Vec<MuseumBreakdown> {
    let mut grouped = GroupedTally::default();
    for row in rows {
        let Some(century) = row.date_text.as_deref().and_then(classify) else {
            continue;
        };
        grouped.add(normalize_label(Some(&row.museum)), century);
    }
    grouped.finish(Tally::into_entries)
}

pub fn aggregate(rows: &[JoinedRow], top_n: usize) -> Aggregates {
    Aggregates {
        culture_by_museum: culture_distribution(rows, top_n),
        top_artists: top_artists(rows, top_n),
        top_classifications: top_classifications(rows, top_n),
        century_by_museum: century_distribution(rows),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(museum: &str, classification: &str, culture: &str, artist: &str, date: &str) -> JoinedRow {
        let opt = |s: &str| (!s.is_empty()).then(|| s.to_string());
        JoinedRow {
            museum: museum.to_string(),
            classification: opt(classification),
            culture: opt(culture),
            artist: opt(artist),
            title: None,
            date_text: opt(date),
        }
    }

    fn pairs(ranked: &[Ranked]) -> Vec<(&str, usize)> {
        ranked.iter().map(|r| (r.label.as_str(), r.count)).collect()
    }

    #[test]
    fn test_two_french_paintings() {
        let rows = vec![
            row("M1", "Painting", "French", "A", "1750"),
            row("M1", "Painting", "French", "B", "1850"),
        ];

        let result = aggregate(&rows, DEFAULT_TOP_N);
        assert_eq!(pairs(result.cultures_for("M1").unwrap()), vec![("French", 2)]);
        assert_eq!(
            pairs(result.centuries_for("M1").unwrap()),
            vec![("18th c.", 1), ("19th c.", 1)]
        );
        assert_eq!(pairs(&result.top_classifications), vec![("Painting", 2)]);
        assert_eq!(pairs(&result.top_artists), vec![("A", 1), ("B", 1)]);
    }

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label(None), "Unknown");
        assert_eq!(normalize_label(Some("   ")), "Unknown");
        assert_eq!(normalize_label(Some("  french ")), "French");
        assert_eq!(normalize_label(Some("UNKNOWN ARTIST")), "Unknown Artist");
        assert_eq!(normalize_label(Some("georgia o'keeffe")), "Georgia O'Keeffe");
        assert_eq!(normalize_label(Some("art institute of chicago")), "Art Institute Of Chicago");
    }

    #[test]
    fn test_labels_merge_after_normalization() {
        let rows = vec![
            row("M1", "painting", "", "", ""),
            row("M1", " PAINTING ", "", "", ""),
            row("M1", "Painting", "", "", ""),
        ];
        assert_eq!(pairs(&top_classifications(&rows, 8)), vec![("Painting", 3)]);
        assert_eq!(pairs(&top_artists(&rows, 8)), vec![("Unknown", 3)]);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let rows: Vec<JoinedRow> = ["Carr", "Adams", "Baker", "Adams", "Carr", "Baker"]
            .iter()
            .map(|artist| row("M1", "", "", artist, ""))
            .collect();

        let first = top_artists(&rows, 8);
        let second = top_artists(&rows, 8);
        assert_eq!(pairs(&first), vec![("Carr", 2), ("Adams", 2), ("Baker", 2)]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_top_n_truncates_per_museum() {
        let mut rows = Vec::new();
        for (i, culture) in ["A", "B", "C", "D"].iter().enumerate() {
            for _ in 0..=i {
                rows.push(row("M1", "", culture, "", ""));
            }
        }
        rows.push(row("M2", "", "Z", "", ""));

        let cultures = culture_distribution(&rows, 2);
        assert_eq!(cultures.len(), 2);
        assert_eq!(pairs(&cultures[0].counts), vec![("D", 4), ("C", 3)]);
        assert_eq!(cultures[1].museum, "M2");
        assert_eq!(pairs(&cultures[1].counts), vec![("Z", 1)]);
    }

    #[test]
    fn test_unclassifiable_dates_are_excluded() {
        let rows = vec![
            row("M1", "", "", "", "Unknown Date"),
            row("M1", "", "", "", "1510"),
            row("M2", "", "", "", "n.d."),
        ];

        let centuries = century_distribution(&rows);
        assert_eq!(centuries.len(), 1);
        assert_eq!(pairs(&centuries[0].counts), vec![("16th c.", 1)]);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(aggregate(&[], DEFAULT_TOP_N), Aggregates::default());
    }
}
