//! Free-text date → century label.
//!
//! Rules are tried in order on the lower-cased text and the first rule that
//! matches decides, even when its verdict is "no label":
//!
//! 1. explicit ordinal century ("15th century", "3rd c.")
//! 2. bare four-digit year
//! 3. bare three-digit year
//! 4. year with a BCE/BC marker
//! 5. year with a CE/AD marker
//!
//! A year is bare when no BCE/BC marker follows it.

use lazy_static::lazy_static;
use regex::Regex;

const MAX_CENTURY: u32 = 21;

lazy_static! {
    static ref ORDINAL_CENTURY: Regex =
        Regex::new(r"\b(\d+)\s*(?:st|nd|rd|th)[\s-]*(?:century|c\.)").expect("valid pattern");
    static ref DIGIT_RUN: Regex = Regex::new(r"\d+").expect("valid pattern");
    static ref BCE_MARKER: Regex = Regex::new(r"^\s*b\.?\s?c\.?(?:\s?e\.?)?(?:[^a-z]|$)").expect("valid pattern");
    static ref BCE_YEAR: Regex =
        Regex::new(r"(?:^|[^\d])-?(\d{1,4})\s*b\.?\s?c\.?(?:\s?e\.?)?(?:[^a-z]|$)").expect("valid pattern");
    static ref CE_YEAR: Regex = Regex::new(
        r"(?:(?:^|[^\d])(\d{1,4})\s*(?:c\.?\s?e\.?|a\.?\s?d\.?)(?:[^a-z]|$))|(?:\b(?:a\.?\s?d\.?|c\.?\s?e\.?)\s+(\d{1,4})(?:[^\d]|$))"
    )
    .expect("valid pattern");
}

/// Century of a positive year: 1..=100 is the 1st, 1901..=2000 the 20th.
pub fn century_of(year: u32) -> u32 {
    (year - 1) / 100 + 1
}

/// Every label takes the "th" suffix ("1th c.", "21th c.") so buckets stay
/// comparable with previously exported metrics.
fn label(century: u32) -> String {
    format!("{century}th c.")
}

fn bounded(century: u32) -> Option<String> {
    (1..=MAX_CENTURY).contains(&century).then(|| label(century))
}

/// Classifies `date_text` into a label such as "18th c." or "5th c. BCE".
pub fn classify(date_text: &str) -> Option<String> {
    let text = date_text.to_lowercase();

    if let Some(caps) = ORDINAL_CENTURY.captures(&text) {
        return caps[1].parse::<u32>().ok().and_then(bounded);
    }

    if let Some(year) = bare_year(&text, 4) {
        return (year > 0).then(|| century_of(year)).and_then(bounded);
    }

    if let Some(year) = bare_year(&text, 3) {
        // NOTE: unlike the other year rules this one has no upper bound check.
        return (year > 0).then(|| label(century_of(year)));
    }

    if let Some(caps) = BCE_YEAR.captures(&text) {
        let year: u32 = caps[1].parse().ok()?;
        return (year > 0).then(|| format!("{} BCE", label(century_of(year))));
    }

    if let Some(caps) = CE_YEAR.captures(&text) {
        let digits = caps.get(1).or_else(|| caps.get(2))?;
        let year: u32 = digits.as_str().parse().ok()?;
        return (year > 0).then(|| century_of(year)).and_then(bounded);
    }

    None
}

/// First digit run of exactly `len` digits that is not followed by a BCE marker.
fn bare_year(text: &str, len: usize) -> Option<u32> {
    DIGIT_RUN
        .find_iter(text)
        .filter(|m| m.len() == len)
        .find(|m| !BCE_MARKER.is_match(&text[m.end()..]))
        .and_then(|m| m.as_str().parse().ok())
}
