//! Period keys.
//!
//! The dataset indexes every observation window by a loosely formatted
//! month-year token (`"March-2024"`, `"2024-10"`, `"PJune-2025"`). Keys are
//! parsed once into a [`PeriodKey`] and carried through the engine; the raw
//! token is kept only to look up the period-suffixed property names.

use crate::error::{EngineError, Result};
use crate::locale::Locale;
use chrono::Month;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

const MONTHS_EN: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

const MONTHS_FR: [&str; 12] = [
    "janvier", "février", "mars", "avril", "mai", "juin", "juillet", "août", "septembre",
    "octobre", "novembre", "décembre",
];

const MONTHS_FR_PLAIN: [&str; 12] = [
    "janvier", "fevrier", "mars", "avril", "mai", "juin", "juillet", "aout", "septembre",
    "octobre", "novembre", "decembre",
];

const MONTHS_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A parsed month-year period.
///
/// Ordering is chronological: year, then month, then observed before
/// projected. The raw token is the last tie-break so that two spellings of
/// the same month (`"03-2024"`, `"March-2024"`) stay distinct keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PeriodKey {
    year: i32,
    month_index: u8,
    is_projection: bool,
    raw: String,
}

impl PeriodKey {
    /// Parse a period token.
    ///
    /// Exactly one of the two segments must be a 4-digit year. The other is
    /// the month: an optional `P`/`p` projection marker (display labels use
    /// `P.`), then either a 1-2 digit month number (clamped to 1..=12) or a
    /// month name in English or French.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let invalid = || EngineError::InvalidPeriod(raw.to_string());

        let mut segments: Vec<&str> = if trimmed.contains('-') {
            trimmed.split('-').collect()
        } else {
            trimmed.split_whitespace().collect()
        };
        if segments.len() < 2 {
            return Err(invalid());
        }
        segments.truncate(2);
        let (a, b) = (segments[0].trim(), segments[1].trim());

        let (year, month_token) = match (is_year(a), is_year(b)) {
            (true, false) => (a, b),
            (false, true) => (b, a),
            _ => return Err(invalid()),
        };
        let year: i32 = year.parse().map_err(|_| invalid())?;

        let (is_projection, month_token) = strip_projection(month_token);
        let month_index = resolve_month(month_token).ok_or_else(invalid)?;

        Ok(Self {
            year,
            month_index,
            is_projection,
            raw: trimmed.to_string(),
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Zero-based month, 0..=11.
    pub fn month_index(&self) -> u8 {
        self.month_index
    }

    pub fn is_projection(&self) -> bool {
        self.is_projection
    }

    /// The token as it appears in property names.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// `(year, month_index, is_projection)`, ignoring the spelling.
    pub fn triple(&self) -> (i32, u8, bool) {
        (self.year, self.month_index, self.is_projection)
    }

    /// Property name for this period, e.g. `population_ph3_March-2024`.
    pub fn field(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.raw)
    }

    /// Long display label: `2024 March`, `2025 P.juin`.
    pub fn label(&self, locale: Locale) -> String {
        let names = match locale {
            Locale::En => &MONTHS_EN,
            Locale::Fr => &MONTHS_FR,
        };
        let prefix = if self.is_projection { "P." } else { "" };
        format!("{} {}{}", self.year, prefix, names[self.month_index as usize])
    }

    /// Chart axis label: `Mar-2024`, `PJun-2025`.
    pub fn short_label(&self) -> String {
        let prefix = if self.is_projection { "P" } else { "" };
        format!("{}{}-{}", prefix, MONTHS_SHORT[self.month_index as usize], self.year)
    }
}

impl FromStr for PeriodKey {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        PeriodKey::parse(s)
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn is_year(s: &str) -> bool {
    s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit())
}

fn strip_projection(token: &str) -> (bool, &str) {
    match token.strip_prefix(|c: char| c == 'P' || c == 'p') {
        Some(rest) => (true, rest.strip_prefix('.').unwrap_or(rest)),
        None => (false, token),
    }
}

fn resolve_month(token: &str) -> Option<u8> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    if token.len() <= 2 && token.bytes().all(|b| b.is_ascii_digit()) {
        let n: i32 = token.parse().ok()?;
        return Some((n.clamp(1, 12) - 1) as u8);
    }
    if let Ok(month) = Month::from_str(token) {
        return Some(month.number_from_month() as u8 - 1);
    }
    let lower = token.to_lowercase();
    if let Some(idx) = MONTHS_FR
        .iter()
        .chain(MONTHS_FR_PLAIN.iter())
        .position(|m| *m == lower)
    {
        return Some((idx % 12) as u8);
    }
    // Other spellings ("Sept", "Marc") resolve on their first three letters.
    let head: String = lower.chars().take(3).collect();
    if head.chars().count() == 3 {
        if let Some(idx) = MONTHS_SHORT.iter().position(|m| m.to_lowercase() == head) {
            return Some(idx as u8);
        }
    }
    None
}

/// Chronological comparison of two parsed keys.
pub fn order_periods(a: &PeriodKey, b: &PeriodKey) -> Ordering {
    a.cmp(b)
}

/// Display label for a raw token; invalid tokens are shown as-is.
pub fn format_period(raw: &str, locale: Locale) -> String {
    match PeriodKey::parse(raw) {
        Ok(key) => key.label(locale),
        Err(_) => raw.to_string(),
    }
}

/// Parse, deduplicate and sort a set of raw tokens. Tokens that do not parse
/// are returned separately, in input order, so callers can report them.
pub fn sort_periods<I, S>(raw: I) -> (Vec<PeriodKey>, Vec<String>)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut valid = Vec::new();
    let mut invalid = Vec::new();
    for token in raw {
        let token = token.as_ref();
        match PeriodKey::parse(token) {
            Ok(key) => valid.push(key),
            Err(_) => {
                if !invalid.iter().any(|t: &String| t == token) {
                    invalid.push(token.to_string());
                }
            }
        }
    }
    valid.sort();
    valid.dedup();
    (valid, invalid)
}
