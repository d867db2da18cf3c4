//! Cadre Harmonisé classification scale.
//!
//! One table holds the label, severity rank, colour and translations of
//! every level; map fills, table cells and worst-case selection all read
//! from it.

use crate::locale::Locale;
use serde::{Serialize, Serializer};
use std::fmt;

/// A display colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(0xff, 0xff, 0xff);

    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(s: &str) -> Option<Rgb> {
        let s = s.trim().trim_start_matches('#');
        if s.len() != 6 || !s.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).ok();
        Some(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Severity level of an area for one period.
///
/// Variants are declared in rank order, so the derived `Ord` is the
/// severity order. `Inaccessible` sorts after `Phase5` for display only and
/// has no phase number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Classification {
    NonAnalysee,
    Phase1,
    Phase2,
    Phase3,
    Phase4,
    Phase5,
    Inaccessible,
}

pub const NON_ANALYSEE_LABEL: &str = "Non analysée";

const SCALE: [Classification; 7] = [
    Classification::NonAnalysee,
    Classification::Phase1,
    Classification::Phase2,
    Classification::Phase3,
    Classification::Phase4,
    Classification::Phase5,
    Classification::Inaccessible,
];

impl Classification {
    pub fn all() -> &'static [Classification] {
        &SCALE
    }

    /// Canonical label as written in the dataset.
    pub const fn label(self) -> &'static str {
        match self {
            Self::NonAnalysee => NON_ANALYSEE_LABEL,
            Self::Phase1 => "Phase 1 : minimal",
            Self::Phase2 => "Phase 2 : sous pression",
            Self::Phase3 => "Phase 3 : crises",
            Self::Phase4 => "Phase 4 : urgence",
            Self::Phase5 => "Phase 5 : famine",
            Self::Inaccessible => "inaccessible",
        }
    }

    pub const fn rank(self) -> u8 {
        match self {
            Self::NonAnalysee => 0,
            Self::Phase1 => 1,
            Self::Phase2 => 2,
            Self::Phase3 => 3,
            Self::Phase4 => 4,
            Self::Phase5 => 5,
            Self::Inaccessible => 6,
        }
    }

    pub fn from_rank(rank: u8) -> Option<Self> {
        SCALE.get(rank as usize).copied()
    }

    /// Numeric phase for arithmetic. `None` for the two sentinels so they
    /// can never leak into averages as a phase 0 or 6.
    pub const fn phase_number(self) -> Option<u8> {
        match self {
            Self::NonAnalysee | Self::Inaccessible => None,
            other => Some(other.rank()),
        }
    }

    pub const fn color(self) -> Rgb {
        match self {
            Self::NonAnalysee => Rgb::WHITE,
            Self::Phase1 => Rgb(0xd3, 0xf3, 0xd4),
            Self::Phase2 => Rgb(0xff, 0xe2, 0x52),
            Self::Phase3 => Rgb(0xfa, 0x89, 0x0f),
            Self::Phase4 => Rgb(0xeb, 0x33, 0x33),
            Self::Phase5 => Rgb(0x60, 0x09, 0x0b),
            Self::Inaccessible => Rgb(0xcc, 0xcc, 0xcc),
        }
    }

    pub const fn display_name(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::NonAnalysee, Locale::En) => "Not analysed",
            (Self::NonAnalysee, Locale::Fr) => "Non analysée",
            (Self::Phase1, Locale::En) => "Phase 1: Minimal",
            (Self::Phase1, Locale::Fr) => "Phase 1 : Minimal",
            (Self::Phase2, Locale::En) => "Phase 2: Stressed",
            (Self::Phase2, Locale::Fr) => "Phase 2 : Sous pression",
            (Self::Phase3, Locale::En) => "Phase 3: Crisis",
            (Self::Phase3, Locale::Fr) => "Phase 3 : Crise",
            (Self::Phase4, Locale::En) => "Phase 4: Emergency",
            (Self::Phase4, Locale::Fr) => "Phase 4 : Urgence",
            (Self::Phase5, Locale::En) => "Phase 5: Famine",
            (Self::Phase5, Locale::Fr) => "Phase 5 : Famine",
            (Self::Inaccessible, Locale::En) => "Inaccessible",
            (Self::Inaccessible, Locale::Fr) => "Inaccessible",
        }
    }

    /// Recognise a dataset label. Accepts the canonical form
    /// (`"Phase 3 : crises"`), the legend form (`"Phase 3"`), and is
    /// tolerant of case and spacing. Unknown labels are `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        let norm = label.trim().to_lowercase();
        if norm.is_empty() {
            return None;
        }
        if let Some(c) = SCALE.iter().find(|c| c.label().to_lowercase() == norm) {
            return Some(*c);
        }
        match norm.as_str() {
            "non analysee" | "non analysé" | "non analyse" | "not analysed" | "not analyzed" => {
                return Some(Self::NonAnalysee)
            }
            _ => {}
        }
        let rest = norm.strip_prefix("phase")?.trim_start();
        let digit = rest.chars().next()?.to_digit(10)?;
        let tail = rest[1..].trim_start();
        if !(tail.is_empty() || tail.starts_with(':')) {
            return None;
        }
        match digit {
            1..=5 => Self::from_rank(digit as u8),
            _ => None,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Classification {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Rank of a raw label; unknown and empty labels rank 0.
pub fn severity_rank(label: &str) -> u8 {
    Classification::from_label(label).map_or(0, Classification::rank)
}

/// Canonical label for a rank; out-of-range ranks fall back to the
/// non-analysed sentinel.
pub fn rank_to_label(rank: u8) -> &'static str {
    Classification::from_rank(rank)
        .unwrap_or(Classification::NonAnalysee)
        .label()
}

/// Fill colour for a raw label; unknown labels are white.
pub fn color_for(label: &str) -> Rgb {
    Classification::from_label(label).map_or(Rgb::WHITE, Classification::color)
}

/// Translated display text for a raw label. Unknown labels are shown
/// verbatim, empty ones as "Unknown".
pub fn translate_label(label: &str, locale: Locale) -> String {
    match Classification::from_label(label) {
        Some(c) => c.display_name(locale).to_string(),
        None if label.trim().is_empty() => match locale {
            Locale::En => "Unknown".to_string(),
            Locale::Fr => "Inconnu".to_string(),
        },
        None => label.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_follow_scale() {
        assert_eq!(severity_rank("Non analysée"), 0);
        assert_eq!(severity_rank("Phase 1 : minimal"), 1);
        assert_eq!(severity_rank("Phase 4 : urgence"), 4);
        assert_eq!(severity_rank("Phase 5 : famine"), 5);
        assert_eq!(severity_rank("inaccessible"), 6);
        assert!(Classification::Inaccessible > Classification::Phase5);
        for c in Classification::all() {
            assert_eq!(rank_to_label(c.rank()), c.label());
            assert_eq!(severity_rank(c.label()), c.rank());
        }
    }

    #[test]
    fn unknown_labels_are_neutral() {
        assert_eq!(severity_rank("Phase 9"), 0);
        assert_eq!(severity_rank(""), 0);
        assert_eq!(severity_rank("something else"), 0);
        assert_eq!(color_for("something else"), Rgb::WHITE);
        assert_eq!(rank_to_label(42), "Non analysée");
    }

    #[test]
    fn lenient_label_forms() {
        assert_eq!(Classification::from_label("Phase 3"), Some(Classification::Phase3));
        assert_eq!(
            Classification::from_label("  phase 2 : SOUS PRESSION "),
            Some(Classification::Phase2)
        );
        assert_eq!(Classification::from_label("Phase 33"), None);
        assert_eq!(Classification::from_label("INACCESSIBLE"), Some(Classification::Inaccessible));
    }

    #[test]
    fn colors_match_legend() {
        assert_eq!(color_for("Phase 3 : crises").to_hex(), "#fa890f");
        assert_eq!(color_for("Phase 5 : famine").to_hex(), "#60090b");
        assert_eq!(color_for("inaccessible").to_hex(), "#cccccc");
        assert_eq!(Rgb::from_hex("#D3F3D4"), Some(Classification::Phase1.color()));
    }

    #[test]
    fn sentinels_have_no_phase_number() {
        assert_eq!(Classification::NonAnalysee.phase_number(), None);
        assert_eq!(Classification::Inaccessible.phase_number(), None);
        assert_eq!(Classification::Phase3.phase_number(), Some(3));
    }

    #[test]
    fn translations() {
        assert_eq!(translate_label("Phase 4 : urgence", Locale::En), "Phase 4: Emergency");
        assert_eq!(translate_label("Non analysée", Locale::Fr), "Non analysée");
        assert_eq!(translate_label("", Locale::Fr), "Inconnu");
        assert_eq!(translate_label("Autre", Locale::En), "Autre");
    }
}
