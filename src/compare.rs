//! Period comparison.
//!
//! Works on two already-aggregated snapshots, so it has no notion of which
//! periods they came from.

use crate::aggregate::RegionGroup;
use crate::classification::Classification;
use crate::locale::Locale;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ChangeDirection {
    Better,
    Worse,
    NoChange,
    NotApplicable,
}

impl ChangeDirection {
    pub const fn display_text(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::Better, Locale::En) => "Better",
            (Self::Better, Locale::Fr) => "Amélioration",
            (Self::Worse, Locale::En) => "Worse",
            (Self::Worse, Locale::Fr) => "Détérioration",
            (Self::NoChange, Locale::En) => "No change",
            (Self::NoChange, Locale::Fr) => "Pas de changement",
            (Self::NotApplicable, _) => "N/A",
        }
    }
}

impl fmt::Display for ChangeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_text(Locale::En))
    }
}

/// One group seen in two periods.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub group_key: String,
    pub first: Option<RegionGroup>,
    pub second: Option<RegionGroup>,
    /// `second - first`; `None` when either side is missing.
    pub population_delta: Option<f64>,
    pub ph2_delta: Option<f64>,
    pub ph3_delta: Option<f64>,
    pub change_direction: ChangeDirection,
}

impl ComparisonRow {
    pub fn first_classification(&self) -> Option<Classification> {
        self.first.as_ref().map(|g| g.worst_classification)
    }

    pub fn second_classification(&self) -> Option<Classification> {
        self.second.as_ref().map(|g| g.worst_classification)
    }
}

/// Compare two snapshots of the same group.
///
/// A missing side yields `NotApplicable` with no deltas. Otherwise the
/// direction follows the worst-classification ranks and the deltas are
/// plain `b - a`.
pub fn compare(a: Option<&RegionGroup>, b: Option<&RegionGroup>) -> ComparisonRow {
    let group_key = a
        .or(b)
        .map(|g| g.group_key.clone())
        .unwrap_or_default();

    let (Some(ga), Some(gb)) = (a, b) else {
        return ComparisonRow {
            group_key,
            first: a.cloned(),
            second: b.cloned(),
            population_delta: None,
            ph2_delta: None,
            ph3_delta: None,
            change_direction: ChangeDirection::NotApplicable,
        };
    };

    let (rank_a, rank_b) = (ga.worst_classification.rank(), gb.worst_classification.rank());
    let change_direction = if rank_b > rank_a {
        ChangeDirection::Worse
    } else if rank_b < rank_a {
        ChangeDirection::Better
    } else {
        ChangeDirection::NoChange
    };

    ComparisonRow {
        group_key,
        first: Some(ga.clone()),
        second: Some(gb.clone()),
        population_delta: Some(gb.total_population - ga.total_population),
        ph2_delta: Some(gb.total_ph2_population - ga.total_ph2_population),
        ph3_delta: Some(gb.total_ph3_plus_population - ga.total_ph3_plus_population),
        change_direction,
    }
}

/// One row per group of the first snapshot, in key order.
pub fn compare_snapshots(
    first: &BTreeMap<String, RegionGroup>,
    second: &BTreeMap<String, RegionGroup>,
) -> Vec<ComparisonRow> {
    first
        .iter()
        .map(|(key, group)| compare(Some(group), second.get(key)))
        .collect()
}

/// Number of rows in each direction, for summaries.
pub fn count_directions(rows: &[ComparisonRow]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for row in rows {
        *counts.entry(row.change_direction.to_string()).or_insert(0) += 1;
    }
    counts
}
