//! Region aggregation.
//!
//! Groups features at one administrative level for one period and sums
//! their population figures. The grouping level follows from how deep the
//! selection goes: nothing selected compares countries, a country compares
//! its regions, a region compares its districts, and a full selection
//! yields just that district.

use crate::classification::Classification;
use crate::feature::Feature;
use crate::period::PeriodKey;
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;

pub const UNKNOWN_COUNTRY: &str = "Unknown Country";
pub const UNKNOWN_REGION: &str = "Unknown Region";
pub const UNKNOWN_DISTRICT: &str = "Unknown District";

/// Which part of the admin hierarchy is selected. Empty strings count as
/// unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegionSelection {
    pub admin0: Option<String>,
    pub admin1: Option<String>,
    pub admin2: Option<String>,
}

/// Administrative level the groups are keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GroupLevel {
    Admin0,
    Admin1,
    Admin2,
    /// Fully specified selection: one exact district.
    Exact,
}

impl RegionSelection {
    pub fn new(admin0: Option<&str>, admin1: Option<&str>, admin2: Option<&str>) -> Self {
        let clean = |s: Option<&str>| {
            s.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Self {
            admin0: clean(admin0),
            admin1: clean(admin1),
            admin2: clean(admin2),
        }
    }

    pub fn all() -> Self {
        Self::default()
    }

    pub fn country(admin0: &str) -> Self {
        Self::new(Some(admin0), None, None)
    }

    fn admin0(&self) -> Option<&str> {
        self.admin0.as_deref().filter(|s| !s.is_empty())
    }

    fn admin1(&self) -> Option<&str> {
        self.admin1.as_deref().filter(|s| !s.is_empty())
    }

    fn admin2(&self) -> Option<&str> {
        self.admin2.as_deref().filter(|s| !s.is_empty())
    }

    /// Level at which rows are produced. An admin1 or admin2 without its
    /// parent is ignored, as is an admin2 without an admin1.
    pub fn level(&self) -> GroupLevel {
        match (self.admin0(), self.admin1(), self.admin2()) {
            (Some(_), None, _) => GroupLevel::Admin1,
            (Some(_), Some(_), None) => GroupLevel::Admin2,
            (Some(_), Some(_), Some(_)) => GroupLevel::Exact,
            (None, _, _) => GroupLevel::Admin0,
        }
    }

    /// Group key for a feature under this selection, or `None` when the
    /// feature falls outside it. Missing names take the placeholder, and a
    /// selected placeholder matches them.
    fn group_key(&self, f: &Feature) -> Option<String> {
        let admin0 = f.admin0_name.as_deref().unwrap_or(UNKNOWN_COUNTRY);
        let admin1 = f.admin1_name.as_deref().unwrap_or(UNKNOWN_REGION);
        let admin2 = f.admin2_name.as_deref().unwrap_or(UNKNOWN_DISTRICT);
        let key = match (self.admin0(), self.admin1(), self.admin2()) {
            (None, _, _) => admin0,
            (Some(a0), None, _) => (admin0 == a0).then_some(admin1)?,
            (Some(a0), Some(a1), None) => (admin0 == a0 && admin1 == a1).then_some(admin2)?,
            (Some(a0), Some(a1), Some(a2)) => {
                (admin0 == a0 && admin1 == a1 && admin2 == a2).then_some(admin2)?
            }
        };
        Some(key.to_string())
    }
}

/// Aggregated figures for one group and one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionGroup {
    pub group_key: String,
    pub member_count: usize,
    pub total_population: f64,
    pub total_ph2_population: f64,
    pub total_ph3_plus_population: f64,
    pub worst_classification: Classification,
    pub all_non_analyzed: bool,
    /// Members whose figures for the period are flagged as estimates.
    pub estimated_members: usize,
}

impl RegionGroup {
    /// A group with no members. Distinct from a populated group whose sums
    /// happen to be zero.
    pub fn empty(group_key: impl Into<String>) -> Self {
        Self {
            group_key: group_key.into(),
            member_count: 0,
            total_population: 0.0,
            total_ph2_population: 0.0,
            total_ph3_plus_population: 0.0,
            worst_classification: Classification::NonAnalysee,
            all_non_analyzed: true,
            estimated_members: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.member_count == 0
    }

    fn add(&mut self, f: &Feature, period: &PeriodKey) {
        self.member_count += 1;
        self.total_population += f.population_total(period);
        self.total_ph2_population += f.population_ph2(period);
        self.total_ph3_plus_population += f.population_ph3(period);
        let class = f.classification(period).unwrap_or(Classification::NonAnalysee);
        if class > self.worst_classification {
            self.worst_classification = class;
        }
        if !f.is_non_analyzed(period) {
            self.all_non_analyzed = false;
        }
        if f.is_estimate(period) {
            self.estimated_members += 1;
        }
    }

    /// Percentage of the population in Phase 3 or worse. `None` when there
    /// is no population to divide by or nothing in the group was analysed,
    /// so the point is left out instead of shown as 0%.
    pub fn ph3_share(&self) -> Option<f64> {
        if self.total_population > 0.0
            && self.total_ph3_plus_population >= 0.0
            && !self.all_non_analyzed
        {
            Some(self.total_ph3_plus_population * 100.0 / self.total_population)
        } else {
            None
        }
    }
}

/// Aggregate `features` for one period under `selection`.
///
/// Only features carrying at least one property for `period` are members,
/// so a group with no data in that period is absent from the map. Missing or
/// unparseable population figures of a member count as 0, so a member with
/// partial data still contributes what it has.
pub fn aggregate(
    features: &[Feature],
    period: &PeriodKey,
    selection: &RegionSelection,
) -> BTreeMap<String, RegionGroup> {
    let mut groups: BTreeMap<String, RegionGroup> = BTreeMap::new();
    for f in features.iter().filter(|f| f.has_period_data(period)) {
        let Some(key) = selection.group_key(f) else {
            continue;
        };
        groups
            .entry(key.clone())
            .or_insert_with(|| RegionGroup::empty(key))
            .add(f, period);
    }
    debug!(
        "aggregated {} features into {} groups for {} at {:?}",
        features.len(),
        groups.len(),
        period,
        selection.level()
    );
    groups
}

/// [`aggregate`] for several periods at once, keyed by period.
pub fn aggregate_all(
    features: &[Feature],
    periods: &[PeriodKey],
    selection: &RegionSelection,
) -> BTreeMap<PeriodKey, BTreeMap<String, RegionGroup>> {
    periods
        .iter()
        .map(|p| (p.clone(), aggregate(features, p, selection)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::{compare_snapshots, ChangeDirection};
    use serde_json::{json, Value};

    fn feature(props: Value) -> Feature {
        match props {
            Value::Object(map) => Feature::from_properties(map),
            _ => unreachable!(),
        }
    }

    fn period() -> PeriodKey {
        PeriodKey::parse("March-2024").unwrap()
    }

    fn sample() -> Vec<Feature> {
        vec![
            feature(json!({
                "admin0Name": "Mali", "admin1Name": "Kayes", "admin2Name": "Bafoulabé",
                "classification_March-2024": "Phase 2 : sous pression",
                "population_total_March-2024": "1,000",
                "population_ph2_March-2024": "300",
                "population_ph3_March-2024": "100"
            })),
            feature(json!({
                "admin0Name": "Mali", "admin1Name": "Kayes", "admin2Name": "Kita",
                "classification_March-2024": "Phase 3 : crises",
                "population_total_March-2024": "2,500",
                "population_ph2_March-2024": 500,
                "level_March-2024": 1
            })),
            feature(json!({
                "admin0Name": "Mali", "admin1Name": "Mopti", "admin2Name": "Bandiagara",
                "classification_March-2024": "Non analysée",
                "population_total_March-2024": 700
            })),
            feature(json!({
                "admin0Name": "Niger", "admin1Name": "Tahoua",
                "classification_March-2024": "Phase 4 : urgence",
                "population_total_March-2024": 4000,
                "population_ph3_March-2024": 1000
            })),
        ]
    }

    #[test]
    fn empty_input_gives_empty_map() {
        assert!(aggregate(&[], &period(), &RegionSelection::all()).is_empty());
    }

    #[test]
    fn groups_by_country_when_nothing_selected() {
        let groups = aggregate(&sample(), &period(), &RegionSelection::all());
        assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["Mali", "Niger"]);
        let mali = &groups["Mali"];
        assert_eq!(mali.member_count, 3);
        assert_eq!(mali.total_population, 4200.0);
        assert_eq!(mali.worst_classification, Classification::Phase3);
        assert!(!mali.all_non_analyzed);
        assert_eq!(mali.estimated_members, 1);
    }

    #[test]
    fn sums_comma_formatted_population_within_admin1() {
        let groups = aggregate(&sample(), &period(), &RegionSelection::country("Mali"));
        let kayes = &groups["Kayes"];
        assert_eq!(kayes.total_population, 3500.0);
        assert_eq!(kayes.total_ph2_population, 800.0);
        assert_eq!(kayes.total_ph3_plus_population, 100.0);
    }

    #[test]
    fn all_non_analyzed_group() {
        let groups = aggregate(&sample(), &period(), &RegionSelection::country("Mali"));
        let mopti = &groups["Mopti"];
        assert!(mopti.all_non_analyzed);
        assert_eq!(mopti.worst_classification, Classification::NonAnalysee);
        assert_eq!(mopti.worst_classification.label(), "Non analysée");
        assert_eq!(mopti.ph3_share(), None);
    }

    #[test]
    fn groups_by_district_within_region() {
        let sel = RegionSelection::new(Some("Mali"), Some("Kayes"), None);
        assert_eq!(sel.level(), GroupLevel::Admin2);
        let groups = aggregate(&sample(), &period(), &sel);
        assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["Bafoulabé", "Kita"]);
    }

    #[test]
    fn exact_selection_yields_single_or_no_group() {
        let sel = RegionSelection::new(Some("Mali"), Some("Kayes"), Some("Kita"));
        let groups = aggregate(&sample(), &period(), &sel);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups["Kita"].member_count, 1);

        let sel = RegionSelection::new(Some("Mali"), Some("Kayes"), Some("Nowhere"));
        assert!(aggregate(&sample(), &period(), &sel).is_empty());
    }

    #[test]
    fn missing_admin1_uses_placeholder() {
        let features = vec![feature(json!({
            "admin0Name": "Chad",
            "classification_March-2024": "Non analysée"
        }))];
        let groups = aggregate(&features, &period(), &RegionSelection::country("Chad"));
        let g = &groups[UNKNOWN_REGION];
        assert_eq!(g.member_count, 1);
        assert_eq!(g.total_population, 0.0);
        assert!(!g.is_empty());
        assert!(RegionGroup::empty("x").is_empty());
    }

    #[test]
    fn selected_placeholder_matches_missing_names() {
        let features = vec![feature(json!({
            "admin0Name": "Chad",
            "population_total_March-2024": 900
        }))];
        let sel = RegionSelection::new(Some("Chad"), Some(UNKNOWN_REGION), None);
        let groups = aggregate(&features, &period(), &sel);
        assert_eq!(groups[UNKNOWN_DISTRICT].total_population, 900.0);

        let sel = RegionSelection::new(Some("Chad"), Some(UNKNOWN_REGION), Some(UNKNOWN_DISTRICT));
        assert_eq!(aggregate(&features, &period(), &sel).len(), 1);
    }

    #[test]
    fn features_without_period_data_are_not_members() {
        let features = vec![
            feature(json!({
                "admin0Name": "Mali",
                "classification_March-2024": "Phase 2 : sous pression",
                "population_total_March-2024": 1000,
                "classification_October-2024": "Phase 3 : crises",
                "population_total_October-2024": 1200
            })),
            feature(json!({
                "admin0Name": "Niger",
                "classification_March-2024": "Phase 3 : crises",
                "population_total_March-2024": 1000
            })),
        ];
        let october = PeriodKey::parse("October-2024").unwrap();
        let first = aggregate(&features, &period(), &RegionSelection::all());
        let second = aggregate(&features, &october, &RegionSelection::all());
        assert!(!second.contains_key("Niger"));

        let rows = compare_snapshots(&first, &second);
        let niger = rows.iter().find(|r| r.group_key == "Niger").unwrap();
        assert_eq!(niger.change_direction, ChangeDirection::NotApplicable);
        assert_eq!(niger.population_delta, None);
        assert_eq!(niger.ph3_delta, None);
        assert!(niger.second.is_none());

        let mali = rows.iter().find(|r| r.group_key == "Mali").unwrap();
        assert_eq!(mali.change_direction, ChangeDirection::Worse);
        assert_eq!(mali.population_delta, Some(200.0));
    }

    #[test]
    fn blank_selection_fields_are_unset() {
        let sel = RegionSelection::new(Some(" "), Some(""), None);
        assert_eq!(sel, RegionSelection::all());
        assert_eq!(sel.level(), GroupLevel::Admin0);
    }

    #[test]
    fn share_of_ph3() {
        let groups = aggregate(&sample(), &period(), &RegionSelection::all());
        assert_eq!(groups["Niger"].ph3_share(), Some(25.0));
    }

    #[test]
    fn aggregates_several_periods() {
        let periods = vec![period(), PeriodKey::parse("October-2024").unwrap()];
        let all = aggregate_all(&sample(), &periods, &RegionSelection::all());
        assert_eq!(all.len(), 2);
        assert_eq!(all[&periods[0]]["Mali"].member_count, 3);
        assert!(all[&periods[1]].is_empty());
    }
}
