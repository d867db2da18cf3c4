//! Ph3+ share over time.
//!
//! For each country and period, the share of the population in Phase 3 or
//! worse. Points where the country has no population or was not analysed at
//! all are gaps (`None`), never 0%.

use crate::aggregate::{aggregate, RegionSelection};
use crate::classification::Rgb;
use crate::feature::{Feature, POPULATION_PH3_PREFIX};
use crate::palette::{country_color, AVERAGE_COLOR};
use crate::period::{sort_periods, PeriodKey};
use crate::util::average;
use serde::Serialize;
use std::collections::BTreeSet;

/// A named group of countries averaged together (ECOWAS, UEMOA, ...).
#[derive(Debug, Clone, Serialize)]
pub struct RegionalBloc {
    pub key: String,
    pub name: String,
    pub color: Rgb,
    pub countries: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SeriesKind {
    Country,
    Average,
    Bloc,
}

/// One line of the chart: a value per period, `None` where suppressed.
#[derive(Debug, Clone, Serialize)]
pub struct TrendSeries {
    pub label: String,
    pub kind: SeriesKind,
    pub color: Rgb,
    pub values: Vec<Option<f64>>,
}

impl TrendSeries {
    pub fn has_data(&self) -> bool {
        self.values.iter().flatten().any(|v| *v > 0.0)
    }
}

/// Periods that carry Ph3 figures, oldest first. Invalid keys are dropped;
/// `skip_months` holds zero-based month indexes to leave out of the chart.
pub fn trend_periods(features: &[Feature], skip_months: &[u8]) -> Vec<PeriodKey> {
    let tokens: BTreeSet<&str> = features
        .iter()
        .flat_map(|f| f.property_names())
        .filter_map(|k| k.strip_prefix(POPULATION_PH3_PREFIX))
        .filter(|t| !t.is_empty())
        .collect();
    let (mut periods, _invalid) = sort_periods(tokens);
    periods.retain(|p| !skip_months.contains(&p.month_index()));
    periods
}

/// Countries present in the data, sorted.
pub fn available_countries(features: &[Feature]) -> Vec<String> {
    features
        .iter()
        .filter_map(|f| f.admin0_name.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn country_share(features: &[Feature], country: &str, period: &PeriodKey) -> Option<f64> {
    let groups = aggregate(features, period, &RegionSelection::all());
    groups.get(country).and_then(|g| g.ph3_share())
}

pub fn country_series(features: &[Feature], country: &str, periods: &[PeriodKey]) -> TrendSeries {
    TrendSeries {
        label: country.to_string(),
        kind: SeriesKind::Country,
        color: country_color(country),
        values: periods
            .iter()
            .map(|p| country_share(features, country, p))
            .collect(),
    }
}

/// Mean of the countries' positive shares for one period; `None` when no
/// country has one.
pub fn mean_share<S: AsRef<str>>(features: &[Feature], countries: &[S], period: &PeriodKey) -> Option<f64> {
    let groups = aggregate(features, period, &RegionSelection::all());
    let values: Vec<f64> = countries
        .iter()
        .filter_map(|c| groups.get(c.as_ref()).and_then(|g| g.ph3_share()))
        .filter(|v| *v > 0.0)
        .collect();
    (!values.is_empty()).then(|| average(&values))
}

pub fn average_series<S: AsRef<str>>(
    features: &[Feature],
    countries: &[S],
    periods: &[PeriodKey],
    label: &str,
) -> TrendSeries {
    TrendSeries {
        label: label.to_string(),
        kind: SeriesKind::Average,
        color: AVERAGE_COLOR,
        values: periods
            .iter()
            .map(|p| mean_share(features, countries, p))
            .collect(),
    }
}

pub fn bloc_series(features: &[Feature], bloc: &RegionalBloc, periods: &[PeriodKey]) -> TrendSeries {
    TrendSeries {
        label: bloc.name.clone(),
        kind: SeriesKind::Bloc,
        color: bloc.color,
        values: periods
            .iter()
            .map(|p| mean_share(features, bloc.countries.as_slice(), p))
            .collect(),
    }
}

/// Regional organisations of the Cadre Harmonisé area.
pub fn default_blocs() -> Vec<RegionalBloc> {
    let bloc = |key: &str, name: &str, color: Rgb, countries: &[&str]| RegionalBloc {
        key: key.to_string(),
        name: name.to_string(),
        color,
        countries: countries.iter().map(|c| c.to_string()).collect(),
    };
    vec![
        bloc(
            "ECOWAS",
            "ECOWAS",
            Rgb(0x1f, 0x4e, 0x9c),
            &[
                "Benin", "Burkina Faso", "Cabo Verde", "Côte d'Ivoire", "Gambia", "Ghana",
                "Guinea", "Guinea-Bissau", "Liberia", "Mali", "Niger", "Nigeria", "Senegal",
                "Sierra Leone", "Togo",
            ],
        ),
        bloc(
            "UEMOA",
            "UEMOA",
            Rgb(0x0b, 0x8a, 0x4a),
            &[
                "Benin", "Burkina Faso", "Côte d'Ivoire", "Guinea-Bissau", "Mali", "Niger",
                "Senegal", "Togo",
            ],
        ),
        bloc(
            "CILSS",
            "CILSS",
            Rgb(0xc0, 0x7a, 0x12),
            &[
                "Benin", "Burkina Faso", "Cabo Verde", "Chad", "Côte d'Ivoire", "Gambia",
                "Guinea", "Guinea-Bissau", "Mali", "Mauritania", "Niger", "Senegal", "Togo",
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn feature(props: Value) -> Feature {
        match props {
            Value::Object(map) => Feature::from_properties(map),
            _ => unreachable!(),
        }
    }

    fn sample() -> Vec<Feature> {
        vec![
            feature(json!({
                "admin0Name": "Mali",
                "classification_March-2024": "Phase 3 : crises",
                "population_total_March-2024": "1,000",
                "population_ph3_March-2024": "200",
                "classification_June-2024": "Phase 2 : sous pression",
                "population_total_June-2024": 1000,
                "population_ph3_June-2024": 50,
                "classification_October-2024": "Phase 2 : sous pression",
                "population_total_October-2024": 1000,
                "population_ph3_October-2024": 100
            })),
            feature(json!({
                "admin0Name": "Niger",
                "classification_March-2024": "Non analysée",
                "population_total_March-2024": 5000,
                "population_ph3_March-2024": 0,
                "classification_October-2024": "Phase 3 : crises",
                "population_total_October-2024": 2000,
                "population_ph3_October-2024": 600,
                "population_ph3_bogus": 1
            })),
        ]
    }

    #[test]
    fn discovers_and_filters_periods() {
        let all = trend_periods(&sample(), &[]);
        let raws: Vec<&str> = all.iter().map(PeriodKey::raw).collect();
        assert_eq!(raws, vec!["March-2024", "June-2024", "October-2024"]);

        let no_june = trend_periods(&sample(), &[5]);
        let raws: Vec<&str> = no_june.iter().map(PeriodKey::raw).collect();
        assert_eq!(raws, vec!["March-2024", "October-2024"]);
    }

    #[test]
    fn non_analysed_country_is_a_gap() {
        let features = sample();
        let periods = trend_periods(&features, &[5]);
        let niger = country_series(&features, "Niger", &periods);
        assert_eq!(niger.values, vec![None, Some(30.0)]);
        let mali = country_series(&features, "Mali", &periods);
        assert_eq!(mali.values, vec![Some(20.0), Some(10.0)]);
        assert!(mali.has_data());
    }

    #[test]
    fn average_ignores_gaps() {
        let features = sample();
        let periods = trend_periods(&features, &[5]);
        let countries = available_countries(&features);
        assert_eq!(countries, vec!["Mali".to_string(), "Niger".to_string()]);
        let avg = average_series(&features, countries.as_slice(), &periods, "CH Average");
        assert_eq!(avg.values, vec![Some(20.0), Some(20.0)]);
        assert_eq!(avg.kind, SeriesKind::Average);
    }

    #[test]
    fn bloc_without_data_has_no_points() {
        let features = sample();
        let periods = trend_periods(&features, &[]);
        let bloc = RegionalBloc {
            key: "X".to_string(),
            name: "Nobody".to_string(),
            color: Rgb::WHITE,
            countries: vec!["Ghana".to_string()],
        };
        let series = bloc_series(&features, &bloc, &periods);
        assert!(series.values.iter().all(Option::is_none));
        assert!(!series.has_data());
    }

    #[test]
    fn default_blocs_are_known() {
        let blocs = default_blocs();
        assert!(blocs.iter().any(|b| b.key == "ECOWAS" && b.countries.iter().any(|c| c == "Mali")));
    }
}
