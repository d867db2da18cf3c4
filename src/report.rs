use crate::aggregate::{RegionGroup, RegionSelection};
use crate::classification::Classification;
use crate::compare::{count_directions, ComparisonRow};
use crate::locale::Locale;
use crate::period::PeriodKey;
use crate::trend::TrendSeries;
use crate::util::{format_number, format_signed};
use serde::Serialize;
use std::collections::BTreeMap;
use tabled::Tabled;

const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ComparisonTableRow {
    #[serde(rename = "Region")]
    #[tabled(rename = "Region")]
    pub region: String,
    #[serde(rename = "Classification1")]
    #[tabled(rename = "Classification1")]
    pub classification1: String,
    #[serde(rename = "Population1")]
    #[tabled(rename = "Population1")]
    pub population1: String,
    #[serde(rename = "PopPh2_1")]
    #[tabled(rename = "PopPh2_1")]
    pub pop_ph2_1: String,
    #[serde(rename = "PopPh3_1")]
    #[tabled(rename = "PopPh3_1")]
    pub pop_ph3_1: String,
    #[serde(rename = "Classification2")]
    #[tabled(rename = "Classification2")]
    pub classification2: String,
    #[serde(rename = "Population2")]
    #[tabled(rename = "Population2")]
    pub population2: String,
    #[serde(rename = "PopPh2_2")]
    #[tabled(rename = "PopPh2_2")]
    pub pop_ph2_2: String,
    #[serde(rename = "PopPh3_2")]
    #[tabled(rename = "PopPh3_2")]
    pub pop_ph3_2: String,
    #[serde(rename = "PopulationDelta")]
    #[tabled(rename = "PopulationDelta")]
    pub population_delta: String,
    #[serde(rename = "Ph2Delta")]
    #[tabled(rename = "Ph2Delta")]
    pub ph2_delta: String,
    #[serde(rename = "Ph3Delta")]
    #[tabled(rename = "Ph3Delta")]
    pub ph3_delta: String,
    #[serde(rename = "Change")]
    #[tabled(rename = "Change")]
    pub change: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct TrendTableRow {
    #[serde(rename = "Series")]
    #[tabled(rename = "Series")]
    pub series: String,
    #[serde(rename = "Period")]
    #[tabled(rename = "Period")]
    pub period: String,
    #[serde(rename = "Ph3Share")]
    #[tabled(rename = "Ph3Share")]
    pub ph3_share: String,
}

#[derive(Debug, Serialize)]
pub struct ComparisonSummary {
    pub first_period: String,
    pub second_period: String,
    pub selection: RegionSelection,
    pub rows: usize,
    pub changes: BTreeMap<String, usize>,
    pub total_population_first: f64,
    pub total_population_second: f64,
    pub total_ph3_first: f64,
    pub total_ph3_second: f64,
    pub estimated_members_second: usize,
}

fn classification_cell(c: Option<Classification>, locale: Locale) -> String {
    c.map(|c| c.display_name(locale).to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn population_cell(g: Option<&RegionGroup>, pick: fn(&RegionGroup) -> f64) -> String {
    g.map(|g| format_number(pick(g), 0))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn delta_cell(d: Option<f64>) -> String {
    d.map(|d| format_signed(d, 0))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

pub fn comparison_table(rows: &[ComparisonRow], locale: Locale) -> Vec<ComparisonTableRow> {
    rows.iter()
        .map(|row| {
            let (a, b) = (row.first.as_ref(), row.second.as_ref());
            ComparisonTableRow {
                region: row.group_key.clone(),
                classification1: classification_cell(row.first_classification(), locale),
                population1: population_cell(a, |g| g.total_population),
                pop_ph2_1: population_cell(a, |g| g.total_ph2_population),
                pop_ph3_1: population_cell(a, |g| g.total_ph3_plus_population),
                classification2: classification_cell(row.second_classification(), locale),
                population2: population_cell(b, |g| g.total_population),
                pop_ph2_2: population_cell(b, |g| g.total_ph2_population),
                pop_ph3_2: population_cell(b, |g| g.total_ph3_plus_population),
                population_delta: delta_cell(row.population_delta),
                ph2_delta: delta_cell(row.ph2_delta),
                ph3_delta: delta_cell(row.ph3_delta),
                change: row.change_direction.display_text(locale).to_string(),
            }
        })
        .collect()
}

fn first_side(row: &ComparisonRow) -> Option<&RegionGroup> {
    row.first.as_ref()
}

fn second_side(row: &ComparisonRow) -> Option<&RegionGroup> {
    row.second.as_ref()
}

fn side_total(
    rows: &[ComparisonRow],
    side: fn(&ComparisonRow) -> Option<&RegionGroup>,
    pick: fn(&RegionGroup) -> f64,
) -> f64 {
    rows.iter().filter_map(side).map(pick).sum()
}

pub fn comparison_summary(
    first: &PeriodKey,
    second: &PeriodKey,
    selection: &RegionSelection,
    rows: &[ComparisonRow],
) -> ComparisonSummary {
    ComparisonSummary {
        first_period: first.raw().to_string(),
        second_period: second.raw().to_string(),
        selection: selection.clone(),
        rows: rows.len(),
        changes: count_directions(rows),
        total_population_first: side_total(rows, first_side, |g| g.total_population),
        total_population_second: side_total(rows, second_side, |g| g.total_population),
        total_ph3_first: side_total(rows, first_side, |g| g.total_ph3_plus_population),
        total_ph3_second: side_total(rows, second_side, |g| g.total_ph3_plus_population),
        estimated_members_second: rows
            .iter()
            .filter_map(second_side)
            .map(|g| g.estimated_members)
            .sum(),
    }
}

fn share_cell(v: Option<f64>, locale: Locale) -> String {
    match (v, locale) {
        (Some(v), _) => format!("{}%", format_number(v, 1)),
        (None, Locale::En) => "No data".to_string(),
        (None, Locale::Fr) => "Pas de données".to_string(),
    }
}

/// Long-form rows (one per series and period) for CSV export.
pub fn trend_rows(series: &[TrendSeries], periods: &[PeriodKey], locale: Locale) -> Vec<TrendTableRow> {
    series
        .iter()
        .flat_map(|s| {
            periods.iter().zip(&s.values).map(move |(p, v)| TrendTableRow {
                series: s.label.clone(),
                period: p.short_label(),
                ph3_share: share_cell(*v, locale),
            })
        })
        .collect()
}

/// Wide layout for the console: a header row of periods, one row per series.
pub fn trend_matrix(
    series: &[TrendSeries],
    periods: &[PeriodKey],
    locale: Locale,
) -> (Vec<String>, Vec<Vec<String>>) {
    let mut header = vec![match locale {
        Locale::En => "Series".to_string(),
        Locale::Fr => "Série".to_string(),
    }];
    header.extend(periods.iter().map(PeriodKey::short_label));
    let body = series
        .iter()
        .map(|s| {
            let mut row = vec![s.label.clone()];
            row.extend(s.values.iter().map(|v| share_cell(*v, locale)));
            row
        })
        .collect();
    (header, body)
}
