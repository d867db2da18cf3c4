use crate::classification::Classification;
use crate::period::PeriodKey;
use crate::util::{population_or_zero, value_is_flag_set};
use serde::Deserialize;
use serde_json::{Map, Value};

pub const CLASSIFICATION_PREFIX: &str = "classification_";
pub const POPULATION_TOTAL_PREFIX: &str = "population_total_";
pub const POPULATION_PH2_PREFIX: &str = "population_ph2_";
pub const POPULATION_PH3_PREFIX: &str = "population_ph3_";
pub const LEVEL_PREFIX: &str = "level_";

/// Every period-suffixed property family a feature may carry.
pub const PERIOD_PREFIXES: [&str; 5] = [
    CLASSIFICATION_PREFIX,
    POPULATION_TOTAL_PREFIX,
    POPULATION_PH2_PREFIX,
    POPULATION_PH3_PREFIX,
    LEVEL_PREFIX,
];

/// Raw GeoJSON feature as found in the collection. Geometry is not used by
/// the engine and is not kept.
#[derive(Debug, Deserialize)]
pub struct RawFeature {
    #[serde(default)]
    pub properties: Value,
}

/// One administrative area with all of its period-suffixed properties.
#[derive(Debug, Clone, Default)]
pub struct Feature {
    pub admin0_name: Option<String>,
    pub admin1_name: Option<String>,
    pub admin2_name: Option<String>,
    properties: Map<String, Value>,
}

impl Feature {
    /// Build from a GeoJSON `properties` object. Empty admin names are
    /// treated as absent.
    pub fn from_properties(properties: Map<String, Value>) -> Self {
        let name = |key: &str| {
            properties
                .get(key)
                .and_then(|v| match v {
                    Value::String(s) => Some(s.trim().to_string()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .filter(|s| !s.is_empty())
        };
        Self {
            admin0_name: name("admin0Name"),
            admin1_name: name("admin1Name"),
            admin2_name: name("admin2Name"),
            properties,
        }
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    /// Raw classification label for the period, if present and non-empty.
    pub fn classification_label(&self, period: &PeriodKey) -> Option<&str> {
        self.property(&period.field(CLASSIFICATION_PREFIX))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Parsed classification; missing or unknown labels are `None`.
    pub fn classification(&self, period: &PeriodKey) -> Option<Classification> {
        self.classification_label(period)
            .and_then(Classification::from_label)
    }

    /// True when the label is absent or reads as the non-analysed sentinel
    /// (any spelling [`Classification::from_label`] accepts).
    pub fn is_non_analyzed(&self, period: &PeriodKey) -> bool {
        match self.classification_label(period) {
            None => true,
            Some(label) => Classification::from_label(label) == Some(Classification::NonAnalysee),
        }
    }

    /// Whether any period-suffixed property for `period` is present and
    /// non-null. Features without one take no part in that period.
    pub fn has_period_data(&self, period: &PeriodKey) -> bool {
        PERIOD_PREFIXES
            .iter()
            .any(|prefix| self.property(&period.field(prefix)).is_some_and(|v| !v.is_null()))
    }

    pub fn population_total(&self, period: &PeriodKey) -> f64 {
        population_or_zero(self.property(&period.field(POPULATION_TOTAL_PREFIX)))
    }

    pub fn population_ph2(&self, period: &PeriodKey) -> f64 {
        population_or_zero(self.property(&period.field(POPULATION_PH2_PREFIX)))
    }

    pub fn population_ph3(&self, period: &PeriodKey) -> f64 {
        population_or_zero(self.property(&period.field(POPULATION_PH3_PREFIX)))
    }

    /// Whether the figures for this period are a carried-forward or
    /// aggregated estimate rather than a direct observation.
    pub fn is_estimate(&self, period: &PeriodKey) -> bool {
        value_is_flag_set(self.property(&period.field(LEVEL_PREFIX)))
    }

    /// Raw period tokens appearing in this feature's property names.
    pub fn period_tokens(&self) -> impl Iterator<Item = &str> {
        self.property_names().filter_map(|key| {
            PERIOD_PREFIXES
                .iter()
                .find_map(|prefix| key.strip_prefix(prefix))
                .filter(|rest| !rest.is_empty())
        })
    }
}
