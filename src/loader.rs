use crate::error::{EngineError, Result};
use crate::feature::{Feature, RawFeature};
use crate::period::{sort_periods, PeriodKey};
use log::{debug, info, warn};
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct LoadReport {
    pub total_features: usize,
    pub loaded_features: usize,
    pub skipped_features: usize,
    /// Valid period keys found in property names, oldest first.
    pub periods: Vec<PeriodKey>,
    /// Period-like suffixes that did not parse as a month and year.
    pub invalid_periods: Vec<String>,
}

/// Load a GeoJSON FeatureCollection from disk.
pub fn load_features<P: AsRef<Path>>(path: P) -> Result<(Vec<Feature>, LoadReport)> {
    let path = path.as_ref();
    debug!("reading feature collection from {}", path.display());
    let text = std::fs::read_to_string(path)?;
    parse_feature_collection(&text)
}

/// Parse a FeatureCollection document.
///
/// Features whose `properties` is not an object are skipped and counted
/// rather than failing the whole load.
pub fn parse_feature_collection(text: &str) -> Result<(Vec<Feature>, LoadReport)> {
    let doc: Value = serde_json::from_str(text)?;

    match doc.get("type").and_then(Value::as_str) {
        None | Some("FeatureCollection") => {}
        Some(other) => {
            return Err(EngineError::NotAFeatureCollection(format!(
                "type is {other:?}"
            )))
        }
    }
    let raw_features = doc
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| EngineError::NotAFeatureCollection("missing features array".to_string()))?;

    let total_features = raw_features.len();
    let mut skipped_features = 0usize;
    let mut features: Vec<Feature> = Vec::with_capacity(total_features);

    for (idx, raw) in raw_features.iter().enumerate() {
        let parsed = match serde_json::from_value::<RawFeature>(raw.clone()) {
            Ok(f) => f,
            Err(e) => {
                warn!("skipping feature #{idx}: {e}");
                skipped_features += 1;
                continue;
            }
        };
        match parsed.properties {
            Value::Object(map) => features.push(Feature::from_properties(map)),
            _ => {
                warn!("skipping feature #{idx}: properties is not an object");
                skipped_features += 1;
            }
        }
    }

    let tokens: BTreeSet<&str> = features.iter().flat_map(Feature::period_tokens).collect();
    let (periods, invalid_periods) = sort_periods(tokens);
    for token in &invalid_periods {
        warn!("ignoring unparseable period key {token:?}");
    }

    let report = LoadReport {
        total_features,
        loaded_features: features.len(),
        skipped_features,
        periods,
        invalid_periods,
    };
    info!(
        "loaded {} of {} features, {} periods",
        report.loaded_features,
        report.total_features,
        report.periods.len()
    );
    Ok((features, report))
}
