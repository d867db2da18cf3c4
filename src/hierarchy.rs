use crate::aggregate::{UNKNOWN_COUNTRY, UNKNOWN_DISTRICT, UNKNOWN_REGION};
use crate::feature::Feature;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Country → region → districts, as offered in region pickers.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RegionHierarchy {
    tree: BTreeMap<String, BTreeMap<String, BTreeSet<String>>>,
}

impl RegionHierarchy {
    pub fn from_features(features: &[Feature]) -> Self {
        let mut tree: BTreeMap<String, BTreeMap<String, BTreeSet<String>>> = BTreeMap::new();
        for f in features {
            let admin0 = f.admin0_name.as_deref().unwrap_or(UNKNOWN_COUNTRY);
            let admin1 = f.admin1_name.as_deref().unwrap_or(UNKNOWN_REGION);
            let admin2 = f.admin2_name.as_deref().unwrap_or(UNKNOWN_DISTRICT);
            tree.entry(admin0.to_string())
                .or_default()
                .entry(admin1.to_string())
                .or_default()
                .insert(admin2.to_string());
        }
        Self { tree }
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn admin0_options(&self) -> Vec<&str> {
        self.tree.keys().map(String::as_str).collect()
    }

    pub fn admin1_options(&self, admin0: &str) -> Vec<&str> {
        self.tree
            .get(admin0)
            .map(|regions| regions.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Districts of one region, or of the whole country when no region is
    /// given (deduplicated and sorted).
    pub fn admin2_options(&self, admin0: &str, admin1: Option<&str>) -> Vec<&str> {
        let Some(regions) = self.tree.get(admin0) else {
            return Vec::new();
        };
        match admin1 {
            Some(a1) => regions
                .get(a1)
                .map(|d| d.iter().map(String::as_str).collect())
                .unwrap_or_default(),
            None => regions
                .values()
                .flatten()
                .map(String::as_str)
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
        }
    }
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

    #[test]
    fn builds_sorted_options() {
        let features = vec![
            feature(json!({"admin0Name": "Mali", "admin1Name": "Mopti", "admin2Name": "Djenné"})),
            feature(json!({"admin0Name": "Mali", "admin1Name": "Kayes", "admin2Name": "Kita"})),
            feature(json!({"admin0Name": "Mali", "admin1Name": "Kayes", "admin2Name": "Bafoulabé"})),
            feature(json!({"admin0Name": "Burkina Faso", "admin1Name": "Sahel"})),
            feature(json!({"admin1Name": "Orphan"})),
        ];
        let h = RegionHierarchy::from_features(&features);
        assert_eq!(h.admin0_options(), vec!["Burkina Faso", "Mali", UNKNOWN_COUNTRY]);
        assert_eq!(h.admin1_options("Mali"), vec!["Kayes", "Mopti"]);
        assert_eq!(h.admin2_options("Mali", Some("Kayes")), vec!["Bafoulabé", "Kita"]);
        assert_eq!(h.admin2_options("Mali", None), vec!["Bafoulabé", "Djenné", "Kita"]);
        assert_eq!(h.admin2_options("Burkina Faso", Some("Sahel")), vec![UNKNOWN_DISTRICT]);
        assert!(h.admin1_options("Atlantis").is_empty());
        assert!(h.admin2_options("Atlantis", None).is_empty());
    }
}
