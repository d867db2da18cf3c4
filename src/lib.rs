//! Period/region aggregation and classification engine for Cadre Harmonisé
//! food-insecurity data.
//!
//! Features loaded from a GeoJSON FeatureCollection carry one set of
//! properties per period (`classification_<p>`, `population_total_<p>`, ...).
//! The engine parses period keys, aggregates populations up the admin
//! hierarchy, picks the worst classification per group and compares two
//! periods. Everything here is pure and holds no shared state.

pub mod aggregate;
pub mod classification;
pub mod compare;
pub mod config;
pub mod error;
pub mod feature;
pub mod hierarchy;
pub mod loader;
pub mod locale;
pub mod output;
pub mod palette;
pub mod period;
pub mod report;
pub mod trend;
pub mod util;

pub use aggregate::{aggregate, aggregate_all, GroupLevel, RegionGroup, RegionSelection};
pub use classification::{color_for, rank_to_label, severity_rank, Classification, Rgb};
pub use compare::{compare, compare_snapshots, ChangeDirection, ComparisonRow};
pub use error::{EngineError, Result};
pub use feature::Feature;
pub use locale::Locale;
pub use period::{format_period, order_periods, PeriodKey};
