use crate::locale::Locale;
use clap::Parser;
use std::path::PathBuf;

/// Cadre Harmonisé comparison and trend reports from a GeoJSON dataset.
#[derive(Debug, Clone, Parser)]
#[command(name = "ch_report", version)]
pub struct Config {
    /// GeoJSON FeatureCollection with period-suffixed properties
    #[arg(long = "data", env = "CH_DATA_PATH", default_value = "data/combined.geojson")]
    pub data_path: PathBuf,

    /// Directory the CSV and JSON reports are written to
    #[arg(long, env = "CH_OUT_DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// Display language for months and classifications (en or fr)
    #[arg(long, env = "CH_LOCALE", default_value = "en")]
    pub locale: Locale,

    /// Rows shown in console previews
    #[arg(long, env = "CH_PREVIEW_ROWS", default_value_t = 5)]
    pub preview_rows: usize,

    /// Months (1-12, comma separated) left out of the Ph3+ trend
    #[arg(long, env = "CH_SKIP_TREND_MONTHS", value_delimiter = ',')]
    pub skip_trend_months: Vec<u8>,
}

impl Config {
    /// Zero-based month indexes to skip; out-of-range entries are dropped.
    pub fn skipped_month_indexes(&self) -> Vec<u8> {
        self.skip_trend_months
            .iter()
            .filter(|m| (1..=12).contains(*m))
            .map(|m| m - 1)
            .collect()
    }
}
