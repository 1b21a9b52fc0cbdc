use serde::Serialize;

use crate::feed::FeedFormat;
use crate::scoring::{ScoreBand, ScoreResult};

#[derive(Debug, Clone, Serialize)]
pub struct ScoreData {
    pub result: ScoreResult,
    pub diagnostics: DiagnosticsData,
    pub source: SourceData,
}

/// Record accounting for one scoring run.
///
/// `dropped_records` never reached the engine (no timestamp field);
/// `skipped_records` reached it but carried an unparseable timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiagnosticsData {
    pub scored_records: usize,
    pub skipped_records: usize,
    pub dropped_records: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceData {
    pub kind: String,
    pub path: Option<String>,
    pub format: FeedFormat,
    pub timezone: String,
    pub target_avg_monthly_inflow: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SimulateInputs {
    pub transactions_count: f64,
    pub monthly_income: f64,
    pub business_age_years: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SimulateData {
    pub inputs: SimulateInputs,
    pub credit_score: u16,
    pub band: ScoreBand,
    pub quick_score: u8,
}
