use serde::Serialize;

use super::{Metric, MetricScores};

/// Scoring policy identifier.
///
/// Emitted with every score so weight or threshold changes remain auditable
/// when two scores from different releases are compared.
pub const SCORING_POLICY_VERSION: &str = "msme-score/v1";

/// Relative importance of each sub-metric in the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricWeights {
    pub avg_inflow: f64,
    pub consistency: f64,
    pub inflow_outflow_ratio: f64,
    pub frequency: f64,
    pub trend: f64,
    pub low_cash_events: f64,
}

impl MetricWeights {
    pub fn weight(self, metric: Metric) -> f64 {
        match metric {
            Metric::AvgInflow => self.avg_inflow,
            Metric::Consistency => self.consistency,
            Metric::InflowOutflowRatio => self.inflow_outflow_ratio,
            Metric::Frequency => self.frequency,
            Metric::Trend => self.trend,
            Metric::LowCashEvents => self.low_cash_events,
        }
    }

    pub fn total(self) -> f64 {
        self.avg_inflow
            + self.consistency
            + self.inflow_outflow_ratio
            + self.frequency
            + self.trend
            + self.low_cash_events
    }
}

/// v1 cash-flow scoring policy.
///
/// Notes:
/// - The ratio band is piecewise linear: `ratio_floor` scores 0,
///   `ratio_midpoint` scores 50 and `ratio_ceiling` or above scores 100.
/// - The trend window looks at the last `trend_window_months` months of
///   inflow; a change of `-trend_pct_span / 2` or worse scores 0.
#[derive(Debug, Clone, Copy)]
pub struct ScoringPolicy {
    pub weights: MetricWeights,
    pub default_target_avg_monthly_inflow: f64,
    pub low_cash_window_days: usize,
    pub ratio_floor: f64,
    pub ratio_midpoint: f64,
    pub ratio_ceiling: f64,
    pub trend_window_months: usize,
    pub trend_pct_span: f64,
    pub neutral_trend_score: f64,
    pub bureau_floor: f64,
    pub bureau_points_per_unit: f64,
}

impl ScoringPolicy {
    pub fn composite(self, scores: &MetricScores) -> f64 {
        Metric::ALL
            .iter()
            .map(|metric| scores.get(*metric) * self.weights.weight(*metric))
            .sum()
    }

    /// Maps a 0–100 composite onto the 300–900 bureau range. A non-finite
    /// composite maps to the floor.
    pub fn bureau_score(self, score_0_to_100: f64) -> u16 {
        let score_0_to_100 = if score_0_to_100.is_finite() {
            score_0_to_100
        } else {
            0.0
        };
        let mapped = (self.bureau_floor + score_0_to_100 * self.bureau_points_per_unit).round();
        let ceiling = self.bureau_floor + 100.0 * self.bureau_points_per_unit;
        mapped.clamp(self.bureau_floor, ceiling) as u16
    }
}

pub const SCORING_POLICY_V1: ScoringPolicy = ScoringPolicy {
    weights: MetricWeights {
        avg_inflow: 0.25,
        consistency: 0.20,
        inflow_outflow_ratio: 0.20,
        frequency: 0.15,
        trend: 0.10,
        low_cash_events: 0.10,
    },
    default_target_avg_monthly_inflow: 200_000.0,
    low_cash_window_days: 7,
    ratio_floor: 0.8,
    ratio_midpoint: 1.0,
    ratio_ceiling: 1.3,
    trend_window_months: 3,
    trend_pct_span: 1.0,
    neutral_trend_score: 50.0,
    bureau_floor: 300.0,
    bureau_points_per_unit: 6.0,
};
