//! Cash-flow credit scoring for small merchants.
//!
//! [`compute_score`] turns timestamped credit/debit records into a 0–100
//! composite and a 300–900 bureau-style score. It never fails on individual
//! records: rows whose timestamp cannot be parsed are skipped, and every
//! degenerate aggregate (no rows, one month, no outflow) resolves to a fixed
//! boundary score.

pub mod aggregate;
pub mod bands;
pub mod metrics;
pub mod policy;
pub mod timestamp;
pub mod types;

use chrono::FixedOffset;
use serde::Serialize;
use tracing::debug;

use crate::{ClientError, ClientResult};
use aggregate::CashFlowBuckets;
pub use bands::ScoreBand;
pub use policy::{MetricWeights, SCORING_POLICY_V1, SCORING_POLICY_VERSION, ScoringPolicy};
use timestamp::format_iso_date;
pub use types::{Direction, Transaction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    AvgInflow,
    Consistency,
    InflowOutflowRatio,
    Frequency,
    Trend,
    LowCashEvents,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::AvgInflow,
        Metric::Consistency,
        Metric::InflowOutflowRatio,
        Metric::Frequency,
        Metric::Trend,
        Metric::LowCashEvents,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AvgInflow => "avg_inflow",
            Self::Consistency => "consistency",
            Self::InflowOutflowRatio => "inflow_outflow_ratio",
            Self::Frequency => "frequency",
            Self::Trend => "trend",
            Self::LowCashEvents => "low_cash_events",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::AvgInflow => "Average inflow",
            Self::Consistency => "Consistency",
            Self::InflowOutflowRatio => "Inflow/outflow ratio",
            Self::Frequency => "Frequency",
            Self::Trend => "Trend",
            Self::LowCashEvents => "Low-cash events",
        }
    }
}

/// Per-metric sub-scores, each in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricScores {
    pub avg_inflow: f64,
    pub consistency: f64,
    pub inflow_outflow_ratio: f64,
    pub frequency: f64,
    pub trend: f64,
    pub low_cash_events: f64,
}

impl MetricScores {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::AvgInflow => self.avg_inflow,
            Metric::Consistency => self.consistency,
            Metric::InflowOutflowRatio => self.inflow_outflow_ratio,
            Metric::Frequency => self.frequency,
            Metric::Trend => self.trend,
            Metric::LowCashEvents => self.low_cash_events,
        }
    }
}

/// The unnormalised statistic behind each sub-score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RawMetrics {
    pub avg_monthly_inflow: f64,
    pub std_monthly_inflow: f64,
    pub inflow_outflow_ratio: f64,
    pub txn_frequency_pct: f64,
    pub trend_last_3m_pct: f64,
    pub low_cash_event_rate: f64,
}

/// Dashboard totals derived from the scored rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivitySummary {
    pub total_inflow: f64,
    pub total_outflow: f64,
    pub net_balance: f64,
    pub first_day: Option<String>,
    pub last_day: Option<String>,
    pub active_days: usize,
    pub span_days: usize,
    pub months_observed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub score_0_to_100: f64,
    pub score_300_to_900: u16,
    pub band: ScoreBand,
    pub metric_scores: MetricScores,
    pub raw_metrics: RawMetrics,
    pub weights: MetricWeights,
    pub activity: ActivitySummary,
    pub policy_version: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoringDiagnostics {
    pub scored_records: usize,
    pub skipped_records: usize,
}

/// Caller-tunable inputs. The target is validated on construction so that
/// scoring itself cannot fail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreOptions {
    target_avg_monthly_inflow: f64,
    timezone: FixedOffset,
}

impl Default for ScoreOptions {
    fn default() -> Self {
        Self {
            target_avg_monthly_inflow: SCORING_POLICY_V1.default_target_avg_monthly_inflow,
            timezone: timestamp::utc(),
        }
    }
}

impl ScoreOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target_avg_monthly_inflow(mut self, target: f64) -> ClientResult<Self> {
        if !target.is_finite() || target <= 0.0 {
            return Err(ClientError::invalid_config(
                "target_avg_monthly_inflow",
                &target.to_string(),
                "a positive number",
            ));
        }
        self.target_avg_monthly_inflow = target;
        Ok(self)
    }

    pub fn with_timezone(mut self, timezone: FixedOffset) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn target_avg_monthly_inflow(&self) -> f64 {
        self.target_avg_monthly_inflow
    }

    pub fn timezone(&self) -> FixedOffset {
        self.timezone
    }
}

pub fn compute_score(transactions: &[Transaction], options: &ScoreOptions) -> ScoreResult {
    compute_score_with_diagnostics(transactions, options).0
}

pub fn compute_score_with_diagnostics(
    transactions: &[Transaction],
    options: &ScoreOptions,
) -> (ScoreResult, ScoringDiagnostics) {
    compute_score_with_policy(transactions, options, SCORING_POLICY_V1)
}

fn compute_score_with_policy(
    transactions: &[Transaction],
    options: &ScoreOptions,
    policy: ScoringPolicy,
) -> (ScoreResult, ScoringDiagnostics) {
    let buckets = CashFlowBuckets::build(transactions, &options.timezone);

    let monthly_inflow = buckets.monthly_inflow_series();
    let avg_monthly_inflow = metrics::mean(&monthly_inflow);
    let std_monthly_inflow = metrics::population_std_dev(&monthly_inflow, avg_monthly_inflow);
    let total_days = buckets.total_days();
    let days_with_txn = buckets.days_with_activity();
    let ratio = metrics::safe_div(buckets.total_inflow, buckets.total_outflow);
    let trend_window = metrics::trend_window(&monthly_inflow, &policy);
    let low_cash = metrics::low_cash_score(&buckets.daily_net_series(), &policy);

    let metric_scores = MetricScores {
        avg_inflow: metrics::avg_inflow_score(
            avg_monthly_inflow,
            options.target_avg_monthly_inflow,
        ),
        consistency: metrics::consistency_score(avg_monthly_inflow, std_monthly_inflow),
        inflow_outflow_ratio: metrics::ratio_score(ratio, &policy),
        frequency: metrics::frequency_score(days_with_txn, total_days),
        trend: metrics::trend_score(trend_window, &policy),
        low_cash_events: low_cash.score,
    };

    let composite = policy.composite(&metric_scores);
    let score_300_to_900 = policy.bureau_score(composite);

    let raw_metrics = RawMetrics {
        avg_monthly_inflow,
        std_monthly_inflow,
        inflow_outflow_ratio: ratio,
        txn_frequency_pct: metrics::safe_div(days_with_txn as f64, total_days as f64) * 100.0,
        trend_last_3m_pct: metrics::trend_pct(trend_window),
        low_cash_event_rate: low_cash.event_rate,
    };

    let activity = ActivitySummary {
        total_inflow: buckets.total_inflow,
        total_outflow: buckets.total_outflow,
        net_balance: metrics::saturate(buckets.total_inflow - buckets.total_outflow),
        first_day: buckets.first_day().as_ref().map(format_iso_date),
        last_day: buckets.last_day().as_ref().map(format_iso_date),
        active_days: days_with_txn,
        span_days: total_days,
        months_observed: monthly_inflow.len(),
    };

    let diagnostics = ScoringDiagnostics {
        scored_records: buckets.scored_records,
        skipped_records: buckets.skipped_records,
    };

    debug!(
        composite,
        score_300_to_900,
        scored = diagnostics.scored_records,
        skipped = diagnostics.skipped_records,
        "computed cash-flow score"
    );

    let result = ScoreResult {
        score_0_to_100: metrics::round_to(composite, 2),
        score_300_to_900,
        band: ScoreBand::for_score(score_300_to_900),
        metric_scores,
        raw_metrics,
        weights: policy.weights,
        activity,
        policy_version: SCORING_POLICY_VERSION,
    };
    (result, diagnostics)
}
