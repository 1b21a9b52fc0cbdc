use std::collections::BTreeMap;

use chrono::{FixedOffset, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::scoring::metrics::{saturate, saturating_add};
use crate::scoring::timestamp::{YearMonth, parse_timestamp};
use crate::scoring::types::Transaction;

const MILLIS_PER_DAY: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DailyFlow {
    pub inflow: f64,
    pub outflow: f64,
}

impl DailyFlow {
    pub fn net(&self) -> f64 {
        saturate(self.inflow - self.outflow)
    }

    pub fn has_activity(&self) -> bool {
        self.inflow > 0.0 || self.outflow > 0.0
    }
}

/// Daily and monthly buckets built from one pass over a transaction list.
#[derive(Debug, Clone, Default)]
pub struct CashFlowBuckets {
    pub daily: BTreeMap<NaiveDate, DailyFlow>,
    pub monthly_inflow: BTreeMap<YearMonth, f64>,
    pub earliest: Option<NaiveDateTime>,
    pub latest: Option<NaiveDateTime>,
    pub total_inflow: f64,
    pub total_outflow: f64,
    pub scored_records: usize,
    pub skipped_records: usize,
}

impl CashFlowBuckets {
    pub fn build(transactions: &[Transaction], timezone: &FixedOffset) -> Self {
        let mut buckets = Self::default();
        for transaction in transactions {
            let Some(occurred_at) = parse_timestamp(&transaction.timestamp, timezone) else {
                debug!(
                    timestamp = %transaction.timestamp,
                    "skipping transaction with unparseable timestamp"
                );
                buckets.skipped_records += 1;
                continue;
            };
            buckets.record(occurred_at, transaction);
        }
        buckets
    }

    fn record(&mut self, occurred_at: NaiveDateTime, transaction: &Transaction) {
        let amount = transaction.effective_amount();
        let day = self.daily.entry(occurred_at.date()).or_default();
        // Running sums saturate so a run of huge amounts cannot reach infinity.
        if transaction.direction.is_credit() {
            day.inflow = saturating_add(day.inflow, amount);
            self.total_inflow = saturating_add(self.total_inflow, amount);
            let month = self
                .monthly_inflow
                .entry(YearMonth::of(&occurred_at))
                .or_insert(0.0);
            *month = saturating_add(*month, amount);
        } else {
            day.outflow = saturating_add(day.outflow, amount);
            self.total_outflow = saturating_add(self.total_outflow, amount);
        }

        if self.earliest.is_none_or(|current| occurred_at < current) {
            self.earliest = Some(occurred_at);
        }
        if self.latest.is_none_or(|current| occurred_at > current) {
            self.latest = Some(occurred_at);
        }
        self.scored_records += 1;
    }

    /// Chronologically ordered monthly credit sums.
    pub fn monthly_inflow_series(&self) -> Vec<f64> {
        self.monthly_inflow.values().copied().collect()
    }

    /// Net cash per observed day, in date order.
    pub fn daily_net_series(&self) -> Vec<f64> {
        self.daily.values().map(DailyFlow::net).collect()
    }

    /// Span between the first and last transaction in whole days, inclusive.
    ///
    /// Measured on instants, so two transactions 23 hours apart on
    /// neighbouring dates still span a single day.
    pub fn total_days(&self) -> usize {
        let (Some(earliest), Some(latest)) = (self.earliest, self.latest) else {
            return 0;
        };
        let elapsed_ms = (latest - earliest).num_milliseconds() as f64;
        let days = (elapsed_ms / MILLIS_PER_DAY).round() + 1.0;
        days.max(1.0) as usize
    }

    pub fn days_with_activity(&self) -> usize {
        self.daily
            .values()
            .filter(|flow| flow.has_activity())
            .count()
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        self.daily.keys().next().copied()
    }

    pub fn last_day(&self) -> Option<NaiveDate> {
        self.daily.keys().next_back().copied()
    }
}
