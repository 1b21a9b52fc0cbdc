#![allow(dead_code)]

use chrono::{Days, NaiveDate};
use notenetra_score::{Direction, Transaction};

pub fn credit(timestamp: &str, amount: f64) -> Transaction {
    Transaction::credit(timestamp, amount)
}

pub fn debit(timestamp: &str, amount: f64) -> Transaction {
    Transaction::debit(timestamp, amount)
}

/// `YYYY-MM-DDT10:00:00` for day `offset` counted from 2026-01-01.
pub fn day_stamp(offset: u32) -> String {
    NaiveDate::from_ymd_opt(2026, 1, 1)
        .and_then(|start| start.checked_add_days(Days::new(u64::from(offset))))
        .map(|date| format!("{}T10:00:00", date.format("%Y-%m-%d")))
        .unwrap_or_default()
}

/// Small deterministic generator so batteries replay identically.
pub struct Lcg {
    state: u64,
}

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed ^ 0x9E37_79B9_7F4A_7C15,
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.state >> 33
    }

    pub fn below(&mut self, bound: u64) -> u64 {
        if bound == 0 {
            return 0;
        }
        self.next_u64() % bound
    }

    pub fn unit(&mut self) -> f64 {
        self.below(1_000_000) as f64 / 1_000_000.0
    }
}

/// A random feed mixing credits, debits, unclassified rows and junk
/// timestamps across up to `max_days` days.
pub fn random_feed(rng: &mut Lcg, max_rows: u64, max_days: u64) -> Vec<Transaction> {
    let rows = rng.below(max_rows + 1);
    let mut feed = Vec::new();
    for _ in 0..rows {
        let offset = rng.below(max_days.max(1)) as u32;
        let timestamp = match rng.below(20) {
            0 => "not-a-date".to_string(),
            1 => String::new(),
            _ => day_stamp(offset),
        };
        let amount = match rng.below(10) {
            0 => 0.0,
            1 => rng.unit() * 1_000_000.0,
            _ => rng.unit() * 20_000.0,
        };
        let direction = match rng.below(10) {
            0 => Direction::Unclassified,
            1..=4 => Direction::Debit,
            _ => Direction::Credit,
        };
        feed.push(Transaction::new(&timestamp, amount, direction));
    }
    feed
}
