use serde::{Deserialize, Serialize};

/// Which side of the cash drawer a transaction moved money on.
///
/// Labels other than `credit`/`debit` are kept as `Unclassified`; they are
/// non-credit and count toward outflow, never toward monthly inflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Credit,
    Debit,
    Unclassified,
}

impl Direction {
    pub fn from_label(label: &str) -> Self {
        if label.eq_ignore_ascii_case("credit") {
            return Self::Credit;
        }
        if label.eq_ignore_ascii_case("debit") {
            return Self::Debit;
        }
        Self::Unclassified
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Credit => "credit",
            Self::Debit => "debit",
            Self::Unclassified => "unclassified",
        }
    }

    pub const fn is_credit(self) -> bool {
        matches!(self, Self::Credit)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub timestamp: String,
    pub amount: f64,
    pub direction: Direction,
}

impl Transaction {
    pub fn new(timestamp: &str, amount: f64, direction: Direction) -> Self {
        Self {
            timestamp: timestamp.to_string(),
            amount,
            direction,
        }
    }

    pub fn credit(timestamp: &str, amount: f64) -> Self {
        Self::new(timestamp, amount, Direction::Credit)
    }

    pub fn debit(timestamp: &str, amount: f64) -> Self {
        Self::new(timestamp, amount, Direction::Debit)
    }

    /// Amount used for aggregation; non-finite values contribute nothing.
    pub fn effective_amount(&self) -> f64 {
        if self.amount.is_finite() {
            self.amount
        } else {
            0.0
        }
    }
}
