//! "What-if" formulas driven by self-reported business figures rather than a
//! transaction feed.

use crate::{ClientError, ClientResult};

const SIMULATOR_BASE_SCORE: f64 = 300.0;
const SIMULATOR_MAX_SCORE: f64 = 900.0;
const TRANSACTION_POINTS_CAP: f64 = 600.0;
const TRANSACTION_POINTS_PER_TXN: f64 = 2.0;
const AGE_POINTS_CAP: f64 = 50.0;
const AGE_POINTS_PER_YEAR: f64 = 5.0;
const INCOME_POINTS_CAP: f64 = 50.0;
const INCOME_PER_POINT: f64 = 20_000.0;

const QUICK_REVENUE_CAP: f64 = 1_000_000.0;
const QUICK_TRANSACTIONS_CAP: f64 = 1_000.0;
const QUICK_AGE_CAP_YEARS: f64 = 20.0;
const QUICK_REVENUE_WEIGHT: f64 = 0.5;
const QUICK_TRANSACTIONS_WEIGHT: f64 = 0.3;
const QUICK_AGE_WEIGHT: f64 = 0.2;

/// Bureau-style 300–900 estimate from monthly activity, income and business age.
pub fn calculate_credit_score(
    transactions_count: f64,
    monthly_income: f64,
    business_age_years: f64,
) -> ClientResult<u16> {
    let inputs = [
        ("transactions", transactions_count),
        ("income", monthly_income),
        ("age", business_age_years),
    ];
    for (name, value) in inputs {
        require_finite(name, value)?;
        if value < 0.0 {
            return Err(ClientError::invalid_argument_for_command(
                &format!("`--{name}` must be non-negative, got {value}."),
                Some("simulate"),
            ));
        }
    }

    let transaction_points =
        (transactions_count * TRANSACTION_POINTS_PER_TXN).min(TRANSACTION_POINTS_CAP);
    let age_points = (business_age_years * AGE_POINTS_PER_YEAR).min(AGE_POINTS_CAP);
    let income_points = (monthly_income / INCOME_PER_POINT).min(INCOME_POINTS_CAP);

    let total = SIMULATOR_BASE_SCORE + transaction_points + age_points + income_points;
    Ok(total.round().min(SIMULATOR_MAX_SCORE) as u16)
}

/// Weighted 0–100 score; each input is clamped to its cap before weighting.
pub fn quick_score(
    monthly_revenue: f64,
    monthly_transactions: f64,
    business_age_years: f64,
) -> ClientResult<u8> {
    require_finite("income", monthly_revenue)?;
    require_finite("transactions", monthly_transactions)?;
    require_finite("age", business_age_years)?;

    let revenue = normalise(monthly_revenue, QUICK_REVENUE_CAP);
    let transactions = normalise(monthly_transactions, QUICK_TRANSACTIONS_CAP);
    let age = normalise(business_age_years, QUICK_AGE_CAP_YEARS);

    let score = QUICK_REVENUE_WEIGHT * revenue
        + QUICK_TRANSACTIONS_WEIGHT * transactions
        + QUICK_AGE_WEIGHT * age;
    Ok(score.round_ties_even().clamp(0.0, 100.0) as u8)
}

fn normalise(value: f64, cap: f64) -> f64 {
    value.clamp(0.0, cap) / cap * 100.0
}

fn require_finite(name: &str, value: f64) -> ClientResult<()> {
    if value.is_finite() {
        return Ok(());
    }
    Err(ClientError::invalid_argument_for_command(
        &format!("`--{name}` must be a finite number."),
        Some("simulate"),
    ))
}
