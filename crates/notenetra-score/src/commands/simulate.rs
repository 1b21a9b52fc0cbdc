use crate::ClientResult;
use crate::contracts::envelope::{CommandName, SuccessEnvelope, success};
use crate::contracts::types::{SimulateData, SimulateInputs};
use crate::scoring::ScoreBand;
use crate::simulator::{calculate_credit_score, quick_score};

/// Runs both what-if formulas; income doubles as monthly revenue.
pub fn run(
    transactions_count: f64,
    monthly_income: f64,
    business_age_years: f64,
) -> ClientResult<SuccessEnvelope> {
    let credit_score =
        calculate_credit_score(transactions_count, monthly_income, business_age_years)?;
    let quick = quick_score(monthly_income, transactions_count, business_age_years)?;

    let data = SimulateData {
        inputs: SimulateInputs {
            transactions_count,
            monthly_income,
            business_age_years,
        },
        credit_score,
        band: ScoreBand::for_score(credit_score),
        quick_score: quick,
    };

    success(CommandName::Simulate, data)
}
