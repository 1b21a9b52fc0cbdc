use crate::scoring::policy::ScoringPolicy;

/// Clamps into [0, 1]; NaN counts as 0.
pub fn clip01(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// Pins overflowed values to the largest finite magnitude; NaN becomes 0.
pub fn saturate(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(f64::MIN, f64::MAX)
}

pub fn saturating_add(left: f64, right: f64) -> f64 {
    saturate(left + right)
}

pub fn saturating_sum(values: &[f64]) -> f64 {
    values
        .iter()
        .fold(0.0, |total, value| saturating_add(total, *value))
}

/// Division that yields 0 for a zero denominator and never a non-finite value.
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    saturate(numerator / denominator)
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let count = values.len() as f64;
    let direct = values.iter().sum::<f64>() / count;
    if direct.is_finite() {
        return direct;
    }
    saturate(values.iter().map(|value| value / count).sum::<f64>())
}

/// Population standard deviation; 0 for fewer than two values.
pub fn population_std_dev(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let direct = deviation(values, mean, 1.0);
    if direct.is_finite() {
        return direct;
    }

    // Squared deviations overflowed; redo the sums on values scaled into [-1, 1].
    let scale = values
        .iter()
        .chain(std::iter::once(&mean))
        .fold(0.0_f64, |largest, value| largest.max(value.abs()));
    if scale == 0.0 || !scale.is_finite() {
        return 0.0;
    }
    saturate(deviation(values, mean, scale) * scale)
}

fn deviation(values: &[f64], mean: f64, scale: f64) -> f64 {
    let scaled_mean = mean / scale;
    let variance = values
        .iter()
        .map(|value| (value / scale - scaled_mean).powi(2))
        .sum::<f64>()
        / values.len() as f64;
    variance.sqrt()
}

pub fn round_to(value: f64, decimals: u32) -> f64 {
    let exponent = i32::try_from(decimals).unwrap_or(2);
    let factor = 10_f64.powi(exponent);
    (value * factor).round() / factor
}

pub fn avg_inflow_score(avg_monthly_inflow: f64, target: f64) -> f64 {
    100.0 * clip01(safe_div(avg_monthly_inflow, target))
}

pub fn consistency_score(avg_monthly_inflow: f64, std_monthly_inflow: f64) -> f64 {
    if avg_monthly_inflow <= 0.0 {
        return 0.0;
    }
    let coefficient_of_variation = std_monthly_inflow / avg_monthly_inflow;
    100.0 * clip01(1.0 - coefficient_of_variation)
}

pub fn ratio_score(ratio: f64, policy: &ScoringPolicy) -> f64 {
    if ratio <= policy.ratio_floor {
        return 0.0;
    }
    if ratio >= policy.ratio_ceiling {
        return 100.0;
    }
    if ratio < policy.ratio_midpoint {
        return ((ratio - policy.ratio_floor) / (policy.ratio_midpoint - policy.ratio_floor))
            * 50.0;
    }
    50.0 + ((ratio - policy.ratio_midpoint) / (policy.ratio_ceiling - policy.ratio_midpoint))
        * 50.0
}

pub fn frequency_score(days_with_txn: usize, total_days: usize) -> f64 {
    100.0 * clip01(safe_div(days_with_txn as f64, total_days as f64))
}

/// The trailing slice of monthly inflow the trend metric compares.
pub fn trend_window<'a>(monthly_inflow: &'a [f64], policy: &ScoringPolicy) -> &'a [f64] {
    let start = monthly_inflow
        .len()
        .saturating_sub(policy.trend_window_months);
    &monthly_inflow[start..]
}

pub fn trend_score(window: &[f64], policy: &ScoringPolicy) -> f64 {
    let (Some(first), Some(last)) = (window.first(), window.last()) else {
        return policy.neutral_trend_score;
    };
    if window.len() < 2 {
        return policy.neutral_trend_score;
    }
    if *first <= 0.0 {
        return if *last > 0.0 {
            100.0
        } else {
            policy.neutral_trend_score
        };
    }
    let pct = safe_div(saturate(last - first), *first);
    let half_span = policy.trend_pct_span / 2.0;
    50.0 + 50.0 * clip01((pct + half_span) / policy.trend_pct_span)
}

/// Percent change across the trend window, or 0 when it is undefined.
pub fn trend_pct(window: &[f64]) -> f64 {
    match (window.first(), window.last()) {
        (Some(first), Some(last)) if window.len() >= 2 && *first > 0.0 => {
            saturate(safe_div(saturate(last - first), *first) * 100.0)
        }
        _ => 0.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LowCashOutcome {
    pub score: f64,
    pub event_rate: f64,
    pub events: usize,
}

/// Counts trailing-window net sums below zero over the observed days.
pub fn low_cash_score(daily_net: &[f64], policy: &ScoringPolicy) -> LowCashOutcome {
    let window = policy.low_cash_window_days.max(1);
    let mut events = 0usize;
    for index in 0..daily_net.len() {
        let start = (index + 1).saturating_sub(window);
        let rolling = saturating_sum(&daily_net[start..=index]);
        if rolling < 0.0 {
            events += 1;
        }
    }

    let normaliser = (daily_net.len() as f64 / window as f64).max(1.0);
    let event_rate = events as f64 / normaliser;
    LowCashOutcome {
        score: 100.0 * clip01(1.0 - event_rate),
        event_rate,
        events,
    }
}
