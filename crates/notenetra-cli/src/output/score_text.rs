use std::io;

use notenetra_score::ScoreBand;
use notenetra_score::scoring::Metric;
use serde_json::Value;

use super::format::{
    Align, Column, format_amount, format_score, format_weight, key_value_rows, render_table,
};

pub fn render_score(command: &str, data: &Value) -> io::Result<String> {
    let result = data
        .get("result")
        .ok_or_else(|| io::Error::other("score output requires result"))?;
    let bureau = required_u64(result, "/score_300_to_900")?;
    let composite = required_f64(result, "/score_0_to_100")?;
    let band = band_for(bureau);

    let mut lines = Vec::new();
    if command == "demo" {
        lines.push("Demo: scoring the bundled sample feed".to_string());
        lines.push(String::new());
    }
    lines.push("Cash-flow credit score".to_string());
    lines.push(String::new());
    lines.extend(key_value_rows(
        &[
            (
                "Score",
                format!("{bureau} / 900 ({}, {})", band.label(), band.range_text()),
            ),
            ("Composite", format!("{} / 100", format_score(composite))),
            (
                "Policy",
                optional_str(result, "/policy_version").unwrap_or("-").to_string(),
            ),
        ],
        2,
    ));

    lines.push(String::new());
    lines.push("Metric breakdown:".to_string());
    lines.extend(render_breakdown(result));

    lines.push(String::new());
    lines.push("Activity:".to_string());
    lines.extend(render_activity(result));

    lines.push(String::new());
    lines.push("Records:".to_string());
    lines.extend(render_records(data));

    Ok(lines.join("\n"))
}

pub fn render_simulate(data: &Value) -> io::Result<String> {
    let credit_score = required_u64(data, "/credit_score")?;
    let quick_score = required_u64(data, "/quick_score")?;
    let band = band_for(credit_score);

    let mut lines = vec!["What-if credit score".to_string(), String::new()];
    lines.extend(key_value_rows(
        &[
            (
                "Credit score",
                format!("{credit_score} / 900 ({}, {})", band.label(), band.range_text()),
            ),
            ("Quick score", format!("{quick_score} / 100")),
        ],
        2,
    ));

    lines.push(String::new());
    lines.push("Inputs:".to_string());
    lines.extend(key_value_rows(
        &[
            (
                "Transactions per month",
                plain_number(required_f64(data, "/inputs/transactions_count")?),
            ),
            (
                "Monthly income",
                format_amount(required_f64(data, "/inputs/monthly_income")?),
            ),
            (
                "Business age (years)",
                plain_number(required_f64(data, "/inputs/business_age_years")?),
            ),
        ],
        2,
    ));

    lines.push(String::new());
    lines.push("These figures are self-reported.".to_string());
    lines.push("Run `notenetra score <path>` to score a recorded transaction feed.".to_string());

    Ok(lines.join("\n"))
}

fn render_breakdown(result: &Value) -> Vec<String> {
    let columns = [
        Column {
            name: "Metric",
            align: Align::Left,
        },
        Column {
            name: "Weight",
            align: Align::Right,
        },
        Column {
            name: "Score",
            align: Align::Right,
        },
        Column {
            name: "Measured",
            align: Align::Left,
        },
    ];

    let rows = Metric::ALL
        .iter()
        .map(|metric| {
            let key = metric.as_str();
            let weight = optional_f64(result, &format!("/weights/{key}")).unwrap_or(0.0);
            let score = optional_f64(result, &format!("/metric_scores/{key}")).unwrap_or(0.0);
            vec![
                metric.label().to_string(),
                format_weight(weight),
                format_score(score),
                measured_text(*metric, result),
            ]
        })
        .collect::<Vec<Vec<String>>>();

    render_table(&columns, &rows)
}

fn measured_text(metric: Metric, result: &Value) -> String {
    let raw = |key: &str| optional_f64(result, &format!("/raw_metrics/{key}")).unwrap_or(0.0);
    match metric {
        Metric::AvgInflow => format!("{} per month", format_amount(raw("avg_monthly_inflow"))),
        Metric::Consistency => {
            format!("std dev {}", format_amount(raw("std_monthly_inflow")))
        }
        Metric::InflowOutflowRatio => format!("{:.2}x", raw("inflow_outflow_ratio")),
        Metric::Frequency => format!("{:.1}% of days active", raw("txn_frequency_pct")),
        Metric::Trend => format!("{:+.1}% over window", raw("trend_last_3m_pct")),
        Metric::LowCashEvents => format!("{:.2} events per week", raw("low_cash_event_rate")),
    }
}

fn render_activity(result: &Value) -> Vec<String> {
    let period = match (
        optional_str(result, "/activity/first_day"),
        optional_str(result, "/activity/last_day"),
    ) {
        (Some(first), Some(last)) => format!(
            "{first} to {last} ({} days, {} months)",
            optional_u64(result, "/activity/span_days").unwrap_or(0),
            optional_u64(result, "/activity/months_observed").unwrap_or(0)
        ),
        _ => "no dated transactions".to_string(),
    };

    let amount = |pointer: &str| format_amount(optional_f64(result, pointer).unwrap_or(0.0));
    key_value_rows(
        &[
            ("Period", period),
            (
                "Active days",
                optional_u64(result, "/activity/active_days")
                    .unwrap_or(0)
                    .to_string(),
            ),
            ("Inflow", amount("/activity/total_inflow")),
            ("Outflow", amount("/activity/total_outflow")),
            ("Net", amount("/activity/net_balance")),
        ],
        2,
    )
}

fn render_records(data: &Value) -> Vec<String> {
    let count = |pointer: &str| optional_u64(data, pointer).unwrap_or(0).to_string();
    let source_kind = optional_str(data, "/source/kind").unwrap_or("unknown");
    let source = match optional_str(data, "/source/path") {
        Some(path) => format!("{source_kind} {path}"),
        None => source_kind.to_string(),
    };
    let context = format!(
        "{}, {}",
        optional_str(data, "/source/format").unwrap_or("unknown"),
        optional_str(data, "/source/timezone").unwrap_or("UTC")
    );

    key_value_rows(
        &[
            ("Scored", count("/diagnostics/scored_records")),
            ("Skipped", count("/diagnostics/skipped_records")),
            ("Dropped", count("/diagnostics/dropped_records")),
            ("Source", format!("{source} ({context})")),
        ],
        2,
    )
}

fn band_for(score: u64) -> ScoreBand {
    ScoreBand::for_score(u16::try_from(score).unwrap_or(u16::MAX))
}

fn plain_number(value: f64) -> String {
    if value.fract() == 0.0 {
        return format!("{value:.0}");
    }
    value.to_string()
}

fn required_f64(data: &Value, pointer: &str) -> io::Result<f64> {
    optional_f64(data, pointer)
        .ok_or_else(|| io::Error::other(format!("output requires numeric field `{pointer}`")))
}

fn required_u64(data: &Value, pointer: &str) -> io::Result<u64> {
    optional_u64(data, pointer)
        .ok_or_else(|| io::Error::other(format!("output requires integer field `{pointer}`")))
}

fn optional_f64(data: &Value, pointer: &str) -> Option<f64> {
    data.pointer(pointer).and_then(Value::as_f64)
}

fn optional_u64(data: &Value, pointer: &str) -> Option<u64> {
    data.pointer(pointer).and_then(Value::as_u64)
}

fn optional_str<'a>(data: &'a Value, pointer: &str) -> Option<&'a str> {
    data.pointer(pointer).and_then(Value::as_str)
}
