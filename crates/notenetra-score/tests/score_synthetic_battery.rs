mod support;

use notenetra_score::{ScoreOptions, ScoreResult, compute_score, compute_score_with_diagnostics};
use support::score_testkit::{Lcg, credit, day_stamp, debit, random_feed};

fn assert_in_range(result: &ScoreResult, context: &str) {
    assert!(
        (0.0..=100.0).contains(&result.score_0_to_100),
        "{context}: composite {}",
        result.score_0_to_100
    );
    assert!(
        (300..=900).contains(&result.score_300_to_900),
        "{context}: bureau {}",
        result.score_300_to_900
    );

    let scores = result.metric_scores;
    for value in [
        scores.avg_inflow,
        scores.consistency,
        scores.inflow_outflow_ratio,
        scores.frequency,
        scores.trend,
        scores.low_cash_events,
    ] {
        assert!(value.is_finite(), "{context}: non-finite sub-score");
        assert!((0.0..=100.0).contains(&value), "{context}: sub-score {value}");
    }

    let raw = result.raw_metrics;
    for value in [
        raw.avg_monthly_inflow,
        raw.std_monthly_inflow,
        raw.inflow_outflow_ratio,
        raw.txn_frequency_pct,
        raw.trend_last_3m_pct,
        raw.low_cash_event_rate,
    ] {
        assert!(value.is_finite(), "{context}: non-finite raw metric");
    }

    let activity = &result.activity;
    for value in [
        activity.total_inflow,
        activity.total_outflow,
        activity.net_balance,
    ] {
        assert!(value.is_finite(), "{context}: non-finite activity total");
    }
}

#[test]
fn random_feeds_stay_in_range_and_finite() {
    let mut rng = Lcg::new(20_260_301);
    for case in 0..400 {
        let feed = random_feed(&mut rng, 60, 200);
        let result = compute_score(&feed, &ScoreOptions::default());
        assert_in_range(&result, &format!("case {case}"));
    }
}

#[test]
fn random_feeds_score_identically_on_replay() {
    for seed in [1_u64, 7, 42, 2_026] {
        let mut first_rng = Lcg::new(seed);
        let mut second_rng = Lcg::new(seed);
        let first = random_feed(&mut first_rng, 80, 120);
        let second = random_feed(&mut second_rng, 80, 120);
        assert_eq!(first, second);
        assert_eq!(
            compute_score(&first, &ScoreOptions::default()),
            compute_score(&second, &ScoreOptions::default())
        );
    }
}

#[test]
fn diagnostics_account_for_every_record() {
    let mut rng = Lcg::new(99);
    for _ in 0..100 {
        let feed = random_feed(&mut rng, 40, 90);
        let (_, diagnostics) = compute_score_with_diagnostics(&feed, &ScoreOptions::default());
        assert_eq!(
            diagnostics.scored_records + diagnostics.skipped_records,
            feed.len()
        );
    }
}

#[test]
fn tiny_targets_saturate_rather_than_overflow() {
    let mut rng = Lcg::new(5);
    let options = ScoreOptions::new().with_target_avg_monthly_inflow(f64::MIN_POSITIVE);
    assert!(options.is_ok());
    if let Ok(options) = options {
        for case in 0..50 {
            let feed = random_feed(&mut rng, 30, 60);
            let result = compute_score(&feed, &options);
            assert_in_range(&result, &format!("tiny target case {case}"));
        }
    }
}

#[test]
fn near_max_amounts_never_leak_nan_or_infinity() {
    let huge = 1e308;
    let feeds = [
        (
            "credits in two months",
            vec![
                credit("2026-01-05T10:00:00", huge),
                credit("2026-02-05T10:00:00", huge),
            ],
        ),
        (
            "credits summing past the maximum",
            vec![
                credit("2026-01-05T10:00:00", f64::MAX),
                credit("2026-01-06T10:00:00", f64::MAX),
                credit("2026-02-05T10:00:00", f64::MAX),
                credit("2026-03-05T10:00:00", 1.0),
            ],
        ),
        (
            "debits summing past the maximum",
            vec![
                credit("2026-01-05T10:00:00", 10.0),
                debit("2026-01-05T11:00:00", f64::MAX),
                debit("2026-01-06T11:00:00", f64::MAX),
                debit("2026-02-06T11:00:00", huge),
            ],
        ),
        (
            "both sides at the maximum",
            vec![
                credit("2026-01-05T10:00:00", f64::MAX),
                debit("2026-01-05T12:00:00", f64::MAX),
                credit("2026-02-05T10:00:00", f64::MAX),
                debit("2026-02-05T12:00:00", -f64::MAX),
                credit("2026-03-05T10:00:00", -huge),
            ],
        ),
    ];

    for (context, feed) in feeds {
        let result = compute_score(&feed, &ScoreOptions::default());
        assert_in_range(&result, context);
    }

    let mut rng = Lcg::new(1_000);
    for case in 0..50 {
        let feed = (0..20)
            .map(|index| {
                let stamp = day_stamp(rng.below(120) as u32);
                let amount = huge * (0.5 + rng.unit());
                if index % 3 == 0 {
                    debit(&stamp, amount)
                } else {
                    credit(&stamp, amount)
                }
            })
            .collect::<Vec<_>>();
        let result = compute_score(&feed, &ScoreOptions::default());
        assert_in_range(&result, &format!("near-max case {case}"));
    }
}
