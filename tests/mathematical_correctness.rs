//! Numerical properties of the analytics functions, including the worked
//! examples the product documentation promises.

use marketlens_core::{
    align_series, correlate, correlation_result, daily_returns, find_opposite_pairs, pair_alerts,
    sharpe_ratio, stats, volatility_pct, what_if, AlertType, AnalyticsError, CorrelationTable,
    Direction, DivergenceStrength, LiveQuote, Strength, DEFAULT_RISK_FREE_RATE,
};
use marketlens_tests::{series, symbol};

const RETURNS_1: [f64; 4] = [0.02, -0.0212, 0.0139, -0.0179];

// =============================================================================
// Returns
// =============================================================================

#[test]
fn positive_price_series_yields_n_minus_one_returns() {
    for n in 2..12 {
        let prices: Vec<f64> = (0..n).map(|i| 100.0 + i as f64).collect();
        assert_eq!(daily_returns(&prices).len(), n - 1);
    }
}

// =============================================================================
// Correlation
// =============================================================================

#[test]
fn self_correlation_of_any_non_constant_series_is_one() {
    assert_eq!(correlate(&RETURNS_1, &RETURNS_1).expect("must correlate"), 1.0);

    let other = [0.5, -0.25, 0.125, 0.0625, -0.03125];
    assert_eq!(correlate(&other, &other).expect("must correlate"), 1.0);
}

#[test]
fn correlation_is_commutative() {
    let ys = [0.011, -0.02, 0.017, -0.008];
    assert_eq!(
        correlate(&RETURNS_1, &ys).expect("must correlate"),
        correlate(&ys, &RETURNS_1).expect("must correlate"),
    );
}

#[test]
fn identical_copies_classify_as_high_positive() {
    let returns_2 = RETURNS_1;
    let result = correlation_result(&RETURNS_1, &returns_2).expect("must classify");
    assert_eq!(result.coefficient, 1.0);
    assert_eq!(result.strength, Strength::High);
    assert_eq!(result.direction, Direction::Positive);
}

#[test]
fn strength_boundaries_are_exact() {
    assert_eq!(correlation_result(&RETURNS_1, &RETURNS_1).expect("ok").strength, Strength::High);

    // 0.6 itself is moderate; just above is high. 0.3 itself is low.
    assert_eq!(marketlens_core::CorrelationResult::classify(0.6).strength, Strength::Moderate);
    assert_eq!(marketlens_core::CorrelationResult::classify(0.6001).strength, Strength::High);
    assert_eq!(marketlens_core::CorrelationResult::classify(-0.6).strength, Strength::Moderate);
    assert_eq!(marketlens_core::CorrelationResult::classify(0.3).strength, Strength::Low);
}

#[test]
fn direction_flips_exactly_below_zero() {
    assert_eq!(
        marketlens_core::CorrelationResult::classify(0.0).direction,
        Direction::Positive
    );
    assert_eq!(
        marketlens_core::CorrelationResult::classify(-1e-4).direction,
        Direction::Negative
    );
}

#[test]
fn mismatched_lengths_report_both_sizes() {
    let err = correlate(&RETURNS_1, &[0.01, 0.02]).expect_err("must fail");
    assert_eq!(err, AnalyticsError::LengthMismatch { left: 4, right: 2 });
}

// =============================================================================
// Alignment
// =============================================================================

#[test]
fn disjoint_date_sets_align_to_empty() {
    let january = series("AAA", &[("2024-01-02", 10.0), ("2024-01-03", 11.0)]);
    let march = series("BBB", &[("2024-03-04", 20.0), ("2024-03-05", 21.0)]);

    let aligned = align_series(&january, &march);
    assert!(aligned.left.is_empty());
    assert!(aligned.right.is_empty());
    assert!(aligned.days.is_empty());
}

#[test]
fn identical_date_sets_align_to_the_inputs() {
    let a = series(
        "AAA",
        &[("2024-01-02", 10.0), ("2024-01-03", 11.0), ("2024-01-04", 12.0)],
    );
    let b = series(
        "BBB",
        &[("2024-01-02", 5.0), ("2024-01-03", 6.0), ("2024-01-04", 7.0)],
    );

    let aligned = align_series(&a, &b);
    assert_eq!(aligned.left, a.closes());
    assert_eq!(aligned.right, b.closes());
    assert_eq!(aligned.len(), 3);
}

// =============================================================================
// What-if projection
// =============================================================================

#[test]
fn no_matching_day_falls_back_to_the_correlation_estimate() {
    let returns_2 = RETURNS_1;

    // No day in RETURNS_1 moved +5% (+/-2pp), so the result is an estimate.
    let result = what_if(&RETURNS_1, &returns_2, 5.0);
    assert!(result.is_estimate);
    assert_eq!(result.sample_count, 0);
    assert_eq!(result.probability_pct, 0.0);

    let coefficient = correlate(&RETURNS_1, &returns_2).expect("must correlate");
    assert_eq!(result.avg_move_pct, stats::round_to(5.0 * coefficient, 2));
    assert_eq!(result.avg_move_pct, 5.0);
}

#[test]
fn estimates_only_occur_with_zero_samples() {
    let returns_a = [0.04, 0.05, 0.06];
    let returns_b = [0.01, 0.02, 0.03];

    let empirical = what_if(&returns_a, &returns_b, 5.0);
    assert_eq!(empirical.sample_count, 3);
    assert!(!empirical.is_estimate);

    let fallback = what_if(&returns_a, &returns_b, -50.0);
    assert_eq!(fallback.sample_count, 0);
    assert!(fallback.is_estimate);
}

// =============================================================================
// Divergence
// =============================================================================

#[test]
fn opposite_three_down_two_up_scores_five_and_reads_strong() {
    let quotes = vec![
        LiveQuote {
            symbol: symbol("AAA"),
            price: 100.0,
            change_percent: -3.0,
            market_cap: None,
        },
        LiveQuote {
            symbol: symbol("BBB"),
            price: 100.0,
            change_percent: 2.0,
            market_cap: None,
        },
    ];

    let pairs = find_opposite_pairs(&quotes);
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].divergence_score, 5.0);
    assert_eq!(pairs[0].strength, DivergenceStrength::Strong);

    let mut known = CorrelationTable::new();
    known.insert(symbol("AAA"), symbol("BBB"), 0.7);
    let alerts = pair_alerts(&quotes, &known);
    assert_eq!(alerts[0].alert_type, AlertType::DivergenceWarning);
}

// =============================================================================
// Risk ratios
// =============================================================================

#[test]
fn constant_price_series_never_produces_nan_risk_ratios() {
    let prices = vec![250.0; 30];
    let returns = daily_returns(&prices);

    let sharpe = sharpe_ratio(&returns, DEFAULT_RISK_FREE_RATE);
    let volatility = volatility_pct(&returns);

    assert_eq!(sharpe, 0.0);
    assert_eq!(volatility, 0.0);
    assert!(sharpe.is_finite());
    assert!(volatility.is_finite());
}
