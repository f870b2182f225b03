//! Alignment of two irregular daily histories onto a shared date axis.
//!
//! Asset classes keep different calendars: an equity history has no weekend
//! observations while a crypto history has one every day. Correlating the two
//! first requires a common axis, with calendar gaps forward-filled from the
//! last known observation.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::{PriceSeries, TradingDay};

/// Two equal-length value arrays on a shared day axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedPair {
    pub days: Vec<TradingDay>,
    pub left: Vec<f64>,
    pub right: Vec<f64>,
}

impl AlignedPair {
    pub fn empty() -> Self {
        Self {
            days: Vec::new(),
            left: Vec::new(),
            right: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Align two (day, value) sequences by forward-filling onto the sorted union
/// of their days.
///
/// A day contributes a row only once both sides have a last-known value, and
/// never past the earlier of the two final observed days; a side stops
/// contributing once it has no further real observations. Histories whose
/// date ranges never overlap therefore align to an empty result.
pub fn align_values(a: &[(TradingDay, f64)], b: &[(TradingDay, f64)]) -> AlignedPair {
    if a.is_empty() || b.is_empty() {
        return AlignedPair::empty();
    }

    let lookup_a: HashMap<TradingDay, f64> = a.iter().copied().collect();
    let lookup_b: HashMap<TradingDay, f64> = b.iter().copied().collect();

    // Both slices are non-empty, so both last days exist.
    let end_a = a.last().map(|(day, _)| *day).expect("non-empty");
    let end_b = b.last().map(|(day, _)| *day).expect("non-empty");
    let end = end_a.min(end_b);

    let union: BTreeSet<TradingDay> = a
        .iter()
        .map(|(day, _)| *day)
        .chain(b.iter().map(|(day, _)| *day))
        .collect();

    let mut aligned = AlignedPair::empty();
    let mut last_a: Option<f64> = None;
    let mut last_b: Option<f64> = None;

    for day in union {
        if day > end {
            break;
        }

        if let Some(value) = lookup_a.get(&day) {
            last_a = Some(*value);
        }
        if let Some(value) = lookup_b.get(&day) {
            last_b = Some(*value);
        }

        if let (Some(value_a), Some(value_b)) = (last_a, last_b) {
            aligned.days.push(day);
            aligned.left.push(value_a);
            aligned.right.push(value_b);
        }
    }

    aligned
}

/// Align two price histories on their closes.
pub fn align_series(a: &PriceSeries, b: &PriceSeries) -> AlignedPair {
    align_values(&a.dated_closes(), &b.dated_closes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PricePoint, Symbol};

    fn day(input: &str) -> TradingDay {
        TradingDay::parse(input).expect("valid day")
    }

    fn series(symbol: &str, closes: &[(&str, f64)]) -> PriceSeries {
        let points = closes
            .iter()
            .map(|(d, close)| {
                PricePoint::new(day(d), *close, *close, *close, *close).expect("valid point")
            })
            .collect();
        PriceSeries::new(Symbol::parse(symbol).expect("valid symbol"), points)
            .expect("valid series")
    }

    #[test]
    fn identical_day_sets_align_to_the_inputs() {
        let a = series("AAPL", &[("2024-01-02", 10.0), ("2024-01-03", 11.0)]);
        let b = series("MSFT", &[("2024-01-02", 20.0), ("2024-01-03", 21.0)]);

        let aligned = align_series(&a, &b);
        assert_eq!(aligned.len(), 2);
        assert_eq!(aligned.left, vec![10.0, 11.0]);
        assert_eq!(aligned.right, vec![20.0, 21.0]);
        assert_eq!(aligned.days, vec![day("2024-01-02"), day("2024-01-03")]);
    }

    #[test]
    fn forward_fills_calendar_gaps() {
        // Equity skips the weekend, crypto does not.
        let equity = series(
            "SPY",
            &[("2024-01-05", 100.0), ("2024-01-08", 102.0)],
        );
        let crypto = series(
            "BTC-USD",
            &[
                ("2024-01-05", 40000.0),
                ("2024-01-06", 40500.0),
                ("2024-01-07", 39800.0),
                ("2024-01-08", 41000.0),
            ],
        );

        let aligned = align_series(&equity, &crypto);
        assert_eq!(aligned.len(), 4);
        // Saturday and Sunday carry Friday's equity close forward.
        assert_eq!(aligned.left, vec![100.0, 100.0, 100.0, 102.0]);
        assert_eq!(aligned.right, vec![40000.0, 40500.0, 39800.0, 41000.0]);
    }

    #[test]
    fn disjoint_ranges_align_to_empty() {
        let january = series("AAPL", &[("2024-01-02", 10.0), ("2024-01-03", 11.0)]);
        let february = series("MSFT", &[("2024-02-01", 20.0), ("2024-02-02", 21.0)]);

        let aligned = align_series(&january, &february);
        assert!(aligned.is_empty());
        assert!(aligned.days.is_empty());
    }

    #[test]
    fn empty_input_aligns_to_empty() {
        let a = series("AAPL", &[("2024-01-02", 10.0)]);
        let b = PriceSeries::empty(Symbol::parse("MSFT").expect("valid symbol"));

        assert!(align_series(&a, &b).is_empty());
        assert!(align_series(&b, &a).is_empty());
    }

    #[test]
    fn rows_start_only_once_both_sides_are_known() {
        let a = series("AAPL", &[("2024-01-02", 10.0), ("2024-01-05", 11.0)]);
        let b = series("MSFT", &[("2024-01-04", 20.0), ("2024-01-05", 21.0)]);

        let aligned = align_series(&a, &b);
        // 2024-01-02 has no MSFT observation yet, so the axis starts at 01-04.
        assert_eq!(aligned.days, vec![day("2024-01-04"), day("2024-01-05")]);
        assert_eq!(aligned.left, vec![10.0, 11.0]);
        assert_eq!(aligned.right, vec![20.0, 21.0]);
    }
}
