//! Live-feed snapshot types and the "append live price" adapter.

use serde::{Deserialize, Serialize};

use crate::{PricePoint, PriceSeries, Symbol, TradingDay};

/// One asset's snapshot from the live quote feed.
///
/// The feed refreshes these periodically; this crate reads only the symbol
/// and percentage change for divergence scans, and the price when extending
/// a daily history with today's not-yet-closed observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveQuote {
    pub symbol: Symbol,
    pub price: f64,
    pub change_percent: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
}

/// Append today's live price to a daily history as a synthetic closing point.
///
/// No-op (returns false) when the history already ends on `today` or the
/// price is not a positive finite number. The synthetic point carries the
/// live price in all four OHLC fields.
pub fn extend_with_live_close(series: &mut PriceSeries, price: f64, today: TradingDay) -> bool {
    if !price.is_finite() || price <= 0.0 {
        return false;
    }
    if series.last_day() == Some(today) {
        return false;
    }
    if series.last_day().is_some_and(|last| last > today) {
        return false;
    }

    let point = PricePoint::flat(today, price).expect("positive finite price builds a valid point");
    series.points.push(point);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Symbol;

    fn day(input: &str) -> TradingDay {
        TradingDay::parse(input).expect("valid day")
    }

    fn history() -> PriceSeries {
        let points = vec![
            PricePoint::new(day("2024-03-06"), 10.0, 10.4, 9.9, 10.2).expect("valid point"),
            PricePoint::new(day("2024-03-07"), 10.2, 10.5, 10.0, 10.4).expect("valid point"),
        ];
        PriceSeries::new(Symbol::parse("AAPL").expect("valid symbol"), points)
            .expect("valid series")
    }

    #[test]
    fn appends_todays_live_price_once() {
        let mut series = history();
        let today = day("2024-03-08");

        assert!(extend_with_live_close(&mut series, 10.55, today));
        assert_eq!(series.len(), 3);
        assert_eq!(series.last_day(), Some(today));
        assert_eq!(series.points[2].close, 10.55);

        // A second refresh on the same day must not duplicate the point.
        assert!(!extend_with_live_close(&mut series, 10.60, today));
        assert_eq!(series.len(), 3);
    }

    #[test]
    fn ignores_non_positive_prices() {
        let mut series = history();
        assert!(!extend_with_live_close(&mut series, 0.0, day("2024-03-08")));
        assert!(!extend_with_live_close(&mut series, f64::NAN, day("2024-03-08")));
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn refuses_to_append_before_the_last_observation() {
        let mut series = history();
        assert!(!extend_with_live_close(&mut series, 10.0, day("2024-03-01")));
        assert_eq!(series.len(), 2);
    }
}
