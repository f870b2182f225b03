//! Daily percentage returns from an ordered price sequence.

use serde::{Deserialize, Serialize};

use crate::stats::round_to;
use crate::{PriceSeries, TradingDay};

/// One daily return tied to the day it was observed on.
///
/// Invalid rows are skipped rather than placeholdered, so a return series can
/// be shorter than its price series minus one. Callers that need the date for
/// a return must carry these pairs instead of re-deriving dates by index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatedReturn {
    pub day: TradingDay,
    pub value: f64,
}

/// Daily returns `(p[i] - p[i-1]) / p[i-1]`, rounded to 4 decimal places.
///
/// A row is skipped when the previous price is non-finite or non-positive,
/// or the current price is non-finite or negative. Fewer than 2 input points
/// yield an empty result.
pub fn daily_returns(prices: &[f64]) -> Vec<f64> {
    prices
        .windows(2)
        .filter_map(|pair| raw_return(pair[0], pair[1]))
        .collect()
}

/// Daily returns with their observation days.
pub fn dated_returns(series: &PriceSeries) -> Vec<DatedReturn> {
    series
        .points
        .windows(2)
        .filter_map(|pair| {
            raw_return(pair[0].close, pair[1].close).map(|value| DatedReturn {
                day: pair[1].day,
                value,
            })
        })
        .collect()
}

fn raw_return(previous: f64, current: f64) -> Option<f64> {
    if !previous.is_finite() || previous <= 0.0 {
        return None;
    }
    if !current.is_finite() || current < 0.0 {
        return None;
    }
    Some(round_to((current - previous) / previous, 4))
}
