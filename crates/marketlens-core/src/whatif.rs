//! Conditional projection: "if A moves X%, what does B usually do?"

use serde::{Deserialize, Serialize};

use crate::correlation::correlate;
use crate::stats::{mean, round_to};

/// Half-width of the empirical match band, in percentage points.
pub const MATCH_TOLERANCE_PCT: f64 = 2.0;

/// Conditional projection of one asset's move given another's.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WhatIfResult {
    /// Average observed (or estimated) move of the second asset, in percent.
    pub avg_move_pct: f64,
    /// Share of matched days whose sign agreed with the hypothesis, 0-100.
    pub probability_pct: f64,
    /// Number of historical days that matched the hypothesis band.
    pub sample_count: usize,
    /// True when no day matched and the value is a correlation-based
    /// linear estimate instead of an empirical average.
    pub is_estimate: bool,
}

impl WhatIfResult {
    fn none() -> Self {
        Self {
            avg_move_pct: 0.0,
            probability_pct: 0.0,
            sample_count: 0,
            is_estimate: false,
        }
    }

    fn estimate(avg_move_pct: f64) -> Self {
        Self {
            avg_move_pct,
            probability_pct: 0.0,
            sample_count: 0,
            is_estimate: true,
        }
    }
}

/// Estimate the move of `returns_b` on days where `returns_a` moved about
/// `hypothesis_pct` percent (within ±2 percentage points).
///
/// Total function: empty or unequal-length inputs produce the all-zero
/// result. When no historical day falls inside the band, the result falls
/// back to `hypothesis × correlation`, flagged as an estimate.
pub fn what_if(returns_a: &[f64], returns_b: &[f64], hypothesis_pct: f64) -> WhatIfResult {
    if returns_a.is_empty() || returns_b.is_empty() || returns_a.len() != returns_b.len() {
        return WhatIfResult::none();
    }

    let band_low = (hypothesis_pct - MATCH_TOLERANCE_PCT) / 100.0;
    let band_high = (hypothesis_pct + MATCH_TOLERANCE_PCT) / 100.0;

    let matches: Vec<f64> = returns_a
        .iter()
        .zip(returns_b)
        .filter(|(a, _)| **a >= band_low && **a <= band_high)
        .map(|(_, b)| *b)
        .collect();

    if matches.is_empty() {
        // No comparable day on record; degrade to a linear estimate, or to
        // nothing at all when the series cannot be correlated.
        return match correlate(returns_a, returns_b) {
            Ok(coefficient) => {
                WhatIfResult::estimate(round_to(hypothesis_pct * coefficient, 2))
            }
            Err(_) => WhatIfResult::estimate(0.0),
        };
    }

    let agreeing = matches
        .iter()
        .filter(|value| same_sign(**value, hypothesis_pct))
        .count();

    WhatIfResult {
        avg_move_pct: round_to(mean(&matches) * 100.0, 2),
        probability_pct: round_to(agreeing as f64 / matches.len() as f64 * 100.0, 2),
        sample_count: matches.len(),
        is_estimate: false,
    }
}

fn same_sign(value: f64, hypothesis: f64) -> bool {
    if hypothesis > 0.0 {
        value > 0.0
    } else if hypothesis < 0.0 {
        value < 0.0
    } else {
        value == 0.0
    }
}
