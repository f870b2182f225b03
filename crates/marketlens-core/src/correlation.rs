//! Pearson correlation, strength classification, and rolling-window trend.

use serde::{Deserialize, Serialize};

use crate::stats::round_to;
use crate::AnalyticsError;

/// Points per rolling trend window.
pub const TREND_WINDOW: usize = 30;
/// Minimum aligned return points before a trend can be read.
pub const TREND_MIN_POINTS: usize = 2 * TREND_WINDOW;
/// Coefficient delta below which the correlation counts as stable.
pub const TREND_DELTA: f64 = 0.1;

/// Correlation strength bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strength {
    Low,
    Moderate,
    High,
}

/// Sign of the association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Positive,
    Negative,
}

/// Direction of a correlation over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

/// One pairwise comparison: coefficient plus its classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResult {
    pub coefficient: f64,
    pub strength: Strength,
    pub direction: Direction,
}

impl CorrelationResult {
    /// Classify a coefficient. The 0.6 and 0.3 boundaries are exclusive:
    /// exactly 0.6 is moderate, exactly 0.3 is low.
    pub fn classify(coefficient: f64) -> Self {
        let magnitude = coefficient.abs();
        let strength = if magnitude > 0.6 {
            Strength::High
        } else if magnitude > 0.3 {
            Strength::Moderate
        } else {
            Strength::Low
        };
        let direction = if coefficient >= 0.0 {
            Direction::Positive
        } else {
            Direction::Negative
        };

        Self {
            coefficient,
            strength,
            direction,
        }
    }
}

/// Stability of a correlation over the rolling windows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendResult {
    pub current: f64,
    pub previous: f64,
    pub trend: Trend,
}

/// Pearson correlation coefficient of two equal-length return series,
/// rounded to 4 decimal places and clamped to [-1, 1].
pub fn correlate(xs: &[f64], ys: &[f64]) -> Result<f64, AnalyticsError> {
    if xs.len() < 2 {
        return Err(AnalyticsError::TooFewPoints {
            len: xs.len(),
            min: 2,
        });
    }
    if ys.len() < 2 {
        return Err(AnalyticsError::TooFewPoints {
            len: ys.len(),
            min: 2,
        });
    }
    if xs.len() != ys.len() {
        return Err(AnalyticsError::LengthMismatch {
            left: xs.len(),
            right: ys.len(),
        });
    }

    let mean_x = xs.iter().sum::<f64>() / xs.len() as f64;
    let mean_y = ys.iter().sum::<f64>() / ys.len() as f64;

    let mut numerator = 0.0;
    let mut sum_sq_x = 0.0;
    let mut sum_sq_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        numerator += dx * dy;
        sum_sq_x += dx * dx;
        sum_sq_y += dy * dy;
    }

    let denominator = (sum_sq_x * sum_sq_y).sqrt();
    if denominator == 0.0 {
        return Err(AnalyticsError::ZeroVariance);
    }

    // Clamp absorbs floating-point overshoot just past +/-1.
    Ok(round_to(numerator / denominator, 4).clamp(-1.0, 1.0))
}

/// Correlate and classify in one step.
pub fn correlation_result(xs: &[f64], ys: &[f64]) -> Result<CorrelationResult, AnalyticsError> {
    correlate(xs, ys).map(CorrelationResult::classify)
}

/// Compare the last 30 aligned points against the 30 before them.
///
/// With fewer than 60 points there is no previous window to read, so the
/// full-series coefficient is reported for both sides and the trend is
/// stable.
pub fn analyze_trend(xs: &[f64], ys: &[f64]) -> Result<TrendResult, AnalyticsError> {
    if xs.len() != ys.len() {
        return Err(AnalyticsError::LengthMismatch {
            left: xs.len(),
            right: ys.len(),
        });
    }

    let len = xs.len();
    if len < TREND_MIN_POINTS {
        let coefficient = correlate(xs, ys)?;
        return Ok(TrendResult {
            current: coefficient,
            previous: coefficient,
            trend: Trend::Stable,
        });
    }

    let current = correlate(&xs[len - TREND_WINDOW..], &ys[len - TREND_WINDOW..])?;
    let previous = correlate(
        &xs[len - TREND_MIN_POINTS..len - TREND_WINDOW],
        &ys[len - TREND_MIN_POINTS..len - TREND_WINDOW],
    )?;

    let trend = if current - previous > TREND_DELTA {
        Trend::Increasing
    } else if current - previous < -TREND_DELTA {
        Trend::Decreasing
    } else {
        Trend::Stable
    };

    Ok(TrendResult {
        current,
        previous,
        trend,
    })
}
