//! Cross-sectional divergence scan over live percentage changes.
//!
//! Works directly on feed snapshots; no historical alignment is needed. The
//! alert classification consults a table of known historical correlations so
//! a pair that "normally moves together" is flagged differently from a
//! natural hedge.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::risk::CorrelationMatrixEntry;
use crate::{LiveQuote, Symbol};

/// Pairs where both moves are below this magnitude are ignored, in percent.
pub const MIN_NOTABLE_CHANGE_PCT: f64 = 0.5;
/// Divergence score above which a pair is strong.
pub const STRONG_DIVERGENCE: f64 = 3.0;
/// Divergence score at or above which a pair is moderate.
pub const MODERATE_DIVERGENCE: f64 = 1.5;
/// Maximum opposite-moving pairs reported per scan.
pub const MAX_PAIRS: usize = 10;

/// Historical correlation threshold above which divergence is unusual.
pub const UNUSUAL_CORRELATION: f64 = 0.5;
/// Historical correlation threshold below which a pair hedges naturally.
pub const HEDGE_CORRELATION: f64 = 0.3;

/// Magnitude bucket for a divergence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DivergenceStrength {
    Strong,
    Moderate,
    Low,
}

impl DivergenceStrength {
    fn from_score(score: f64) -> Self {
        if score > STRONG_DIVERGENCE {
            Self::Strong
        } else if score >= MODERATE_DIVERGENCE {
            Self::Moderate
        } else {
            Self::Low
        }
    }
}

/// Alert classification for an opposite-moving pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertType {
    HedgeOpportunity,
    DivergenceWarning,
    DivergenceDetected,
}

/// One asset's instantaneous move inside a pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetMove {
    pub symbol: Symbol,
    pub change_pct: f64,
}

/// Two assets currently moving in opposite directions.
///
/// `asset_a` is always the negative-change side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DivergencePair {
    pub asset_a: AssetMove,
    pub asset_b: AssetMove,
    pub divergence_score: f64,
    pub strength: DivergenceStrength,
}

/// One divergence finding classified against historical correlation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilityAlert {
    pub asset_a: AssetMove,
    pub asset_b: AssetMove,
    pub divergence_score: f64,
    pub historical_correlation: Option<f64>,
    pub alert_type: AlertType,
    pub strength: DivergenceStrength,
    pub message: String,
}

/// Known historical correlations, looked up under either symbol ordering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorrelationTable {
    coefficients: HashMap<(Symbol, Symbol), f64>,
}

impl CorrelationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, a: Symbol, b: Symbol, coefficient: f64) {
        self.coefficients.insert((a, b), coefficient);
    }

    pub fn lookup(&self, a: &Symbol, b: &Symbol) -> Option<f64> {
        self.coefficients
            .get(&(a.clone(), b.clone()))
            .or_else(|| self.coefficients.get(&(b.clone(), a.clone())))
            .copied()
    }

    /// Build a table from correlation-matrix cells, skipping the diagonal.
    pub fn from_matrix(entries: &[CorrelationMatrixEntry]) -> Self {
        let mut table = Self::new();
        for entry in entries {
            if entry.row < entry.col {
                table.insert(
                    entry.asset_a.clone(),
                    entry.asset_b.clone(),
                    entry.coefficient,
                );
            }
        }
        table
    }

    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }
}

/// Scan a snapshot cross-section for opposite-moving pairs.
///
/// A pair qualifies when at least one side moved 0.5% or more and the signs
/// are strictly opposite. Returns at most the 10 widest divergences, widest
/// first, with the falling asset canonically first in each pair.
pub fn find_opposite_pairs(quotes: &[LiveQuote]) -> Vec<DivergencePair> {
    let mut pairs = Vec::new();

    for (index, left) in quotes.iter().enumerate() {
        for right in &quotes[index + 1..] {
            let change_left = left.change_percent;
            let change_right = right.change_percent;

            if change_left.abs() < MIN_NOTABLE_CHANGE_PCT
                && change_right.abs() < MIN_NOTABLE_CHANGE_PCT
            {
                continue;
            }
            if change_left * change_right >= 0.0 {
                continue;
            }

            let (falling, rising) = if change_left < 0.0 {
                (left, right)
            } else {
                (right, left)
            };
            let score = (change_left - change_right).abs();

            pairs.push(DivergencePair {
                asset_a: AssetMove {
                    symbol: falling.symbol.clone(),
                    change_pct: falling.change_percent,
                },
                asset_b: AssetMove {
                    symbol: rising.symbol.clone(),
                    change_pct: rising.change_percent,
                },
                divergence_score: score,
                strength: DivergenceStrength::from_score(score),
            });
        }
    }

    pairs.sort_by(|left, right| right.divergence_score.total_cmp(&left.divergence_score));
    pairs.truncate(MAX_PAIRS);
    pairs
}

/// Classify each opposite-moving pair against known historical correlations.
///
/// Results keep the descending-divergence order of the pair scan.
pub fn pair_alerts(quotes: &[LiveQuote], known: &CorrelationTable) -> Vec<VolatilityAlert> {
    find_opposite_pairs(quotes)
        .into_iter()
        .map(|pair| classify_pair(pair, known))
        .collect()
}

fn classify_pair(pair: DivergencePair, known: &CorrelationTable) -> VolatilityAlert {
    let correlation = known.lookup(&pair.asset_a.symbol, &pair.asset_b.symbol);
    let a = &pair.asset_a.symbol;
    let b = &pair.asset_b.symbol;

    let (alert_type, message) = match correlation {
        None => (
            AlertType::DivergenceDetected,
            format!("{a} and {b} are moving in opposite directions"),
        ),
        Some(coefficient) if coefficient.abs() > UNUSUAL_CORRELATION => (
            AlertType::DivergenceWarning,
            format!("{a} and {b} normally move together but are currently diverging"),
        ),
        Some(coefficient) if coefficient.abs() < HEDGE_CORRELATION => (
            AlertType::HedgeOpportunity,
            format!("{a} and {b} act as a natural hedge for each other"),
        ),
        Some(_) => (
            AlertType::DivergenceDetected,
            format!("{a} and {b} show a moderate divergence from their usual relationship"),
        ),
    };

    VolatilityAlert {
        asset_a: pair.asset_a,
        asset_b: pair.asset_b,
        divergence_score: pair.divergence_score,
        historical_correlation: correlation,
        alert_type,
        strength: pair.strength,
        message,
    }
}
