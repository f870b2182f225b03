use serde::{Deserialize, Serialize};

use crate::{Symbol, TradingDay, ValidationError};

/// Canonical instrument class.
///
/// The class decides which trading calendar a history follows: equities and
/// funds observe exchange sessions, crypto trades every calendar day,
/// commodities follow their own venue calendars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    Equity,
    Etf,
    Index,
    Crypto,
    Commodity,
    Forex,
    Other,
}

impl AssetClass {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equity => "equity",
            Self::Etf => "etf",
            Self::Index => "index",
            Self::Crypto => "crypto",
            Self::Commodity => "commodity",
            Self::Forex => "forex",
            Self::Other => "other",
        }
    }

    /// Whether this class trades on every calendar day.
    pub const fn trades_continuously(self) -> bool {
        matches!(self, Self::Crypto)
    }
}

impl std::fmt::Display for AssetClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AssetClass {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "equity" => Ok(Self::Equity),
            "etf" => Ok(Self::Etf),
            "index" => Ok(Self::Index),
            "crypto" => Ok(Self::Crypto),
            "commodity" => Ok(Self::Commodity),
            "forex" => Ok(Self::Forex),
            "other" => Ok(Self::Other),
            other => Err(ValidationError::InvalidAssetClass {
                value: other.to_owned(),
            }),
        }
    }
}

/// One OHLC observation on a calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub day: TradingDay,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl PricePoint {
    pub fn new(
        day: TradingDay,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
    ) -> Result<Self, ValidationError> {
        validate_finite("open", open)?;
        validate_finite("high", high)?;
        validate_finite("low", low)?;
        validate_finite("close", close)?;

        if close <= 0.0 {
            return Err(ValidationError::NonPositiveClose { value: close });
        }

        if high < low {
            return Err(ValidationError::InvalidPriceRange);
        }

        Ok(Self {
            day,
            open,
            high,
            low,
            close,
        })
    }

    /// Synthetic point carrying a single traded price in all four fields,
    /// used when a live quote is appended to a daily history.
    pub fn flat(day: TradingDay, price: f64) -> Result<Self, ValidationError> {
        Self::new(day, price, price, price, price)
    }
}

/// Ordered daily history for one symbol, strictly increasing by day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: Symbol,
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(symbol: Symbol, points: Vec<PricePoint>) -> Result<Self, ValidationError> {
        for pair in points.windows(2) {
            if pair[1].day <= pair[0].day {
                return Err(ValidationError::NonMonotonicDays {
                    previous: pair[0].day.format_iso(),
                    day: pair[1].day.format_iso(),
                });
            }
        }

        Ok(Self { symbol, points })
    }

    pub fn empty(symbol: Symbol) -> Self {
        Self {
            symbol,
            points: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last_day(&self) -> Option<TradingDay> {
        self.points.last().map(|point| point.day)
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|point| point.close).collect()
    }

    /// (day, close) pairs, the shape consumed by the aligner.
    pub fn dated_closes(&self) -> Vec<(TradingDay, f64)> {
        self.points
            .iter()
            .map(|point| (point.day, point.close))
            .collect()
    }
}

/// One portfolio position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub symbol: Symbol,
    pub quantity: f64,
    pub asset_class: AssetClass,
}

impl Holding {
    pub fn new(
        symbol: Symbol,
        quantity: f64,
        asset_class: AssetClass,
    ) -> Result<Self, ValidationError> {
        validate_finite("quantity", quantity)?;
        if quantity <= 0.0 {
            return Err(ValidationError::NonPositiveQuantity { value: quantity });
        }

        Ok(Self {
            symbol,
            quantity,
            asset_class,
        })
    }
}

fn validate_finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    Ok(())
}
