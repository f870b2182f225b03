use thiserror::Error;

/// Validation and contract errors exposed by `marketlens-core` domain types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("day must be an ISO-8601 calendar date (YYYY-MM-DD): '{value}'")]
    InvalidDay { value: String },

    #[error(
        "invalid asset class '{value}', expected one of equity, etf, index, crypto, commodity, forex, other"
    )]
    InvalidAssetClass { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("close must be positive, got {value}")]
    NonPositiveClose { value: f64 },
    #[error("price point high must be >= low")]
    InvalidPriceRange,
    #[error("price series days must be strictly increasing: '{day}' follows '{previous}'")]
    NonMonotonicDays { previous: String, day: String },

    #[error("holding quantity must be positive, got {value}")]
    NonPositiveQuantity { value: f64 },

    #[error("history request days must be greater than zero")]
    ZeroHistoryDays,
}

/// Computation-level errors for the analytics functions.
///
/// The upstream system modelled these as `{error: string}` tagged objects;
/// here every computation returns `Result<_, AnalyticsError>` so callers must
/// handle both branches.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("need at least {min} return points, got {len}")]
    TooFewPoints { len: usize, min: usize },

    #[error("return series length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("cannot correlate series where all values are identical")]
    ZeroVariance,
}
