mod day;
mod models;
mod symbol;

pub use day::TradingDay;
pub use models::{AssetClass, Holding, PricePoint, PriceSeries};
pub use symbol::Symbol;
