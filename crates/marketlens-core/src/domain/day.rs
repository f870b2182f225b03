use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::well_known::Iso8601;
use time::{Date, Duration, OffsetDateTime, Weekday};

use crate::ValidationError;

/// One calendar day on the shared date axis, ISO-8601 (`YYYY-MM-DD`).
///
/// Daily observations are keyed by calendar day rather than instant so that
/// series from venues with different session clocks can be merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TradingDay(Date);

impl TradingDay {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        Date::parse(input, &Iso8601::DATE)
            .map(Self)
            .map_err(|_| ValidationError::InvalidDay {
                value: input.to_owned(),
            })
    }

    /// Current calendar day in UTC.
    pub fn today_utc() -> Self {
        Self(OffsetDateTime::now_utc().date())
    }

    pub fn from_date(date: Date) -> Self {
        Self(date)
    }

    pub fn into_inner(self) -> Date {
        self.0
    }

    /// Next calendar day.
    pub fn succ(self) -> Self {
        Self(self.0.saturating_add(Duration::days(1)))
    }

    /// Previous calendar day.
    pub fn pred(self) -> Self {
        Self(self.0.saturating_sub(Duration::days(1)))
    }

    pub fn is_weekend(self) -> bool {
        matches!(self.0.weekday(), Weekday::Saturday | Weekday::Sunday)
    }

    pub fn format_iso(self) -> String {
        self.0
            .format(&Iso8601::DATE)
            .expect("TradingDay must be ISO-8601 formattable")
    }
}

impl Display for TradingDay {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_iso())
    }
}

impl Serialize for TradingDay {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_iso())
    }
}

impl<'de> Deserialize<'de> for TradingDay {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}
