use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Card expiration as a year-month pair. Comparisons are month-granular; a
/// day component never enters the picture. The canonical textual form is
/// `yyyy-MM`, which is also the database column format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Expiry {
    year: i32,
    month: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExpiryError {
    #[error("month must be between 1 and 12, got {0}")]
    MonthOutOfRange(u32),
    #[error("expiration date must use the yyyy-MM format")]
    Malformed,
}

impl Expiry {
    pub fn new(year: i32, month: u32) -> Result<Self, ExpiryError> {
        if !(1..=12).contains(&month) {
            return Err(ExpiryError::MonthOutOfRange(month));
        }
        Ok(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The year-month a timestamp falls in.
    pub fn from_datetime(dt: &DateTime<Utc>) -> Self {
        Self {
            year: dt.year(),
            month: dt.month(),
        }
    }

    pub fn plus_years(self, years: i32) -> Self {
        Self {
            year: self.year + years,
            month: self.month,
        }
    }
}

impl fmt::Display for Expiry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Expiry {
    type Err = ExpiryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s.split_once('-').ok_or(ExpiryError::Malformed)?;
        let year: i32 = year.parse().map_err(|_| ExpiryError::Malformed)?;
        let month: u32 = month.parse().map_err(|_| ExpiryError::Malformed)?;
        Expiry::new(year, month)
    }
}

impl Serialize for Expiry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Expiry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn orders_by_year_then_month() {
        let a = Expiry::new(2023, 12).unwrap();
        let b = Expiry::new(2024, 1).unwrap();
        let c = Expiry::new(2024, 3).unwrap();
        assert!(a < b);
        assert!(b < c);
        assert!(c >= c);
    }

    #[test]
    fn formats_and_parses_canonical_form() {
        let expiry = Expiry::new(2025, 3).unwrap();
        assert_eq!(expiry.to_string(), "2025-03");
        assert_eq!("2025-03".parse::<Expiry>().unwrap(), expiry);
        assert_eq!("2025-3".parse::<Expiry>().unwrap(), expiry);
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(
            "2025-13".parse::<Expiry>(),
            Err(ExpiryError::MonthOutOfRange(13))
        );
        assert_eq!("202512".parse::<Expiry>(), Err(ExpiryError::Malformed));
        assert_eq!("abcd-ef".parse::<Expiry>(), Err(ExpiryError::Malformed));
    }

    #[test]
    fn plus_years_keeps_month() {
        let expiry = Expiry::new(2022, 12).unwrap();
        assert_eq!(expiry.plus_years(1), Expiry::new(2023, 12).unwrap());
    }
}
