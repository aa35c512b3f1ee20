use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};

use regex::Regex;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// A calendar month written as `MM-YYYY`.
///
/// Stored as the first day of the month, so two values compare by year first
/// and then by month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthYear(NaiveDate);

impl MonthYear {
    pub fn new(month: u32, year: i32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self)
            .ok_or_else(|| Error::Validation(format!("{:02}-{:04} is not a valid month", month, year)))
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// The first day of the month, as persisted
    pub fn first_day(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for MonthYear {
    /// Truncates to the first day of the month
    fn from(date: NaiveDate) -> Self {
        Self(date.with_day(1).unwrap_or(date))
    }
}

impl FromStr for MonthYear {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        lazy_static::lazy_static! {
            static ref MONTH_YEAR_REGEX: Regex = Regex::new(r"^(\d{2})-(\d{4})$").unwrap();
        }

        let captures = MONTH_YEAR_REGEX
            .captures(value)
            .ok_or_else(|| Error::Validation("Month must be formatted as MM-YYYY".into()))?;

        let month: u32 = captures[1]
            .parse()
            .map_err(|_| Error::Validation("Month is not a number".into()))?;
        let year: i32 = captures[2]
            .parse()
            .map_err(|_| Error::Validation("Year is not a number".into()))?;

        if !(1..=12).contains(&month) {
            return Err(Error::Validation("Month must be between 01 and 12".into()));
        }

        Self::new(month, year)
    }
}

impl fmt::Display for MonthYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:04}", self.month(), self.year())
    }
}

impl Serialize for MonthYear {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthYear {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(de::Error::custom)
    }
}
