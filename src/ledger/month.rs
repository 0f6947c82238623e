use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Calendar month in `YYYY-MM` form. Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) && (0..=9999).contains(&year) {
            Some(MonthKey { year, month })
        } else {
            None
        }
    }

    /// Parses an exact `YYYY-MM` string. Anything else yields `None`.
    pub fn parse(value: &str) -> Option<Self> {
        let bytes = value.as_bytes();
        if bytes.len() != 7 || bytes[4] != b'-' {
            return None;
        }
        if !bytes[..4].iter().all(u8::is_ascii_digit) || !bytes[5..].iter().all(u8::is_ascii_digit)
        {
            return None;
        }
        let year: i32 = value[..4].parse().ok()?;
        let month: u32 = value[5..].parse().ok()?;
        MonthKey::new(year, month)
    }

    /// Derives the month from the leading `YYYY-MM` of a date string.
    /// Empty or malformed dates have no month.
    pub fn from_date_str(date: &str) -> Option<Self> {
        MonthKey::parse(date.get(..7)?)
    }

    pub fn from_date(date: NaiveDate) -> Self {
        MonthKey {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        MonthKey::parse(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid month key `{}`", raw)))
    }
}

/// Month selection for entry listings and aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthFilter {
    All,
    Month(MonthKey),
}

impl MonthFilter {
    /// Parses the UI selector value: the literal `all` or a `YYYY-MM` key.
    pub fn parse(value: &str) -> Option<Self> {
        if value == "all" {
            Some(MonthFilter::All)
        } else {
            MonthKey::parse(value).map(MonthFilter::Month)
        }
    }
}
