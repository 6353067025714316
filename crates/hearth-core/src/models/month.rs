//! Calendar month keys for the monthly task index.

use std::fmt;
use std::str::FromStr;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

/// A calendar month, the bucketing unit of the monthly index.
///
/// Ordered chronologically; formats as `"YYYY-MM"`, the key shape stored
/// in the `task_months` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    year: i16,
    month: i8,
}

impl MonthKey {
    /// Create a month key, validating the month number.
    pub fn new(year: i16, month: i8) -> Result<Self, String> {
        if !(1..=12).contains(&month) {
            return Err(format!("Invalid month number: {month}"));
        }
        Ok(Self { year, month })
    }

    /// The month containing the given date.
    pub fn of(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The calendar month immediately after this one.
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

}

/// Every month overlapped by the inclusive span `[start, end]`.
///
/// Returns an empty list for an inverted span; callers validate spans
/// before storing them, so an empty result only shows up on bad input.
pub fn months_spanned(start: Date, end: Date) -> Vec<MonthKey> {
    let mut months = Vec::new();
    let mut current = MonthKey::of(start);
    let last = MonthKey::of(end);
    while current <= last {
        months.push(current);
        current = current.next();
    }
    months
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| format!("Invalid month key: {s}"))?;
        let year: i16 = year.parse().map_err(|_| format!("Invalid month key: {s}"))?;
        let month: i8 = month
            .parse()
            .map_err(|_| format!("Invalid month key: {s}"))?;
        Self::new(year, month)
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for MonthKey {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
