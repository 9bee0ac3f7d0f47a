use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const CANONICAL_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid calendar day {raw:?}: expected YYYY-MM-DD")]
pub struct DayParseError {
    raw: String,
}

impl DayParseError {
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

/// A bare calendar day an entry is attributed to.
///
/// The canonical text form is the zero-padded `YYYY-MM-DD`, so ordering days
/// and ordering their canonical strings agree. Parsing accepts only that form:
/// timestamps and other layouts are rejected rather than truncated, which keeps
/// a stored day from drifting across time zones.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntryDay(NaiveDate);

impl EntryDay {
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Build a day from year, month and day-of-month.
    ///
    /// Returns `None` for dates that do not exist (e.g. February 30th).
    #[must_use]
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    #[must_use]
    pub fn as_naive_date(&self) -> NaiveDate {
        self.0
    }

    /// The calendar day before this one, if representable.
    #[must_use]
    pub fn pred(&self) -> Option<Self> {
        self.0.pred_opt().map(Self)
    }

    /// The calendar day after this one, if representable.
    #[must_use]
    pub fn succ(&self) -> Option<Self> {
        self.0.succ_opt().map(Self)
    }

    /// Step `days` calendar days into the past.
    #[must_use]
    pub fn days_before(&self, days: u32) -> Option<Self> {
        self.0
            .checked_sub_days(chrono::Days::new(u64::from(days)))
            .map(Self)
    }

    #[must_use]
    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }
}

impl From<NaiveDate> for EntryDay {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Debug for EntryDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntryDay({self})")
    }
}

impl fmt::Display for EntryDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(CANONICAL_FORMAT))
    }
}

impl FromStr for EntryDay {
    type Err = DayParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || DayParseError { raw: s.to_owned() };
        let bytes = s.as_bytes();
        let canonical_shape = bytes.len() == 10
            && bytes.iter().enumerate().all(|(i, b)| match i {
                4 | 7 => *b == b'-',
                _ => b.is_ascii_digit(),
            });
        if !canonical_shape {
            return Err(err());
        }
        NaiveDate::parse_from_str(s, CANONICAL_FORMAT)
            .map(Self)
            .map_err(|_| err())
    }
}

impl TryFrom<String> for EntryDay {
    type Error = DayParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EntryDay> for String {
    fn from(day: EntryDay) -> Self {
        day.to_string()
    }
}
