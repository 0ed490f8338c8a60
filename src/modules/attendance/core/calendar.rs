// Calendar keys used by attendance cells and monthly statistics.
//
// Purpose
// - Validate date keys (`YYYY-MM-DD`) on the write path.
// - Represent a target month (`YYYY-MM`) for the statistics.
//
// Notes
// - Month matching stays a string prefix test on the date key. Write-time validation is what
//   keeps new keys well formed; keys that arrive through an old or imported document are
//   matched as they are.

use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalendarError {
    #[error("invalid date key: {0:?} (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("invalid month: {0:?} (expected YYYY-MM)")]
    InvalidMonth(String),
}

/// Accepts only real calendar dates written exactly as `YYYY-MM-DD`.
pub fn validate_date_key(key: &str) -> Result<NaiveDate, CalendarError> {
    let date = NaiveDate::parse_from_str(key, DATE_KEY_FORMAT)
        .map_err(|_| CalendarError::InvalidDate(key.to_string()))?;
    if date.format(DATE_KEY_FORMAT).to_string() != key {
        return Err(CalendarError::InvalidDate(key.to_string()));
    }
    Ok(date)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Result<Self, CalendarError> {
        match NaiveDate::from_ymd_opt(year, month, 1) {
            Some(_) if (0..=9999).contains(&year) => Ok(Self { year, month }),
            _ => Err(CalendarError::InvalidMonth(format!("{year:04}-{month:02}"))),
        }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
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

    /// The `YYYY-MM` prefix a date key must start with to fall into this month.
    pub fn prefix(&self) -> String {
        self.to_string()
    }

    pub fn matches(&self, date_key: &str) -> bool {
        date_key.starts_with(&self.prefix())
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CalendarError::InvalidMonth(s.to_string());
        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

#[cfg(test)]
mod calendar_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("2024-03-05")]
    #[case("2024-02-29")]
    #[case("1999-12-31")]
    fn it_should_accept_canonical_dates(#[case] key: &str) {
        assert!(validate_date_key(key).is_ok());
    }

    #[rstest]
    #[case("2024-031")]
    #[case("2024-3-5")]
    #[case("2023-02-29")]
    #[case("2024-13-01")]
    #[case("2024-03-05T10:00")]
    #[case("")]
    #[case("not a date")]
    fn it_should_reject_malformed_dates(#[case] key: &str) {
        assert_eq!(
            validate_date_key(key),
            Err(CalendarError::InvalidDate(key.to_string()))
        );
    }

    #[rstest]
    fn it_should_parse_and_display_a_month() {
        let month: MonthKey = "2024-03".parse().unwrap();
        assert_eq!(month.year(), 2024);
        assert_eq!(month.month(), 3);
        assert_eq!(month.to_string(), "2024-03");
        assert_eq!(month, MonthKey::new(2024, 3).unwrap());
    }

    #[rstest]
    #[case("2024-3")]
    #[case("2024-13")]
    #[case("2024-00")]
    #[case("24-03")]
    #[case("2024/03")]
    #[case("2024-03-01")]
    fn it_should_reject_malformed_months(#[case] raw: &str) {
        assert!(raw.parse::<MonthKey>().is_err());
    }

    #[rstest]
    fn it_should_match_date_keys_by_prefix() {
        let march = MonthKey::new(2024, 3).unwrap();
        assert!(march.matches("2024-03-05"));
        assert!(march.matches("2024-031"));
        assert!(!march.matches("2024-04-01"));
        assert!(!march.matches("2023-03-05"));
    }

    #[rstest]
    fn it_should_take_the_month_of_a_date() {
        let date = validate_date_key("2024-11-30").unwrap();
        assert_eq!(MonthKey::of(date).to_string(), "2024-11");
    }
}
