use crate::consts::{
    CENTURY_CYCLE, DATE_SEPARATOR, DAYS_IN_MONTH, DAYS_IN_WEEK, FEBRUARY, FEBRUARY_DAYS_LEAP,
    GREGORIAN_CYCLE, LEAP_YEAR_CYCLE, MAX_MONTH, MAX_YEAR,
};
use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU16;
use std::num::NonZeroU8;
use std::str::FromStr;

/// Days between 0000-03-01 and 1970-01-01 in the proleptic Gregorian calendar
const UNIX_EPOCH_OFFSET: i64 = 719_468;
/// Days in a full 400-year Gregorian cycle
const DAYS_PER_ERA: i64 = 146_097;
/// 1970-01-01 was a Thursday
const EPOCH_WEEKDAY: i64 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Invalid year: {} (must be 1-{})", "_0", MAX_YEAR)]
    InvalidYear(u16),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day {day} for month {year}-{month:02}")]
    InvalidDay { month: u8, day: u8, year: u16 },
    #[display(fmt = "Empty date string")]
    EmptyInput,
}

impl std::error::Error for ParseError {}

/// A year value guaranteed to be in the range `1..=MAX_YEAR` (1..=9999)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Year(NonZeroU16);

impl Year {
    /// Creates a new Year, validating that it's non-zero and <= `MAX_YEAR`
    ///
    /// # Errors
    /// Returns `ParseError::InvalidYear` if the value is 0 or > `MAX_YEAR`.
    pub fn new(value: u16) -> Result<Self, ParseError> {
        let non_zero = NonZeroU16::new(value).ok_or(ParseError::InvalidYear(value))?;
        if value > MAX_YEAR {
            return Err(ParseError::InvalidYear(value));
        }
        Ok(Self(non_zero))
    }

    #[inline]
    pub const fn get(self) -> u16 {
        self.0.get()
    }
}

impl TryFrom<u16> for Year {
    type Error = ParseError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Year> for u16 {
    fn from(year: Year) -> Self {
        year.0.get()
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A month value guaranteed to be in the range `1..=MAX_MONTH` (1..=12)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Month(NonZeroU8);

impl Month {
    /// Creates a new Month, validating that it's non-zero and <= `MAX_MONTH`
    ///
    /// # Errors
    /// Returns `ParseError::InvalidMonth` if the value is 0 or > `MAX_MONTH`.
    pub fn new(value: u8) -> Result<Self, ParseError> {
        let non_zero = NonZeroU8::new(value).ok_or(ParseError::InvalidMonth(value))?;
        if value > MAX_MONTH {
            return Err(ParseError::InvalidMonth(value));
        }
        Ok(Self(non_zero))
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }

    /// For `const` season tables only, where an out-of-range value is a
    /// compile error.
    pub(crate) const fn from_table(value: u8) -> Self {
        match NonZeroU8::new(value) {
            Some(non_zero) if value <= MAX_MONTH => Self(non_zero),
            _ => panic!("month table entry out of range"),
        }
    }
}

impl TryFrom<u8> for Month {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Month> for u8 {
    fn from(month: Month) -> Self {
        month.0.get()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A day value guaranteed to be valid for a given year and month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Day(NonZeroU8);

impl Day {
    /// Creates a new Day, validating that it's non-zero and valid for the given year and month
    ///
    /// # Errors
    /// Returns `ParseError::InvalidDay` if the value is 0 or invalid for the given year and month.
    pub fn new(value: u8, year: u16, month: u8) -> Result<Self, ParseError> {
        let invalid = ParseError::InvalidDay {
            month,
            day: value,
            year,
        };
        let non_zero = NonZeroU8::new(value).ok_or_else(|| invalid.clone())?;
        if value > days_in_month(year, month) {
            return Err(invalid);
        }
        Ok(Self(non_zero))
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

impl From<Day> for u8 {
    fn from(day: Day) -> Self {
        day.0.get()
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A local wall-clock calendar date with no time or zone attached.
/// Field order makes the derived ordering chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{:04}-{:02}-{:02}", "year.get()", "month.get()", "day.get()")]
pub struct CalendarDate {
    year: Year,
    month: Month,
    day: Day,
}

impl CalendarDate {
    /// Creates a date from raw components.
    ///
    /// # Errors
    /// Returns a `ParseError` naming the first invalid component.
    pub fn from_ymd(year: u16, month: u8, day: u8) -> Result<Self, ParseError> {
        let year_typed = Year::new(year)?;
        let month_typed = Month::new(month)?;
        let day_typed = Day::new(day, year, month)?;
        Ok(Self {
            year: year_typed,
            month: month_typed,
            day: day_typed,
        })
    }

    /// Today's date on the local clock.
    ///
    /// # Errors
    /// Returns `ParseError::InvalidYear` if the clock is outside `1..=MAX_YEAR`.
    pub fn today() -> Result<Self, ParseError> {
        Self::from_naive(chrono::Local::now().date_naive())
    }

    /// Years that do not fit are reported saturated to `0..=u16::MAX`.
    fn from_naive(date: chrono::NaiveDate) -> Result<Self, ParseError> {
        use chrono::Datelike;

        let raw = date.year();
        let year = u16::try_from(raw).map_err(|_| {
            ParseError::InvalidYear(u16::try_from(raw.max(0)).unwrap_or(u16::MAX))
        })?;
        // chrono guarantees month 1..=12 and day 1..=31
        Self::from_ymd(year, date.month() as u8, date.day() as u8)
    }

    #[inline]
    pub const fn year(&self) -> u16 {
        self.year.get()
    }

    #[inline]
    pub const fn month(&self) -> u8 {
        self.month.get()
    }

    #[inline]
    pub const fn day(&self) -> u8 {
        self.day.get()
    }

    pub const fn month_typed(&self) -> Month {
        self.month
    }

    /// Day of the week, 0 = Sunday through 6 = Saturday.
    pub fn weekday(&self) -> u8 {
        let days = self.days_since_epoch();
        // rem_euclid keeps the result in 0..7 for pre-1970 dates
        (days + EPOCH_WEEKDAY).rem_euclid(i64::from(DAYS_IN_WEEK)) as u8
    }

    /// Moves the date by a signed number of calendar days.
    /// Returns `None` if the result leaves `1..=MAX_YEAR`.
    pub fn add_days(&self, days: i32) -> Option<Self> {
        let (y, m, d) = civil_from_days(self.days_since_epoch() + i64::from(days));
        let year = u16::try_from(y).ok()?;
        Self::from_ymd(year, m, d).ok()
    }

    fn days_since_epoch(&self) -> i64 {
        days_from_civil(i64::from(self.year()), self.month(), self.day())
    }
}

impl FromStr for CalendarDate {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let parts: Vec<&str> = trimmed.split(DATE_SEPARATOR).map(str::trim).collect();
        let [year, month, day] = parts.as_slice() else {
            return Err(ParseError::InvalidFormat(trimmed.to_owned()));
        };

        let year = year
            .parse::<u16>()
            .map_err(|_| ParseError::InvalidFormat(trimmed.to_owned()))?;
        let month = month
            .parse::<u8>()
            .map_err(|_| ParseError::InvalidFormat(trimmed.to_owned()))?;
        let day = day
            .parse::<u8>()
            .map_err(|_| ParseError::InvalidFormat(trimmed.to_owned()))?;

        Self::from_ymd(year, month, day)
    }
}

impl Serialize for CalendarDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// Helper functions

pub const fn is_leap_year(year: u16) -> bool {
    (year % LEAP_YEAR_CYCLE == 0 && year % CENTURY_CYCLE != 0) || (year % GREGORIAN_CYCLE == 0)
}

pub const fn days_in_month(year: u16, month: u8) -> u8 {
    debug_assert!(month != 0 && month <= MAX_MONTH);

    if month == FEBRUARY && is_leap_year(year) {
        FEBRUARY_DAYS_LEAP
    } else {
        DAYS_IN_MONTH[month as usize]
    }
}

/// Days since 1970-01-01 (Howard Hinnant's civil calendar algorithm).
fn days_from_civil(year: i64, month: u8, day: u8) -> i64 {
    let month = i64::from(month);
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y.rem_euclid(400);
    let mp = (month + 9) % 12;
    let doy = (153 * mp + 2) / 5 + i64::from(day) - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * DAYS_PER_ERA + doe - UNIX_EPOCH_OFFSET
}

/// Inverse of `days_from_civil`.
fn civil_from_days(days: i64) -> (i64, u8, u8) {
    let z = days + UNIX_EPOCH_OFFSET;
    let era = z.div_euclid(DAYS_PER_ERA);
    let doe = z.rem_euclid(DAYS_PER_ERA);
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = if m <= 2 { y + 1 } else { y };
    let d = doy - (153 * mp + 2) / 5 + 1;
    // m is 1..=12 and d is 1..=31 by construction
    (y, m as u8, d as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: u16, m: u8, d: u8) -> CalendarDate {
        CalendarDate::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_year_new_valid() {
        assert!(Year::new(1).is_ok());
        assert!(Year::new(2000).is_ok());
        assert!(Year::new(9999).is_ok());
    }

    #[test]
    fn test_year_new_invalid() {
        assert!(matches!(Year::new(0), Err(ParseError::InvalidYear(0))));
        assert!(matches!(
            Year::new(10000),
            Err(ParseError::InvalidYear(10000))
        ));
    }

    #[test]
    fn test_month_new_valid() {
        for m in 1..=12 {
            assert!(Month::new(m).is_ok(), "Month {m} should be valid");
        }
    }

    #[test]
    fn test_month_new_invalid() {
        assert!(matches!(Month::new(0), Err(ParseError::InvalidMonth(0))));
        assert!(matches!(Month::new(13), Err(ParseError::InvalidMonth(13))));
    }

    #[test]
    fn test_month_serde_rejects_out_of_range() {
        let month: Month = serde_json::from_str("8").unwrap();
        assert_eq!(month.get(), 8);
        assert!(serde_json::from_str::<Month>("13").is_err());
    }

    #[test]
    fn test_day_new_valid() {
        assert!(Day::new(31, 2024, 1).is_ok());
        assert!(Day::new(29, 2023, 2).is_err());
        assert!(Day::new(29, 2024, 2).is_ok());
        assert!(Day::new(31, 2024, 4).is_err());
        assert!(matches!(
            Day::new(0, 2024, 1),
            Err(ParseError::InvalidDay { .. })
        ));
    }

    #[test]
    fn test_is_leap_year_cases() {
        struct TestCase {
            year: u16,
            is_leap: bool,
            description: &'static str,
        }

        let cases = [
            TestCase {
                year: 2024,
                is_leap: true,
                description: "divisible by 4",
            },
            TestCase {
                year: 2023,
                is_leap: false,
                description: "not divisible by 4",
            },
            TestCase {
                year: 1900,
                is_leap: false,
                description: "century not divisible by 400",
            },
            TestCase {
                year: 2000,
                is_leap: true,
                description: "divisible by 400",
            },
        ];

        for case in &cases {
            assert_eq!(
                is_leap_year(case.year),
                case.is_leap,
                "Year {} ({})",
                case.year,
                case.description
            );
        }
    }

    #[test]
    fn test_days_in_month() {
        let expected = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
        for month in 1..=12 {
            assert_eq!(days_in_month(2023, month), expected[month as usize]);
        }
        assert_eq!(days_in_month(2024, 2), 29);
    }

    #[test]
    fn test_weekday_known_dates() {
        // 1970-01-01 Thursday, 2024-11-28 Thursday, 2024-03-31 Sunday
        assert_eq!(date(1970, 1, 1).weekday(), 4);
        assert_eq!(date(2024, 11, 28).weekday(), 4);
        assert_eq!(date(2024, 3, 31).weekday(), 0);
        assert_eq!(date(2000, 1, 1).weekday(), 6);
        assert_eq!(date(1900, 1, 1).weekday(), 1);
    }

    #[test]
    fn test_add_days_crosses_month_and_year() {
        assert_eq!(date(2024, 12, 31).add_days(1), Some(date(2025, 1, 1)));
        assert_eq!(date(2025, 1, 1).add_days(-1), Some(date(2024, 12, 31)));
        assert_eq!(date(2024, 2, 28).add_days(1), Some(date(2024, 2, 29)));
        assert_eq!(date(2023, 2, 28).add_days(1), Some(date(2023, 3, 1)));
        assert_eq!(date(2024, 3, 31).add_days(-47), Some(date(2024, 2, 13)));
        assert_eq!(date(2024, 6, 15).add_days(0), Some(date(2024, 6, 15)));
    }

    #[test]
    fn test_add_days_out_of_range() {
        assert_eq!(date(9999, 12, 31).add_days(1), None);
        assert_eq!(date(1, 1, 1).add_days(-1), None);
    }

    #[test]
    fn test_parse_and_display() {
        let parsed = "2024-03-25".parse::<CalendarDate>().unwrap();
        assert_eq!(parsed, date(2024, 3, 25));
        assert_eq!(parsed.to_string(), "2024-03-25");
        assert_eq!(" 0999-1-2 ".parse::<CalendarDate>().unwrap().to_string(), "0999-01-02");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<CalendarDate>(), Err(ParseError::EmptyInput));
        assert!(matches!(
            "2024-03".parse::<CalendarDate>(),
            Err(ParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            "2024-xx-01".parse::<CalendarDate>(),
            Err(ParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            "2024-13-01".parse::<CalendarDate>(),
            Err(ParseError::InvalidMonth(13))
        ));
        assert!(matches!(
            "2023-02-29".parse::<CalendarDate>(),
            Err(ParseError::InvalidDay { .. })
        ));
    }

    #[test]
    fn test_ordering_is_chronological() {
        assert!(date(2024, 1, 31) < date(2024, 2, 1));
        assert!(date(2023, 12, 31) < date(2024, 1, 1));
        assert!(date(2024, 5, 5) > date(2024, 5, 4));
    }

    #[test]
    fn test_serde_string_format() {
        let d = date(2025, 4, 20);
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, "\"2025-04-20\"");
        let back: CalendarDate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
        assert!(serde_json::from_str::<CalendarDate>("\"2025-02-30\"").is_err());
    }

    #[test]
    fn test_today_is_valid() {
        let today = CalendarDate::today().unwrap();
        assert!(today.year() >= 2024);
    }

    #[test]
    fn test_clock_year_out_of_range_is_reported() {
        let naive = |y| chrono::NaiveDate::from_ymd_opt(y, 6, 1).unwrap();

        assert_eq!(
            CalendarDate::from_naive(naive(2024)).unwrap(),
            CalendarDate::from_ymd(2024, 6, 1).unwrap()
        );
        assert_eq!(
            CalendarDate::from_naive(naive(10_000)),
            Err(ParseError::InvalidYear(10_000))
        );
        assert_eq!(
            CalendarDate::from_naive(naive(70_000)),
            Err(ParseError::InvalidYear(u16::MAX))
        );
        assert_eq!(
            CalendarDate::from_naive(naive(-44)),
            Err(ParseError::InvalidYear(0))
        );
    }
}
