//! Holiday date rules and the matchers behind them.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::consts::{DAYS_IN_WEEK, MAX_MONTH, MAX_OCCURRENCE, MAX_WEEKDAY};
use crate::country::Country;
use crate::date::{CalendarDate, ParseError, days_in_month};

/// Any leap year; used so February 29 passes validation.
const LEAP_REFERENCE_YEAR: u16 = 2000;

/// Error for rule fields outside their valid range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("month {0} is outside 1-12")]
    InvalidMonth(u8),
    #[error("day {day} does not exist in month {month}")]
    InvalidDay { month: u8, day: u8 },
    #[error("weekday {0} is outside 0-6")]
    InvalidWeekday(u8),
    #[error("occurrence {0} is outside 1-5")]
    InvalidOccurrence(u8),
}

/// Signature of a custom holiday predicate.
pub type HolidayPredicate = dyn Fn(&CalendarDate, Country) -> bool + Send + Sync;

/// Shared handle to a registrant-supplied predicate.
#[derive(Clone)]
pub struct CustomPredicate(Arc<HolidayPredicate>);

impl CustomPredicate {
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&CalendarDate, Country) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(predicate))
    }

    pub fn call(&self, date: &CalendarDate, country: Country) -> bool {
        (self.0)(date, country)
    }
}

impl fmt::Debug for CustomPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomPredicate(..)")
    }
}

/// When a holiday occurs. Everything but `CustomPredicate` round-trips
/// through serde with a `type` tag; unknown tags fail to deserialize.
/// Field ranges are checked by [`HolidayRule::validate`] at registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HolidayRule {
    /// Same month and day every year.
    #[serde(rename = "fixed")]
    FixedDate { month: u8, day: u8 },
    /// Inclusive span; `start_month > end_month` wraps across the year end.
    #[serde(rename = "range", rename_all = "camelCase")]
    DateRange {
        start_month: u8,
        start_day: u8,
        end_month: u8,
        end_day: u8,
    },
    /// Nth weekday (0 = Sunday) of a month.
    #[serde(rename = "relative")]
    RelativeWeekday {
        month: u8,
        weekday: u8,
        occurrence: u8,
    },
    /// Signed day offset from Easter Sunday.
    #[serde(rename = "easter", rename_all = "camelCase")]
    EasterOffset { offset_days: i32 },
    #[serde(skip)]
    CustomPredicate(CustomPredicate),
}

impl HolidayRule {
    pub const fn fixed(month: u8, day: u8) -> Self {
        Self::FixedDate { month, day }
    }

    pub const fn range(start_month: u8, start_day: u8, end_month: u8, end_day: u8) -> Self {
        Self::DateRange {
            start_month,
            start_day,
            end_month,
            end_day,
        }
    }

    pub const fn relative(month: u8, weekday: u8, occurrence: u8) -> Self {
        Self::RelativeWeekday {
            month,
            weekday,
            occurrence,
        }
    }

    pub const fn easter(offset_days: i32) -> Self {
        Self::EasterOffset { offset_days }
    }

    pub fn custom<F>(predicate: F) -> Self
    where
        F: Fn(&CalendarDate, Country) -> bool + Send + Sync + 'static,
    {
        Self::CustomPredicate(CustomPredicate::new(predicate))
    }

    /// Whether the rule fires on `date` for `country`.
    pub fn matches(&self, date: &CalendarDate, country: Country) -> bool {
        match self {
            Self::FixedDate { month, day } => date.month() == *month && date.day() == *day,
            Self::DateRange {
                start_month,
                start_day,
                end_month,
                end_day,
            } => {
                let current = (date.month(), date.day());
                let start = (*start_month, *start_day);
                let end = (*end_month, *end_day);
                if start_month <= end_month {
                    start <= current && current <= end
                } else {
                    current >= start || current <= end
                }
            }
            Self::RelativeWeekday {
                month,
                weekday,
                occurrence,
            } => {
                date.month() == *month
                    && date.weekday() == *weekday
                    && weekday_occurrence(date.day()) == *occurrence
            }
            Self::EasterOffset { offset_days } => easter_sunday(date.year())
                .ok()
                .and_then(|easter| easter.add_days(*offset_days))
                .is_some_and(|target| target == *date),
            Self::CustomPredicate(predicate) => predicate.call(date, country),
        }
    }

    /// Checks every field against its valid range.
    ///
    /// # Errors
    /// Returns the first out-of-range field as a `RuleError`.
    pub fn validate(&self) -> Result<(), RuleError> {
        match self {
            Self::FixedDate { month, day } => validate_day(*month, *day),
            Self::DateRange {
                start_month,
                start_day,
                end_month,
                end_day,
            } => {
                validate_day(*start_month, *start_day)?;
                validate_day(*end_month, *end_day)
            }
            Self::RelativeWeekday {
                month,
                weekday,
                occurrence,
            } => {
                validate_month(*month)?;
                if *weekday > MAX_WEEKDAY {
                    return Err(RuleError::InvalidWeekday(*weekday));
                }
                if *occurrence == 0 || *occurrence > MAX_OCCURRENCE {
                    return Err(RuleError::InvalidOccurrence(*occurrence));
                }
                Ok(())
            }
            Self::EasterOffset { .. } | Self::CustomPredicate(_) => Ok(()),
        }
    }
}

const fn validate_month(month: u8) -> Result<(), RuleError> {
    if month == 0 || month > MAX_MONTH {
        return Err(RuleError::InvalidMonth(month));
    }
    Ok(())
}

fn validate_day(month: u8, day: u8) -> Result<(), RuleError> {
    validate_month(month)?;
    if day == 0 || day > days_in_month(LEAP_REFERENCE_YEAR, month) {
        return Err(RuleError::InvalidDay { month, day });
    }
    Ok(())
}

/// Which occurrence of its weekday a day of the month is: days 1-7 are the
/// first, 8-14 the second, and so on.
pub const fn weekday_occurrence(day: u8) -> u8 {
    day.div_ceil(DAYS_IN_WEEK)
}

/// Easter Sunday of `year` (Meeus/Jones/Butcher Gregorian computus).
///
/// # Errors
/// Returns `ParseError::InvalidYear` for years outside the supported range.
pub fn easter_sunday(year: u16) -> Result<CalendarDate, ParseError> {
    let y = u32::from(year);
    let a = y % 19;
    let b = y / 100;
    let c = y % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    // 32 + 2e + 2i >= h + k always holds, so this cannot underflow
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let n = h + l - 7 * m + 114;
    let month = n / 31;
    let day = n % 31 + 1;
    // month is 3 or 4 and day at most 31
    CalendarDate::from_ymd(year, month as u8, day as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: u16, m: u8, d: u8) -> CalendarDate {
        CalendarDate::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_easter_known_years() {
        struct TestCase {
            year: u16,
            month: u8,
            day: u8,
        }

        let cases = [
            TestCase { year: 2024, month: 3, day: 31 },
            TestCase { year: 2025, month: 4, day: 20 },
            TestCase { year: 2019, month: 4, day: 21 },
            TestCase { year: 2000, month: 4, day: 23 },
            TestCase { year: 1961, month: 4, day: 2 },
            TestCase { year: 2038, month: 4, day: 25 },
            TestCase { year: 2285, month: 3, day: 22 },
        ];

        for case in &cases {
            assert_eq!(
                easter_sunday(case.year).unwrap(),
                date(case.year, case.month, case.day),
                "Easter {}",
                case.year
            );
        }
    }

    #[test]
    fn test_easter_is_always_a_sunday() {
        for year in 1583..=2600 {
            assert_eq!(easter_sunday(year).unwrap().weekday(), 0, "year {year}");
        }
    }

    #[test]
    fn test_fixed_date_matches_only_its_day() {
        let rule = HolidayRule::fixed(1, 1);
        assert!(rule.matches(&date(2024, 1, 1), Country::US));
        assert!(rule.matches(&date(1999, 1, 1), Country::JP));
        assert!(!rule.matches(&date(2024, 1, 2), Country::US));
        assert!(!rule.matches(&date(2024, 12, 31), Country::US));
        assert!(!rule.matches(&date(2024, 2, 1), Country::US));
    }

    #[test]
    fn test_date_range_inclusive_bounds() {
        let rule = HolidayRule::range(12, 20, 12, 26);
        assert!(!rule.matches(&date(2024, 12, 19), Country::US));
        for day in 20..=26 {
            assert!(rule.matches(&date(2024, 12, day), Country::US), "Dec {day}");
        }
        assert!(!rule.matches(&date(2024, 12, 27), Country::US));
    }

    #[test]
    fn test_date_range_across_months() {
        let rule = HolidayRule::range(3, 20, 4, 15);
        assert!(rule.matches(&date(2024, 3, 25), Country::JP));
        assert!(rule.matches(&date(2024, 4, 15), Country::JP));
        assert!(!rule.matches(&date(2024, 4, 16), Country::JP));
        assert!(!rule.matches(&date(2024, 3, 19), Country::JP));
    }

    #[test]
    fn test_date_range_wraps_year_end() {
        let rule = HolidayRule::range(11, 1, 1, 10);
        assert!(rule.matches(&date(2024, 11, 1), Country::US));
        assert!(rule.matches(&date(2024, 12, 31), Country::US));
        assert!(rule.matches(&date(2025, 1, 10), Country::US));
        assert!(!rule.matches(&date(2025, 1, 11), Country::US));
        assert!(!rule.matches(&date(2024, 10, 31), Country::US));
    }

    #[test]
    fn test_relative_weekday_thanksgiving() {
        let rule = HolidayRule::relative(11, 4, 4);
        assert!(rule.matches(&date(2024, 11, 28), Country::US));
        assert!(!rule.matches(&date(2024, 11, 21), Country::US));
        assert!(!rule.matches(&date(2024, 11, 29), Country::US));
        assert!(rule.matches(&date(2025, 11, 27), Country::US));
    }

    #[test]
    fn test_relative_fifth_occurrence_may_not_exist() {
        // November 2025 has only four Thursdays; 2024 has no fifth Thursday either
        let rule = HolidayRule::relative(11, 4, 5);
        for day in 1..=30 {
            assert!(!rule.matches(&date(2025, 11, day), Country::US));
        }
        // January 2025 has five Fridays; the 31st is the fifth
        let fifth_friday = HolidayRule::relative(1, 5, 5);
        assert!(fifth_friday.matches(&date(2025, 1, 31), Country::US));
    }

    #[test]
    fn test_weekday_occurrence() {
        assert_eq!(weekday_occurrence(1), 1);
        assert_eq!(weekday_occurrence(7), 1);
        assert_eq!(weekday_occurrence(8), 2);
        assert_eq!(weekday_occurrence(28), 4);
        assert_eq!(weekday_occurrence(29), 5);
    }

    #[test]
    fn test_easter_offset() {
        let carnival = HolidayRule::easter(-47);
        assert!(carnival.matches(&date(2024, 2, 13), Country::BR));
        assert!(!carnival.matches(&date(2024, 2, 14), Country::BR));
        assert!(carnival.matches(&date(2025, 3, 4), Country::BR));

        let easter = HolidayRule::easter(0);
        assert!(easter.matches(&date(2024, 3, 31), Country::US));
        assert!(easter.matches(&date(2025, 4, 20), Country::US));
        assert!(!easter.matches(&date(2025, 3, 31), Country::US));
    }

    #[test]
    fn test_custom_predicate_receives_date_and_country() {
        let rule = HolidayRule::custom(|date, country| country == Country::SE && date.day() == 13);
        assert!(rule.matches(&date(2024, 12, 13), Country::SE));
        assert!(!rule.matches(&date(2024, 12, 13), Country::NO));
        assert!(!rule.matches(&date(2024, 12, 14), Country::SE));
    }

    #[test]
    fn test_validate() {
        assert!(HolidayRule::fixed(2, 29).validate().is_ok());
        assert_eq!(
            HolidayRule::fixed(4, 31).validate(),
            Err(RuleError::InvalidDay { month: 4, day: 31 })
        );
        assert_eq!(
            HolidayRule::range(3, 0, 4, 1).validate(),
            Err(RuleError::InvalidDay { month: 3, day: 0 })
        );
        assert_eq!(
            HolidayRule::relative(11, 7, 4).validate(),
            Err(RuleError::InvalidWeekday(7))
        );
        assert_eq!(
            HolidayRule::relative(11, 4, 6).validate(),
            Err(RuleError::InvalidOccurrence(6))
        );
        assert_eq!(
            HolidayRule::relative(11, 4, 0).validate(),
            Err(RuleError::InvalidOccurrence(0))
        );
        assert!(HolidayRule::easter(-400).validate().is_ok());
    }

    #[test]
    fn test_out_of_range_month_fails_validation() {
        assert_eq!(HolidayRule::fixed(13, 1).validate(), Err(RuleError::InvalidMonth(13)));
        assert_eq!(HolidayRule::fixed(0, 1).validate(), Err(RuleError::InvalidMonth(0)));
        assert_eq!(
            HolidayRule::range(12, 20, 14, 1).validate(),
            Err(RuleError::InvalidMonth(14))
        );
        assert_eq!(
            HolidayRule::relative(13, 4, 4).validate(),
            Err(RuleError::InvalidMonth(13))
        );
        // Never matches any real date
        let rule = HolidayRule::fixed(13, 1);
        for month in 1..=12 {
            assert!(!rule.matches(&date(2024, month, 1), Country::US));
        }
    }

    #[test]
    fn test_deserialize_tagged_rules() {
        let rule: HolidayRule =
            serde_json::from_str(r#"{"type": "range", "startMonth": 3, "startDay": 20, "endMonth": 4, "endDay": 15}"#)
                .unwrap();
        assert!(rule.matches(&date(2024, 4, 1), Country::JP));

        let rule: HolidayRule = serde_json::from_str(r#"{"type": "easter", "offsetDays": 1}"#).unwrap();
        assert!(rule.matches(&date(2024, 4, 1), Country::DE));

        let rule: HolidayRule =
            serde_json::from_str(r#"{"type": "relative", "month": 5, "weekday": 0, "occurrence": 2}"#).unwrap();
        assert!(rule.matches(&date(2024, 5, 12), Country::US));
    }

    #[test]
    fn test_deserialize_rejects_unknown_kind() {
        assert!(serde_json::from_str::<HolidayRule>(r#"{"type": "lunar", "month": 1}"#).is_err());
        assert!(serde_json::from_str::<HolidayRule>(r#"{"type": "custom"}"#).is_err());
    }

    #[test]
    fn test_deserialized_bad_month_fails_validation() {
        let rule: HolidayRule =
            serde_json::from_str(r#"{"type": "fixed", "month": 13, "day": 1}"#).unwrap();
        assert_eq!(rule.validate(), Err(RuleError::InvalidMonth(13)));
    }
}
