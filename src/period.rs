//! Period keys: week and month identifiers derived from a date and an offset.
//!
//! Keys are never stored on their own. They are recomputed from "today"
//! plus the view's navigation offset, and their string form is what the
//! remote tables use to group rows (`2026-W43`, `2026-10`).

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Serialize, Serializer};

use crate::error::ValidationError;

/// Number of day slots in a week view (Monday first).
pub const DAYS_PER_WEEK: usize = 7;

/// How week numbers are computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WeekNumbering {
    /// Saturday-start weeks counted from January 1st.
    ///
    /// Rows already stored remotely were keyed with this scheme. It was
    /// computed from a timestamp taken during the day, so each Saturday
    /// already belongs to the following week, and a year whose January 1st
    /// is a Saturday starts at week 2.
    #[default]
    Legacy,
    /// ISO-8601 weeks; the key year is the ISO week-year.
    Iso,
}

impl fmt::Display for WeekNumbering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy => write!(f, "legacy"),
            Self::Iso => write!(f, "iso"),
        }
    }
}

impl FromStr for WeekNumbering {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(Self::Legacy),
            "iso" => Ok(Self::Iso),
            _ => Err(format!("Unknown week numbering: {s}")),
        }
    }
}

/// A calendar week, rendered as `<year>-W<week>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WeekKey {
    year: i32,
    week: u32,
}

impl WeekKey {
    /// Highest week number the legacy scheme can produce (Dec 31 of a year starting on a Saturday).
    pub const MAX_WEEK: u32 = 54;

    pub fn new(year: i32, week: u32) -> Option<Self> {
        (1..=Self::MAX_WEEK)
            .contains(&week)
            .then_some(Self { year, week })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn week(&self) -> u32 {
        self.week
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-W{}", self.year, self.week)
    }
}

impl FromStr for WeekKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidKey {
            kind: "week",
            input: s.to_string(),
        };
        let (year, week) = s.split_once("-W").ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let week: u32 = week.parse().map_err(|_| invalid())?;
        Self::new(year, week).ok_or_else(invalid)
    }
}

impl Serialize for WeekKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A calendar month, rendered as `<year>-<month>` without zero padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Move by `offset` months, rolling over year boundaries in either direction.
    pub fn shift(self, offset: i32) -> Self {
        let index = i64::from(self.year) * 12 + i64::from(self.month - 1) + i64::from(offset);
        Self {
            year: index.div_euclid(12) as i32,
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    /// First day of the month, if the year is within chrono's date range.
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn days_in_month(&self) -> u32 {
        match self.month {
            2 if is_leap_year(self.year) => 29,
            2 => 28,
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        }
    }

    /// Whether `date` falls inside this month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidKey {
            kind: "month",
            input: s.to_string(),
        };
        let (year, month) = s.rsplit_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Shift `today` by whole weeks, saturating at chrono's date range.
pub fn shift_weeks(today: NaiveDate, offset: i32) -> NaiveDate {
    today
        .checked_add_signed(Duration::weeks(i64::from(offset)))
        .unwrap_or(if offset < 0 {
            NaiveDate::MIN
        } else {
            NaiveDate::MAX
        })
}

/// Week key for the week `offset` weeks away from `today`.
pub fn derive_week_key(today: NaiveDate, offset: i32, numbering: WeekNumbering) -> WeekKey {
    week_key_of(shift_weeks(today, offset), numbering)
}

/// Week key of the week containing `date`.
pub fn week_key_of(date: NaiveDate, numbering: WeekNumbering) -> WeekKey {
    match numbering {
        WeekNumbering::Legacy => {
            let ordinal0 = date.ordinal0();
            let jan1_from_sunday =
                (date.weekday().num_days_from_sunday() + 7 - ordinal0 % 7) % 7;
            // ceil((n + t) / 7) for a time of day 0 < t < 1.
            WeekKey {
                year: date.year(),
                week: (ordinal0 + jan1_from_sunday + 1) / 7 + 1,
            }
        }
        WeekNumbering::Iso => {
            let iso = date.iso_week();
            WeekKey {
                year: iso.year(),
                week: iso.week(),
            }
        }
    }
}

/// Month key of the month containing `date`.
pub fn derive_month_key(date: NaiveDate) -> MonthKey {
    MonthKey {
        year: date.year(),
        month: date.month(),
    }
}

/// Day names for the seven slots, Monday first.
pub const DAY_NAMES: [&str; DAYS_PER_WEEK] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Abbreviated day names, Monday first.
pub const DAY_ABBREVIATIONS: [&str; DAYS_PER_WEEK] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Source of "today" for offset-relative keys.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// A clock pinned to one date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn legacy_weeks_start_on_saturday() {
        // 2023-01-01 was a Sunday.
        let n = WeekNumbering::Legacy;
        assert_eq!(week_key_of(date(2023, 1, 1), n).to_string(), "2023-W1");
        assert_eq!(week_key_of(date(2023, 1, 6), n).to_string(), "2023-W1");
        assert_eq!(week_key_of(date(2023, 1, 7), n).to_string(), "2023-W2");
        assert_eq!(week_key_of(date(2023, 1, 8), n).to_string(), "2023-W2");
    }

    #[test]
    fn legacy_saturday_joins_following_week() {
        let n = WeekNumbering::Legacy;
        assert_eq!(week_key_of(date(2026, 10, 16), n).to_string(), "2026-W42");
        assert_eq!(week_key_of(date(2026, 10, 17), n).to_string(), "2026-W43");
        assert_eq!(week_key_of(date(2026, 10, 18), n).to_string(), "2026-W43");
        assert_eq!(week_key_of(date(2026, 10, 23), n).to_string(), "2026-W43");
        assert_eq!(week_key_of(date(2026, 10, 24), n).to_string(), "2026-W44");
    }

    #[test]
    fn legacy_weekday_table_across_jan1_weekdays() {
        // (date, key) pairs for Friday / Saturday / Sunday around the first
        // boundary, for years whose January 1st falls on each weekday.
        let cases = [
            // 2023: Jan 1 Sunday.
            ((2023, 1, 6), "2023-W1"),
            ((2023, 1, 7), "2023-W2"),
            ((2023, 1, 8), "2023-W2"),
            // 2024: Jan 1 Monday.
            ((2024, 1, 5), "2024-W1"),
            ((2024, 1, 6), "2024-W2"),
            ((2024, 1, 7), "2024-W2"),
            // 2019: Jan 1 Tuesday.
            ((2019, 1, 4), "2019-W1"),
            ((2019, 1, 5), "2019-W2"),
            ((2019, 1, 6), "2019-W2"),
            // 2025: Jan 1 Wednesday.
            ((2025, 1, 3), "2025-W1"),
            ((2025, 1, 4), "2025-W2"),
            ((2025, 1, 5), "2025-W2"),
            // 2026: Jan 1 Thursday.
            ((2026, 1, 2), "2026-W1"),
            ((2026, 1, 3), "2026-W2"),
            ((2026, 1, 4), "2026-W2"),
            // 2027: Jan 1 Friday, so it is its own week.
            ((2027, 1, 1), "2027-W1"),
            ((2027, 1, 2), "2027-W2"),
            ((2027, 1, 3), "2027-W2"),
            // 2022: Jan 1 Saturday, so the year starts at week 2.
            ((2022, 1, 1), "2022-W2"),
            ((2022, 1, 2), "2022-W2"),
            ((2022, 1, 7), "2022-W2"),
            ((2022, 1, 8), "2022-W3"),
        ];
        for ((y, m, d), expected) in cases {
            assert_eq!(
                week_key_of(date(y, m, d), WeekNumbering::Legacy).to_string(),
                expected,
                "{y}-{m}-{d}"
            );
        }
    }

    #[test]
    fn legacy_week_of_known_date() {
        let key = derive_week_key(date(2026, 10, 18), 0, WeekNumbering::Legacy);
        assert_eq!(key.to_string(), "2026-W43");
        assert_eq!(
            derive_week_key(date(2026, 10, 18), -1, WeekNumbering::Legacy).to_string(),
            "2026-W42"
        );
    }

    #[test]
    fn iso_week_of_known_date() {
        let key = derive_week_key(date(2026, 10, 18), 0, WeekNumbering::Iso);
        assert_eq!(key.to_string(), "2026-W42");
    }

    #[test]
    fn legacy_uses_shifted_calendar_year() {
        // Eleven weeks after 2026-10-18 is Sunday 2027-01-03.
        let key = derive_week_key(date(2026, 10, 18), 11, WeekNumbering::Legacy);
        assert_eq!(key.to_string(), "2027-W2");
        assert_eq!(
            week_key_of(date(2024, 12, 30), WeekNumbering::Legacy).to_string(),
            "2024-W53"
        );
    }

    #[test]
    fn iso_uses_week_year_at_boundaries() {
        assert_eq!(
            week_key_of(date(2024, 12, 30), WeekNumbering::Iso).to_string(),
            "2025-W1"
        );
        assert_eq!(
            week_key_of(date(2021, 1, 3), WeekNumbering::Iso).to_string(),
            "2020-W53"
        );
    }

    #[test]
    fn legacy_can_reach_week_54() {
        // 2000 was a leap year starting on a Saturday.
        let key = week_key_of(date(2000, 12, 31), WeekNumbering::Legacy);
        assert_eq!(key.week(), WeekKey::MAX_WEEK);
        assert_eq!("2000-W54".parse::<WeekKey>().unwrap(), key);
    }

    #[test]
    fn week_key_parse_rejects_garbage() {
        assert!("2026-43".parse::<WeekKey>().is_err());
        assert!("2026-W0".parse::<WeekKey>().is_err());
        assert!("2026-W55".parse::<WeekKey>().is_err());
        assert!("year-W3".parse::<WeekKey>().is_err());
    }

    #[test]
    fn month_key_has_no_zero_padding() {
        assert_eq!(derive_month_key(date(2026, 3, 9)).to_string(), "2026-3");
        assert_eq!("2026-03".parse::<MonthKey>().unwrap().to_string(), "2026-3");
    }

    #[test]
    fn month_shift_rolls_year_boundaries() {
        let dec = MonthKey::new(2026, 12).unwrap();
        assert_eq!(dec.shift(1), MonthKey::new(2027, 1).unwrap());
        let jan = MonthKey::new(2026, 1).unwrap();
        assert_eq!(jan.shift(-1), MonthKey::new(2025, 12).unwrap());
        assert_eq!(jan.shift(-25), MonthKey::new(2023, 12).unwrap());
    }

    #[test]
    fn month_key_parse_rejects_out_of_range() {
        assert!("2026-13".parse::<MonthKey>().is_err());
        assert!("2026-0".parse::<MonthKey>().is_err());
        assert!("october".parse::<MonthKey>().is_err());
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(MonthKey::new(2024, 2).unwrap().days_in_month(), 29);
        assert_eq!(MonthKey::new(1900, 2).unwrap().days_in_month(), 28);
        assert_eq!(MonthKey::new(2000, 2).unwrap().days_in_month(), 29);
        assert_eq!(MonthKey::new(2026, 11).unwrap().days_in_month(), 30);
    }

    #[test]
    fn week_numbering_parses_case_insensitively() {
        assert_eq!("ISO".parse::<WeekNumbering>().unwrap(), WeekNumbering::Iso);
        assert_eq!(" legacy ".parse::<WeekNumbering>().unwrap(), WeekNumbering::Legacy);
        assert!("gregorian".parse::<WeekNumbering>().is_err());
    }

    proptest! {
        #[test]
        fn same_offset_gives_same_key(days in 0i64..20_000, offset in -520i32..520) {
            let today = date(1990, 1, 1) + Duration::days(days);
            for numbering in [WeekNumbering::Legacy, WeekNumbering::Iso] {
                prop_assert_eq!(
                    derive_week_key(today, offset, numbering),
                    derive_week_key(today, offset, numbering)
                );
            }
        }

        #[test]
        fn distinct_offsets_in_one_year_give_distinct_keys(
            days in 0i64..20_000,
            o1 in -80i32..80,
            o2 in -80i32..80,
        ) {
            let today = date(1990, 1, 1) + Duration::days(days);
            for numbering in [WeekNumbering::Legacy, WeekNumbering::Iso] {
                let k1 = derive_week_key(today, o1, numbering);
                let k2 = derive_week_key(today, o2, numbering);
                if o1 != o2 && k1.year() == k2.year() {
                    prop_assert_ne!(k1, k2);
                }
            }
        }

        #[test]
        fn legacy_week_advances_only_on_saturday(days in 1i64..20_000) {
            let day = date(1990, 1, 1) + Duration::days(days);
            let prev = day - Duration::days(1);
            prop_assume!(prev.year() == day.year());
            let k_prev = week_key_of(prev, WeekNumbering::Legacy);
            let k_day = week_key_of(day, WeekNumbering::Legacy);
            if day.weekday() == chrono::Weekday::Sat {
                prop_assert_eq!(k_day.week(), k_prev.week() + 1);
            } else {
                prop_assert_eq!(k_day, k_prev);
            }
        }

        #[test]
        fn month_shift_round_trips(year in 1i32..9000, month in 1u32..=12, offset in -1200i32..1200) {
            let key = MonthKey::new(year, month).unwrap();
            prop_assert_eq!(key.shift(1).shift(-1), key);
            prop_assert_eq!(key.shift(offset).shift(-offset), key);
        }

        #[test]
        fn month_key_parses_its_own_display(year in 1i32..9000, month in 1u32..=12) {
            let key = MonthKey::new(year, month).unwrap();
            prop_assert_eq!(key.to_string().parse::<MonthKey>().unwrap(), key);
        }

        #[test]
        fn week_keys_parse_their_own_display(days in 0i64..20_000) {
            let d = date(1990, 1, 1) + Duration::days(days);
            for numbering in [WeekNumbering::Legacy, WeekNumbering::Iso] {
                let key = week_key_of(d, numbering);
                prop_assert_eq!(key.to_string().parse::<WeekKey>().unwrap(), key);
            }
        }
    }
}
