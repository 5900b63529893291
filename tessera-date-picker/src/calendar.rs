//! Calendar value types shared by every part of the picker.
//!
//! [`CalendarDate`] is a day without a time component and [`YearMonth`] is a
//! month without a day. Both are immutable, `Copy` and totally ordered.
use std::fmt;

use chrono::{Datelike, Days, NaiveDate, Utc};

/// Smallest year a [`YearMonth`] may hold.
///
/// Dates a little outside the month range stay representable so the grid of
/// the first and last month can still be filled.
pub const MIN_YEAR: i32 = -262_000;
/// Largest year a [`YearMonth`] may hold.
pub const MAX_YEAR: i32 = 262_000;

/// Days of the week in Monday-first order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weekday {
    /// Monday.
    Monday,
    /// Tuesday.
    Tuesday,
    /// Wednesday.
    Wednesday,
    /// Thursday.
    Thursday,
    /// Friday.
    Friday,
    /// Saturday.
    Saturday,
    /// Sunday.
    Sunday,
}

impl Weekday {
    /// All weekdays, Monday first.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Returns the zero-based position of this day in a Monday-first week.
    pub fn index_from_monday(self) -> usize {
        match self {
            Weekday::Monday => 0,
            Weekday::Tuesday => 1,
            Weekday::Wednesday => 2,
            Weekday::Thursday => 3,
            Weekday::Friday => 4,
            Weekday::Saturday => 5,
            Weekday::Sunday => 6,
        }
    }

    /// Returns the weekday at `index` in a Monday-first week, wrapping.
    pub fn from_monday_index(index: usize) -> Self {
        Self::ALL[index % 7]
    }

    /// Returns the seven weekdays in column order for a grid starting on
    /// `self`.
    pub fn week_starting_here(self) -> [Weekday; 7] {
        let start = self.index_from_monday();
        std::array::from_fn(|offset| Self::from_monday_index(start + offset))
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        Self::from_monday_index(day.num_days_from_monday() as usize)
    }
}

/// A calendar date expressed as year, month, and day.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate {
    inner: NaiveDate,
}

impl CalendarDate {
    /// Creates a calendar date if the values are valid.
    pub fn new(year: i32, month: u8, day: u8) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, u32::from(month), u32::from(day)).map(|inner| Self { inner })
    }

    /// Returns the year.
    pub fn year(&self) -> i32 {
        self.inner.year()
    }

    /// Returns the month (1-12).
    pub fn month(&self) -> u8 {
        self.inner.month() as u8
    }

    /// Returns the day of the month (1-31).
    pub fn day(&self) -> u8 {
        self.inner.day() as u8
    }

    /// Returns the day of the week.
    pub fn weekday(&self) -> Weekday {
        self.inner.weekday().into()
    }

    /// Returns the month this date belongs to, clamped to the supported
    /// month range.
    pub fn year_month(&self) -> YearMonth {
        YearMonth::new(self.year(), self.month()).unwrap_or(if self.year() < MIN_YEAR {
            YearMonth {
                year: MIN_YEAR,
                month: 1,
            }
        } else {
            YearMonth {
                year: MAX_YEAR,
                month: 12,
            }
        })
    }

    /// Returns the current date in UTC.
    pub fn today() -> Self {
        Self {
            inner: Utc::now().date_naive(),
        }
    }

    /// Moves the date by `days`, or returns `None` past the representable
    /// range.
    pub fn checked_add_days(self, days: i64) -> Option<Self> {
        let moved = if days >= 0 {
            self.inner.checked_add_days(Days::new(days.unsigned_abs()))
        } else {
            self.inner.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        moved.map(Self::from_naive)
    }

    /// Moves the date by `days`, stopping at the representable range.
    pub fn saturating_add_days(self, days: i64) -> Self {
        self.checked_add_days(days).unwrap_or(if days >= 0 {
            Self::MAX
        } else {
            Self::MIN
        })
    }

    /// Number of days from `self` to `other` (negative if `other` is earlier).
    pub fn days_until(self, other: CalendarDate) -> i64 {
        other.inner.signed_duration_since(self.inner).num_days()
    }

    /// Earliest representable date.
    pub const MIN: CalendarDate = CalendarDate {
        inner: NaiveDate::MIN,
    };

    /// Latest representable date.
    pub const MAX: CalendarDate = CalendarDate {
        inner: NaiveDate::MAX,
    };

    /// Returns the underlying `chrono` date.
    pub fn as_naive(&self) -> NaiveDate {
        self.inner
    }

    /// Wraps a `chrono` date.
    pub fn from_naive(date: NaiveDate) -> Self {
        Self { inner: date }
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self::from_naive(date)
    }
}

/// Formats as an ISO-8601 calendar date, e.g. `2024-02-29`.
impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year = self.year();
        if (0..=9_999).contains(&year) {
            write!(f, "{year:04}-{:02}-{:02}", self.month(), self.day())
        } else {
            write!(f, "{year:+05}-{:02}-{:02}", self.month(), self.day())
        }
    }
}

impl fmt::Debug for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CalendarDate({self})")
    }
}

/// A year and month pair used for month navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u8,
}

impl YearMonth {
    /// Creates a year/month pair if the values are valid.
    pub fn new(year: i32, month: u8) -> Option<Self> {
        if !(1..=12).contains(&month) || !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return None;
        }
        Some(Self { year, month })
    }

    /// Returns the year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Returns the month (1-12).
    pub fn month(&self) -> u8 {
        self.month
    }

    /// Returns the date for this month at the provided day.
    pub fn to_date(&self, day: u8) -> Option<CalendarDate> {
        CalendarDate::new(self.year, self.month, day)
    }

    /// Returns day 1 of this month.
    pub fn first_day(&self) -> CalendarDate {
        self.to_date(1).unwrap_or(CalendarDate::MIN)
    }

    /// Returns the last day of this month.
    pub fn last_day(&self) -> CalendarDate {
        self.to_date(self.length_of_month()).unwrap_or(CalendarDate::MAX)
    }

    /// Returns how many days this month has (28-31).
    pub fn length_of_month(&self) -> u8 {
        match self.month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            _ if is_leap_year(self.year) => 29,
            _ => 28,
        }
    }

    /// Returns true when `date` falls inside this month.
    pub fn contains(&self, date: CalendarDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Adds or subtracts months, adjusting the year as needed.
    ///
    /// Results past [`MIN_YEAR`]/[`MAX_YEAR`] stop at January of the first
    /// year or December of the last year.
    pub fn add_months(&self, delta: i32) -> Self {
        let total = i64::from(self.year) * 12 + i64::from(self.month - 1) + i64::from(delta);
        let year = total.div_euclid(12);
        if year < i64::from(MIN_YEAR) {
            return Self {
                year: MIN_YEAR,
                month: 1,
            };
        }
        if year > i64::from(MAX_YEAR) {
            return Self {
                year: MAX_YEAR,
                month: 12,
            };
        }
        Self {
            year: year as i32,
            month: (total.rem_euclid(12) + 1) as u8,
        }
    }

    /// The month after this one.
    pub fn next_month(&self) -> Self {
        self.add_months(1)
    }

    /// The month before this one.
    pub fn previous_month(&self) -> Self {
        self.add_months(-1)
    }

    /// The same month one year later.
    pub fn next_year(&self) -> Self {
        self.add_months(12)
    }

    /// The same month one year earlier.
    pub fn previous_year(&self) -> Self {
        self.add_months(-12)
    }
}

impl From<CalendarDate> for YearMonth {
    fn from(date: CalendarDate) -> Self {
        date.year_month()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u8, day: u8) -> CalendarDate {
        CalendarDate::new(year, month, day).unwrap()
    }

    #[test]
    fn test_calendar_date_rejects_invalid_values() {
        assert!(CalendarDate::new(2023, 2, 29).is_none());
        assert!(CalendarDate::new(2024, 2, 29).is_some());
        assert!(CalendarDate::new(2024, 13, 1).is_none());
        assert!(CalendarDate::new(2024, 4, 31).is_none());
        assert!(CalendarDate::new(2024, 1, 0).is_none());
        assert!(CalendarDate::new(i32::MAX, 1, 1).is_none());
    }

    #[test]
    fn test_calendar_date_ordering() {
        assert!(date(2024, 1, 31) < date(2024, 2, 1));
        assert!(date(2023, 12, 31) < date(2024, 1, 1));
        assert_eq!(date(2024, 6, 20), date(2024, 6, 20));
    }

    #[test]
    fn test_add_days_crosses_month_and_year() {
        assert_eq!(date(2024, 2, 28).checked_add_days(1), Some(date(2024, 2, 29)));
        assert_eq!(date(2024, 2, 29).checked_add_days(1), Some(date(2024, 3, 1)));
        assert_eq!(date(2024, 1, 1).checked_add_days(-1), Some(date(2023, 12, 31)));
        assert_eq!(date(2024, 1, 3).checked_add_days(-7), Some(date(2023, 12, 27)));
        assert_eq!(CalendarDate::MAX.checked_add_days(1), None);
        assert_eq!(CalendarDate::MIN.saturating_add_days(-3), CalendarDate::MIN);
    }

    #[test]
    fn test_weekday_of_known_dates() {
        assert_eq!(date(2024, 2, 1).weekday(), Weekday::Thursday);
        assert_eq!(date(2000, 1, 1).weekday(), Weekday::Saturday);
        assert_eq!(date(1970, 1, 1).weekday(), Weekday::Thursday);
    }

    #[test]
    fn test_week_starting_here_wraps() {
        let week = Weekday::Saturday.week_starting_here();
        assert_eq!(week[0], Weekday::Saturday);
        assert_eq!(week[1], Weekday::Sunday);
        assert_eq!(week[2], Weekday::Monday);
        assert_eq!(week[6], Weekday::Friday);
    }

    #[test]
    fn test_year_month_arithmetic_carries_years() {
        let december = YearMonth::new(2023, 12).unwrap();
        assert_eq!(december.next_month(), YearMonth::new(2024, 1).unwrap());
        let january = YearMonth::new(2024, 1).unwrap();
        assert_eq!(january.previous_month(), december);
        assert_eq!(january.next_year(), YearMonth::new(2025, 1).unwrap());
        assert_eq!(january.previous_year(), YearMonth::new(2023, 1).unwrap());
        assert_eq!(january.add_months(-25), YearMonth::new(2021, 12).unwrap());
    }

    #[test]
    fn test_year_month_arithmetic_stops_at_supported_range() {
        let last = YearMonth::new(MAX_YEAR, 12).unwrap();
        assert_eq!(last.next_month(), last);
        let first = YearMonth::new(MIN_YEAR, 1).unwrap();
        assert_eq!(first.previous_year(), first);
        assert!(YearMonth::new(MAX_YEAR + 1, 1).is_none());
    }

    #[test]
    fn test_year_month_of_date() {
        assert_eq!(date(2024, 6, 20).year_month(), YearMonth::new(2024, 6).unwrap());
        assert!(YearMonth::new(2024, 6).unwrap().contains(date(2024, 6, 1)));
        assert!(!YearMonth::new(2024, 6).unwrap().contains(date(2023, 6, 1)));
    }

    #[test]
    fn test_length_of_month() {
        assert_eq!(YearMonth::new(2024, 2).unwrap().length_of_month(), 29);
        assert_eq!(YearMonth::new(2023, 2).unwrap().length_of_month(), 28);
        assert_eq!(YearMonth::new(1900, 2).unwrap().length_of_month(), 28);
        assert_eq!(YearMonth::new(2000, 2).unwrap().length_of_month(), 29);
        assert_eq!(YearMonth::new(2024, 4).unwrap().length_of_month(), 30);
        assert_eq!(YearMonth::new(2024, 12).unwrap().last_day(), date(2024, 12, 31));
    }

    #[test]
    fn test_display_is_iso() {
        assert_eq!(date(2024, 2, 9).to_string(), "2024-02-09");
        assert_eq!(date(33, 7, 4).to_string(), "0033-07-04");
        assert_eq!(date(12_024, 1, 1).to_string(), "+12024-01-01");
        assert_eq!(YearMonth::new(2024, 6).unwrap().to_string(), "2024-06");
    }
}
