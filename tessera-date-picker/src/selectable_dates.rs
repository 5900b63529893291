//! Policies deciding which dates a user may pick.
//!
//! ## Usage
//!
//! Pass an `Arc<dyn SelectableDates>` to the picker. The same policy drives
//! both the disabled look of day cells and the checks made before a
//! selection is committed, so it must not change between those two uses.
use std::{ops::RangeInclusive, sync::Arc};

use crate::calendar::CalendarDate;

/// Controls which dates are selectable in the date picker.
pub trait SelectableDates: Send + Sync {
    /// Returns true when the date can be selected.
    fn is_selectable_date(&self, _date: CalendarDate) -> bool {
        true
    }

    /// Returns true when the year can be selected.
    fn is_selectable_year(&self, _year: i32) -> bool {
        true
    }
}

impl<F> SelectableDates for F
where
    F: Fn(CalendarDate) -> bool + Send + Sync,
{
    fn is_selectable_date(&self, date: CalendarDate) -> bool {
        self(date)
    }
}

struct AllDates;

impl SelectableDates for AllDates {}

/// Allows only dates within an inclusive range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    range: RangeInclusive<CalendarDate>,
}

impl DateRange {
    /// Creates a policy accepting `start..=end`; the bounds are swapped if
    /// given in reverse.
    pub fn new(start: CalendarDate, end: CalendarDate) -> Self {
        let range = if start <= end { start..=end } else { end..=start };
        Self { range }
    }
}

impl SelectableDates for DateRange {
    fn is_selectable_date(&self, date: CalendarDate) -> bool {
        self.range.contains(&date)
    }

    fn is_selectable_year(&self, year: i32) -> bool {
        (self.range.start().year()..=self.range.end().year()).contains(&year)
    }
}

/// Defaults for date picker behavior.
pub struct DatePickerDefaults;

impl DatePickerDefaults {
    /// Default selectable year range.
    pub const YEAR_RANGE: RangeInclusive<i32> = 1900..=2100;

    /// Returns a selectable-dates policy that allows every date.
    pub fn all_dates() -> Arc<dyn SelectableDates> {
        Arc::new(AllDates)
    }
}

/// Returns true when `date` passes both the year range and the policy.
pub(crate) fn is_date_selectable(
    date: CalendarDate,
    year_range: &RangeInclusive<i32>,
    selectable_dates: &Arc<dyn SelectableDates>,
) -> bool {
    year_range.contains(&date.year())
        && selectable_dates.is_selectable_year(date.year())
        && selectable_dates.is_selectable_date(date)
}

pub(crate) fn normalize_year_range(range: RangeInclusive<i32>) -> RangeInclusive<i32> {
    let start = *range.start();
    let end = *range.end();
    if start <= end { range } else { end..=start }
}
