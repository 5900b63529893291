//! Stable identifiers for the picker's interactive elements.
//!
//! Automation tooling addresses elements by these tags. Day cells are keyed
//! by their ISO date, so a date maps to the same tag whichever month grid
//! renders it.
use crate::calendar::CalendarDate;

/// The text field.
pub const FIELD: &str = "date_picker_field";
/// The calendar popup container.
pub const CALENDAR_POPUP: &str = "date_picker_calendar";
/// Button showing the previous month.
pub const PREVIOUS_MONTH_BUTTON: &str = "date_picker_previous_month";
/// Button showing the next month.
pub const NEXT_MONTH_BUTTON: &str = "date_picker_next_month";
/// Button showing the same month a year earlier.
pub const PREVIOUS_YEAR_BUTTON: &str = "date_picker_previous_year";
/// Button showing the same month a year later.
pub const NEXT_YEAR_BUTTON: &str = "date_picker_next_year";

const DAY_CELL_PREFIX: &str = "date_picker_day_";

/// Returns the tag of the day cell showing `date`.
pub fn day_cell_tag(date: CalendarDate) -> String {
    format!("{DAY_CELL_PREFIX}{date}")
}

/// Recovers the date from a day-cell tag.
pub fn parse_day_cell_tag(tag: &str) -> Option<CalendarDate> {
    let iso = tag.strip_prefix(DAY_CELL_PREFIX)?;
    let mut parts = iso.splitn(3, '-');
    let year = parts.next()?.parse().ok()?;
    let month = parts.next()?.parse().ok()?;
    let day = parts.next()?.parse().ok()?;
    CalendarDate::new(year, month, day)
}
