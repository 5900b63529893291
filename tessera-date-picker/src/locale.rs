//! Month and weekday names used by the calendar labels.
use crate::calendar::{CalendarDate, Weekday, YearMonth};

/// Names used for the calendar header, weekday row and headline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarLocale {
    /// Full month names, January first.
    pub month_names: [String; 12],
    /// Abbreviated month names, January first.
    pub short_month_names: [String; 12],
    /// Abbreviated weekday names, Monday first.
    pub short_weekday_names: [String; 7],
}

impl CalendarLocale {
    /// English names.
    pub fn english() -> Self {
        Self {
            month_names: [
                "January",
                "February",
                "March",
                "April",
                "May",
                "June",
                "July",
                "August",
                "September",
                "October",
                "November",
                "December",
            ]
            .map(String::from),
            short_month_names: [
                "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
            ]
            .map(String::from),
            short_weekday_names: ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"].map(String::from),
        }
    }

    /// Full name of `month` (1-12).
    pub fn month_name(&self, month: u8) -> &str {
        &self.month_names[month_index(month)]
    }

    /// Abbreviated name of `month` (1-12).
    pub fn short_month_name(&self, month: u8) -> &str {
        &self.short_month_names[month_index(month)]
    }

    /// Abbreviated name of `weekday`.
    pub fn short_weekday_name(&self, weekday: Weekday) -> &str {
        &self.short_weekday_names[weekday.index_from_monday()]
    }

    /// Header label such as `June 2024`.
    pub fn month_year_label(&self, month: YearMonth) -> String {
        format!("{} {}", self.month_name(month.month()), month.year())
    }

    /// Headline label such as `Jun 20, 2024`.
    pub fn headline(&self, date: CalendarDate) -> String {
        format!(
            "{} {}, {}",
            self.short_month_name(date.month()),
            date.day(),
            date.year()
        )
    }

    /// Weekday labels in column order for a grid starting on
    /// `first_day_of_week`.
    pub fn weekday_labels(&self, first_day_of_week: Weekday) -> [&str; 7] {
        first_day_of_week
            .week_starting_here()
            .map(|weekday| self.short_weekday_name(weekday))
    }
}

impl Default for CalendarLocale {
    fn default() -> Self {
        Self::english()
    }
}

fn month_index(month: u8) -> usize {
    usize::from(month.clamp(1, 12) - 1)
}
