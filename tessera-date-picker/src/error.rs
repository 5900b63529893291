//! Non-fatal outcomes of picker input.
//!
//! Every variant is reported after the picker state has already settled and
//! the validation signal has fired; callers may log or ignore it.
use thiserror::Error;

use crate::{calendar::CalendarDate, date_format::DateFormatError};

/// Why a typed value or a selection did not become the selected date.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateInputError {
    /// The field text does not match the configured format.
    #[error("field text could not be parsed: {0}")]
    Parse(#[source] DateFormatError),
    /// The date is outside the year range or rejected by the selectable-dates
    /// policy.
    #[error("{0} is not selectable")]
    NotSelectable(CalendarDate),
    /// The confirm hook refused the change (`None` means clearing).
    #[error("date change to {} was vetoed", describe(.0))]
    Vetoed(Option<CalendarDate>),
    /// The date was selected but could not be written back to the field.
    #[error("selected date could not be formatted: {0}")]
    Format(#[source] DateFormatError),
}

impl DateInputError {
    /// True for the outcomes that the validation signal reports as invalid.
    pub fn marks_field_invalid(&self) -> bool {
        matches!(self, DateInputError::Parse(_) | DateInputError::Format(_))
    }
}

fn describe(date: &Option<CalendarDate>) -> String {
    match date {
        Some(date) => date.to_string(),
        None => "no date".to_string(),
    }
}
