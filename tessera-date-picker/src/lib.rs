//! Headless date picker core for Tessera.
//!
//! The crate holds everything a docked date picker needs except drawing:
//! the 6×7 month grid, the link between the typed field text and the
//! selected date, arrow-key movement across the grid and the open/closed
//! state of the calendar popup.
//!
//! # Example
//!
//! ```
//! use tessera_date_picker::{CalendarDate, DatePicker, DatePickerArgs};
//!
//! let mut picker = DatePicker::new(
//!     DatePickerArgs::default().initial_selected_date(CalendarDate::new(2024, 1, 15).unwrap()),
//! );
//! assert_eq!(picker.state().field_text(), "2024/01/15");
//!
//! picker.on_field_click();
//! picker.on_day_click(CalendarDate::new(2024, 1, 20).unwrap()).unwrap();
//! assert_eq!(picker.state().field_text(), "2024/01/20");
//! assert!(!picker.is_expanded());
//! ```
#![deny(missing_docs, clippy::unwrap_used)]

pub mod calendar;
pub mod calendar_matrix;
pub mod callback;
pub mod date_format;
pub mod date_picker;
pub mod date_picker_state;
pub mod error;
pub mod keyboard_navigation;
pub mod locale;
pub mod popup_sync;
pub mod selectable_dates;
pub mod test_tags;

pub use crate::{
    calendar::{CalendarDate, Weekday, YearMonth},
    calendar_matrix::{CalendarMatrix, DayCell},
    callback::Callback,
    date_format::{DateFormat, DateFormatError, PatternDateFormat},
    date_picker::{DatePicker, DatePickerArgs, DatePickerKey, DayCellModel},
    date_picker_state::{ConfirmDateChange, DatePickerState, always_confirm},
    error::DateInputError,
    keyboard_navigation::{FocusMove, GridDirection, KeyboardGridNavigator, next_focus_target},
    locale::CalendarLocale,
    popup_sync::{DismissReason, FieldState, OpenTrigger, PopupState, PopupSyncController},
    selectable_dates::{DatePickerDefaults, DateRange, SelectableDates},
};
