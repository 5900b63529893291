//! Selection, displayed month and field text of a date picker.
//!
//! ## Usage
//!
//! Keep one [`DatePickerState`] per picker and route day clicks through
//! [`DatePickerState::set_selected_date`] and typing through
//! [`DatePickerState::update_field_value`]. The state keeps the field text
//! and the selection in sync and reports every outcome through the
//! validation callback.
use std::{ops::RangeInclusive, sync::Arc};

use tracing::debug;

use crate::{
    calendar::{CalendarDate, YearMonth},
    callback::{Callback, notify},
    date_format::{DateFormat, PatternDateFormat},
    error::DateInputError,
    selectable_dates::{
        DatePickerDefaults, SelectableDates, is_date_selectable, normalize_year_range,
    },
};

/// Hook asked before any change of the selected date is committed.
///
/// Returning `false` leaves the state untouched. `None` asks to clear the
/// selection.
pub type ConfirmDateChange = Callback<Option<CalendarDate>, bool>;

/// Returns a confirm hook that accepts every change.
pub fn always_confirm() -> ConfirmDateChange {
    Callback::new(|_| true)
}

/// Holds the current selection, displayed month and field text of a date
/// picker.
pub struct DatePickerState {
    selected_date: Option<CalendarDate>,
    displayed_month: YearMonth,
    field_text: String,
    is_field_value_invalid: bool,
    year_range: RangeInclusive<i32>,
    selectable_dates: Arc<dyn SelectableDates>,
    date_format: Arc<dyn DateFormat>,
    confirm_date_change: ConfirmDateChange,
    on_validation_result: Option<Callback<bool>>,
    on_field_value_change: Option<Callback<String>>,
}

impl DatePickerState {
    /// Creates a date picker state.
    ///
    /// An initial date that the policy rejects is dropped. The displayed
    /// month starts at the initial date's month, else today's month.
    pub fn new(
        initial_selected_date: Option<CalendarDate>,
        date_format: Arc<dyn DateFormat>,
        selectable_dates: Arc<dyn SelectableDates>,
        confirm_date_change: ConfirmDateChange,
        on_validation_result: Option<Callback<bool>>,
    ) -> Self {
        Self::with_year_range(
            initial_selected_date,
            DatePickerDefaults::YEAR_RANGE,
            date_format,
            selectable_dates,
            confirm_date_change,
            on_validation_result,
        )
    }

    /// Creates a date picker state limited to `year_range`.
    pub fn with_year_range(
        initial_selected_date: Option<CalendarDate>,
        year_range: RangeInclusive<i32>,
        date_format: Arc<dyn DateFormat>,
        selectable_dates: Arc<dyn SelectableDates>,
        confirm_date_change: ConfirmDateChange,
        on_validation_result: Option<Callback<bool>>,
    ) -> Self {
        let year_range = normalize_year_range(year_range);
        let selected_date = initial_selected_date
            .filter(|date| is_date_selectable(*date, &year_range, &selectable_dates));
        let displayed_month = clamp_month_to_range(
            selected_date.unwrap_or_else(CalendarDate::today).year_month(),
            &year_range,
        );

        let mut state = Self {
            selected_date,
            displayed_month,
            field_text: String::new(),
            is_field_value_invalid: false,
            year_range,
            selectable_dates,
            date_format,
            confirm_date_change,
            on_validation_result,
            on_field_value_change: None,
        };
        state.refresh_field_text();
        state
    }

    /// Returns the selected date, if any.
    pub fn selected_date(&self) -> Option<CalendarDate> {
        self.selected_date
    }

    /// Returns the month currently displayed by the calendar.
    pub fn displayed_month(&self) -> YearMonth {
        self.displayed_month
    }

    /// Returns the text shown in the field.
    pub fn field_text(&self) -> &str {
        &self.field_text
    }

    /// Returns true when the last validation reported a failure.
    pub fn is_field_value_invalid(&self) -> bool {
        self.is_field_value_invalid
    }

    /// Returns the year range allowed by this picker.
    pub fn year_range(&self) -> &RangeInclusive<i32> {
        &self.year_range
    }

    /// Returns the selectable-dates policy.
    pub fn selectable_dates(&self) -> &Arc<dyn SelectableDates> {
        &self.selectable_dates
    }

    /// Returns the date format.
    pub fn date_format(&self) -> &Arc<dyn DateFormat> {
        &self.date_format
    }

    /// Returns true when `date` may be selected under the year range and
    /// policy.
    pub fn is_selectable(&self, date: CalendarDate) -> bool {
        is_date_selectable(date, &self.year_range, &self.selectable_dates)
    }

    /// Sets the listener told whenever the field text changes.
    pub fn set_on_field_value_change(&mut self, listener: Option<Callback<String>>) {
        self.on_field_value_change = listener;
    }

    /// Sets the listener told about every validation outcome.
    pub fn set_on_validation_result(&mut self, listener: Option<Callback<bool>>) {
        self.on_validation_result = listener;
    }

    /// Replaces the confirm hook.
    pub fn set_confirm_date_change(&mut self, hook: ConfirmDateChange) {
        self.confirm_date_change = hook;
    }

    /// Selects `date`, or clears the selection when `None`.
    ///
    /// A date the policy rejects, or any change the confirm hook vetoes,
    /// leaves the state untouched and does not fire the validation callback.
    /// If the committed date cannot be formatted the selection is kept, the
    /// field text is left as it was and validation fails.
    pub fn set_selected_date(&mut self, date: Option<CalendarDate>) -> Result<(), DateInputError> {
        let Some(date) = date else {
            return self.clear_selected_date();
        };

        if !self.is_selectable(date) {
            debug!(%date, "selection rejected by selectable-dates policy");
            return Err(DateInputError::NotSelectable(date));
        }
        if !self.confirm_date_change.call(Some(date)) {
            debug!(%date, "selection vetoed by confirm hook");
            return Err(DateInputError::Vetoed(Some(date)));
        }

        self.commit_selection(date);
        match self.date_format.format(date) {
            Ok(text) => {
                self.set_field_text(text);
                self.report_validation(true);
                Ok(())
            }
            Err(err) => {
                debug!(%date, error = %err, "selected date could not be formatted");
                self.report_validation(false);
                Err(DateInputError::Format(err))
            }
        }
    }

    /// Clears the selection and the field text, if the confirm hook agrees.
    pub fn clear_selected_date(&mut self) -> Result<(), DateInputError> {
        if !self.confirm_date_change.call(None) {
            debug!("clearing vetoed by confirm hook");
            return Err(DateInputError::Vetoed(None));
        }
        self.selected_date = None;
        self.set_field_text(String::new());
        self.report_validation(true);
        debug!("selection cleared");
        Ok(())
    }

    /// Applies text typed into the field.
    ///
    /// The field always shows `text`. Unparsable text fails validation.
    /// Parsable text passes validation even when the policy or the confirm
    /// hook then refuses the date; only a date that is parsed and accepted
    /// becomes the selection.
    pub fn update_field_value(&mut self, text: impl Into<String>) -> Result<(), DateInputError> {
        let text = text.into();
        let parsed = self.date_format.parse(&text);
        self.set_field_text(text);

        let date = match parsed {
            Ok(date) => date,
            Err(err) => {
                debug!(text = %self.field_text, "field text did not parse");
                self.report_validation(false);
                return Err(DateInputError::Parse(err));
            }
        };

        if !self.is_selectable(date) {
            debug!(%date, "typed date rejected by selectable-dates policy");
            self.report_validation(true);
            return Err(DateInputError::NotSelectable(date));
        }
        if !self.confirm_date_change.call(Some(date)) {
            debug!(%date, "typed date vetoed by confirm hook");
            self.report_validation(true);
            return Err(DateInputError::Vetoed(Some(date)));
        }

        self.commit_selection(date);
        self.report_validation(true);
        Ok(())
    }

    /// Updates the displayed month, clamped to the year range.
    pub fn set_displayed_month(&mut self, month: YearMonth) {
        self.displayed_month = clamp_month_to_range(month, &self.year_range);
    }

    /// Moves the displayed month forward by one, staying within the year range.
    pub fn next_month(&mut self) {
        if self.can_navigate_next_month() {
            self.displayed_month = self.displayed_month.next_month();
        }
    }

    /// Moves the displayed month backward by one, staying within the year
    /// range.
    pub fn previous_month(&mut self) {
        if self.can_navigate_previous_month() {
            self.displayed_month = self.displayed_month.previous_month();
        }
    }

    /// Moves the displayed month forward by a year, staying within the year
    /// range.
    pub fn next_year(&mut self) {
        if self.can_navigate_next_year() {
            self.displayed_month = self.displayed_month.next_year();
        }
    }

    /// Moves the displayed month backward by a year, staying within the year
    /// range.
    pub fn previous_year(&mut self) {
        if self.can_navigate_previous_year() {
            self.displayed_month = self.displayed_month.previous_year();
        }
    }

    /// Whether a previous month exists inside the year range.
    pub fn can_navigate_previous_month(&self) -> bool {
        let month = self.displayed_month;
        let start = *self.year_range.start();
        month.year() > start || (month.year() == start && month.month() > 1)
    }

    /// Whether a next month exists inside the year range.
    pub fn can_navigate_next_month(&self) -> bool {
        let month = self.displayed_month;
        let end = *self.year_range.end();
        month.year() < end || (month.year() == end && month.month() < 12)
    }

    /// Whether the previous year lies inside the year range.
    pub fn can_navigate_previous_year(&self) -> bool {
        self.displayed_month.year() > *self.year_range.start()
    }

    /// Whether the next year lies inside the year range.
    pub fn can_navigate_next_year(&self) -> bool {
        self.displayed_month.year() < *self.year_range.end()
    }

    /// Updates the allowed year range.
    ///
    /// A selection that falls outside the new range is cleared together
    /// with the field text.
    pub fn set_year_range(&mut self, year_range: RangeInclusive<i32>) {
        self.year_range = normalize_year_range(year_range);
        self.displayed_month = clamp_month_to_range(self.displayed_month, &self.year_range);
        self.drop_unselectable_selection();
    }

    /// Updates the selectable-dates policy.
    ///
    /// A selection the new policy rejects is cleared together with the field
    /// text.
    pub fn set_selectable_dates(&mut self, selectable_dates: Arc<dyn SelectableDates>) {
        self.selectable_dates = selectable_dates;
        self.drop_unselectable_selection();
    }

    /// Updates the date format and rewrites the field for the current
    /// selection.
    pub fn set_date_format(&mut self, date_format: Arc<dyn DateFormat>) {
        self.date_format = date_format;
        self.refresh_field_text();
    }

    fn commit_selection(&mut self, date: CalendarDate) {
        self.selected_date = Some(date);
        self.displayed_month = clamp_month_to_range(date.year_month(), &self.year_range);
        debug!(%date, "selection committed");
    }

    fn drop_unselectable_selection(&mut self) {
        if let Some(date) = self.selected_date
            && !self.is_selectable(date)
        {
            debug!(%date, "selection no longer selectable, clearing");
            self.selected_date = None;
            self.set_field_text(String::new());
            self.is_field_value_invalid = false;
        }
    }

    fn refresh_field_text(&mut self) {
        let Some(date) = self.selected_date else {
            return;
        };
        match self.date_format.format(date) {
            Ok(text) => {
                self.set_field_text(text);
                self.is_field_value_invalid = false;
            }
            Err(err) => {
                debug!(%date, error = %err, "selected date could not be formatted");
                self.is_field_value_invalid = true;
            }
        }
    }

    fn set_field_text(&mut self, text: String) {
        if self.field_text == text {
            return;
        }
        self.field_text = text;
        notify(self.on_field_value_change.as_ref(), self.field_text.clone());
    }

    fn report_validation(&mut self, is_valid: bool) {
        self.is_field_value_invalid = !is_valid;
        notify(self.on_validation_result.as_ref(), is_valid);
    }
}

impl Default for DatePickerState {
    fn default() -> Self {
        DatePickerState::new(
            None,
            Arc::new(PatternDateFormat::default()),
            DatePickerDefaults::all_dates(),
            always_confirm(),
            None,
        )
    }
}

fn clamp_month_to_range(month: YearMonth, year_range: &RangeInclusive<i32>) -> YearMonth {
    let start = *year_range.start();
    let end = *year_range.end();
    if month.year() < start {
        YearMonth::new(start, 1).unwrap_or(month)
    } else if month.year() > end {
        YearMonth::new(end, 12).unwrap_or(month)
    } else {
        month
    }
}
