//! Headless docked date picker: a text field with a calendar popup.
//!
//! ## Usage
//!
//! Create a [`DatePicker`] from [`DatePickerArgs`], forward field and
//! calendar events to its `on_*` methods and render
//! [`DatePicker::day_cells`] for the displayed month. After laying out a new
//! grid, call [`DatePicker::on_layout`] so a focus request that crossed into
//! another month can land.
use std::{ops::RangeInclusive, sync::Arc};

use derive_setters::Setters;
use tracing::debug;

use crate::{
    calendar::{CalendarDate, Weekday, YearMonth},
    calendar_matrix::CalendarMatrix,
    callback::{Callback, notify},
    date_format::{DateFormat, PatternDateFormat},
    date_picker_state::{ConfirmDateChange, DatePickerState, always_confirm},
    error::DateInputError,
    keyboard_navigation::{FocusMove, GridDirection, KeyboardGridNavigator},
    locale::CalendarLocale,
    popup_sync::{DismissReason, FieldState, OpenTrigger, PopupSyncController},
    selectable_dates::{DatePickerDefaults, SelectableDates},
    test_tags,
};

/// Configuration options for [`DatePicker`].
#[derive(Clone, Setters)]
pub struct DatePickerArgs {
    /// Initial selected date.
    #[setters(strip_option)]
    pub initial_selected_date: Option<CalendarDate>,
    /// Initial displayed month; defaults to the selected date's month, else
    /// today's.
    #[setters(strip_option)]
    pub initial_displayed_month: Option<YearMonth>,
    /// Years the user may pick from.
    pub year_range: RangeInclusive<i32>,
    /// Selectable-dates policy.
    pub selectable_dates: Arc<dyn SelectableDates>,
    /// Parser and formatter for the field text.
    pub date_format: Arc<dyn DateFormat>,
    /// Hook that may veto any change of the selection.
    pub confirm_date_change: ConfirmDateChange,
    /// First day of the week for the calendar grid.
    pub first_day_of_week: Weekday,
    /// Names used for labels.
    pub locale: CalendarLocale,
    /// Interactive state of the field.
    pub field_state: FieldState,
    /// Called whenever the field text changes.
    #[setters(strip_option)]
    pub on_field_value_change: Option<Callback<String>>,
    /// Called whenever the popup opens (`true`) or closes (`false`).
    #[setters(strip_option)]
    pub on_expanded_change: Option<Callback<bool>>,
    /// Called when a day is picked from the calendar.
    #[setters(strip_option)]
    pub on_day_selected: Option<Callback<CalendarDate>>,
    /// Called with every validation outcome (`true` means valid).
    #[setters(strip_option)]
    pub on_validation_result: Option<Callback<bool>>,
}

impl Default for DatePickerArgs {
    fn default() -> Self {
        Self {
            initial_selected_date: None,
            initial_displayed_month: None,
            year_range: DatePickerDefaults::YEAR_RANGE,
            selectable_dates: DatePickerDefaults::all_dates(),
            date_format: Arc::new(PatternDateFormat::default()),
            confirm_date_change: always_confirm(),
            first_day_of_week: Weekday::Monday,
            locale: CalendarLocale::default(),
            field_state: FieldState::Enabled,
            on_field_value_change: None,
            on_expanded_change: None,
            on_day_selected: None,
            on_validation_result: None,
        }
    }
}

/// Keys the picker reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePickerKey {
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
    /// Up arrow.
    ArrowUp,
    /// Down arrow.
    ArrowDown,
    /// Enter / Return.
    Enter,
    /// Space bar.
    Space,
    /// Escape.
    Escape,
}

impl DatePickerKey {
    fn grid_direction(self) -> Option<GridDirection> {
        match self {
            DatePickerKey::ArrowLeft => Some(GridDirection::Left),
            DatePickerKey::ArrowRight => Some(GridDirection::Right),
            DatePickerKey::ArrowUp => Some(GridDirection::Up),
            DatePickerKey::ArrowDown => Some(GridDirection::Down),
            _ => None,
        }
    }
}

/// Everything the rendering layer needs to draw one day cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCellModel {
    /// The date shown.
    pub date: CalendarDate,
    /// True for cells of the previous or next month.
    pub is_out_of_month: bool,
    /// True when this is the selected date.
    pub is_selected: bool,
    /// True when clicking the cell may select it.
    pub is_selectable: bool,
    /// True when the cell shows today.
    pub is_today: bool,
    /// True when the cell holds keyboard focus.
    pub is_focused: bool,
    /// Stable automation identifier.
    pub test_tag: String,
}

/// A date field with its calendar popup, keyboard navigation and state.
pub struct DatePicker {
    state: DatePickerState,
    popup: PopupSyncController,
    navigator: KeyboardGridNavigator,
    field_state: FieldState,
    first_day_of_week: Weekday,
    locale: CalendarLocale,
    on_day_selected: Option<Callback<CalendarDate>>,
}

impl DatePicker {
    /// Creates a picker from `args`.
    pub fn new(args: impl Into<DatePickerArgs>) -> Self {
        let args: DatePickerArgs = args.into();
        let mut state = DatePickerState::with_year_range(
            args.initial_selected_date,
            args.year_range,
            args.date_format,
            args.selectable_dates,
            args.confirm_date_change,
            args.on_validation_result,
        );
        if let Some(month) = args.initial_displayed_month {
            state.set_displayed_month(month);
        }
        state.set_on_field_value_change(args.on_field_value_change);

        let popup = PopupSyncController::new();
        popup.set_on_expanded_change(args.on_expanded_change);

        Self {
            state,
            popup,
            navigator: KeyboardGridNavigator::new(),
            field_state: args.field_state,
            first_day_of_week: args.first_day_of_week,
            locale: args.locale,
            on_day_selected: args.on_day_selected,
        }
    }

    /// Returns the selection state.
    pub fn state(&self) -> &DatePickerState {
        &self.state
    }

    /// Returns the selection state for direct changes.
    pub fn state_mut(&mut self) -> &mut DatePickerState {
        &mut self.state
    }

    /// Returns a handle to the popup controller.
    pub fn popup(&self) -> &PopupSyncController {
        &self.popup
    }

    /// Returns the keyboard navigator.
    pub fn navigator(&self) -> &KeyboardGridNavigator {
        &self.navigator
    }

    /// Returns the field's interactive state.
    pub fn field_state(&self) -> &FieldState {
        &self.field_state
    }

    /// Changes the field's interactive state, closing the popup if the field
    /// is no longer interactive.
    pub fn set_field_state(&mut self, field_state: FieldState) {
        self.field_state = field_state;
        if self.popup.sync_field_state(&self.field_state) {
            self.navigator.clear();
        }
    }

    /// Returns the first day of the week used by the grid.
    pub fn first_day_of_week(&self) -> Weekday {
        self.first_day_of_week
    }

    /// Returns true while the calendar popup is shown.
    pub fn is_expanded(&self) -> bool {
        self.popup.is_open()
    }

    /// Builds the grid for the displayed month.
    pub fn matrix(&self) -> CalendarMatrix {
        CalendarMatrix::build(self.state.displayed_month(), self.first_day_of_week)
    }

    /// Returns the render model for every cell of the displayed month.
    pub fn day_cells(&self) -> Vec<DayCellModel> {
        let today = CalendarDate::today();
        let selected = self.state.selected_date();
        let focused = self.navigator.focused_date();
        self.matrix()
            .cells()
            .map(|cell| DayCellModel {
                date: cell.date,
                is_out_of_month: cell.is_out_of_month,
                is_selected: selected == Some(cell.date),
                is_selectable: self.state.is_selectable(cell.date),
                is_today: cell.date == today,
                is_focused: focused == Some(cell.date),
                test_tag: test_tags::day_cell_tag(cell.date),
            })
            .collect()
    }

    /// Header label for the displayed month, e.g. `June 2024`.
    pub fn month_year_label(&self) -> String {
        self.locale.month_year_label(self.state.displayed_month())
    }

    /// Weekday labels in grid column order.
    pub fn weekday_labels(&self) -> [&str; 7] {
        self.locale.weekday_labels(self.first_day_of_week)
    }

    /// Headline describing the selection.
    pub fn headline(&self) -> String {
        self.state
            .selected_date()
            .map(|date| self.locale.headline(date))
            .unwrap_or_else(|| "No date selected".to_string())
    }

    /// The field gained focus.
    pub fn on_field_focus(&mut self) -> bool {
        self.open(OpenTrigger::Focus)
    }

    /// The field was clicked.
    pub fn on_field_click(&mut self) -> bool {
        self.open(OpenTrigger::Click)
    }

    /// A key was pressed while the field has focus. Returns true if handled.
    pub fn on_field_key(&mut self, key: DatePickerKey) -> bool {
        match key {
            DatePickerKey::Enter => self.open(OpenTrigger::EnterKey),
            DatePickerKey::Escape if self.popup.is_open() => self.dismiss(DismissReason::EscapeKey),
            _ => false,
        }
    }

    /// The user edited the field text.
    ///
    /// Returns `Ok(false)` without touching the state when the field is
    /// disabled or read-only, `Ok(true)` when the text became the selection.
    pub fn on_field_text_change(
        &mut self,
        text: impl Into<String>,
    ) -> Result<bool, DateInputError> {
        if !self.field_state.is_interactive() {
            return Ok(false);
        }
        let before = self.state.displayed_month();
        let result = self.state.update_field_value(text);
        self.refocus_if_month_changed(before);
        result.map(|()| true)
    }

    /// A key was pressed while focus is inside the calendar. Returns true if
    /// handled.
    pub fn on_calendar_key(&mut self, key: DatePickerKey) -> bool {
        if !self.popup.is_open() {
            return false;
        }
        if let Some(direction) = key.grid_direction() {
            return self.move_focus(direction);
        }
        match key {
            DatePickerKey::Enter | DatePickerKey::Space => match self.navigator.focused_date() {
                Some(date) => {
                    match self.select_day(date) {
                        Ok(()) => {}
                        // Disabled cells stay focusable but do not activate.
                        Err(DateInputError::NotSelectable(_)) => {}
                        Err(err) => debug!(%date, error = %err, "focused day not selected"),
                    }
                    true
                }
                None => false,
            },
            DatePickerKey::Escape => self.dismiss(DismissReason::EscapeKey),
            _ => false,
        }
    }

    /// A day cell was clicked.
    pub fn on_day_click(&mut self, date: CalendarDate) -> Result<(), DateInputError> {
        self.select_day(date)
    }

    /// A click landed outside the field and the popup.
    pub fn on_outside_click(&mut self) -> bool {
        self.dismiss(DismissReason::OutsideClick)
    }

    /// Call after the grid for a month has been laid out. Returns the date
    /// that should now receive keyboard focus, if a request was pending.
    pub fn on_layout(&mut self, rendered: &CalendarMatrix) -> Option<CalendarDate> {
        self.navigator.on_layout(rendered)
    }

    /// Shows the previous month.
    pub fn previous_month(&mut self) {
        let before = self.state.displayed_month();
        self.state.previous_month();
        self.navigator.cancel_pending();
        self.refocus_if_month_changed(before);
    }

    /// Shows the next month.
    pub fn next_month(&mut self) {
        let before = self.state.displayed_month();
        self.state.next_month();
        self.navigator.cancel_pending();
        self.refocus_if_month_changed(before);
    }

    /// Shows the same month one year earlier.
    pub fn previous_year(&mut self) {
        let before = self.state.displayed_month();
        self.state.previous_year();
        self.navigator.cancel_pending();
        self.refocus_if_month_changed(before);
    }

    /// Shows the same month one year later.
    pub fn next_year(&mut self) {
        let before = self.state.displayed_month();
        self.state.next_year();
        self.navigator.cancel_pending();
        self.refocus_if_month_changed(before);
    }

    fn open(&mut self, trigger: OpenTrigger) -> bool {
        if !self.popup.request_open(trigger, &self.field_state) {
            return false;
        }
        self.navigator.focus(self.initial_focus());
        true
    }

    fn dismiss(&mut self, reason: DismissReason) -> bool {
        let closed = self.popup.dismiss(reason);
        if closed {
            self.navigator.clear();
        }
        closed
    }

    fn initial_focus(&self) -> CalendarDate {
        let displayed = self.state.displayed_month();
        let today = CalendarDate::today();
        match self.state.selected_date() {
            Some(selected) if displayed.contains(selected) => selected,
            _ if displayed.contains(today) => today,
            _ => displayed.first_day(),
        }
    }

    /// Moves keyboard focus into the displayed month after it changed by
    /// anything other than an arrow key.
    fn refocus_if_month_changed(&mut self, before: YearMonth) {
        let displayed = self.state.displayed_month();
        if displayed == before || !self.popup.is_open() {
            return;
        }
        let target = self.initial_focus();
        debug!(%displayed, %target, "displayed month changed, refocusing");
        self.navigator.focus(target);
    }

    fn move_focus(&mut self, direction: GridDirection) -> bool {
        let stale = self.navigator.pending_focus().is_none()
            && self
                .navigator
                .focused_date()
                .is_none_or(|focused| !self.state.displayed_month().contains(focused));
        if stale {
            self.navigator.focus(self.initial_focus());
        }
        let Some(step) = self.navigator.navigate(direction, self.state.displayed_month()) else {
            return false;
        };
        if let FocusMove::ChangeMonth { month, target } = step {
            self.state.set_displayed_month(month);
            if self.state.displayed_month() != month {
                debug!(%target, "focus target outside year range, staying put");
                self.navigator.cancel_pending();
            }
        }
        true
    }

    fn select_day(&mut self, date: CalendarDate) -> Result<(), DateInputError> {
        if !self.field_state.is_interactive() {
            return Ok(());
        }
        self.state.set_selected_date(Some(date))?;
        debug!(%date, "day selected from calendar");
        notify(self.on_day_selected.as_ref(), date);
        self.dismiss(DismissReason::DaySelected);
        Ok(())
    }
}

impl Default for DatePicker {
    fn default() -> Self {
        Self::new(DatePickerArgs::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{callback::testing::Recorder, popup_sync::PopupState};

    fn date(year: i32, month: u8, day: u8) -> CalendarDate {
        CalendarDate::new(year, month, day).unwrap()
    }

    fn month(year: i32, month: u8) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    fn picker_at(selected: CalendarDate) -> DatePicker {
        DatePicker::new(DatePickerArgs::default().initial_selected_date(selected))
    }

    #[test]
    fn clicking_a_day_selects_and_closes() {
        let expanded = Recorder::new();
        let selected = Recorder::new();
        let mut picker = DatePicker::new(
            DatePickerArgs::default()
                .initial_selected_date(date(2024, 6, 3))
                .on_expanded_change(expanded.callback())
                .on_day_selected(selected.callback()),
        );
        assert!(picker.on_field_click());
        assert!(picker.is_expanded());
        assert!(picker.on_day_click(date(2024, 6, 14)).is_ok());
        assert!(!picker.is_expanded());
        assert_eq!(picker.state().field_text(), "2024/06/14");
        assert_eq!(selected.calls(), vec![date(2024, 6, 14)]);
        assert_eq!(expanded.calls(), vec![true, false]);
        assert_eq!(picker.navigator().focused_date(), None);
    }

    #[test]
    fn rejected_day_keeps_popup_open() {
        let tomorrow = CalendarDate::today().saturating_add_days(1);
        let mut picker = DatePicker::new(
            DatePickerArgs::default()
                .selectable_dates(Arc::new(move |d: CalendarDate| d != tomorrow)),
        );
        picker.on_field_click();
        let before = picker.state().selected_date();
        let result = picker.on_day_click(tomorrow);
        assert_eq!(result, Err(DateInputError::NotSelectable(tomorrow)));
        assert_eq!(picker.state().selected_date(), before);
        assert!(!picker.state().is_field_value_invalid());
        assert_eq!(picker.popup().state(), PopupState::Open);
    }

    #[test]
    fn typed_date_is_shown_when_reopened() {
        let mut picker = picker_at(date(2024, 1, 15));
        assert_eq!(picker.state().displayed_month(), month(2024, 1));
        assert_eq!(picker.on_field_text_change("2024/06/20"), Ok(true));
        assert_eq!(picker.state().selected_date(), Some(date(2024, 6, 20)));
        picker.on_field_click();
        assert_eq!(picker.matrix().year_month(), month(2024, 6));
        assert_eq!(picker.month_year_label(), "June 2024");
        assert_eq!(picker.navigator().focused_date(), Some(date(2024, 6, 20)));
    }

    #[test]
    fn disabled_and_read_only_fields_stay_closed() {
        let mut picker = DatePicker::new(DatePickerArgs::default().field_state(FieldState::Disabled));
        assert!(!picker.on_field_click());
        assert!(!picker.on_field_focus());
        assert!(!picker.on_field_key(DatePickerKey::Enter));

        picker.set_field_state(FieldState::ReadOnly);
        assert!(!picker.on_field_click());
        assert_eq!(picker.on_field_text_change("2024/06/20"), Ok(false));
        assert_eq!(picker.state().field_text(), "");

        picker.set_field_state(FieldState::Enabled);
        assert!(picker.on_field_key(DatePickerKey::Enter));
        picker.set_field_state(FieldState::Disabled);
        assert!(!picker.is_expanded());
    }

    #[test]
    fn arrow_keys_cross_months_through_layout() {
        let mut picker = picker_at(date(2024, 1, 31));
        picker.on_field_focus();
        assert_eq!(picker.navigator().focused_date(), Some(date(2024, 1, 31)));

        assert!(picker.on_calendar_key(DatePickerKey::ArrowRight));
        assert_eq!(picker.state().displayed_month(), month(2024, 2));
        assert_eq!(picker.navigator().pending_focus(), Some(date(2024, 2, 1)));
        assert_eq!(picker.state().selected_date(), Some(date(2024, 1, 31)));

        let grid = picker.matrix();
        assert_eq!(picker.on_layout(&grid), Some(date(2024, 2, 1)));
        let focused: Vec<_> = picker
            .day_cells()
            .into_iter()
            .filter(|cell| cell.is_focused)
            .map(|cell| cell.date)
            .collect();
        assert_eq!(focused, vec![date(2024, 2, 1)]);
    }

    #[test]
    fn enter_selects_focused_day_unless_disabled() {
        let blocked = date(2024, 6, 11);
        let mut picker = DatePicker::new(
            DatePickerArgs::default()
                .initial_selected_date(date(2024, 6, 10))
                .selectable_dates(Arc::new(move |d: CalendarDate| d != blocked)),
        );
        picker.on_field_click();
        picker.on_calendar_key(DatePickerKey::ArrowRight);
        assert_eq!(picker.navigator().focused_date(), Some(blocked));
        assert!(picker.on_calendar_key(DatePickerKey::Enter));
        assert_eq!(picker.state().selected_date(), Some(date(2024, 6, 10)));
        assert!(picker.is_expanded());

        picker.on_calendar_key(DatePickerKey::ArrowDown);
        assert!(picker.on_calendar_key(DatePickerKey::Space));
        assert_eq!(picker.state().selected_date(), Some(date(2024, 6, 18)));
        assert!(!picker.is_expanded());
    }

    #[test]
    fn escape_and_outside_click_dismiss() {
        let mut picker = picker_at(date(2024, 6, 10));
        picker.on_field_click();
        assert!(picker.on_calendar_key(DatePickerKey::Escape));
        assert!(!picker.is_expanded());
        assert!(!picker.on_calendar_key(DatePickerKey::ArrowLeft));

        picker.on_field_click();
        assert!(picker.on_outside_click());
        assert!(!picker.on_outside_click());
    }

    #[test]
    fn focus_does_not_leave_year_range() {
        let mut picker = DatePicker::new(
            DatePickerArgs::default()
                .year_range(2024..=2024)
                .initial_selected_date(date(2024, 12, 30)),
        );
        picker.on_field_click();
        picker.on_calendar_key(DatePickerKey::ArrowDown);
        assert_eq!(picker.state().displayed_month(), month(2024, 12));
        assert_eq!(picker.navigator().pending_focus(), None);
        assert_eq!(picker.navigator().focused_date(), Some(date(2024, 12, 30)));
    }

    #[test]
    fn render_model_marks_selection_and_disabled_cells() {
        let picker = DatePicker::new(
            DatePickerArgs::default()
                .initial_selected_date(date(2024, 2, 14))
                .first_day_of_week(Weekday::Sunday)
                .selectable_dates(Arc::new(|d: CalendarDate| d.weekday() != Weekday::Sunday)),
        );
        let cells = picker.day_cells();
        assert_eq!(cells.len(), 42);
        assert_eq!(cells[0].date, date(2024, 1, 28));
        assert!(!cells[0].is_selectable);
        assert!(cells[0].is_out_of_month);
        let selected: Vec<_> = cells.iter().filter(|c| c.is_selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].test_tag, "date_picker_day_2024-02-14");
        assert_eq!(picker.weekday_labels()[0], "Sun");
        assert_eq!(picker.headline(), "Feb 14, 2024");
    }

    #[test]
    fn explicit_displayed_month_wins_over_selection() {
        let picker = DatePicker::new(
            DatePickerArgs::default()
                .initial_selected_date(date(2024, 2, 14))
                .initial_displayed_month(month(2024, 5)),
        );
        assert_eq!(picker.state().displayed_month(), month(2024, 5));
    }

    #[test]
    fn month_buttons_cancel_pending_focus() {
        let mut picker = picker_at(date(2024, 1, 31));
        picker.on_field_click();
        picker.on_calendar_key(DatePickerKey::ArrowRight);
        picker.next_month();
        assert_eq!(picker.state().displayed_month(), month(2024, 3));
        assert_eq!(picker.navigator().pending_focus(), None);
        picker.previous_year();
        assert_eq!(picker.state().displayed_month(), month(2023, 3));
        picker.next_year();
        picker.previous_month();
        assert_eq!(picker.state().displayed_month(), month(2024, 2));
    }

    #[test]
    fn arrow_after_month_button_stays_in_new_month() {
        let mut picker = picker_at(date(2024, 1, 15));
        picker.on_field_click();
        picker.next_month();
        assert_eq!(picker.state().displayed_month(), month(2024, 2));
        assert_eq!(picker.navigator().focused_date(), Some(date(2024, 2, 1)));
        assert_eq!(picker.day_cells().iter().filter(|c| c.is_focused).count(), 1);

        assert!(picker.on_calendar_key(DatePickerKey::ArrowRight));
        assert_eq!(picker.state().displayed_month(), month(2024, 2));
        assert_eq!(picker.navigator().focused_date(), Some(date(2024, 2, 2)));
        assert_eq!(picker.navigator().pending_focus(), None);
    }

    #[test]
    fn arrow_after_typing_while_open_stays_in_typed_month() {
        let mut picker = picker_at(date(2024, 1, 15));
        picker.on_field_click();
        assert_eq!(picker.on_field_text_change("2024/06/20"), Ok(true));
        assert_eq!(picker.navigator().focused_date(), Some(date(2024, 6, 20)));

        assert!(picker.on_calendar_key(DatePickerKey::ArrowRight));
        assert_eq!(picker.state().displayed_month(), month(2024, 6));
        assert_eq!(picker.navigator().focused_date(), Some(date(2024, 6, 21)));
        assert_eq!(picker.navigator().pending_focus(), None);
    }

    #[test]
    fn arrow_after_direct_month_change_reseeds_focus() {
        let mut picker = picker_at(date(2024, 1, 15));
        picker.on_field_click();
        picker.state_mut().set_displayed_month(month(2024, 9));
        picker.on_calendar_key(DatePickerKey::ArrowDown);
        assert_eq!(picker.state().displayed_month(), month(2024, 9));
        assert_eq!(picker.navigator().focused_date(), Some(date(2024, 9, 8)));
    }

    #[test]
    fn enter_on_unformattable_day_keeps_popup_open() {
        let mut picker = DatePicker::new(
            DatePickerArgs::default()
                .date_format(Arc::new(PatternDateFormat::new("dd/MM/yy").unwrap()))
                .year_range(1900..=2100)
                .initial_displayed_month(month(1950, 3)),
        );
        picker.on_field_click();
        assert_eq!(picker.navigator().focused_date(), Some(date(1950, 3, 1)));
        assert!(picker.on_calendar_key(DatePickerKey::Enter));
        assert_eq!(picker.state().selected_date(), Some(date(1950, 3, 1)));
        assert!(picker.state().is_field_value_invalid());
        assert!(picker.is_expanded());
    }
}
