//! Arrow-key movement of the focused day cell.
//!
//! Movement is plain date arithmetic: left/right move one day, up/down move
//! one week. Disabled dates stay focusable. When the destination belongs to
//! another month the grid for that month has to be built before the cell
//! exists, so the focus request is parked until the next layout pass and
//! consumed there exactly once.
use tracing::{debug, instrument};

use crate::{
    calendar::{CalendarDate, YearMonth},
    calendar_matrix::{CalendarMatrix, DATE_COLUMNS},
};

/// Direction of an arrow key inside the day grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridDirection {
    /// One day earlier.
    Left,
    /// One day later.
    Right,
    /// One week earlier.
    Up,
    /// One week later.
    Down,
}

impl GridDirection {
    /// Number of days this direction moves the focus.
    pub fn day_delta(self) -> i64 {
        match self {
            GridDirection::Left => -1,
            GridDirection::Right => 1,
            GridDirection::Up => -(DATE_COLUMNS as i64),
            GridDirection::Down => DATE_COLUMNS as i64,
        }
    }
}

/// Returns the date focus moves to from `current` in `direction`.
///
/// At the ends of the representable calendar the focus stays put.
pub fn next_focus_target(current: CalendarDate, direction: GridDirection) -> CalendarDate {
    current
        .checked_add_days(direction.day_delta())
        .unwrap_or(current)
}

/// What the picker has to do after an arrow key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusMove {
    /// The target is in the displayed month; focus it now.
    Immediate(CalendarDate),
    /// Show `month` first; the target is focused on the next layout pass.
    ChangeMonth {
        /// Month that must be displayed.
        month: YearMonth,
        /// Date that receives focus once that month is laid out.
        target: CalendarDate,
    },
}

impl FocusMove {
    /// The date that ends up focused.
    pub fn target(&self) -> CalendarDate {
        match self {
            FocusMove::Immediate(target) | FocusMove::ChangeMonth { target, .. } => *target,
        }
    }
}

/// Tracks the focused day cell and any focus request waiting for a layout
/// pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyboardGridNavigator {
    focused_date: Option<CalendarDate>,
    pending_focus: Option<CalendarDate>,
}

impl KeyboardGridNavigator {
    /// Creates a navigator with nothing focused.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the day cell that currently holds keyboard focus.
    pub fn focused_date(&self) -> Option<CalendarDate> {
        self.focused_date
    }

    /// Returns the date waiting to be focused after the next layout pass.
    pub fn pending_focus(&self) -> Option<CalendarDate> {
        self.pending_focus
    }

    /// Focuses `date` directly, dropping any pending request.
    pub fn focus(&mut self, date: CalendarDate) {
        self.focused_date = Some(date);
        self.pending_focus = None;
    }

    /// Forgets the focused cell, e.g. when the calendar closes.
    pub fn clear(&mut self) {
        self.focused_date = None;
        self.pending_focus = None;
    }

    /// Moves focus from the focused date in `direction`.
    ///
    /// Returns `None` when nothing is focused. When the target lies outside
    /// `displayed_month` the caller must switch to the returned month; the
    /// target is then parked until [`Self::on_layout`].
    #[instrument(level = "trace", skip(self))]
    pub fn navigate(
        &mut self,
        direction: GridDirection,
        displayed_month: YearMonth,
    ) -> Option<FocusMove> {
        let current = self.pending_focus.or(self.focused_date)?;
        let target = next_focus_target(current, direction);
        if displayed_month.contains(target) {
            self.focus(target);
            return Some(FocusMove::Immediate(target));
        }

        let month = target.year_month();
        debug!(%target, %month, "focus crosses into another month, deferring");
        self.pending_focus = Some(target);
        Some(FocusMove::ChangeMonth { month, target })
    }

    /// Cancels a pending request, keeping the previously focused cell.
    pub fn cancel_pending(&mut self) {
        self.pending_focus = None;
    }

    /// Consumes the pending focus request against the freshly built grid.
    ///
    /// The request is cleared whether or not the grid shows its date. Returns
    /// the date to focus, if any.
    pub fn on_layout(&mut self, matrix: &CalendarMatrix) -> Option<CalendarDate> {
        let target = self.pending_focus.take()?;
        if matrix.contains(target) {
            debug!(%target, "pending focus consumed");
            self.focused_date = Some(target);
            Some(target)
        } else {
            debug!(%target, month = %matrix.year_month(), "pending focus dropped, not in grid");
            None
        }
    }
}
