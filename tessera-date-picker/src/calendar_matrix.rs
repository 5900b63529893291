//! Fixed 6x7 month grid construction.
//!
//! ## Usage
//!
//! Build a [`CalendarMatrix`] for the displayed month and lay out one day
//! cell per entry. The grid always has six weeks so the popup keeps the same
//! height from month to month.
use crate::calendar::{CalendarDate, Weekday, YearMonth};

/// Number of columns (days) in a grid week.
pub const DATE_COLUMNS: usize = 7;
/// Number of rows (weeks) in a grid.
pub const DATE_ROWS: usize = 6;
/// Total number of cells in a grid.
pub const DATE_CELLS: usize = DATE_COLUMNS * DATE_ROWS;

/// One cell of the month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    /// The date shown in the cell.
    pub date: CalendarDate,
    /// True when the cell belongs to the previous or next month.
    pub is_out_of_month: bool,
}

/// A month laid out as six weeks of seven days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarMatrix {
    year_month: YearMonth,
    first_day_of_week: Weekday,
    weeks: [[DayCell; DATE_COLUMNS]; DATE_ROWS],
}

impl CalendarMatrix {
    /// Builds the grid for `year_month` with columns starting on
    /// `first_day_of_week`.
    ///
    /// Leading cells are filled from the end of the previous month and
    /// trailing cells from the start of the next month until all 42 cells
    /// are populated.
    pub fn build(year_month: YearMonth, first_day_of_week: Weekday) -> Self {
        let first = year_month.first_day();
        let leading = (first.weekday().index_from_monday() + DATE_COLUMNS
            - first_day_of_week.index_from_monday())
            % DATE_COLUMNS;
        let grid_start = first.saturating_add_days(-(leading as i64));

        let weeks = std::array::from_fn(|row| {
            std::array::from_fn(|column| {
                let offset = (row * DATE_COLUMNS + column) as i64;
                let date = grid_start.saturating_add_days(offset);
                DayCell {
                    date,
                    is_out_of_month: !year_month.contains(date),
                }
            })
        });

        Self {
            year_month,
            first_day_of_week,
            weeks,
        }
    }

    /// Returns the month this grid was built for.
    pub fn year_month(&self) -> YearMonth {
        self.year_month
    }

    /// Returns the weekday of column 0.
    pub fn first_day_of_week(&self) -> Weekday {
        self.first_day_of_week
    }

    /// Returns the grid rows, first week first.
    pub fn weeks(&self) -> &[[DayCell; DATE_COLUMNS]; DATE_ROWS] {
        &self.weeks
    }

    /// Returns the cell at `row`/`column`, if in bounds.
    pub fn cell(&self, row: usize, column: usize) -> Option<&DayCell> {
        self.weeks.get(row).and_then(|week| week.get(column))
    }

    /// Iterates all 42 cells in reading order.
    pub fn cells(&self) -> impl Iterator<Item = &DayCell> + '_ {
        self.weeks.iter().flatten()
    }

    /// Returns the first cell's date.
    pub fn first_date(&self) -> CalendarDate {
        self.weeks[0][0].date
    }

    /// Returns the last cell's date.
    pub fn last_date(&self) -> CalendarDate {
        self.weeks[DATE_ROWS - 1][DATE_COLUMNS - 1].date
    }

    /// Returns the row and column showing `date`, if the grid contains it.
    pub fn position_of(&self, date: CalendarDate) -> Option<(usize, usize)> {
        let offset = self.first_date().days_until(date);
        if !(0..DATE_CELLS as i64).contains(&offset) {
            return None;
        }
        let offset = offset as usize;
        Some((offset / DATE_COLUMNS, offset % DATE_COLUMNS))
    }

    /// Returns true when any cell, in or out of month, shows `date`.
    pub fn contains(&self, date: CalendarDate) -> bool {
        self.position_of(date).is_some()
    }

    /// Iterates the cells that belong to the grid's own month.
    pub fn own_month_cells(&self) -> impl Iterator<Item = &DayCell> + '_ {
        self.cells().filter(|cell| !cell.is_out_of_month)
    }
}
