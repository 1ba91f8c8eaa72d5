use chrono::{Datelike, Local, NaiveDate, Weekday};

use crate::app::AppState;
use crate::calendar::store::EventStore;
use crate::calendar::{DateKey, EventColor};
use crate::storage::repository::SnapshotRepository;

/// Dots drawn per day before the cell would overflow.
pub const MAX_INDICATORS: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct MonthLayout {
    pub year: i32,
    pub month: u32,
    /// Leading blanks first, then one cell per day of the month.
    pub cells: Vec<DayCell>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayCell {
    pub date: Option<NaiveDate>,
    pub is_selected: bool,
    pub is_today: bool,
    pub event_count: usize,
    pub indicators: Vec<EventColor>,
}

impl DayCell {
    pub fn blank() -> Self {
        Self::new(None)
    }

    pub fn new(date: Option<NaiveDate>) -> Self {
        Self {
            date,
            is_selected: false,
            is_today: false,
            event_count: 0,
            indicators: Vec::new(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.date.is_none()
    }

    pub fn is_sunday(&self) -> bool {
        self.date.is_some_and(|d| d.weekday() == Weekday::Sun)
    }
}

impl MonthLayout {
    pub fn leading_blanks(&self) -> usize {
        self.cells.iter().take_while(|c| c.is_blank()).count()
    }

    pub fn day_cells(&self) -> impl Iterator<Item = &DayCell> {
        self.cells.iter().filter(|c| !c.is_blank())
    }

    /// Rows of seven cells, Sunday first. The last row may be short.
    pub fn weeks(&self) -> impl Iterator<Item = &[DayCell]> {
        self.cells.chunks(7)
    }
}

/// Last valid day of the month, found by probing down from 31.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    (28..=31)
        .rev()
        .find(|&day| NaiveDate::from_ymd_opt(year, month, day).is_some())
        .unwrap_or(0)
}

/// Weekday index of the 1st, 0 = Sunday.
pub fn first_weekday(year: i32, month: u32) -> u32 {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.weekday().num_days_from_sunday())
        .unwrap_or(0)
}

/// Undecorated grid for the month containing `reference`.
pub fn month_grid(reference: NaiveDate) -> MonthLayout {
    let year = reference.year();
    let month = reference.month();

    let blanks = first_weekday(year, month) as usize;
    let days = days_in_month(year, month);

    let mut cells = Vec::with_capacity(blanks + days as usize);
    cells.extend(std::iter::repeat_with(DayCell::blank).take(blanks));
    cells.extend(
        (1..=days)
            .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day))
            .map(|date| DayCell::new(Some(date))),
    );

    MonthLayout { year, month, cells }
}

/// Marks selection, today and per-day event indicators on `layout`.
pub fn decorate<R: SnapshotRepository>(
    mut layout: MonthLayout,
    store: &EventStore<R>,
    selected: NaiveDate,
    today: NaiveDate,
) -> MonthLayout {
    for cell in layout.cells.iter_mut() {
        let Some(date) = cell.date else { continue };
        let events = store.events_on(DateKey::from(date));

        cell.is_selected = date == selected;
        cell.is_today = date == today;
        cell.event_count = events.len();
        cell.indicators = events
            .iter()
            .take(MAX_INDICATORS)
            .map(|e| e.color.clone())
            .collect();
    }
    layout
}

pub fn calculate_layout(state: &AppState) -> MonthLayout {
    let today = Local::now().date_naive();
    decorate(
        month_grid(state.current_month),
        &state.store,
        state.selected_date,
        today,
    )
}
