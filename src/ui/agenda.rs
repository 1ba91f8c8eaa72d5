use chrono::{Datelike, NaiveDate};

use crate::app::{AppState, EventForm};
use crate::calendar::filter::FilteredEvents;
use crate::calendar::{Event, EventColor};
use crate::ui::month_view::{calculate_layout, DayCell, MonthLayout};

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub fn render_month(layout: &MonthLayout) -> String {
    let month_name = NaiveDate::from_ymd_opt(layout.year, layout.month, 1)
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_else(|| format!("{}-{:02}", layout.year, layout.month));

    let mut lines = vec![month_name, String::new()];
    lines.push(
        WEEKDAYS
            .iter()
            .map(|d| format!(" {:<4}", d))
            .collect::<String>()
            .trim_end()
            .to_string(),
    );

    for week in layout.weeks() {
        let row: String = week.iter().map(render_cell).collect();
        lines.push(row.trim_end().to_string());
    }

    lines.join("\n")
}

// Five columns per cell: selection bracket, day number, event marker.
fn render_cell(cell: &DayCell) -> String {
    let Some(date) = cell.date else {
        return "     ".to_string();
    };

    let (open, close) = match (cell.is_selected, cell.is_today) {
        (true, _) => ('[', ']'),
        (false, true) => ('(', ')'),
        _ => (' ', ' '),
    };
    let marker = match cell.event_count {
        0 => ' ',
        n if n > 3 => '+',
        _ => '*',
    };

    format!("{}{:>2}{}{}", open, date.day(), close, marker)
}

pub fn format_event_line(event: &Event) -> String {
    let mut line = format!(
        "{}-{}  {}  [{}]",
        event.start_time, event.end_time, event.title, event.color
    );
    if let Some(description) = event.description.as_deref().filter(|d| !d.is_empty()) {
        line.push_str(&format!(" - {}", description));
    }
    line.push_str(&format!("  ({})", event.id));
    line
}

pub fn render_day(date: NaiveDate, filter_keyword: &str, visible: &FilteredEvents<'_>) -> String {
    let mut lines = vec![format!("Events for {}", date.format("%A, %B %-d, %Y"))];
    if !filter_keyword.is_empty() {
        lines.push(format!(
            "Filter: \"{}\" ({} of {})",
            filter_keyword,
            visible.matches.len(),
            visible.total
        ));
    }
    lines.push(String::new());

    match visible.empty_message() {
        Some(message) => lines.push(message.to_string()),
        None => lines.extend(visible.matches.iter().map(|e| format!("- {}", format_event_line(e)))),
    }

    lines.join("\n")
}

pub fn render_form(form: &EventForm) -> String {
    let heading = if form.is_editing() { "Edit event" } else { "Add event" };
    let mut lines = vec![
        format!("{} for {}", heading, form.date.date().format("%b %-d, %Y")),
        format!("  title:       {}", form.title),
        format!("  description: {}", form.description),
        format!("  start:       {}", form.start_time),
        format!("  end:         {}", form.end_time),
        format!("  color:       {} ({})", form.color, palette_hint()),
    ];
    if let Some(error) = &form.error {
        lines.push(format!("  ! {}", error));
    }
    lines.push("  :set <field> <value> | :save | :cancel".to_string());
    lines.join("\n")
}

fn palette_hint() -> String {
    EventColor::PALETTE
        .iter()
        .map(EventColor::name)
        .collect::<Vec<_>>()
        .join("|")
}

/// Full screen for the interactive loop: grid, the selected day, and any open form.
pub fn render_screen(state: &AppState) -> String {
    let mut sections = vec![
        render_month(&calculate_layout(state)),
        render_day(state.selected_date, &state.filter_keyword, &state.visible_events()),
    ];
    if let Some(form) = &state.event_form {
        sections.push(render_form(form));
    }
    sections.join("\n\n")
}
