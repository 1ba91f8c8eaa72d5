use chrono::NaiveDate;

use crate::app::{AppState, FormField};
use crate::ui::agenda::format_event_line;

#[derive(Debug, PartialEq)]
pub enum Command {
    Quit,
    NextMonth,
    PreviousMonth,
    Today,
    Goto(NaiveDate),
    SelectDay(u32),
    Filter(String),
    NewEvent(Option<String>),
    EditEvent(String),
    DeleteEvent(String),
    SetField(FormField, String),
    Save,
    Cancel,
    Help,
    Error(String),
}

#[derive(Debug, PartialEq)]
pub enum Outcome {
    Continue(Option<String>),
    Quit,
}

pub const HELP_TEXT: &str = "\
:next | :prev          change month
:today                 jump to today
:goto YYYY-MM-DD       select a date
:day N                 select day N of the shown month
:filter [keyword]      filter the day's events (empty clears)
:new [title]           open the add form
:edit <id>             open the edit form
:delete <id>           delete an event
:set <field> <value>   title, description, color, start, end
:save | :cancel        submit or discard the form
:q                     quit";

pub fn parse_command(input: &str) -> Command {
    let trimmed = input.trim();

    let Some(command_text) = trimmed.strip_prefix(':') else {
        return Command::Error("Commands must start with ':'".to_string());
    };

    let parts: Vec<&str> = command_text.split_whitespace().collect();
    if parts.is_empty() {
        return Command::Error("Empty command".to_string());
    }
    let rest = || parts[1..].join(" ");

    match parts[0] {
        "q" | "quit" => Command::Quit,
        "next" | "n" => Command::NextMonth,
        "prev" | "p" => Command::PreviousMonth,
        "today" | "t" => Command::Today,
        "help" => Command::Help,
        "goto" => {
            if parts.len() < 2 {
                Command::Error("goto requires a date argument".to_string())
            } else if let Ok(date) = NaiveDate::parse_from_str(parts[1], "%Y-%m-%d") {
                Command::Goto(date)
            } else {
                Command::Error(format!("Invalid date format: {}", parts[1]))
            }
        }
        "day" => match parts.get(1).map(|d| d.parse::<u32>()) {
            Some(Ok(day)) => Command::SelectDay(day),
            Some(Err(_)) => Command::Error(format!("Invalid day: {}", parts[1])),
            None => Command::Error("day requires a day number".to_string()),
        },
        "filter" | "f" => Command::Filter(rest()),
        "new" | "add" => {
            if parts.len() < 2 {
                Command::NewEvent(None)
            } else {
                Command::NewEvent(Some(rest()))
            }
        }
        "edit" => match parts.get(1) {
            Some(id) => Command::EditEvent(id.to_string()),
            None => Command::Error("edit requires an event id".to_string()),
        },
        "delete" | "del" => match parts.get(1) {
            Some(id) => Command::DeleteEvent(id.to_string()),
            None => Command::Error("delete requires an event id".to_string()),
        },
        "set" => match parts.get(1).map(|f| (f, FormField::parse(f))) {
            Some((_, Some(field))) => Command::SetField(field, parts[2..].join(" ")),
            Some((name, None)) => Command::Error(format!("Unknown field: {}", name)),
            None => Command::Error("set requires a field name".to_string()),
        },
        "save" | "w" => Command::Save,
        "cancel" => Command::Cancel,
        _ => Command::Error(format!("Unknown command: {}", parts[0])),
    }
}

pub fn execute(command: Command, state: &mut AppState) -> Outcome {
    let message = match command {
        Command::Quit => return Outcome::Quit,
        Command::NextMonth => {
            state.next_month();
            None
        }
        Command::PreviousMonth => {
            state.previous_month();
            None
        }
        Command::Today => {
            state.jump_to_today();
            None
        }
        Command::Goto(date) => {
            state.goto(date);
            None
        }
        Command::SelectDay(day) => {
            if state.select_day_of_month(day) {
                None
            } else {
                Some(format!("No day {} in this month", day))
            }
        }
        Command::Filter(keyword) => {
            state.set_filter(keyword);
            None
        }
        Command::NewEvent(title) => {
            state.open_new_event_form(title);
            None
        }
        Command::EditEvent(id) => state.open_edit_event_form(&id).err().map(|e| e.to_string()),
        Command::DeleteEvent(id) => match state.delete_event(&id) {
            Ok(removed) => Some(format!("Deleted {}", format_event_line(&removed))),
            Err(e) => Some(e.to_string()),
        },
        Command::SetField(field, value) => match state.event_form.as_mut() {
            Some(form) => {
                form.set_field(field, &value);
                None
            }
            None => Some("No event form is open; use :new or :edit first".to_string()),
        },
        // Rejections are shown inside the form itself.
        Command::Save => match state.submit_form() {
            Ok(event) => Some(format!("Saved {}", format_event_line(&event))),
            Err(_) => None,
        },
        Command::Cancel => {
            state.cancel_form();
            None
        }
        Command::Help => Some(HELP_TEXT.to_string()),
        Command::Error(message) => Some(message),
    };

    Outcome::Continue(message)
}
