use chrono::{Datelike, Local, Months, NaiveDate};
use thiserror::Error;

use crate::calendar::filter::{filter_events, FilteredEvents};
use crate::calendar::overlap::{validate, Candidate, ScheduleError};
use crate::calendar::store::{EventStore, StoreError};
use crate::calendar::{DateKey, Event, EventColor, NewEvent, TimeOfDay, TimeParseError};
use crate::storage::config::FormConfig;
use crate::storage::repository::SnapshotRepository;

pub type Store = EventStore<Box<dyn SnapshotRepository>>;

#[derive(Debug, Error)]
pub enum FormError {
    #[error("No event form is open.")]
    NoOpenForm,
    #[error("Title is required.")]
    MissingTitle,
    #[error(transparent)]
    InvalidTime(#[from] TimeParseError),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    Color,
    StartTime,
    EndTime,
}

impl FormField {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "title" => Some(FormField::Title),
            "description" | "desc" => Some(FormField::Description),
            "color" | "colour" => Some(FormField::Color),
            "start" => Some(FormField::StartTime),
            "end" => Some(FormField::EndTime),
            _ => None,
        }
    }
}

/// Pending add/edit. Times stay as typed until the form is submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct EventForm {
    /// Day the form was opened for; the commit goes there whatever is selected later.
    pub date: DateKey,
    pub title: String,
    pub description: String,
    pub color: EventColor,
    pub start_time: String,
    pub end_time: String,
    pub event_id: Option<String>,
    pub error: Option<String>,
}

impl EventForm {
    pub fn new(date: DateKey, defaults: &FormConfig, title: String) -> Self {
        Self {
            date,
            title,
            description: String::new(),
            color: EventColor::default(),
            start_time: defaults.default_start.to_string(),
            end_time: defaults.default_end.to_string(),
            event_id: None,
            error: None,
        }
    }

    pub fn for_event(date: DateKey, event: &Event) -> Self {
        Self {
            date,
            title: event.title.clone(),
            description: event.description.clone().unwrap_or_default(),
            color: event.color.clone(),
            start_time: event.start_time.to_string(),
            end_time: event.end_time.to_string(),
            event_id: Some(event.id.clone()),
            error: None,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.event_id.is_some()
    }

    pub fn set_field(&mut self, field: FormField, value: &str) {
        match field {
            FormField::Title => self.title = value.to_string(),
            FormField::Description => self.description = value.to_string(),
            FormField::Color => self.color = EventColor::from(value.to_string()),
            FormField::StartTime => self.start_time = value.to_string(),
            FormField::EndTime => self.end_time = value.to_string(),
        }
    }
}

pub struct AppState {
    pub current_month: NaiveDate,
    pub selected_date: NaiveDate,
    pub filter_keyword: String,
    pub event_form: Option<EventForm>,
    pub form_defaults: FormConfig,
    pub store: Store,
}

impl AppState {
    pub fn new(store: Store, form_defaults: FormConfig) -> Self {
        let today = Local::now().date_naive();
        Self {
            current_month: today,
            selected_date: today,
            filter_keyword: String::new(),
            event_form: None,
            form_defaults,
            store,
        }
    }

    pub fn selected_key(&self) -> DateKey {
        DateKey::from(self.selected_date)
    }

    pub fn events_for_selected_date(&self) -> &[Event] {
        self.store.events_on(self.selected_key())
    }

    pub fn visible_events(&self) -> FilteredEvents<'_> {
        filter_events(self.events_for_selected_date(), &self.filter_keyword)
    }

    pub fn set_filter(&mut self, keyword: impl Into<String>) {
        self.filter_keyword = keyword.into();
    }

    pub fn next_month(&mut self) {
        if let Some(date) = first_of_month(self.current_month).checked_add_months(Months::new(1)) {
            self.current_month = date;
        }
    }

    pub fn previous_month(&mut self) {
        if let Some(date) = first_of_month(self.current_month).checked_sub_months(Months::new(1)) {
            self.current_month = date;
        }
    }

    pub fn select_date(&mut self, date: NaiveDate) {
        self.selected_date = date;
    }

    /// Selects `day` of the displayed month; returns false when the month has no such day.
    pub fn select_day_of_month(&mut self, day: u32) -> bool {
        match self.current_month.with_day(day) {
            Some(date) => {
                self.selected_date = date;
                true
            }
            None => false,
        }
    }

    pub fn goto(&mut self, date: NaiveDate) {
        self.current_month = date;
        self.selected_date = date;
    }

    pub fn jump_to_today(&mut self) {
        self.goto(Local::now().date_naive());
    }

    pub fn open_new_event_form(&mut self, title: Option<String>) {
        let date = self.selected_key();
        self.event_form = Some(EventForm::new(date, &self.form_defaults, title.unwrap_or_default()));
    }

    pub fn open_edit_event_form(&mut self, event_id: &str) -> Result<(), StoreError> {
        let date = self.selected_key();
        let Some(event) = self.store.find(date, event_id) else {
            return Err(StoreError::NotFound { date, id: event_id.to_string() });
        };
        self.event_form = Some(EventForm::for_event(date, event));
        Ok(())
    }

    /// Drops the open form without touching the store.
    pub fn cancel_form(&mut self) {
        self.event_form = None;
    }

    /// Validates and commits the open form. On failure the form stays open with `error` set.
    pub fn submit_form(&mut self) -> Result<Event, FormError> {
        let result = match self.event_form.as_ref() {
            Some(form) => commit_form(form, &mut self.store),
            None => return Err(FormError::NoOpenForm),
        };

        match result {
            Ok(event) => {
                self.event_form = None;
                Ok(event)
            }
            Err(err) => {
                tracing::info!("Event form rejected: {}", err);
                if let Some(form) = self.event_form.as_mut() {
                    form.error = Some(err.to_string());
                }
                Err(err)
            }
        }
    }

    pub fn delete_event(&mut self, event_id: &str) -> Result<Event, StoreError> {
        let date = self.selected_key();
        self.store.delete_event(date, event_id)
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn commit_form(form: &EventForm, store: &mut Store) -> Result<Event, FormError> {
    let date = form.date;
    let title = form.title.trim();
    if title.is_empty() {
        return Err(FormError::MissingTitle);
    }

    let start_time: TimeOfDay = form.start_time.parse()?;
    let end_time: TimeOfDay = form.end_time.parse()?;
    let description = (!form.description.is_empty()).then(|| form.description.clone());

    match &form.event_id {
        Some(id) => {
            let others: Vec<Event> = store
                .events_on(date)
                .iter()
                .filter(|e| &e.id != id)
                .cloned()
                .collect();
            validate(start_time, end_time, &others, Candidate::Edit)?;

            let updated = Event {
                id: id.clone(),
                title: title.to_string(),
                description,
                color: form.color.clone(),
                start_time,
                end_time,
            };
            store.edit_event(date, updated.clone())?;
            Ok(updated)
        }
        None => {
            validate(start_time, end_time, store.events_on(date), Candidate::New)?;

            let new_event = NewEvent {
                title: title.to_string(),
                description,
                color: form.color.clone(),
                start_time,
                end_time,
            };
            Ok(store.add_event(date, new_event)?)
        }
    }
}
