pub mod calendar;
pub mod input;
pub mod ui;
pub mod storage;
pub mod app;

pub use calendar::{DateKey, Event, EventColor, NewEvent, TimeOfDay};
pub use app::{AppState, EventForm, FormError};
