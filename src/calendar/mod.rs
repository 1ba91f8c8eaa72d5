pub mod date_key;
pub mod event;
pub mod filter;
pub mod overlap;
pub mod store;

pub use date_key::{DateKey, DateKeyError};
pub use event::{Event, EventColor, NewEvent, TimeOfDay, TimeParseError};
pub use overlap::{Candidate, ScheduleError};
pub use store::{EventStore, StoreError};
