use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid time '{0}', expected HH:MM")]
pub struct TimeParseError(pub String);

/// Wall-clock time of day with minute precision, encoded as zero-padded `HH:MM`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn minutes_until(&self, later: TimeOfDay) -> i64 {
        (later.0 - self.0).num_minutes()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        NaiveTime::parse_from_str(trimmed, "%H:%M")
            .map(Self)
            .map_err(|_| TimeParseError(trimmed.to_string()))
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventColor {
    #[default]
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    /// Anything outside the palette; kept as-is so it survives a save.
    Other(String),
}

impl EventColor {
    pub const PALETTE: [EventColor; 5] = [
        EventColor::Red,
        EventColor::Blue,
        EventColor::Green,
        EventColor::Yellow,
        EventColor::Purple,
    ];

    pub fn name(&self) -> &str {
        match self {
            EventColor::Red => "red",
            EventColor::Blue => "blue",
            EventColor::Green => "green",
            EventColor::Yellow => "yellow",
            EventColor::Purple => "purple",
            EventColor::Other(raw) => raw,
        }
    }

    pub fn is_palette(&self) -> bool {
        !matches!(self, EventColor::Other(_))
    }
}

impl From<String> for EventColor {
    fn from(raw: String) -> Self {
        // Older snapshots stored the Tailwind class (`bg-red-500`) instead of the name.
        let name = raw
            .strip_prefix("bg-")
            .and_then(|rest| rest.strip_suffix("-500"))
            .unwrap_or(&raw);

        match name.to_lowercase().as_str() {
            "red" => EventColor::Red,
            "blue" => EventColor::Blue,
            "green" => EventColor::Green,
            "yellow" => EventColor::Yellow,
            "purple" => EventColor::Purple,
            _ => EventColor::Other(raw),
        }
    }
}

impl From<EventColor> for String {
    fn from(color: EventColor) -> Self {
        match color {
            EventColor::Other(raw) => raw,
            palette => palette.name().to_string(),
        }
    }
}

impl fmt::Display for EventColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub color: EventColor,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
}

/// Event data before the store has assigned an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub color: EventColor,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
}

impl NewEvent {
    pub fn with_id(self, id: String) -> Event {
        Event {
            id,
            title: self.title,
            description: self.description,
            color: self.color,
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }
}

impl Event {
    pub fn duration_minutes(&self) -> i64 {
        self.start_time.minutes_until(self.end_time)
    }

    pub fn overlaps(&self, other: &Event) -> bool {
        self.start_time < other.end_time && other.start_time < self.end_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn time(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    fn create_test_event(id: &str, title: &str, start: &str, end: &str) -> Event {
        Event {
            id: id.to_string(),
            title: title.to_string(),
            description: None,
            color: EventColor::Blue,
            start_time: time(start),
            end_time: time(end),
        }
    }

    #[test]
    fn time_of_day_displays_zero_padded() {
        assert_eq!(TimeOfDay::new(9, 5).unwrap().to_string(), "09:05");
    }

    #[test]
    fn time_of_day_rejects_out_of_range_values() {
        assert!("24:00".parse::<TimeOfDay>().is_err());
        assert!("12:60".parse::<TimeOfDay>().is_err());
        assert!("noon".parse::<TimeOfDay>().is_err());
    }

    #[test]
    fn time_of_day_ordering_matches_string_ordering() {
        let pairs = [("09:00", "09:30"), ("09:59", "10:00"), ("00:00", "23:59")];
        for (a, b) in pairs {
            assert!(time(a) < time(b));
            assert!(a < b);
        }
    }

    #[test]
    fn event_duration_calculated_correctly() {
        let event = create_test_event("e1", "Meeting", "09:00", "10:30");

        assert_eq!(event.duration_minutes(), 90);
    }

    #[test]
    fn event_overlaps_with_another_event() {
        let first = create_test_event("e1", "Event 1", "09:00", "11:00");
        let second = create_test_event("e2", "Event 2", "10:00", "12:00");

        assert!(first.overlaps(&second));
    }

    #[test]
    fn event_does_not_overlap_when_adjacent() {
        let first = create_test_event("e1", "Event 1", "09:00", "10:00");
        let second = create_test_event("e2", "Event 2", "10:00", "11:00");

        assert!(!first.overlaps(&second));
    }

    #[test]
    fn event_serializes_with_camel_case_fields() {
        let event = create_test_event("e1", "Standup", "09:00", "09:30");

        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "id": "e1",
                "title": "Standup",
                "color": "blue",
                "startTime": "09:00",
                "endTime": "09:30",
            })
        );
    }

    #[test]
    fn legacy_tailwind_color_is_read_as_palette_color() {
        let json = r#"{"id":"1","title":"Gym","description":"","color":"bg-purple-500","startTime":"18:00","endTime":"19:00"}"#;

        let event: Event = serde_json::from_str(json).unwrap();

        assert_eq!(event.color, EventColor::Purple);
        assert_eq!(event.description.as_deref(), Some(""));
    }

    #[test]
    fn unknown_color_survives_round_trip() {
        let color = EventColor::from("teal".to_string());

        assert_eq!(color, EventColor::Other("teal".to_string()));
        assert!(!color.is_palette());
        assert_eq!(String::from(color), "teal");
    }
}
