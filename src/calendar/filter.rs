use crate::calendar::Event;

/// Events of one day after keyword filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredEvents<'a> {
    pub matches: Vec<&'a Event>,
    pub total: usize,
}

impl FilteredEvents<'_> {
    pub fn is_day_empty(&self) -> bool {
        self.total == 0
    }

    pub fn nothing_matches(&self) -> bool {
        self.total > 0 && self.matches.is_empty()
    }

    pub fn empty_message(&self) -> Option<&'static str> {
        if self.is_day_empty() {
            Some("No events scheduled for this day.")
        } else if self.nothing_matches() {
            Some("No events match your filter.")
        } else {
            None
        }
    }
}

pub fn matches_keyword(event: &Event, keyword: &str) -> bool {
    let needle = keyword.to_lowercase();
    event.title.to_lowercase().contains(&needle)
        || event
            .description
            .as_ref()
            .is_some_and(|d| d.to_lowercase().contains(&needle))
}

pub fn filter_events<'a>(events: &'a [Event], keyword: &str) -> FilteredEvents<'a> {
    FilteredEvents {
        matches: events.iter().filter(|e| matches_keyword(e, keyword)).collect(),
        total: events.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::EventColor;
    use pretty_assertions::assert_eq;

    fn event(id: &str, title: &str, description: Option<&str>) -> Event {
        Event {
            id: id.to_string(),
            title: title.to_string(),
            description: description.map(String::from),
            color: EventColor::Yellow,
            start_time: "09:00".parse().unwrap(),
            end_time: "10:00".parse().unwrap(),
        }
    }

    fn ids(filtered: &FilteredEvents<'_>) -> Vec<String> {
        filtered.matches.iter().map(|e| e.id.clone()).collect()
    }

    #[test]
    fn empty_keyword_returns_everything_in_order() {
        let events = vec![
            event("3", "Lunch", None),
            event("1", "Standup", None),
            event("2", "Review", Some("PR backlog")),
        ];

        let filtered = filter_events(&events, "");

        assert_eq!(ids(&filtered), vec!["3", "1", "2"]);
        assert_eq!(filtered.empty_message(), None);
    }

    #[test]
    fn matches_title_case_insensitively() {
        let events = vec![event("1", "Team STANDUP", None), event("2", "Lunch", None)];

        let filtered = filter_events(&events, "standup");

        assert_eq!(ids(&filtered), vec!["1"]);
    }

    #[test]
    fn matches_description() {
        let events = vec![
            event("1", "Sync", Some("Quarterly Planning")),
            event("2", "Gym", None),
        ];

        let filtered = filter_events(&events, "planning");

        assert_eq!(ids(&filtered), vec!["1"]);
    }

    #[test]
    fn no_match_is_distinct_from_empty_day() {
        let events = vec![event("1", "Standup", None)];

        let no_match = filter_events(&events, "dentist");
        let empty_day = filter_events(&[], "dentist");

        assert!(no_match.nothing_matches());
        assert!(!no_match.is_day_empty());
        assert_eq!(no_match.total, 1);
        assert_eq!(no_match.empty_message(), Some("No events match your filter."));

        assert!(empty_day.is_day_empty());
        assert!(!empty_day.nothing_matches());
        assert_eq!(empty_day.empty_message(), Some("No events scheduled for this day."));
    }
}
