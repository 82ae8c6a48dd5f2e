use crate::error::GenerateError;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A calendar event as the storage layer hands it over.
///
/// A master carries `is_recurring`, the `rule` text and its `exception_dates`.
/// Occurrences built from it carry `recurrence_id` and `recurrence_master_id`
/// instead and are never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub color: Option<String>,

    pub start_date: NaiveDate,
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub is_all_day: bool,

    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub rule: Option<String>,
    #[serde(default)]
    pub recurrence_id: Option<String>,
    #[serde(default)]
    pub recurrence_master_id: Option<String>,
    #[serde(default)]
    pub exception_dates: BTreeSet<NaiveDate>,
}

impl Event {
    pub fn new(title: impl Into<String>, start_date: NaiveDate) -> Self {
        Event {
            id: None,
            title: title.into(),
            description: None,
            category: None,
            color: None,
            start_date,
            start_time: None,
            end_date: None,
            end_time: None,
            is_all_day: false,
            is_recurring: false,
            rule: None,
            recurrence_id: None,
            recurrence_master_id: None,
            exception_dates: BTreeSet::new(),
        }
    }

    /// The occurrence of `master` on `date`, keeping the master's length in days.
    pub fn occurrence(master: &Event, date: NaiveDate) -> Result<Event, GenerateError> {
        let end_date = match master.end_date {
            Some(end) => {
                let length = end.signed_duration_since(master.start_date);
                Some(
                    date.checked_add_signed(length)
                        .ok_or(GenerateError::DateOverflow)?,
                )
            }
            None => None,
        };

        let recurrence_id = master
            .id
            .as_ref()
            .map(|id| format!("{}_{}", id, date.format("%Y%m%d")));

        Ok(Event {
            id: None,
            title: master.title.clone(),
            description: master.description.clone(),
            category: master.category.clone(),
            color: master.color.clone(),
            start_date: date,
            start_time: master.start_time,
            end_date,
            end_time: master.end_time,
            is_all_day: master.is_all_day,
            is_recurring: false,
            rule: None,
            recurrence_id,
            recurrence_master_id: master.id.clone(),
            exception_dates: BTreeSet::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{test_helpers::*, Generator};

    fn master() -> Event {
        Event {
            id: Some("42".into()),
            description: Some("Planning".into()),
            category: Some("work".into()),
            color: Some("#3366ff".into()),
            start_time: NaiveTime::from_hms_opt(23, 0, 0),
            end_date: Some(ymd(2024, 1, 2)),
            end_time: NaiveTime::from_hms_opt(1, 0, 0),
            is_recurring: true,
            rule: Some("RRULE:FREQ=WEEKLY;BYDAY=MO,WE".into()),
            exception_dates: BTreeSet::from([ymd(2024, 1, 8)]),
            ..Event::new("Standup", new_years_day())
        }
    }

    #[test]
    fn occurrence_copies_master() {
        let occurrence = Event::occurrence(&master(), ymd(2024, 1, 31)).unwrap();

        assert_eq!(occurrence.id, None);
        assert_eq!(occurrence.title, "Standup");
        assert_eq!(occurrence.description.as_deref(), Some("Planning"));
        assert_eq!(occurrence.category.as_deref(), Some("work"));
        assert_eq!(occurrence.color.as_deref(), Some("#3366ff"));
        assert_eq!(occurrence.start_date, ymd(2024, 1, 31));
        assert_eq!(occurrence.end_date, Some(ymd(2024, 2, 1)));
        assert_eq!(occurrence.start_time, NaiveTime::from_hms_opt(23, 0, 0));
        assert_eq!(occurrence.end_time, NaiveTime::from_hms_opt(1, 0, 0));
        assert!(!occurrence.is_recurring);
        assert_eq!(occurrence.rule, None);
        assert_eq!(occurrence.recurrence_id.as_deref(), Some("42_20240131"));
        assert_eq!(occurrence.recurrence_master_id.as_deref(), Some("42"));
        assert!(occurrence.exception_dates.is_empty());
    }

    #[test]
    fn unsaved_master_has_no_recurrence_id() {
        let unsaved = Event {
            id: None,
            ..master()
        };
        let occurrence = Event::occurrence(&unsaved, ymd(2024, 1, 3)).unwrap();

        assert_eq!(occurrence.recurrence_id, None);
        assert_eq!(occurrence.recurrence_master_id, None);
        assert_eq!(occurrence.start_date, ymd(2024, 1, 3));
    }

    #[test]
    fn expands_master() {
        let occurrences =
            Generator::default().expand_event(&master(), new_years_day(), ymd(2024, 1, 14));

        let starts: Vec<_> = occurrences.iter().map(|e| e.start_date).collect();
        assert_eq!(starts, dates_in(2024, &[(1, 1), (1, 3), (1, 10)]));
        assert!(occurrences
            .iter()
            .all(|e| e.recurrence_master_id.as_deref() == Some("42")));
    }

    #[test]
    fn non_recurring_master_has_no_occurrences() {
        let single = Event {
            is_recurring: false,
            ..master()
        };
        assert!(Generator::default()
            .expand_event(&single, new_years_day(), ymd(2024, 12, 31))
            .is_empty());

        let ruleless = Event {
            rule: None,
            ..master()
        };
        assert!(Generator::default()
            .expand_event(&ruleless, new_years_day(), ymd(2024, 12, 31))
            .is_empty());
    }

    #[test]
    fn malformed_master_rule() {
        let broken = Event {
            rule: Some("INTERVAL=2".into()),
            ..master()
        };
        assert_eq!(
            Generator::default().try_expand_event(&broken, new_years_day(), ymd(2024, 12, 31)),
            Err(GenerateError::Parse(crate::ParseError::MissingFrequency))
        );
        assert!(Generator::default()
            .expand_event(&broken, new_years_day(), ymd(2024, 12, 31))
            .is_empty());
    }

    #[test]
    fn storage_json() {
        let json = r#"{
            "id": "7",
            "title": "Review",
            "startDate": "2024-03-01",
            "isRecurring": true,
            "rule": "FREQ=MONTHLY",
            "exceptionDates": ["2024-04-01"]
        }"#;
        let event: Event = serde_json::from_str(json).unwrap();

        assert_eq!(event.start_date, ymd(2024, 3, 1));
        assert!(event.exception_dates.contains(&ymd(2024, 4, 1)));

        let occurrences =
            Generator::default().expand_event(&event, ymd(2024, 3, 1), ymd(2024, 5, 31));
        let starts: Vec<_> = occurrences.iter().map(|e| e.start_date).collect();
        assert_eq!(starts, dates_in(2024, &[(3, 1), (5, 1)]));
    }
}
