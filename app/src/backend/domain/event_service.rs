//! Calendar event domain logic for the v2 schema.
//!
//! Events keep their timestamps as strings in the persisted document;
//! everything that computes with them parses through
//! [`ParsedEvent`](crate::backend::domain::models::event::ParsedEvent) so a
//! malformed timestamp can never reach the store.

use anyhow::{bail, Result};
use log::{info, warn};
use shared::{AppStateV2, CalendarEvent};
use uuid::Uuid;

use crate::backend::domain::commands::events::{
    AddEventCommand, AddEventResult, DeleteEventCommand, DeleteEventResult,
};
use crate::backend::domain::models::event::{parse_instant, ParsedEvent};

/// Service for calendar events
#[derive(Clone)]
pub struct EventService;

impl EventService {
    /// Create a new EventService instance
    pub fn new() -> Self {
        Self
    }

    /// Add a calendar event, validating its timestamps before anything is stored
    pub fn add_event(
        &self,
        state: &mut AppStateV2,
        command: AddEventCommand,
    ) -> Result<AddEventResult> {
        let title = command.title.trim().to_string();
        if title.is_empty() {
            bail!("Event title cannot be empty");
        }

        let end_iso = command
            .end_iso
            .filter(|raw| !raw.trim().is_empty());

        let event = CalendarEvent {
            id: format!("event::{}", Uuid::new_v4()),
            category_id: command.category_id,
            title,
            start_iso: command.start_iso,
            end_iso,
            remind_minutes: command.remind_minutes,
            notes: command.notes,
        };

        // Rejects malformed startISO/endISO before the event is stored
        ParsedEvent::from_dto(&event)?;

        state.events.push(event.clone());
        Self::sort_by_start(&mut state.events);

        info!(
            "📅 EVENTS: Added '{}' starting {}",
            event.title, event.start_iso
        );
        Ok(AddEventResult { event })
    }

    /// Delete an event by id
    pub fn delete_event(
        &self,
        state: &mut AppStateV2,
        command: DeleteEventCommand,
    ) -> Result<DeleteEventResult> {
        let before = state.events.len();
        state.events.retain(|event| event.id != command.event_id);
        let deleted = state.events.len() < before;

        if deleted {
            info!("📅 EVENTS: Deleted event {}", command.event_id);
        }
        Ok(DeleteEventResult { deleted })
    }

    /// A copy of the events ordered by start time, for presentation.
    /// Imported events with unparsable timestamps sort last.
    pub fn events_sorted(&self, events: &[CalendarEvent]) -> Vec<CalendarEvent> {
        let mut sorted = events.to_vec();
        Self::sort_by_start(&mut sorted);
        sorted
    }

    fn sort_by_start(events: &mut [CalendarEvent]) {
        events.sort_by_cached_key(|event| {
            parse_instant(&event.start_iso)
                .map(|instant| instant.timestamp_millis())
                .unwrap_or(i64::MAX)
        });
    }

    /// Parse every event, dropping (with a warning) the ones whose
    /// timestamps no longer parse; imported documents are not re-validated
    /// record by record.
    pub fn parsed_events(&self, events: &[CalendarEvent]) -> Vec<ParsedEvent> {
        events
            .iter()
            .filter_map(|event| match ParsedEvent::from_dto(event) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    warn!("Skipping event {} with invalid timestamp: {}", event.id, e);
                    None
                }
            })
            .collect()
    }
}

impl Default for EventService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_state() -> AppStateV2 {
        AppStateV2 {
            categories: Vec::new(),
            events: Vec::new(),
            tasks: Default::default(),
        }
    }

    fn add_command(title: &str, start_iso: &str) -> AddEventCommand {
        AddEventCommand {
            category_id: "category::framing".to_string(),
            title: title.to_string(),
            start_iso: start_iso.to_string(),
            end_iso: None,
            remind_minutes: None,
            notes: String::new(),
        }
    }

    #[test]
    fn add_event_assigns_id_and_keeps_list_sorted() {
        let service = EventService::new();
        let mut state = empty_state();

        service
            .add_event(&mut state, add_command("Later", "2026-04-01T09:00:00Z"))
            .unwrap();
        let result = service
            .add_event(&mut state, add_command("Earlier", "2026-03-01T09:00:00Z"))
            .unwrap();

        assert!(result.event.id.starts_with("event::"));
        assert_eq!(state.events[0].title, "Earlier");
        assert_eq!(state.events[1].title, "Later");
    }

    #[test]
    fn add_event_rejects_invalid_timestamps_without_storing() {
        let service = EventService::new();
        let mut state = empty_state();

        let result = service.add_event(&mut state, add_command("Bad", "not a date"));
        assert!(result.is_err());
        assert!(state.events.is_empty());
    }

    #[test]
    fn delete_event_reports_whether_anything_was_removed() {
        let service = EventService::new();
        let mut state = empty_state();
        let added = service
            .add_event(&mut state, add_command("Inspection", "2026-03-01T09:00:00Z"))
            .unwrap();

        let result = service
            .delete_event(
                &mut state,
                DeleteEventCommand {
                    event_id: added.event.id.clone(),
                },
            )
            .unwrap();
        assert!(result.deleted);
        assert!(state.events.is_empty());

        let result = service
            .delete_event(
                &mut state,
                DeleteEventCommand {
                    event_id: added.event.id,
                },
            )
            .unwrap();
        assert!(!result.deleted);
    }

    #[test]
    fn parsed_events_drops_unparsable_records() {
        let service = EventService::new();
        let events = vec![
            CalendarEvent {
                id: "event::good".to_string(),
                category_id: "category::1".to_string(),
                title: "Good".to_string(),
                start_iso: "2026-03-01T09:00:00Z".to_string(),
                end_iso: None,
                remind_minutes: Some(15),
                notes: String::new(),
            },
            CalendarEvent {
                id: "event::bad".to_string(),
                category_id: "category::1".to_string(),
                title: "Bad".to_string(),
                start_iso: "whenever".to_string(),
                end_iso: None,
                remind_minutes: Some(15),
                notes: String::new(),
            },
        ];

        let parsed = service.parsed_events(&events);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].id, "event::good");
    }
}
