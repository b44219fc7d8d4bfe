//! # Backend Module
//!
//! Synchronous domain services and storage for the tracker. The backend
//! knows nothing about presentation: it takes commands, mutates documents,
//! talks to the stores, and arms reminders.

use anyhow::Result;
use log::warn;
use std::path::PathBuf;
use std::sync::Arc;

pub mod domain;
pub mod storage;

pub use storage::json::JsonConnection;

/// Main backend struct that orchestrates all services
pub struct Backend {
    pub budget_service: domain::BudgetService,
    pub category_service: domain::CategoryService,
    pub task_service: domain::TaskService,
    pub event_service: domain::EventService,
    pub document_service: domain::DocumentService,
    /// None when the attachment store failed to open; every other feature
    /// keeps working without it
    pub attachment_service: Option<domain::AttachmentService>,
    pub reminder_scheduler: domain::ReminderScheduler,
}

impl Backend {
    /// Create a backend rooted at the default data directory
    pub fn new() -> Result<Self> {
        Self::with_data_directory(JsonConnection::default_location()?)
    }

    /// Create a backend rooted at an explicit data directory
    pub fn with_data_directory(path: impl Into<PathBuf>) -> Result<Self> {
        let connection = Arc::new(JsonConnection::new(path)?);
        Self::with_connection(
            connection,
            Arc::new(domain::SystemClock),
            Arc::new(domain::LogNotifier),
        )
    }

    /// Full wiring with an injectable clock and notifier (used by tests)
    pub fn with_connection(
        connection: Arc<JsonConnection>,
        clock: Arc<dyn domain::Clock>,
        notifier: Arc<dyn domain::Notifier>,
    ) -> Result<Self> {
        let attachment_service = match domain::AttachmentService::new(connection.clone()) {
            Ok(service) => Some(service),
            Err(e) => {
                warn!(
                    "Attachment store unavailable, disabling attachment features: {}",
                    e
                );
                None
            }
        };

        Ok(Backend {
            budget_service: domain::BudgetService::new(),
            category_service: domain::CategoryService::new(),
            task_service: domain::TaskService::new(),
            event_service: domain::EventService::new(),
            document_service: domain::DocumentService::new(connection),
            attachment_service,
            reminder_scheduler: domain::ReminderScheduler::new(clock, notifier),
        })
    }

    /// Recompute and re-arm every reminder from the current event list.
    /// Called on load and after every event-list mutation.
    pub fn rearm_reminders(&mut self, events: &[shared::CalendarEvent]) -> usize {
        let parsed = self.event_service.parsed_events(events);
        self.reminder_scheduler.rearm(&parsed)
    }
}
