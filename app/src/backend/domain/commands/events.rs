use shared::CalendarEvent;

#[derive(Debug, Clone)]
pub struct AddEventCommand {
    pub category_id: String,
    pub title: String,
    /// Event start as an ISO-8601 instant; validated before anything is stored
    pub start_iso: String,
    pub end_iso: Option<String>,
    /// Minutes before start at which to raise a reminder
    pub remind_minutes: Option<i64>,
    pub notes: String,
}

#[derive(Debug, Clone)]
pub struct AddEventResult {
    pub event: CalendarEvent,
}

#[derive(Debug, Clone)]
pub struct DeleteEventCommand {
    pub event_id: String,
}

#[derive(Debug, Clone)]
pub struct DeleteEventResult {
    pub deleted: bool,
}
