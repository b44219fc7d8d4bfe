//! Domain services: all business logic lives here, behind command/result
//! structs, with storage abstracted away by the traits in
//! [`crate::backend::storage`].

pub mod attachment_service;
pub mod budget_service;
pub mod category_service;
pub mod commands;
pub mod document_service;
pub mod event_service;
pub mod models;
pub mod reminder_scheduler;
pub mod task_service;

pub use attachment_service::AttachmentService;
pub use budget_service::{BudgetService, MANAGEMENT_FEE_RATE};
pub use category_service::CategoryService;
pub use document_service::{DocumentService, EXPORT_FILENAME};
pub use event_service::EventService;
pub use reminder_scheduler::{
    plan_reminders, Clock, LogNotifier, Notifier, PlannedReminder, ReminderScheduler, SystemClock,
    REMINDER_HORIZON_DAYS,
};
pub use task_service::TaskService;
