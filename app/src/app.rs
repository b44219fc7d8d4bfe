//! Application shell: the explicit state object that owns the backend, the
//! current document and the current route.
//!
//! Every UI-style event is a method here. Each mutation flows through a
//! domain service, the whole document is persisted afterwards, and anything
//! that changes the event list re-arms the reminder scheduler.

use anyhow::{anyhow, bail, Result};
use log::info;
use shared::{
    AppDocument, AttachmentRecord, BudgetItem, BudgetTotals, CalendarEvent, CategoryRecord,
    CategoryTotals, DocumentVersion, Task,
};

use crate::backend::domain::commands::attachments::{
    AddAttachmentCommand, DeleteAttachmentCommand,
};
use crate::backend::domain::commands::budget::UpdateBudgetFieldCommand;
use crate::backend::domain::commands::categories::{
    AddCategoryCommand, DeleteCategoryCommand, UpdateCategoryFieldCommand,
};
use crate::backend::domain::commands::document::{ExportDocumentResult, ImportDocumentCommand};
use crate::backend::domain::commands::events::{AddEventCommand, DeleteEventCommand};
use crate::backend::domain::commands::tasks::{
    AddTaskCommand, CreateGroupCommand, DeleteTaskCommand, UpdateTaskFieldCommand,
};
use crate::backend::domain::AttachmentService;
use crate::backend::Backend;
use crate::render::{render, render_files, Route};

pub struct AppShell {
    backend: Backend,
    document: AppDocument,
    route: Route,
}

impl AppShell {
    /// Create the shell over the default data directory
    pub fn new() -> Result<Self> {
        Self::with_backend(Backend::new()?)
    }

    /// Create the shell over an already-constructed backend.
    /// Loads (or seeds) the document and arms reminders from it.
    pub fn with_backend(mut backend: Backend) -> Result<Self> {
        let document = backend.document_service.load_or_seed()?;
        backend.rearm_reminders(document.events());

        Ok(Self {
            backend,
            document,
            route: Route::Dashboard,
        })
    }

    pub fn document(&self) -> &AppDocument {
        &self.document
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn navigate(&mut self, route: Route) {
        info!("Navigating to {}", route.key());
        self.route = route;
    }

    /// Render the whole view for the current route
    pub fn render(&self) -> String {
        match &self.route {
            Route::Files => {
                let records = self
                    .backend
                    .attachment_service
                    .as_ref()
                    .and_then(|service| self.all_attachments(service).ok())
                    .unwrap_or_default();
                render_files(&self.document, &records)
            }
            route => render(&self.document, route),
        }
    }

    fn all_attachments(&self, service: &AttachmentService) -> Result<Vec<AttachmentRecord>> {
        let mut records = Vec::new();
        if let AppDocument::V2(state) = &self.document {
            for category in &state.categories {
                records.extend(service.list_by_category(&category.id)?);
            }
        }
        Ok(records)
    }

    fn persist(&self) -> Result<()> {
        self.backend.document_service.save(&self.document)
    }

    fn persist_and_rearm(&mut self) -> Result<()> {
        self.backend.document_service.save(&self.document)?;
        self.backend.rearm_reminders(self.document.events());
        Ok(())
    }

    // ---- budget (v1) ----

    pub fn budget_totals(&self) -> Option<BudgetTotals> {
        match &self.document {
            AppDocument::V1(state) => Some(self.backend.budget_service.budget_totals(&state.budget)),
            AppDocument::V2(_) => None,
        }
    }

    pub fn update_budget_field(&mut self, command: UpdateBudgetFieldCommand) -> Result<BudgetItem> {
        let item = match &mut self.document {
            AppDocument::V1(state) => {
                self.backend
                    .budget_service
                    .update_field(state, command)?
                    .item
            }
            AppDocument::V2(_) => bail!("Budget line items are a v1 feature; this document is v2"),
        };
        self.persist()?;
        Ok(item)
    }

    // ---- categories (v2) ----

    pub fn category_totals(&self) -> Option<CategoryTotals> {
        match &self.document {
            AppDocument::V2(state) => Some(
                self.backend
                    .category_service
                    .category_totals(&state.categories),
            ),
            AppDocument::V1(_) => None,
        }
    }

    pub fn add_category(&mut self, command: AddCategoryCommand) -> Result<CategoryRecord> {
        let category = match &mut self.document {
            AppDocument::V2(state) => {
                self.backend
                    .category_service
                    .add_category(state, command)?
                    .category
            }
            AppDocument::V1(_) => bail!("Categories are a v2 feature; this document is v1"),
        };
        self.persist()?;
        Ok(category)
    }

    pub fn update_category_field(
        &mut self,
        command: UpdateCategoryFieldCommand,
    ) -> Result<CategoryRecord> {
        let category = match &mut self.document {
            AppDocument::V2(state) => {
                self.backend
                    .category_service
                    .update_field(state, command)?
                    .category
            }
            AppDocument::V1(_) => bail!("Categories are a v2 feature; this document is v1"),
        };
        self.persist()?;
        Ok(category)
    }

    pub fn delete_category(&mut self, command: DeleteCategoryCommand) -> Result<bool> {
        let deleted = match &mut self.document {
            AppDocument::V2(state) => {
                self.backend
                    .category_service
                    .delete_category(state, command)?
                    .deleted
            }
            AppDocument::V1(_) => bail!("Categories are a v2 feature; this document is v1"),
        };
        self.persist()?;
        Ok(deleted)
    }

    // ---- tasks (both versions) ----

    pub fn create_group(&mut self, command: CreateGroupCommand) -> Result<String> {
        let name = self
            .backend
            .task_service
            .create_group(self.document.tasks_mut(), command)?
            .name;
        self.persist()?;
        self.route = Route::TaskGroup(name.clone());
        Ok(name)
    }

    pub fn add_task(&mut self, command: AddTaskCommand) -> Result<Task> {
        let task = self
            .backend
            .task_service
            .add_task(self.document.tasks_mut(), command)?
            .task;
        self.persist()?;
        Ok(task)
    }

    pub fn update_task_field(&mut self, command: UpdateTaskFieldCommand) -> Result<Task> {
        let task = self
            .backend
            .task_service
            .update_task_field(self.document.tasks_mut(), command)?
            .task;
        self.persist()?;
        Ok(task)
    }

    pub fn delete_task(&mut self, command: DeleteTaskCommand) -> Result<bool> {
        let deleted = self
            .backend
            .task_service
            .delete_task(self.document.tasks_mut(), command)?
            .deleted;
        self.persist()?;
        Ok(deleted)
    }

    // ---- events (v2) ----

    pub fn add_event(&mut self, command: AddEventCommand) -> Result<CalendarEvent> {
        let event = match &mut self.document {
            AppDocument::V2(state) => self.backend.event_service.add_event(state, command)?.event,
            AppDocument::V1(_) => bail!("Calendar events are a v2 feature; this document is v1"),
        };
        self.persist_and_rearm()?;
        Ok(event)
    }

    pub fn delete_event(&mut self, command: DeleteEventCommand) -> Result<bool> {
        let deleted = match &mut self.document {
            AppDocument::V2(state) => {
                self.backend
                    .event_service
                    .delete_event(state, command)?
                    .deleted
            }
            AppDocument::V1(_) => bail!("Calendar events are a v2 feature; this document is v1"),
        };
        self.persist_and_rearm()?;
        Ok(deleted)
    }

    // ---- whole-document operations ----

    /// Import an uploaded document. All-or-nothing: on failure the current
    /// state (in memory and on disk) is untouched.
    pub fn import(&mut self, content: String) -> Result<DocumentVersion> {
        let result = self
            .backend
            .document_service
            .import(ImportDocumentCommand { content })?;

        self.document = result.document;
        self.route = Route::Dashboard;
        self.backend.rearm_reminders(self.document.events());
        Ok(result.version)
    }

    /// Serialize the current document for download
    pub fn export(&self) -> Result<ExportDocumentResult> {
        self.backend.document_service.export(&self.document)
    }

    /// Replace everything with the seed document
    pub fn reset(&mut self) -> Result<()> {
        self.document = self.backend.document_service.reset()?;
        self.route = Route::Dashboard;
        self.backend.rearm_reminders(self.document.events());
        Ok(())
    }

    // ---- attachments (v2, store-backed) ----

    fn attachment_service(&self) -> Result<&AttachmentService> {
        self.backend.attachment_service.as_ref().ok_or_else(|| {
            anyhow!("Attachments are unavailable: the local attachment store failed to open")
        })
    }

    pub fn add_attachment(&self, command: AddAttachmentCommand) -> Result<AttachmentRecord> {
        Ok(self.attachment_service()?.add_attachment(command)?.record)
    }

    pub fn list_attachments(&self, category_id: &str) -> Result<Vec<AttachmentRecord>> {
        self.attachment_service()?.list_by_category(category_id)
    }

    pub fn read_attachment(&self, attachment_id: &str) -> Result<Option<Vec<u8>>> {
        self.attachment_service()?.read_blob(attachment_id)
    }

    pub fn delete_attachment(&self, command: DeleteAttachmentCommand) -> Result<bool> {
        Ok(self
            .attachment_service()?
            .delete_attachment(command)?
            .deleted)
    }
}
