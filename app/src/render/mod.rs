//! Pure presentation layer.
//!
//! `render(document, route)` turns the current document and route into a text
//! view. It is idempotent and side-effect free: calling it any number of
//! times with the same inputs produces the same output, so the shell can
//! simply re-render the whole view after every change.

use shared::{
    Amount, AppDocument, AppStateV1, AppStateV2, AttachmentRecord, BudgetItem, CategoryRecord,
    Task,
};

use crate::backend::domain::{BudgetService, CategoryService, EventService, TaskService};

/// Where the user currently is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    TasksAll,
    TaskGroup(String),
    Events,
    Files,
}

impl Route {
    /// Parse a route key; anything unknown lands on the dashboard
    pub fn parse(raw: &str) -> Route {
        match raw {
            "dashboard" => Route::Dashboard,
            "events" => Route::Events,
            "files" => Route::Files,
            other if other.starts_with("tasks:") => {
                let group = &other["tasks:".len()..];
                if group == "all" || group.is_empty() {
                    Route::TasksAll
                } else {
                    Route::TaskGroup(group.to_string())
                }
            }
            _ => Route::Dashboard,
        }
    }

    pub fn key(&self) -> String {
        match self {
            Route::Dashboard => "dashboard".to_string(),
            Route::TasksAll => "tasks:all".to_string(),
            Route::TaskGroup(group) => format!("tasks:{}", group),
            Route::Events => "events".to_string(),
            Route::Files => "files".to_string(),
        }
    }
}

/// Render the view for the current document and route
pub fn render(document: &AppDocument, route: &Route) -> String {
    let mut out = render_nav(document, route);

    match route {
        Route::Dashboard => match document {
            AppDocument::V1(state) => out.push_str(&render_budget_dashboard(state)),
            AppDocument::V2(state) => out.push_str(&render_category_dashboard(state)),
        },
        Route::TasksAll => out.push_str(&render_tasks(document, None)),
        Route::TaskGroup(group) => out.push_str(&render_tasks(document, Some(group))),
        Route::Events => out.push_str(&render_events(document)),
        Route::Files => {
            out.push_str("Files\n\nAttachment contents come from the local file store.\n")
        }
    }
    out
}

/// Render the files view with records fetched from the attachment store
pub fn render_files(document: &AppDocument, records: &[AttachmentRecord]) -> String {
    let mut out = render_nav(document, &Route::Files);
    out.push_str("Files\n\n");

    if records.is_empty() {
        out.push_str("No attachments yet.\n");
        return out;
    }

    out.push_str(&format!(
        "{:<34} {:<26} {:>10}  {}\n",
        "Name", "Type", "Size", "Created"
    ));
    for record in records {
        out.push_str(&format!(
            "{:<34} {:<26} {:>10}  {}\n",
            record.name, record.mime_type, record.size, record.created
        ));
    }
    out
}

/// Format a currency figure the way the dashboard shows it: $1,234.56
pub fn money(value: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }
    let negative = value < 0.0;
    let fixed = format!("{:.2}", value.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::new();
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!(
        "{}${}.{}",
        if negative { "-" } else { "" },
        grouped,
        fraction
    )
}

/// A money input cell: the raw stored value, blank when unset
fn amount_cell(amount: &Amount) -> String {
    match amount.value() {
        Some(value) if value.is_finite() => format!("{}", value),
        _ => String::new(),
    }
}

fn render_nav(document: &AppDocument, route: &Route) -> String {
    let task_service = TaskService::new();
    let tasks = document.tasks();
    let marker = |candidate: &Route| if candidate == route { ">" } else { " " };

    let mut out = String::new();
    out.push_str("== Homebuild Tracker ==\n");
    out.push_str(&format!("{} Dashboard [Budget]\n", marker(&Route::Dashboard)));
    out.push_str(&format!(
        "{} All Tasks [{}]\n",
        marker(&Route::TasksAll),
        task_service.all_task_count(tasks)
    ));
    for (name, entries) in tasks {
        let progress = task_service.group_progress(entries);
        out.push_str(&format!(
            "{} {} [{}/{}]\n",
            marker(&Route::TaskGroup(name.clone())),
            name,
            progress.done,
            progress.total
        ));
    }
    if matches!(document, AppDocument::V2(_)) {
        out.push_str(&format!("{} Events\n", marker(&Route::Events)));
        out.push_str(&format!("{} Files\n", marker(&Route::Files)));
    }
    out.push('\n');
    out
}

fn render_budget_dashboard(state: &AppStateV1) -> String {
    let budget_service = BudgetService::new();
    let totals = budget_service.budget_totals(&state.budget);

    let mut out = String::new();
    out.push_str("Dashboard\n");
    out.push_str("Track estimates vs. payments, and keep notes as you build.\n");
    out.push_str(if totals.owed > 0.0 {
        "Status: Budget items outstanding\n\n"
    } else {
        "Status: All items paid (per inputs)\n\n"
    });

    out.push_str(&format!("Estimated Total    {}\n", money(totals.estimate)));
    out.push_str(&format!("Paid Total         {}\n", money(totals.paid)));
    out.push_str(&format!("Owed               {}\n", money(totals.owed)));
    out.push_str(&format!("Management (20%)   {}\n", money(totals.management)));
    out.push_str(&format!(
        "Estimated + Management: {}\n\n",
        money(totals.with_management)
    ));

    out.push_str(&format!(
        "{:<4} {:<28} {:>12} {:>12} {:>12}  {}\n",
        "#", "Budget Item", "Estimate", "Paid", "Owed", "Notes"
    ));
    for item in &state.budget {
        out.push_str(&render_budget_row(&budget_service, item));
    }
    out
}

fn render_budget_row(budget_service: &BudgetService, item: &BudgetItem) -> String {
    let label = if item.desc.is_empty() {
        item.category.clone()
    } else {
        format!("{} - {}", item.category, item.desc)
    };
    format!(
        "{:<4} {:<28} {:>12} {:>12} {:>12}  {}\n",
        item.id,
        label,
        amount_cell(&item.estimate),
        amount_cell(&item.paid),
        money(budget_service.item_owed(item)),
        item.notes
    )
}

fn render_category_dashboard(state: &AppStateV2) -> String {
    let category_service = CategoryService::new();
    let totals = category_service.category_totals(&state.categories);

    let mut out = String::new();
    out.push_str("Dashboard\n");
    out.push_str("Cost centers with estimate, actual and paid figures.\n\n");

    out.push_str(&format!("Estimate Total     {}\n", money(totals.estimate)));
    out.push_str(&format!("Actual Total       {}\n", money(totals.actual)));
    out.push_str(&format!("Paid Total         {}\n", money(totals.paid)));
    out.push_str(&format!("Outstanding        {}\n\n", money(totals.outstanding)));

    out.push_str(&format!(
        "{:<24} {:>12} {:>12} {:>12} {:>12}  {}\n",
        "Category", "Estimate", "Actual", "Paid", "Outstanding", "Notes"
    ));
    for category in &state.categories {
        out.push_str(&render_category_row(category));
    }
    out
}

fn render_category_row(category: &CategoryRecord) -> String {
    let outstanding = category.actual.coerced() - category.paid.coerced();
    format!(
        "{:<24} {:>12} {:>12} {:>12} {:>12}  {}\n",
        category.name,
        amount_cell(&category.estimate),
        amount_cell(&category.actual),
        amount_cell(&category.paid),
        money(outstanding),
        category.notes
    )
}

fn render_tasks(document: &AppDocument, only_group: Option<&str>) -> String {
    let task_service = TaskService::new();
    let tasks = document.tasks();

    let mut out = String::new();
    for (name, entries) in tasks {
        if let Some(only) = only_group {
            if name.as_str() != only {
                continue;
            }
        }
        let progress = task_service.group_progress(entries);
        out.push_str(&format!(
            "{} Tasks ({}/{} complete)\n",
            name, progress.done, progress.total
        ));

        if entries.is_empty() {
            out.push_str("  No tasks yet.\n\n");
            continue;
        }
        for task in entries {
            out.push_str(&render_task_row(task));
        }
        out.push('\n');
    }

    if let Some(only) = only_group {
        if !tasks.contains_key(only) {
            out.push_str(&format!("{} Tasks (0/0 complete)\n  No tasks yet.\n", only));
        }
    }
    out
}

fn render_task_row(task: &Task) -> String {
    let due = if task.due_date.is_empty() {
        String::new()
    } else {
        format!("  due {}", task.due_date)
    };
    let dot = task.status.dot();
    let dot_label = if dot.is_empty() {
        String::new()
    } else {
        format!(" ({})", dot)
    };
    format!(
        "  {:<4} [{}]{} {}{}{}\n",
        task.id,
        task.status.label(),
        dot_label,
        task.title,
        due,
        if task.notes.is_empty() {
            String::new()
        } else {
            format!("  - {}", task.notes)
        }
    )
}

fn render_events(document: &AppDocument) -> String {
    let event_service = EventService::new();
    let events = event_service.events_sorted(document.events());

    let mut out = String::new();
    out.push_str("Events\n\n");
    if events.is_empty() {
        out.push_str("No events yet.\n");
        return out;
    }

    for event in &events {
        let reminder = match event.remind_minutes {
            Some(minutes) => format!("  remind {}m before", minutes),
            None => String::new(),
        };
        let end = match &event.end_iso {
            Some(end_iso) => format!(" .. {}", end_iso),
            None => String::new(),
        };
        out.push_str(&format!(
            "{}{}  {}{}\n",
            event.start_iso, end, event.title, reminder
        ));
        if !event.notes.is_empty() {
            out.push_str(&format!("    {}\n", event.notes));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_formats_with_thousands_separators() {
        assert_eq!(money(0.0), "$0.00");
        assert_eq!(money(1234.5), "$1,234.50");
        assert_eq!(money(1_000_000.0), "$1,000,000.00");
        assert_eq!(money(-500.25), "-$500.25");
    }

    #[test]
    fn route_keys_round_trip() {
        for route in [
            Route::Dashboard,
            Route::TasksAll,
            Route::TaskGroup("Framing".to_string()),
            Route::Events,
            Route::Files,
        ] {
            assert_eq!(Route::parse(&route.key()), route);
        }
        assert_eq!(Route::parse("nonsense"), Route::Dashboard);
    }

    #[test]
    fn rendering_is_idempotent() {
        let document: AppDocument =
            serde_json::from_str(r#"{"categories": [], "events": [], "tasks": {}}"#).unwrap();
        let first = render(&document, &Route::Dashboard);
        let second = render(&document, &Route::Dashboard);
        assert_eq!(first, second);
        assert!(first.contains("Dashboard"));
    }
}
