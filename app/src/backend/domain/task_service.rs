//! Task checklist domain logic: named groups of tasks (construction phases)
//! with monotonic per-group ids and progress counts for the navigation pills.

use anyhow::{anyhow, bail, Result};
use log::{info, warn};
use shared::{Task, TaskGroups, TaskStatus};

use crate::backend::domain::commands::tasks::{
    AddTaskCommand, AddTaskResult, CreateGroupCommand, CreateGroupResult, DeleteTaskCommand,
    DeleteTaskResult, GroupProgress, TaskField, UpdateTaskFieldCommand, UpdateTaskFieldResult,
};

/// Service for task groups and their checklists
#[derive(Clone)]
pub struct TaskService;

impl TaskService {
    /// Create a new TaskService instance
    pub fn new() -> Self {
        Self
    }

    /// Create a new, empty task group
    pub fn create_group(
        &self,
        tasks: &mut TaskGroups,
        command: CreateGroupCommand,
    ) -> Result<CreateGroupResult> {
        let name = command.name.trim().to_string();
        if name.is_empty() {
            bail!("Group name cannot be empty");
        }
        if tasks.contains_key(&name) {
            bail!("That group already exists: {}", name);
        }

        tasks.insert(name.clone(), Vec::new());
        info!("📋 TASKS: Created group '{}'", name);
        Ok(CreateGroupResult { name })
    }

    /// Add a task to a group with the next monotonic id
    pub fn add_task(&self, tasks: &mut TaskGroups, command: AddTaskCommand) -> Result<AddTaskResult> {
        let title = command.title.trim().to_string();
        if title.is_empty() {
            bail!("Task title cannot be empty");
        }

        let group = tasks
            .get_mut(&command.group)
            .ok_or_else(|| anyhow!("Unknown task group: {}", command.group))?;

        let task = Task {
            id: Self::next_task_id(group),
            title,
            status: TaskStatus::NotStarted,
            due_date: String::new(),
            notes: String::new(),
        };
        group.push(task.clone());

        info!(
            "📋 TASKS: Added task {} '{}' to group '{}'",
            task.id, task.title, command.group
        );
        Ok(AddTaskResult { task })
    }

    /// Ids are assigned monotonically within a group: one more than the
    /// largest existing id, starting at 1 for an empty group.
    fn next_task_id(group: &[Task]) -> i64 {
        group.iter().map(|task| task.id.max(0)).max().unwrap_or(0) + 1
    }

    /// Apply one field change to a task
    pub fn update_task_field(
        &self,
        tasks: &mut TaskGroups,
        command: UpdateTaskFieldCommand,
    ) -> Result<UpdateTaskFieldResult> {
        let UpdateTaskFieldCommand {
            group,
            task_id,
            field,
            value,
        } = command;

        let entries = tasks
            .get_mut(&group)
            .ok_or_else(|| anyhow!("Unknown task group: {}", group))?;
        let task = entries
            .iter_mut()
            .find(|task| task.id == task_id)
            .ok_or_else(|| anyhow!("Task {} not found in group '{}'", task_id, group))?;

        match field {
            TaskField::Title => task.title = value,
            TaskField::DueDate => task.due_date = value,
            TaskField::Notes => task.notes = value,
            TaskField::Status => task.status = Self::parse_status(&value)?,
        }

        info!(
            "📋 TASKS: Updated {:?} on task {} in group '{}'",
            field, task_id, group
        );
        Ok(UpdateTaskFieldResult { task: task.clone() })
    }

    fn parse_status(raw: &str) -> Result<TaskStatus> {
        match raw {
            "not_started" => Ok(TaskStatus::NotStarted),
            "in_progress" => Ok(TaskStatus::InProgress),
            "blocked" => Ok(TaskStatus::Blocked),
            "done" => Ok(TaskStatus::Done),
            other => bail!("Unknown task status: {}", other),
        }
    }

    /// Delete a task by id
    pub fn delete_task(
        &self,
        tasks: &mut TaskGroups,
        command: DeleteTaskCommand,
    ) -> Result<DeleteTaskResult> {
        let entries = tasks
            .get_mut(&command.group)
            .ok_or_else(|| anyhow!("Unknown task group: {}", command.group))?;

        let before = entries.len();
        entries.retain(|task| task.id != command.task_id);
        let deleted = entries.len() < before;

        if deleted {
            info!(
                "📋 TASKS: Deleted task {} from group '{}'",
                command.task_id, command.group
            );
        } else {
            warn!(
                "Task {} not found in group '{}'",
                command.task_id, command.group
            );
        }
        Ok(DeleteTaskResult { deleted })
    }

    /// Done/total counts for one group
    pub fn group_progress(&self, group: &[Task]) -> GroupProgress {
        GroupProgress {
            done: group
                .iter()
                .filter(|task| task.status == TaskStatus::Done)
                .count(),
            total: group.len(),
        }
    }

    /// Total task count across all groups
    pub fn all_task_count(&self, tasks: &TaskGroups) -> usize {
        tasks.values().map(|group| group.len()).sum()
    }
}

impl Default for TaskService {
    fn default() -> Self {
        Self::new()
    }
}
