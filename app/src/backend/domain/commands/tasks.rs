use shared::Task;

#[derive(Debug, Clone)]
pub struct CreateGroupCommand {
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct CreateGroupResult {
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct AddTaskCommand {
    pub group: String,
    pub title: String,
}

#[derive(Debug, Clone)]
pub struct AddTaskResult {
    pub task: Task,
}

/// Which editable field of a task to update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskField {
    Title,
    Status,
    DueDate,
    Notes,
}

#[derive(Debug, Clone)]
pub struct UpdateTaskFieldCommand {
    pub group: String,
    pub task_id: i64,
    pub field: TaskField,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct UpdateTaskFieldResult {
    pub task: Task,
}

#[derive(Debug, Clone)]
pub struct DeleteTaskCommand {
    pub group: String,
    pub task_id: i64,
}

#[derive(Debug, Clone)]
pub struct DeleteTaskResult {
    pub deleted: bool,
}

/// Done/total counts for one task group, shown as the nav pill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupProgress {
    pub done: usize,
    pub total: usize,
}
