use shared::CategoryRecord;

/// Which editable field of a category to update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryField {
    Name,
    Estimate,
    Actual,
    Paid,
    Notes,
    StartDate,
    EndDate,
    DesignLink,
}

#[derive(Debug, Clone)]
pub struct AddCategoryCommand {
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct AddCategoryResult {
    pub category: CategoryRecord,
}

#[derive(Debug, Clone)]
pub struct UpdateCategoryFieldCommand {
    pub category_id: String,
    pub field: CategoryField,
    /// Raw input value; money fields are coerced, text fields stored verbatim
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct UpdateCategoryFieldResult {
    pub category: CategoryRecord,
}

#[derive(Debug, Clone)]
pub struct DeleteCategoryCommand {
    pub category_id: String,
}

#[derive(Debug, Clone)]
pub struct DeleteCategoryResult {
    pub deleted: bool,
}
