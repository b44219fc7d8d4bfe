use shared::BudgetItem;

/// Which editable field of a budget line item to update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetField {
    Estimate,
    Paid,
    Category,
    Desc,
    Notes,
}

/// Apply one field change from the budget table
#[derive(Debug, Clone)]
pub struct UpdateBudgetFieldCommand {
    pub item_id: i64,
    pub field: BudgetField,
    /// Raw input value; money fields are coerced, text fields stored verbatim
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct UpdateBudgetFieldResult {
    pub item: BudgetItem,
}
