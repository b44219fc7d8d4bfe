//! Category domain logic for the v2 schema: cost centers with
//! estimate/actual/paid figures and the outstanding total.

use anyhow::{anyhow, bail, Result};
use log::info;
use shared::{Amount, AppStateV2, CategoryRecord, CategoryTotals};
use uuid::Uuid;

use crate::backend::domain::commands::categories::{
    AddCategoryCommand, AddCategoryResult, CategoryField, DeleteCategoryCommand,
    DeleteCategoryResult, UpdateCategoryFieldCommand, UpdateCategoryFieldResult,
};

/// Service for the v2 category table
#[derive(Clone)]
pub struct CategoryService;

impl CategoryService {
    /// Create a new CategoryService instance
    pub fn new() -> Self {
        Self
    }

    /// Aggregate totals over the categories.
    ///
    /// Empty and non-finite amounts count as 0; an empty list produces
    /// all-zero totals. Outstanding is what has been incurred but not paid.
    pub fn category_totals(&self, categories: &[CategoryRecord]) -> CategoryTotals {
        let estimate: f64 = categories.iter().map(|c| c.estimate.coerced()).sum();
        let actual: f64 = categories.iter().map(|c| c.actual.coerced()).sum();
        let paid: f64 = categories.iter().map(|c| c.paid.coerced()).sum();

        CategoryTotals {
            estimate,
            actual,
            paid,
            outstanding: actual - paid,
        }
    }

    /// Create a new category with blank figures
    pub fn add_category(
        &self,
        state: &mut AppStateV2,
        command: AddCategoryCommand,
    ) -> Result<AddCategoryResult> {
        let name = command.name.trim().to_string();
        if name.is_empty() {
            bail!("Category name cannot be empty");
        }

        let category = CategoryRecord {
            id: format!("category::{}", Uuid::new_v4()),
            name,
            estimate: Amount::empty(),
            actual: Amount::empty(),
            paid: Amount::empty(),
            notes: String::new(),
            start_date: None,
            end_date: None,
            design_link: None,
        };
        state.categories.push(category.clone());

        info!("💰 BUDGET: Added category '{}'", category.name);
        Ok(AddCategoryResult { category })
    }

    /// Apply one field change from the category table
    pub fn update_field(
        &self,
        state: &mut AppStateV2,
        command: UpdateCategoryFieldCommand,
    ) -> Result<UpdateCategoryFieldResult> {
        let UpdateCategoryFieldCommand {
            category_id,
            field,
            value,
        } = command;

        let category = state
            .categories
            .iter_mut()
            .find(|c| c.id == category_id)
            .ok_or_else(|| anyhow!("Category not found: {}", category_id))?;

        // Optional text fields store None when blanked so the persisted
        // document drops the key instead of keeping an empty string
        let optional = |value: String| {
            if value.trim().is_empty() {
                None
            } else {
                Some(value)
            }
        };

        match field {
            CategoryField::Name => category.name = value,
            CategoryField::Estimate => category.estimate = Amount::from_input(&value),
            CategoryField::Actual => category.actual = Amount::from_input(&value),
            CategoryField::Paid => category.paid = Amount::from_input(&value),
            CategoryField::Notes => category.notes = value,
            CategoryField::StartDate => category.start_date = optional(value),
            CategoryField::EndDate => category.end_date = optional(value),
            CategoryField::DesignLink => category.design_link = optional(value),
        }

        info!("💰 BUDGET: Updated {:?} on category {}", field, category_id);
        Ok(UpdateCategoryFieldResult {
            category: category.clone(),
        })
    }

    /// Delete a category by id
    pub fn delete_category(
        &self,
        state: &mut AppStateV2,
        command: DeleteCategoryCommand,
    ) -> Result<DeleteCategoryResult> {
        let before = state.categories.len();
        state.categories.retain(|c| c.id != command.category_id);
        let deleted = state.categories.len() < before;

        if deleted {
            info!("💰 BUDGET: Deleted category {}", command.category_id);
        }
        Ok(DeleteCategoryResult { deleted })
    }
}

impl Default for CategoryService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: &str, estimate: Amount, actual: Amount, paid: Amount) -> CategoryRecord {
        CategoryRecord {
            id: id.to_string(),
            name: id.to_string(),
            estimate,
            actual,
            paid,
            notes: String::new(),
            start_date: None,
            end_date: None,
            design_link: None,
        }
    }

    #[test]
    fn outstanding_is_actual_minus_paid() {
        let service = CategoryService::new();
        let categories = vec![
            category(
                "a",
                Amount::new(10_000.0),
                Amount::new(11_000.0),
                Amount::new(5_000.0),
            ),
            category("b", Amount::new(2_000.0), Amount::empty(), Amount::empty()),
        ];

        let totals = service.category_totals(&categories);
        assert_eq!(totals.estimate, 12_000.0);
        assert_eq!(totals.actual, 11_000.0);
        assert_eq!(totals.paid, 5_000.0);
        assert_eq!(totals.outstanding, 6_000.0);
    }

    #[test]
    fn empty_list_gives_zero_totals() {
        let totals = CategoryService::new().category_totals(&[]);
        assert_eq!(totals.estimate, 0.0);
        assert_eq!(totals.actual, 0.0);
        assert_eq!(totals.paid, 0.0);
        assert_eq!(totals.outstanding, 0.0);
    }

    #[test]
    fn add_rejects_blank_name_and_assigns_opaque_id() {
        let service = CategoryService::new();
        let mut state = AppStateV2 {
            categories: Vec::new(),
            events: Vec::new(),
            tasks: Default::default(),
        };

        assert!(service
            .add_category(
                &mut state,
                AddCategoryCommand {
                    name: "   ".to_string()
                }
            )
            .is_err());

        let result = service
            .add_category(
                &mut state,
                AddCategoryCommand {
                    name: "  Roofing ".to_string(),
                },
            )
            .unwrap();
        assert_eq!(result.category.name, "Roofing");
        assert!(result.category.id.starts_with("category::"));
        assert_eq!(state.categories.len(), 1);
    }

    #[test]
    fn blanking_an_optional_field_drops_it() {
        let service = CategoryService::new();
        let mut state = AppStateV2 {
            categories: vec![category(
                "category::1",
                Amount::empty(),
                Amount::empty(),
                Amount::empty(),
            )],
            events: Vec::new(),
            tasks: Default::default(),
        };

        let result = service
            .update_field(
                &mut state,
                UpdateCategoryFieldCommand {
                    category_id: "category::1".to_string(),
                    field: CategoryField::DesignLink,
                    value: "https://example.com/plans.pdf".to_string(),
                },
            )
            .unwrap();
        assert!(result.category.design_link.is_some());

        let result = service
            .update_field(
                &mut state,
                UpdateCategoryFieldCommand {
                    category_id: "category::1".to_string(),
                    field: CategoryField::DesignLink,
                    value: "  ".to_string(),
                },
            )
            .unwrap();
        assert_eq!(result.category.design_link, None);
    }

    #[test]
    fn delete_reports_whether_anything_was_removed() {
        let service = CategoryService::new();
        let mut state = AppStateV2 {
            categories: vec![category(
                "category::1",
                Amount::empty(),
                Amount::empty(),
                Amount::empty(),
            )],
            events: Vec::new(),
            tasks: Default::default(),
        };

        let result = service
            .delete_category(
                &mut state,
                DeleteCategoryCommand {
                    category_id: "category::1".to_string(),
                },
            )
            .unwrap();
        assert!(result.deleted);

        let result = service
            .delete_category(
                &mut state,
                DeleteCategoryCommand {
                    category_id: "category::1".to_string(),
                },
            )
            .unwrap();
        assert!(!result.deleted);
    }
}
