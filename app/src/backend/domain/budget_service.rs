//! Budget domain logic for the v1 schema.
//!
//! Aggregate figures are recomputed from scratch on every render; at tens of
//! line items there is nothing worth caching, and recomputing keeps the
//! totals impossible to get stale.

use anyhow::{anyhow, Result};
use log::info;
use shared::{Amount, AppStateV1, BudgetItem, BudgetTotals};

use crate::backend::domain::commands::budget::{
    BudgetField, UpdateBudgetFieldCommand, UpdateBudgetFieldResult,
};

/// Fixed management fee applied on top of the estimate total
pub const MANAGEMENT_FEE_RATE: f64 = 0.20;

/// Service for the v1 budget table
#[derive(Clone)]
pub struct BudgetService;

impl BudgetService {
    /// Create a new BudgetService instance
    pub fn new() -> Self {
        Self
    }

    /// Aggregate totals over the budget table.
    ///
    /// Empty and non-finite amounts count as 0; an empty table produces
    /// all-zero totals.
    pub fn budget_totals(&self, items: &[BudgetItem]) -> BudgetTotals {
        let estimate: f64 = items.iter().map(|item| item.estimate.coerced()).sum();
        let paid: f64 = items.iter().map(|item| item.paid.coerced()).sum();
        let management = estimate * MANAGEMENT_FEE_RATE;

        BudgetTotals {
            estimate,
            paid,
            owed: estimate - paid,
            management,
            with_management: estimate + management,
        }
    }

    /// What is still owed on a single line item
    pub fn item_owed(&self, item: &BudgetItem) -> f64 {
        item.estimate.coerced() - item.paid.coerced()
    }

    /// Apply one field change from the budget table
    pub fn update_field(
        &self,
        state: &mut AppStateV1,
        command: UpdateBudgetFieldCommand,
    ) -> Result<UpdateBudgetFieldResult> {
        let UpdateBudgetFieldCommand {
            item_id,
            field,
            value,
        } = command;

        let item = state
            .budget
            .iter_mut()
            .find(|item| item.id == item_id)
            .ok_or_else(|| anyhow!("Budget item not found: {}", item_id))?;

        match field {
            BudgetField::Estimate => item.estimate = Amount::from_input(&value),
            BudgetField::Paid => item.paid = Amount::from_input(&value),
            BudgetField::Category => item.category = value,
            BudgetField::Desc => item.desc = value,
            BudgetField::Notes => item.notes = value,
        }

        info!("💰 BUDGET: Updated {:?} on item {}", field, item_id);
        Ok(UpdateBudgetFieldResult { item: item.clone() })
    }
}

impl Default for BudgetService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, estimate: Amount, paid: Amount) -> BudgetItem {
        BudgetItem {
            id,
            category: format!("Category {}", id),
            desc: String::new(),
            estimate,
            paid,
            notes: String::new(),
        }
    }

    #[test]
    fn totals_sum_each_column() {
        let service = BudgetService::new();
        let items = vec![
            item(1, Amount::new(10_000.0), Amount::new(4_000.0)),
            item(2, Amount::new(2_500.0), Amount::new(2_500.0)),
        ];

        let totals = service.budget_totals(&items);
        assert_eq!(totals.estimate, 12_500.0);
        assert_eq!(totals.paid, 6_500.0);
        assert_eq!(totals.owed, 6_000.0);
    }

    #[test]
    fn empty_amounts_count_as_zero() {
        let service = BudgetService::new();
        let items = vec![
            item(1, Amount::empty(), Amount::new(500.0)),
            item(2, Amount::new(f64::NAN), Amount::empty()),
        ];

        let totals = service.budget_totals(&items);
        assert_eq!(totals.estimate, 0.0);
        assert_eq!(totals.paid, 500.0);
        assert_eq!(totals.owed, -500.0);
    }

    #[test]
    fn empty_table_gives_zero_totals() {
        let totals = BudgetService::new().budget_totals(&[]);
        assert_eq!(totals.estimate, 0.0);
        assert_eq!(totals.paid, 0.0);
        assert_eq!(totals.owed, 0.0);
        assert_eq!(totals.management, 0.0);
        assert_eq!(totals.with_management, 0.0);
    }

    #[test]
    fn management_fee_is_twenty_percent_of_estimate() {
        let service = BudgetService::new();
        let items = vec![item(1, Amount::new(10_000.0), Amount::empty())];

        let totals = service.budget_totals(&items);
        assert!((totals.management - 2_000.0).abs() < 1e-9);
        assert!((totals.with_management - 12_000.0).abs() < 1e-9);
    }

    #[test]
    fn update_field_coerces_money_and_preserves_blank() {
        let service = BudgetService::new();
        let mut state = AppStateV1 {
            budget: vec![item(1, Amount::new(100.0), Amount::empty())],
            tasks: Default::default(),
        };

        let result = service
            .update_field(
                &mut state,
                UpdateBudgetFieldCommand {
                    item_id: 1,
                    field: BudgetField::Estimate,
                    value: "2500".to_string(),
                },
            )
            .unwrap();
        assert_eq!(result.item.estimate, Amount::new(2500.0));

        let result = service
            .update_field(
                &mut state,
                UpdateBudgetFieldCommand {
                    item_id: 1,
                    field: BudgetField::Estimate,
                    value: String::new(),
                },
            )
            .unwrap();
        assert!(result.item.estimate.is_empty());
    }

    #[test]
    fn update_field_rejects_unknown_item() {
        let service = BudgetService::new();
        let mut state = AppStateV1 {
            budget: Vec::new(),
            tasks: Default::default(),
        };

        let result = service.update_field(
            &mut state,
            UpdateBudgetFieldCommand {
                item_id: 42,
                field: BudgetField::Notes,
                value: "x".to_string(),
            },
        );
        assert!(result.is_err());
    }
}
