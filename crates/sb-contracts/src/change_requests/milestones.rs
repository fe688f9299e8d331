//! Milestone percentage contract
//!
//! Fixed-Price billing rows are generated from milestones, so the milestone
//! percentages must describe at most the whole contract value.

use sb_core::error::ValidationErrors;
use sb_models::MilestoneInput;

use crate::base::{Contract, ValidationResult};

/// Percentage rules across a Fixed-Price contract's milestones: no single
/// milestone above 100 and the total not above 100.
#[derive(Debug, Default)]
pub struct MilestoneContract;

impl MilestoneContract {
    pub fn new() -> Self {
        Self
    }
}

impl Contract<Vec<MilestoneInput>> for MilestoneContract {
    fn validate(&self, entity: &Vec<MilestoneInput>) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        let mut total = 0.0;
        for (index, milestone) in entity.iter().enumerate() {
            if milestone.payment_percentage > 100.0 {
                errors.add_indexed("paymentPercentage", index, "can't exceed 100");
            }
            total += milestone.payment_percentage;
        }

        if total > 100.0 {
            errors.add_base("Total payment percentage can't exceed 100");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn milestone(pct: f64) -> MilestoneInput {
        MilestoneInput {
            milestone: "Phase".to_string(),
            payment_percentage: pct,
            ..MilestoneInput::default()
        }
    }

    #[test]
    fn test_within_bounds_passes() {
        let contract = MilestoneContract::new();
        assert!(contract.validate(&vec![milestone(60.0), milestone(40.0)]).is_ok());
    }

    #[test]
    fn test_single_percentage_above_hundred() {
        let contract = MilestoneContract::new();
        let errors = contract.validate(&vec![milestone(150.0)]).unwrap_err();
        assert!(errors.has_indexed("paymentPercentage", 0));
    }

    #[test]
    fn test_total_above_hundred() {
        let contract = MilestoneContract::new();
        let errors = contract
            .validate(&vec![milestone(70.0), milestone(50.0)])
            .unwrap_err();
        assert!(!errors.base_errors.is_empty());
        assert!(!errors.has_indexed("paymentPercentage", 0));
    }
}
