//! Fixed-Price milestone editor
//!
//! Billing rows are never edited directly: every accepted milestone edit
//! regenerates them from the contract value and billing day. Percentage
//! edits that would push a single milestone or the total above 100 are
//! rejected and leave the milestones untouched.

use chrono::NaiveDate;
use sb_contracts::base::Contract;
use sb_contracts::change_requests::MilestoneContract;
use sb_core::error::ValidationErrors;
use sb_models::{BillingLine, ContractSnapshot, MilestoneInput};

pub struct MilestoneEditor {
    contract_value: f64,
    billing_day: Option<String>,
    milestones: Vec<MilestoneInput>,
    billing: Vec<BillingLine>,
    errors: ValidationErrors,
}

impl MilestoneEditor {
    pub fn new(contract: &ContractSnapshot, milestones: Vec<MilestoneInput>) -> Self {
        let mut editor = Self {
            contract_value: contract.value,
            billing_day: contract.billing_day.clone(),
            milestones,
            billing: Vec::new(),
            errors: ValidationErrors::new(),
        };
        editor.recompute();
        editor
    }

    pub fn milestones(&self) -> &[MilestoneInput] {
        &self.milestones
    }

    pub fn billing_lines(&self) -> &[BillingLine] {
        &self.billing
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    fn recompute(&mut self) {
        self.billing = self
            .milestones
            .iter()
            .map(|m| BillingLine::for_milestone(m, self.contract_value, self.billing_day.as_deref()))
            .collect();
    }

    pub fn add_milestone(&mut self) {
        self.milestones.push(MilestoneInput::default());
        self.recompute();
    }

    pub fn remove_milestone(&mut self, index: usize) {
        if index < self.milestones.len() {
            self.milestones.remove(index);
            self.errors = ValidationErrors::new();
            self.recompute();
        }
    }

    /// Set a milestone's payment percentage. Negative input clamps to
    /// zero; a value above 100, or one that would push the total above
    /// 100, is rejected and the milestone keeps its previous value.
    /// Returns whether the edit was applied.
    pub fn set_percentage(&mut self, index: usize, value: f64) -> bool {
        if index >= self.milestones.len() {
            return false;
        }
        let value = value.max(0.0);

        if value > 100.0 {
            self.errors
                .add_indexed("paymentPercentage", index, "can't exceed 100");
            return false;
        }

        let others: f64 = self
            .milestones
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, m)| m.payment_percentage)
            .sum();
        if others + value > 100.0 {
            self.errors
                .add_base("Total payment percentage can't exceed 100");
            return false;
        }

        self.milestones[index].payment_percentage = value;
        self.errors.clear_indexed("paymentPercentage", index);
        self.errors.base_errors.clear();
        self.recompute();
        true
    }

    pub fn set_planned_end(&mut self, index: usize, date: Option<NaiveDate>) {
        if let Some(milestone) = self.milestones.get_mut(index) {
            milestone.planned_end = date;
            self.recompute();
        }
    }

    pub fn set_name(&mut self, index: usize, name: impl Into<String>) {
        if let Some(milestone) = self.milestones.get_mut(index) {
            milestone.milestone = name.into();
            self.recompute();
        }
    }

    pub fn set_delivery_note(&mut self, index: usize, note: impl Into<String>) {
        if let Some(milestone) = self.milestones.get_mut(index) {
            milestone.delivery_note = note.into();
            self.recompute();
        }
    }

    pub fn set_acceptance_criteria(&mut self, index: usize, criteria: impl Into<String>) {
        if let Some(milestone) = self.milestones.get_mut(index) {
            milestone.acceptance_criteria = criteria.into();
        }
    }

    /// Final cross-milestone check before the schedule is persisted.
    pub fn validate(&mut self) -> bool {
        match MilestoneContract::new().validate(&self.milestones) {
            Ok(()) => {
                self.errors = ValidationErrors::new();
                true
            }
            Err(errors) => {
                self.errors = errors;
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sb_models::ChangeRequestKind;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fixed_price_contract() -> ContractSnapshot {
        ContractSnapshot {
            id: Some(8),
            code: "SOW-008".to_string(),
            title: "Fixed price".to_string(),
            kind: ChangeRequestKind::SowFixedPrice,
            effective_start: Some(date(2025, 1, 1)),
            effective_end: Some(date(2025, 12, 31)),
            value: 1_000_000.0,
            billing_day: Some("15th of every month".to_string()),
            billing_lines: Vec::new(),
        }
    }

    fn milestone(name: &str, pct: f64, planned_end: Option<NaiveDate>) -> MilestoneInput {
        MilestoneInput {
            milestone: name.to_string(),
            payment_percentage: pct,
            planned_end,
            ..MilestoneInput::default()
        }
    }

    #[test]
    fn test_billing_regenerated_from_milestones() {
        let editor = MilestoneEditor::new(
            &fixed_price_contract(),
            vec![milestone("Phase 1", 30.0, Some(date(2025, 3, 10)))],
        );

        let line = &editor.billing_lines()[0];
        assert_eq!(line.billing_name, "Phase 1 Payment");
        assert_eq!(line.amount, 300_000);
        assert_eq!(line.invoice_date, Some(date(2025, 3, 15)));
    }

    #[test]
    fn test_negative_percentage_clamps_to_zero() {
        let mut editor = MilestoneEditor::new(
            &fixed_price_contract(),
            vec![milestone("Phase 1", 30.0, None)],
        );

        assert!(editor.set_percentage(0, -5.0));
        assert_eq!(editor.milestones()[0].payment_percentage, 0.0);
        assert_eq!(editor.billing_lines()[0].amount, 0);
    }

    #[test]
    fn test_single_percentage_above_hundred_rejected() {
        let mut editor = MilestoneEditor::new(
            &fixed_price_contract(),
            vec![milestone("Phase 1", 30.0, None)],
        );

        assert!(!editor.set_percentage(0, 150.0));
        assert_eq!(editor.milestones()[0].payment_percentage, 30.0);
        assert!(editor.errors().has_indexed("paymentPercentage", 0));
    }

    #[test]
    fn test_total_above_hundred_rejected_and_unchanged() {
        let mut editor = MilestoneEditor::new(
            &fixed_price_contract(),
            vec![milestone("Phase 1", 70.0, None), milestone("Phase 2", 20.0, None)],
        );

        assert!(!editor.set_percentage(1, 50.0));
        assert_eq!(editor.milestones()[1].payment_percentage, 20.0);
        assert!(!editor.errors().base_errors.is_empty());

        // A valid follow-up edit clears the rejection.
        assert!(editor.set_percentage(1, 30.0));
        assert!(editor.errors().is_empty());
    }

    #[test]
    fn test_planned_end_moves_invoice_date() {
        let mut editor = MilestoneEditor::new(
            &fixed_price_contract(),
            vec![milestone("Phase 1", 30.0, Some(date(2025, 3, 10)))],
        );

        editor.set_planned_end(0, Some(date(2025, 3, 20)));
        assert_eq!(editor.billing_lines()[0].invoice_date, Some(date(2025, 4, 15)));
    }
}
