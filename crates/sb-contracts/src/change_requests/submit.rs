//! Submit contract for change requests
//!
//! `save` is never gated; submitting for internal review runs the checks
//! here. All violations are collected and reported together so the whole
//! form can light up at once.

use chrono::NaiveDate;
use sb_core::error::ValidationErrors;
use sb_models::{ChangeRequest, ChangeRequestKind, ContractSnapshot, ImpactAnalysis};

use super::base::ChangeRequestBaseContract;
use crate::base::{Contract, ValidationResult};

/// Full validation gate run before a draft is submitted for review.
/// Only the sections relevant to the draft's kind and type are checked.
pub struct SubmitChangeRequestContract<'a> {
    base: ChangeRequestBaseContract,
    contract: &'a ContractSnapshot,
    today: NaiveDate,
}

impl<'a> SubmitChangeRequestContract<'a> {
    pub fn new(contract: &'a ContractSnapshot, today: NaiveDate) -> Self {
        Self {
            base: ChangeRequestBaseContract::new(),
            contract,
            today,
        }
    }

    /// Validate every engineer row that is not soft-removed.
    ///
    /// RESOURCE_CHANGE rows may not start before the contract does and use
    /// an inclusive end-date bound; other retainer types only require the
    /// end date to strictly follow the start date.
    fn validate_engineer_rows(&self, entity: &ChangeRequest, errors: &mut ValidationErrors) {
        let resource_change = entity.change_type.is_resource_change();
        let mut remaining = 0usize;

        for (index, row) in entity.engineers.iter().enumerate() {
            if row.is_removed() {
                continue;
            }
            remaining += 1;

            if row.level_label.trim().is_empty() {
                errors.add_indexed("engineerLevel", index, "can't be blank");
            }

            match row.start_date {
                None => errors.add_indexed("startDate", index, "can't be blank"),
                Some(start) => {
                    if resource_change {
                        if let Some(floor) = self.contract.effective_start {
                            if start < floor {
                                errors.add_indexed(
                                    "startDate",
                                    index,
                                    "must be on or after the contract start date",
                                );
                            }
                        }
                    }
                    if let Some(end) = row.end_date {
                        if resource_change {
                            if end < start {
                                errors.add_indexed(
                                    "endDate",
                                    index,
                                    "must be on or after the start date",
                                );
                            }
                        } else if end <= start {
                            errors.add_indexed("endDate", index, "must be after the start date");
                        }
                    }
                }
            }

            if !(0.0..=100.0).contains(&row.rating) {
                errors.add_indexed("rating", index, "must be between 0 and 100");
            }

            if row.compensation.amount() <= 0.0 {
                errors.add_indexed("compensation", index, "must be greater than 0");
            }
        }

        if resource_change && remaining == 0 {
            errors.add_base("At least one engineer must remain on the contract");
        }
    }

    /// Retainer billing adjustments are optional, but each one present
    /// must be complete and carry a non-zero signed amount.
    fn validate_billing_adjustments(&self, entity: &ChangeRequest, errors: &mut ValidationErrors) {
        for (index, adjustment) in entity.billing_adjustments.iter().enumerate() {
            if adjustment.payment_date.is_none() {
                errors.add_indexed("adjustmentDate", index, "can't be blank");
            }
            if adjustment.note.trim().is_empty() {
                errors.add_indexed("adjustmentNote", index, "can't be blank");
            }
            if adjustment.amount == 0.0 {
                errors.add_indexed("adjustmentAmount", index, "can't be zero");
            }
        }
    }

    /// Fixed-Price impact analysis. The additional-cost sign depends on the
    /// type: Remove Scope records a refund, whose magnitude must stay
    /// strictly below the contract's remaining future billing; every other
    /// type requires a strictly positive cost.
    fn validate_impact_analysis(&self, entity: &ChangeRequest, errors: &mut ValidationErrors) {
        let impact = entity.impact.clone().unwrap_or_else(ImpactAnalysis::default);

        if impact.dev_hours <= 0.0 {
            errors.add("devHours", "must be greater than 0");
        }
        if impact.test_hours <= 0.0 {
            errors.add("testHours", "must be greater than 0");
        }
        if impact.new_end_date.is_none() {
            errors.add("newEndDate", "can't be blank");
        }
        if impact.delay_days <= 0 {
            errors.add("delayDuration", "must be greater than 0");
        }

        if entity.change_type.is_remove_scope() {
            if impact.additional_cost >= 0.0 {
                errors.add("additionalCost", "must be a negative refund amount");
            } else if impact.refund_amount() >= self.contract.future_unpaid_total(self.today) {
                errors.add(
                    "additionalCost",
                    "refund exceeds the contract's remaining future billing",
                );
            }
        } else if impact.additional_cost <= 0.0 {
            errors.add("additionalCost", "must be greater than 0");
        }
    }

    fn validate_reviewer(&self, entity: &ChangeRequest, errors: &mut ValidationErrors) {
        if entity.internal_reviewer_id.is_none() {
            errors.add("internalReviewer", "must be selected");
        }
    }
}

impl<'a> Contract<ChangeRequest> for SubmitChangeRequestContract<'a> {
    fn validate(&self, entity: &ChangeRequest) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        if let Err(base_errors) = self.base.validate(entity) {
            errors.merge(base_errors);
        }

        match entity.kind {
            ChangeRequestKind::SowRetainer => {
                self.validate_engineer_rows(entity, &mut errors);
                self.validate_billing_adjustments(entity, &mut errors);
            }
            ChangeRequestKind::SowFixedPrice => {
                self.validate_impact_analysis(entity, &mut errors);
            }
            ChangeRequestKind::Msa => {}
        }

        self.validate_reviewer(entity, &mut errors);

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
    use sb_models::{
        BaselineBillingLine, BillingAdjustment, ChangeType, Compensation, EngineerAssignment,
        FixedPriceChangeType, RetainerChangeType,
    };

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn retainer_contract() -> ContractSnapshot {
        ContractSnapshot {
            id: Some(7),
            code: "SOW-007".to_string(),
            title: "Retainer".to_string(),
            kind: ChangeRequestKind::SowRetainer,
            effective_start: Some(date(2024, 6, 1)),
            effective_end: Some(date(2025, 12, 31)),
            value: 0.0,
            billing_day: None,
            billing_lines: Vec::new(),
        }
    }

    fn fixed_price_contract() -> ContractSnapshot {
        ContractSnapshot {
            id: Some(8),
            code: "SOW-008".to_string(),
            title: "Fixed price".to_string(),
            kind: ChangeRequestKind::SowFixedPrice,
            effective_start: Some(date(2024, 6, 1)),
            effective_end: Some(date(2025, 12, 31)),
            value: 2_000_000.0,
            billing_day: Some("15th of every month".to_string()),
            billing_lines: vec![
                BaselineBillingLine {
                    billing_name: "Phase 1 Payment".to_string(),
                    amount: 300_000.0,
                    invoice_date: Some(date(2025, 3, 15)),
                    is_paid: false,
                    delivery_note: String::new(),
                },
                BaselineBillingLine {
                    billing_name: "Phase 2 Payment".to_string(),
                    amount: 200_000.0,
                    invoice_date: Some(date(2025, 6, 15)),
                    is_paid: false,
                    delivery_note: String::new(),
                },
            ],
        }
    }

    fn valid_row() -> EngineerAssignment {
        let mut row = EngineerAssignment::blank();
        row.set_level_label("Middle QA");
        row.start_date = Some(date(2025, 1, 1));
        row.compensation = Compensation::monthly(500_000.0);
        row
    }

    fn retainer_draft() -> ChangeRequest {
        let mut cr = ChangeRequest::new_draft(7, ChangeRequestKind::SowRetainer);
        cr.title = "Add 1 QA".to_string();
        cr.summary = "Staff one more QA engineer".to_string();
        cr.effective_from = Some(date(2025, 1, 1));
        cr.effective_until = Some(date(2025, 6, 1));
        cr.engineers = vec![valid_row()];
        cr.internal_reviewer_id = Some(42);
        cr
    }

    fn fixed_price_draft(change_type: FixedPriceChangeType) -> ChangeRequest {
        let mut cr = ChangeRequest::new_draft(8, ChangeRequestKind::SowFixedPrice);
        cr.title = "Scope change".to_string();
        cr.summary = "Adjust the delivered scope".to_string();
        cr.change_type = ChangeType::FixedPrice(change_type);
        cr.effective_from = Some(date(2025, 1, 1));
        cr.effective_until = Some(date(2025, 6, 1));
        cr.impact = Some(ImpactAnalysis {
            dev_hours: 40.0,
            test_hours: 16.0,
            new_end_date: Some(date(2026, 1, 31)),
            delay_days: 31,
            additional_cost: 120_000.0,
        });
        cr.internal_reviewer_id = Some(42);
        cr
    }

    #[test]
    fn test_complete_resource_change_passes() {
        let contract = retainer_contract();
        let gate = SubmitChangeRequestContract::new(&contract, date(2025, 1, 2));
        assert!(gate.validate(&retainer_draft()).is_ok());
    }

    #[test]
    fn test_row_before_contract_start_rejected() {
        let contract = retainer_contract();
        let gate = SubmitChangeRequestContract::new(&contract, date(2025, 1, 2));

        let mut cr = retainer_draft();
        cr.engineers[0].start_date = Some(date(2024, 1, 1));

        let errors = gate.validate(&cr).unwrap_err();
        assert!(errors.has_indexed("startDate", 0));
    }

    #[test]
    fn test_schedule_change_end_must_strictly_follow_start() {
        let contract = retainer_contract();
        let gate = SubmitChangeRequestContract::new(&contract, date(2025, 1, 2));

        let mut cr = retainer_draft();
        cr.change_type = ChangeType::Retainer(RetainerChangeType::ScheduleChange);
        cr.engineers[0].start_date = Some(date(2025, 2, 1));
        cr.engineers[0].end_date = Some(date(2025, 2, 1));

        let errors = gate.validate(&cr).unwrap_err();
        assert!(errors.has_indexed("endDate", 0));

        // The same dates pass for RESOURCE_CHANGE, whose bound is inclusive.
        let mut cr = retainer_draft();
        cr.engineers[0].start_date = Some(date(2025, 2, 1));
        cr.engineers[0].end_date = Some(date(2025, 2, 1));
        assert!(gate.validate(&cr).is_ok());
    }

    #[test]
    fn test_all_rows_removed_rejected() {
        let contract = retainer_contract();
        let gate = SubmitChangeRequestContract::new(&contract, date(2025, 1, 2));

        let mut cr = retainer_draft();
        cr.engineers[0].soft_remove(date(2025, 1, 1));

        let errors = gate.validate(&cr).unwrap_err();
        assert!(!errors.base_errors.is_empty());
    }

    #[test]
    fn test_removed_rows_skip_field_checks() {
        let contract = retainer_contract();
        let gate = SubmitChangeRequestContract::new(&contract, date(2025, 1, 2));

        let mut cr = retainer_draft();
        let mut removed = EngineerAssignment::blank();
        removed.soft_remove(date(2025, 1, 1));
        cr.engineers.push(removed);

        assert!(gate.validate(&cr).is_ok());
    }

    #[test]
    fn test_hourly_compensation_must_be_positive() {
        let contract = retainer_contract();
        let gate = SubmitChangeRequestContract::new(&contract, date(2025, 1, 2));

        let mut cr = retainer_draft();
        cr.engineers[0].compensation = Compensation::hourly(0.0, 160.0);

        let errors = gate.validate(&cr).unwrap_err();
        assert!(errors.has_indexed("compensation", 0));
    }

    #[test]
    fn test_incomplete_adjustment_rejected() {
        let contract = retainer_contract();
        let gate = SubmitChangeRequestContract::new(&contract, date(2025, 1, 2));

        let mut cr = retainer_draft();
        cr.billing_adjustments.push(BillingAdjustment {
            payment_date: None,
            note: String::new(),
            amount: 0.0,
        });

        let errors = gate.validate(&cr).unwrap_err();
        assert!(errors.has_indexed("adjustmentDate", 0));
        assert!(errors.has_indexed("adjustmentNote", 0));
        assert!(errors.has_indexed("adjustmentAmount", 0));
    }

    #[test]
    fn test_add_scope_requires_positive_cost() {
        let contract = fixed_price_contract();
        let gate = SubmitChangeRequestContract::new(&contract, date(2025, 1, 2));

        let mut cr = fixed_price_draft(FixedPriceChangeType::AddScope);
        cr.impact.as_mut().unwrap().additional_cost = -100.0;

        let errors = gate.validate(&cr).unwrap_err();
        assert!(errors.has_error("additionalCost"));
    }

    #[test]
    fn test_remove_scope_refund_bounded_by_future_billing() {
        let contract = fixed_price_contract();
        let gate = SubmitChangeRequestContract::new(&contract, date(2025, 1, 2));

        // Future billing totals 500,000; a 1,000,000 refund exceeds it.
        let mut cr = fixed_price_draft(FixedPriceChangeType::RemoveScope);
        cr.impact.as_mut().unwrap().additional_cost = -1_000_000.0;
        let errors = gate.validate(&cr).unwrap_err();
        assert!(errors.has_error("additionalCost"));

        cr.impact.as_mut().unwrap().additional_cost = -400_000.0;
        assert!(gate.validate(&cr).is_ok());
    }

    #[test]
    fn test_missing_reviewer_reported_with_other_errors() {
        let contract = retainer_contract();
        let gate = SubmitChangeRequestContract::new(&contract, date(2025, 1, 2));

        let mut cr = retainer_draft();
        cr.title.clear();
        cr.internal_reviewer_id = None;

        let errors = gate.validate(&cr).unwrap_err();
        assert!(errors.has_error("title"));
        assert!(errors.has_error("internalReviewer"));
    }
}
