//! Draft form state
//!
//! The draft is the user's working copy of a change request. Every setter
//! clears the error flag of the field it touches so the form recovers as
//! the user types; validation only runs again on the next submit attempt.

use chrono::NaiveDate;
use sb_contracts::base::Contract;
use sb_contracts::change_requests::SubmitChangeRequestContract;
use sb_core::error::{SbError, ValidationErrors};
use sb_models::{
    BillingAdjustment, ChangeRequest, ChangeRequestKind, ChangeType, Compensation,
    ContractSnapshot, EngineerAssignment, ImpactAnalysis, SalesUser,
};

/// Working copy of a change request plus its current error flags.
#[derive(Debug, Clone)]
pub struct ChangeRequestDraft {
    record: ChangeRequest,
    errors: ValidationErrors,
    /// Contract end date, used to seed new engineer rows
    contract_end: Option<NaiveDate>,
    /// Whether the user has edited the engineer list since it was seeded
    touched_engineers: bool,
}

impl ChangeRequestDraft {
    /// A fresh draft for a contract. Retainer drafts open with one blank
    /// engineer row; Fixed-Price drafts open with a zeroed impact analysis.
    pub fn for_contract(contract: &ContractSnapshot, kind: ChangeRequestKind) -> Self {
        let mut record = ChangeRequest::new_draft(contract.id.unwrap_or_default(), kind);
        if kind.is_retainer() {
            record.engineers.push(EngineerAssignment::blank());
        }
        Self {
            record,
            errors: ValidationErrors::new(),
            contract_end: contract.effective_end,
            touched_engineers: false,
        }
    }

    /// Wrap an authoritative record fetched from the backend.
    pub fn from_record(record: ChangeRequest, contract: &ContractSnapshot) -> Self {
        Self {
            record,
            errors: ValidationErrors::new(),
            contract_end: contract.effective_end,
            touched_engineers: false,
        }
    }

    pub fn record(&self) -> &ChangeRequest {
        &self.record
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn engineers_untouched(&self) -> bool {
        !self.touched_engineers
    }

    // ---- header fields ----

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.record.title = title.into();
        self.errors.clear("title");
    }

    /// Change the request type. Types from another contract kind are
    /// refused; returns whether the type was applied.
    pub fn set_change_type(&mut self, change_type: ChangeType) -> bool {
        if !change_type.matches_kind(self.record.kind) {
            return false;
        }
        self.record.change_type = change_type;
        self.errors.clear("type");
        true
    }

    pub fn set_summary(&mut self, summary: impl Into<String>) {
        self.record.summary = summary.into();
        self.errors.clear("summary");
    }

    /// Returns whether the date actually changed, so the caller knows a
    /// resource snapshot reload is due.
    pub fn set_effective_from(&mut self, date: Option<NaiveDate>) -> bool {
        let changed = self.record.effective_from != date;
        self.record.effective_from = date;
        self.errors.clear("effectiveFrom");
        changed
    }

    pub fn set_effective_until(&mut self, date: Option<NaiveDate>) {
        self.record.effective_until = date;
        self.errors.clear("effectiveUntil");
    }

    pub fn set_references(&mut self, references: impl Into<String>) {
        self.record.references = references.into();
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.record.comment = comment.into();
    }

    /// Only sales managers may be picked as the internal reviewer.
    pub fn set_reviewer(&mut self, reviewer: &SalesUser) -> Result<(), SbError> {
        if !reviewer.can_review() {
            return Err(SbError::forbidden(format!(
                "{} is not a sales manager",
                reviewer.full_name
            )));
        }
        self.record.internal_reviewer_id = Some(reviewer.id);
        self.record.internal_reviewer_name = reviewer.full_name.clone();
        self.errors.clear("internalReviewer");
        Ok(())
    }

    // ---- engineer rows ----

    /// Replace the engineer list wholesale, e.g. when seeding from the
    /// Before-view. Resets the touched flag.
    pub fn seed_engineers(&mut self, rows: Vec<EngineerAssignment>) {
        self.record.engineers = rows;
        self.touched_engineers = false;
    }

    /// Append a blank row, pre-filled with the draft's effective-from as
    /// start and the contract's end date as end.
    pub fn add_engineer_row(&mut self) {
        let mut row = EngineerAssignment::blank();
        row.start_date = self.record.effective_from;
        row.end_date = self.contract_end;
        self.record.engineers.push(row);
        self.touched_engineers = true;
    }

    /// Remove a row. Rows with a backend identity are soft-removed (kept
    /// in the list, tagged REMOVE, end date pinned to the day before the
    /// change takes effect); brand-new rows are deleted outright.
    /// Soft-removal needs an effective-from date and reports whether the
    /// row was handled.
    pub fn remove_engineer_row(&mut self, index: usize) -> bool {
        let Some(row) = self.record.engineers.get_mut(index) else {
            return false;
        };
        if row.has_backend_identity() {
            let Some(effective_from) = self.record.effective_from else {
                return false;
            };
            row.soft_remove(effective_from);
        } else {
            self.record.engineers.remove(index);
        }
        self.touched_engineers = true;
        true
    }

    pub fn set_row_level_label(&mut self, index: usize, label: impl Into<String>) {
        if let Some(row) = self.record.engineers.get_mut(index) {
            row.set_level_label(label);
            row.mark_edited();
            self.errors.clear_indexed("engineerLevel", index);
            self.touched_engineers = true;
        }
    }

    pub fn set_row_start(&mut self, index: usize, date: Option<NaiveDate>) {
        if let Some(row) = self.record.engineers.get_mut(index) {
            row.start_date = date;
            row.mark_edited();
            self.errors.clear_indexed("startDate", index);
            self.touched_engineers = true;
        }
    }

    pub fn set_row_end(&mut self, index: usize, date: Option<NaiveDate>) {
        if let Some(row) = self.record.engineers.get_mut(index) {
            row.end_date = date;
            row.mark_edited();
            self.errors.clear_indexed("endDate", index);
            self.touched_engineers = true;
        }
    }

    pub fn set_row_rating(&mut self, index: usize, rating: f64) {
        if let Some(row) = self.record.engineers.get_mut(index) {
            row.rating = rating;
            row.mark_edited();
            self.errors.clear_indexed("rating", index);
            self.touched_engineers = true;
        }
    }

    pub fn set_row_monthly(&mut self, index: usize, salary: f64) {
        if let Some(row) = self.record.engineers.get_mut(index) {
            row.compensation = Compensation::monthly(salary);
            row.mark_edited();
            self.errors.clear_indexed("compensation", index);
            self.touched_engineers = true;
        }
    }

    /// Hourly edits always recompute the subtotal from rate and hours.
    pub fn set_row_hourly(&mut self, index: usize, rate: f64, hours: f64) {
        if let Some(row) = self.record.engineers.get_mut(index) {
            row.compensation = Compensation::hourly(rate, hours);
            row.mark_edited();
            self.errors.clear_indexed("compensation", index);
            self.touched_engineers = true;
        }
    }

    /// Switch a row's billing mode, keeping existing values where they
    /// translate (salary does not; rate and hours do not).
    pub fn set_row_billing_mode(&mut self, index: usize, hourly: bool) {
        if let Some(row) = self.record.engineers.get_mut(index) {
            if row.compensation.is_hourly() != hourly {
                row.compensation = if hourly {
                    Compensation::hourly(0.0, 0.0)
                } else {
                    Compensation::monthly(0.0)
                };
                row.mark_edited();
                self.errors.clear_indexed("compensation", index);
                self.touched_engineers = true;
            }
        }
    }

    // ---- billing adjustments ----

    pub fn add_adjustment(&mut self) {
        self.record.billing_adjustments.push(BillingAdjustment::default());
    }

    pub fn remove_adjustment(&mut self, index: usize) {
        if index < self.record.billing_adjustments.len() {
            self.record.billing_adjustments.remove(index);
            self.errors.clear_indexed("adjustmentDate", index);
            self.errors.clear_indexed("adjustmentNote", index);
            self.errors.clear_indexed("adjustmentAmount", index);
        }
    }

    pub fn set_adjustment_date(&mut self, index: usize, date: Option<NaiveDate>) {
        if let Some(adjustment) = self.record.billing_adjustments.get_mut(index) {
            adjustment.payment_date = date;
            self.errors.clear_indexed("adjustmentDate", index);
        }
    }

    pub fn set_adjustment_note(&mut self, index: usize, note: impl Into<String>) {
        if let Some(adjustment) = self.record.billing_adjustments.get_mut(index) {
            adjustment.note = note.into();
            self.errors.clear_indexed("adjustmentNote", index);
        }
    }

    pub fn set_adjustment_amount(&mut self, index: usize, amount: f64) {
        if let Some(adjustment) = self.record.billing_adjustments.get_mut(index) {
            adjustment.amount = amount;
            self.errors.clear_indexed("adjustmentAmount", index);
        }
    }

    // ---- impact analysis ----

    fn impact_mut(&mut self) -> &mut ImpactAnalysis {
        self.record.impact.get_or_insert_with(ImpactAnalysis::default)
    }

    pub fn set_dev_hours(&mut self, hours: f64) {
        self.impact_mut().dev_hours = hours;
        self.errors.clear("devHours");
    }

    pub fn set_test_hours(&mut self, hours: f64) {
        self.impact_mut().test_hours = hours;
        self.errors.clear("testHours");
    }

    pub fn set_new_end_date(&mut self, date: Option<NaiveDate>) {
        self.impact_mut().new_end_date = date;
        self.errors.clear("newEndDate");
    }

    pub fn set_delay_days(&mut self, days: i64) {
        self.impact_mut().delay_days = days;
        self.errors.clear("delayDuration");
    }

    pub fn set_additional_cost(&mut self, cost: f64) {
        self.impact_mut().additional_cost = cost;
        self.errors.clear("additionalCost");
    }

    // ---- validation ----

    /// Run the submit gate. On failure the full error map replaces the
    /// current flags and the draft itself stays untouched.
    pub fn validate_for_submit(&mut self, contract: &ContractSnapshot, today: NaiveDate) -> bool {
        let gate = SubmitChangeRequestContract::new(contract, today);
        match gate.validate(&self.record) {
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

    /// Adopt the authoritative record after a successful backend mutation.
    pub fn resync(&mut self, record: ChangeRequest) {
        self.record = record;
        self.errors = ValidationErrors::new();
        self.touched_engineers = false;
    }
}
