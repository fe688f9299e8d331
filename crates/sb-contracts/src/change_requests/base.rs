//! Base contract for change requests

use sb_core::error::ValidationErrors;
use sb_models::ChangeRequest;

use crate::base::{Contract, ValidationResult};

/// Field checks shared by every change request regardless of kind.
#[derive(Debug, Default)]
pub struct ChangeRequestBaseContract;

impl ChangeRequestBaseContract {
    pub fn new() -> Self {
        Self
    }

    /// Validate title is present
    pub fn validate_title(&self, title: &str, errors: &mut ValidationErrors) {
        if title.trim().is_empty() {
            errors.add("title", "can't be blank");
        }
    }

    /// Validate the type belongs to the draft's contract kind
    pub fn validate_type(&self, entity: &ChangeRequest, errors: &mut ValidationErrors) {
        if !entity.change_type.matches_kind(entity.kind) {
            errors.add("type", "is not valid for this contract");
        }
    }

    /// Validate summary is present
    pub fn validate_summary(&self, summary: &str, errors: &mut ValidationErrors) {
        if summary.trim().is_empty() {
            errors.add("summary", "can't be blank");
        }
    }

    /// Validate both effective dates are present and ordered
    pub fn validate_effective_range(&self, entity: &ChangeRequest, errors: &mut ValidationErrors) {
        match (entity.effective_from, entity.effective_until) {
            (None, None) => {
                errors.add("effectiveFrom", "can't be blank");
                errors.add("effectiveUntil", "can't be blank");
            }
            (None, Some(_)) => errors.add("effectiveFrom", "can't be blank"),
            (Some(_), None) => errors.add("effectiveUntil", "can't be blank"),
            (Some(from), Some(until)) => {
                if until <= from {
                    errors.add("effectiveUntil", "must be after the effective from date");
                }
            }
        }
    }
}

impl Contract<ChangeRequest> for ChangeRequestBaseContract {
    fn validate(&self, entity: &ChangeRequest) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        self.validate_title(&entity.title, &mut errors);
        self.validate_type(entity, &mut errors);
        self.validate_summary(&entity.summary, &mut errors);
        self.validate_effective_range(entity, &mut errors);

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
    use chrono::NaiveDate;
    use sb_models::ChangeRequestKind;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn filled_draft() -> ChangeRequest {
        let mut cr = ChangeRequest::new_draft(1, ChangeRequestKind::Msa);
        cr.title = "Add 1 QA".to_string();
        cr.summary = "Extend the QA team".to_string();
        cr.effective_from = Some(date(2025, 1, 1));
        cr.effective_until = Some(date(2025, 6, 1));
        cr
    }

    #[test]
    fn test_filled_draft_passes() {
        let contract = ChangeRequestBaseContract::new();
        assert!(contract.validate(&filled_draft()).is_ok());
    }

    #[test]
    fn test_blank_required_fields_reported_together() {
        let contract = ChangeRequestBaseContract::new();
        let cr = ChangeRequest::new_draft(1, ChangeRequestKind::Msa);

        let errors = contract.validate(&cr).unwrap_err();
        assert!(errors.has_error("title"));
        assert!(errors.has_error("summary"));
        assert!(errors.has_error("effectiveFrom"));
        assert!(errors.has_error("effectiveUntil"));
    }

    #[test]
    fn test_effective_until_must_follow_from() {
        let contract = ChangeRequestBaseContract::new();
        let mut cr = filled_draft();
        cr.effective_until = cr.effective_from;

        let errors = contract.validate(&cr).unwrap_err();
        assert!(errors.has_error("effectiveUntil"));
        assert!(!errors.has_error("effectiveFrom"));
    }
}
