//! Contract snapshots
//!
//! The backend owns the contract record; the client holds the last-fetched
//! authoritative snapshot. Only the fields the change-request workflow reads
//! are modelled here.

use chrono::NaiveDate;
use sb_core::error::{SbError, ValidationErrors};
use sb_core::traits::{Id, Identifiable};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::change_request::ChangeRequestKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngagementType {
    #[serde(rename = "Fixed Price")]
    FixedPrice,
    Retainer,
}

/// A billing row already on the contract, against which retainer
/// adjustments apply and Remove Scope refunds are bounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineBillingLine {
    pub billing_name: String,
    pub amount: f64,
    pub invoice_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default)]
    pub delivery_note: String,
}

/// Authoritative snapshot of a contract, as fetched per edit session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContractSnapshot {
    pub id: Option<Id>,
    #[validate(length(min = 1))]
    pub code: String,
    pub title: String,
    pub kind: ChangeRequestKind,
    pub effective_start: Option<NaiveDate>,
    pub effective_end: Option<NaiveDate>,
    /// Total contract value (Fixed-Price)
    #[serde(default)]
    pub value: f64,
    /// Configured billing day label, e.g. "15th" or "Last business day"
    pub billing_day: Option<String>,
    #[serde(default)]
    pub billing_lines: Vec<BaselineBillingLine>,
}

impl Identifiable for ContractSnapshot {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl ContractSnapshot {
    pub fn engagement(&self) -> Option<EngagementType> {
        self.kind.engagement()
    }

    /// Field constraints on an adopted snapshot. A record that fails here
    /// is not a usable basis for an edit session.
    pub fn ensure_valid(&self) -> Result<(), SbError> {
        match Validate::validate(self) {
            Ok(()) => Ok(()),
            Err(field_errors) => {
                let mut errors = ValidationErrors::new();
                for (field, messages) in field_errors.field_errors() {
                    for error in messages {
                        let message = match &error.message {
                            Some(message) => message.to_string(),
                            None => format!("{} is invalid", field),
                        };
                        errors.add(field, message);
                    }
                }
                Err(SbError::Validation(errors))
            }
        }
    }

    /// Sum of billing amounts whose invoice date is strictly after `today`
    /// and which are not already marked paid. This bounds the refund a
    /// Remove Scope request may claim.
    pub fn future_unpaid_total(&self, today: NaiveDate) -> f64 {
        self.billing_lines
            .iter()
            .filter(|line| !line.is_paid)
            .filter(|line| matches!(line.invoice_date, Some(d) if d > today))
            .map(|line| line.amount)
            .sum()
    }
}
