//! Billing lines
//!
//! Two very different shapes share this module:
//! - Fixed-Price contracts generate one read-only billing row per milestone,
//!   with the invoice date derived from the milestone's planned end and the
//!   contract's configured billing day.
//! - Retainer change requests carry signed adjustments applied on top of the
//!   contract's baseline schedule.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Signed delta on top of a retainer contract's baseline billing schedule.
/// The amount may be positive or negative but never zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingAdjustment {
    pub payment_date: Option<NaiveDate>,
    #[serde(rename = "deliveryNote")]
    pub note: String,
    pub amount: f64,
}

/// Milestone data a Fixed-Price billing row is generated from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneInput {
    pub milestone: String,
    pub delivery_note: String,
    pub acceptance_criteria: String,
    pub planned_end: Option<NaiveDate>,
    /// Share of the contract value, 0-100
    pub payment_percentage: f64,
}

/// A generated Fixed-Price billing row. Not directly editable: edits go
/// through the milestone and are recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingLine {
    pub billing_name: String,
    pub milestone: String,
    pub amount: i64,
    pub percentage: Option<f64>,
    pub invoice_date: Option<NaiveDate>,
    pub is_paid: bool,
    pub delivery_note: String,
}

static BILLING_DAY_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

fn last_day_of_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}

fn date_clamped(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let day = day.min(last_day_of_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Derive the invoice date for a milestone from its planned end and the
/// contract's billing day.
///
/// "Last business day" (or any label containing "last") means the end of the
/// month; otherwise the first number found in the label is the billing day.
/// When the planned end falls after the billing day, the invoice moves to
/// the billing day of the following month. Days that overflow a short month
/// clamp to its last day.
pub fn derive_invoice_date(planned_end: NaiveDate, billing_day: Option<&str>) -> NaiveDate {
    let Some(billing_day) = billing_day else {
        return planned_end;
    };

    let day_number = if billing_day.to_lowercase().contains("last") {
        last_day_of_month(planned_end.year(), planned_end.month())
    } else {
        match BILLING_DAY_NUMBER
            .find(billing_day)
            .and_then(|m| m.as_str().parse::<u32>().ok())
        {
            Some(n) => n,
            None => return planned_end,
        }
    };

    let (year, month) = if planned_end.day() > day_number {
        if planned_end.month() == 12 {
            (planned_end.year() + 1, 1)
        } else {
            (planned_end.year(), planned_end.month() + 1)
        }
    } else {
        (planned_end.year(), planned_end.month())
    };

    date_clamped(year, month, day_number).unwrap_or(planned_end)
}

impl BillingLine {
    /// Generate the billing row for a milestone against a contract value.
    pub fn for_milestone(
        milestone: &MilestoneInput,
        contract_value: f64,
        billing_day: Option<&str>,
    ) -> Self {
        let billing_name = if milestone.milestone.is_empty() {
            "Payment".to_string()
        } else {
            format!("{} Payment", milestone.milestone)
        };
        Self {
            billing_name,
            milestone: milestone.milestone.clone(),
            amount: (contract_value * milestone.payment_percentage / 100.0).round() as i64,
            percentage: Some(milestone.payment_percentage),
            invoice_date: milestone
                .planned_end
                .map(|end| derive_invoice_date(end, billing_day)),
            is_paid: false,
            delivery_note: milestone.delivery_note.clone(),
        }
    }
}
