//! Impact analysis for Fixed-Price change requests

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Projected impact of a Fixed-Price change request. The additional cost is
/// positive extra cost for every type except Remove Scope, where it is a
/// negative refund bounded by the contract's remaining unpaid billing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactAnalysis {
    pub dev_hours: f64,
    pub test_hours: f64,
    pub new_end_date: Option<NaiveDate>,
    /// Delay in days
    #[serde(rename = "delayDuration")]
    pub delay_days: i64,
    pub additional_cost: f64,
}

impl ImpactAnalysis {
    pub fn is_refund(&self) -> bool {
        self.additional_cost < 0.0
    }

    pub fn refund_amount(&self) -> f64 {
        self.additional_cost.abs()
    }
}
