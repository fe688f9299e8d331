//! Wire DTOs
//!
//! The backend speaks camelCase JSON. Engineer rows travel flat (billing
//! fields side by side with a discriminating `billingType`), so the draft's
//! tagged compensation is unfolded here and refolded on the way back in.

use chrono::{DateTime, NaiveDate, Utc};
use sb_core::traits::Id;
use sb_models::{
    AttachmentMeta, BaselineBillingLine, BillingAdjustment, Compensation, CurrentResource,
    EngineerAssignment, ImpactAnalysis, RowAction,
};
use serde::{Deserialize, Serialize};

/// Draft action carried inside the create/update body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftAction {
    Save,
    Submit,
}

/// Create/update request body for a change request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRequestPayload {
    pub contract_id: Id,
    pub title: String,
    #[serde(rename = "type")]
    pub change_type: String,
    pub summary: String,
    pub effective_from: Option<NaiveDate>,
    pub effective_until: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub references: String,
    pub action: DraftAction,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub engineers: Vec<EngineerRowDto>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub billing_adjustments: Vec<BillingAdjustment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact_analysis: Option<ImpactAnalysis>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<AttachmentMeta>,
}

/// One engineer row as the backend expects it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineerRowDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_engineer_id: Option<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engineer_id: Option<Id>,
    pub action: RowAction,
    pub engineer_level: String,
    pub level: String,
    pub role: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub rating: f64,
    pub billing_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<f64>,
}

impl From<&EngineerAssignment> for EngineerRowDto {
    fn from(row: &EngineerAssignment) -> Self {
        let mut dto = Self {
            base_engineer_id: row.base_engineer_id,
            engineer_id: row.engineer_id,
            action: row.action,
            engineer_level: row.level_label.clone(),
            level: row.level.clone(),
            role: row.role.clone(),
            start_date: row.start_date,
            end_date: row.end_date,
            rating: row.rating,
            billing_type: String::new(),
            salary: None,
            hourly_rate: None,
            hours: None,
            subtotal: None,
        };
        match &row.compensation {
            Compensation::Monthly { salary } => {
                dto.billing_type = "Monthly".to_string();
                dto.salary = Some(*salary);
            }
            Compensation::Hourly { rate, hours, .. } => {
                dto.billing_type = "Hourly".to_string();
                dto.hourly_rate = Some(*rate);
                dto.hours = Some(*hours);
                // Subtotal is derived, never trusted from stored state.
                dto.subtotal = Some(rate * hours);
            }
        }
        dto
    }
}

impl EngineerRowDto {
    pub fn into_assignment(self) -> EngineerAssignment {
        let compensation = if self.billing_type == "Hourly" {
            Compensation::hourly(self.hourly_rate.unwrap_or(0.0), self.hours.unwrap_or(0.0))
        } else {
            Compensation::monthly(self.salary.unwrap_or(0.0))
        };
        EngineerAssignment {
            base_engineer_id: self.base_engineer_id,
            engineer_id: self.engineer_id,
            action: self.action,
            level: self.level,
            role: self.role,
            level_label: self.engineer_level,
            start_date: self.start_date,
            end_date: self.end_date,
            rating: self.rating,
            compensation,
        }
    }
}

/// Point-in-time resource listing for a contract
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentResourcesResponse {
    pub contract_id: Id,
    pub as_of: Option<NaiveDate>,
    #[serde(default)]
    pub resources: Vec<CurrentResource>,
}

/// Server-computed before/after comparison for a processing change request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRequestPreview {
    #[serde(default)]
    pub before_resources: Vec<CurrentResource>,
    #[serde(default)]
    pub after_resources: Vec<CurrentResource>,
    #[serde(default)]
    pub before_billing: Vec<BaselineBillingLine>,
    #[serde(default)]
    pub after_billing: Vec<BaselineBillingLine>,
}

/// Short-lived downloadable URL for a stored file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignedUrl {
    pub url: String,
    pub expires_at: Option<DateTime<Utc>>,
}
