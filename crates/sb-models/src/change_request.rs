//! Change request record
//!
//! The kind is a tagged variant (MSA vs Fixed-Price SOW vs Retainer SOW)
//! driving which sections, types, and validation rules apply, instead of the
//! optional-field soup the original wire format allowed.

use chrono::{DateTime, NaiveDate, Utc};
use sb_core::traits::{Auditable, Id, Identifiable, Timestamped};
use serde::{Deserialize, Serialize};

use crate::attachment::AttachmentMeta;
use crate::billing::BillingAdjustment;
use crate::contract::EngagementType;
use crate::engineer::EngineerAssignment;
use crate::impact::ImpactAnalysis;
use crate::status::{ActorRole, ChangeRequestStatus};

/// Which contract family a change request amends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChangeRequestKind {
    Msa,
    SowFixedPrice,
    SowRetainer,
}

impl ChangeRequestKind {
    pub fn engagement(&self) -> Option<EngagementType> {
        match self {
            ChangeRequestKind::Msa => None,
            ChangeRequestKind::SowFixedPrice => Some(EngagementType::FixedPrice),
            ChangeRequestKind::SowRetainer => Some(EngagementType::Retainer),
        }
    }

    pub fn is_retainer(&self) -> bool {
        *self == ChangeRequestKind::SowRetainer
    }

    pub fn is_fixed_price(&self) -> bool {
        *self == ChangeRequestKind::SowFixedPrice
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MsaChangeType {
    #[serde(rename = "Add Scope")]
    AddScope,
    #[serde(rename = "Remove Scope")]
    RemoveScope,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FixedPriceChangeType {
    #[serde(rename = "Extend Schedule")]
    ExtendSchedule,
    #[serde(rename = "Rate Change")]
    RateChange,
    #[serde(rename = "Increase Resource")]
    IncreaseResource,
    #[serde(rename = "Add Scope")]
    AddScope,
    #[serde(rename = "Remove Scope")]
    RemoveScope,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RetainerChangeType {
    ResourceChange,
    ScheduleChange,
    ScopeAdjustment,
}

/// Change-request type, scoped to the contract kind.
///
/// Serializes to its bare wire label. Labels overlap across kinds
/// ("Add Scope" exists for both MSA and Fixed-Price), so there is no
/// standalone `Deserialize`: a label is only meaningful next to a kind,
/// and [`ChangeType::parse`] is the one way back in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ChangeType {
    Msa(MsaChangeType),
    FixedPrice(FixedPriceChangeType),
    Retainer(RetainerChangeType),
}

impl ChangeType {
    /// Default type presented when a draft opens.
    pub fn default_for(kind: ChangeRequestKind) -> Self {
        match kind {
            ChangeRequestKind::Msa => ChangeType::Msa(MsaChangeType::AddScope),
            ChangeRequestKind::SowFixedPrice => {
                ChangeType::FixedPrice(FixedPriceChangeType::AddScope)
            }
            ChangeRequestKind::SowRetainer => {
                ChangeType::Retainer(RetainerChangeType::ResourceChange)
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChangeType::Msa(t) => match t {
                MsaChangeType::AddScope => "Add Scope",
                MsaChangeType::RemoveScope => "Remove Scope",
                MsaChangeType::Other => "Other",
            },
            ChangeType::FixedPrice(t) => match t {
                FixedPriceChangeType::ExtendSchedule => "Extend Schedule",
                FixedPriceChangeType::RateChange => "Rate Change",
                FixedPriceChangeType::IncreaseResource => "Increase Resource",
                FixedPriceChangeType::AddScope => "Add Scope",
                FixedPriceChangeType::RemoveScope => "Remove Scope",
                FixedPriceChangeType::Other => "Other",
            },
            ChangeType::Retainer(t) => match t {
                RetainerChangeType::ResourceChange => "RESOURCE_CHANGE",
                RetainerChangeType::ScheduleChange => "SCHEDULE_CHANGE",
                RetainerChangeType::ScopeAdjustment => "SCOPE_ADJUSTMENT",
            },
        }
    }

    /// Resolve a wire label against the contract kind. The kind decides
    /// which catalog the label is read from.
    pub fn parse(kind: ChangeRequestKind, label: &str) -> Option<Self> {
        match kind {
            ChangeRequestKind::Msa => match label {
                "Add Scope" => Some(ChangeType::Msa(MsaChangeType::AddScope)),
                "Remove Scope" => Some(ChangeType::Msa(MsaChangeType::RemoveScope)),
                "Other" => Some(ChangeType::Msa(MsaChangeType::Other)),
                _ => None,
            },
            ChangeRequestKind::SowFixedPrice => match label {
                "Extend Schedule" => {
                    Some(ChangeType::FixedPrice(FixedPriceChangeType::ExtendSchedule))
                }
                "Rate Change" => Some(ChangeType::FixedPrice(FixedPriceChangeType::RateChange)),
                "Increase Resource" => {
                    Some(ChangeType::FixedPrice(FixedPriceChangeType::IncreaseResource))
                }
                "Add Scope" => Some(ChangeType::FixedPrice(FixedPriceChangeType::AddScope)),
                "Remove Scope" => Some(ChangeType::FixedPrice(FixedPriceChangeType::RemoveScope)),
                "Other" => Some(ChangeType::FixedPrice(FixedPriceChangeType::Other)),
                _ => None,
            },
            ChangeRequestKind::SowRetainer => match label {
                "RESOURCE_CHANGE" => Some(ChangeType::Retainer(RetainerChangeType::ResourceChange)),
                "SCHEDULE_CHANGE" => Some(ChangeType::Retainer(RetainerChangeType::ScheduleChange)),
                "SCOPE_ADJUSTMENT" => {
                    Some(ChangeType::Retainer(RetainerChangeType::ScopeAdjustment))
                }
                _ => None,
            },
        }
    }

    pub fn matches_kind(&self, kind: ChangeRequestKind) -> bool {
        matches!(
            (self, kind),
            (ChangeType::Msa(_), ChangeRequestKind::Msa)
                | (ChangeType::FixedPrice(_), ChangeRequestKind::SowFixedPrice)
                | (ChangeType::Retainer(_), ChangeRequestKind::SowRetainer)
        )
    }

    pub fn is_resource_change(&self) -> bool {
        matches!(self, ChangeType::Retainer(RetainerChangeType::ResourceChange))
    }

    pub fn is_remove_scope(&self) -> bool {
        matches!(
            self,
            ChangeType::Msa(MsaChangeType::RemoveScope)
                | ChangeType::FixedPrice(FixedPriceChangeType::RemoveScope)
        )
    }
}

/// Internal review decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewAction {
    Approve,
    RequestRevision,
}

/// Read-only audit trail entry carried on the detail snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: Id,
    pub description: String,
    pub date: Option<DateTime<Utc>>,
    pub user: String,
    pub document_link: Option<String>,
}

/// A change request as held client-side: the working copy of a draft, or
/// the last-fetched authoritative record.
///
/// Deserialization goes through [`ChangeRequestWire`] so the type label is
/// resolved against the record's kind; serialization emits the bare label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ChangeRequestWire")]
pub struct ChangeRequest {
    pub id: Option<Id>,
    /// Human-readable code assigned by the backend, e.g. "CR-0012"
    pub code: Option<String>,
    pub contract_id: Id,
    pub kind: ChangeRequestKind,
    pub title: String,
    #[serde(rename = "type")]
    pub change_type: ChangeType,
    pub summary: String,
    pub effective_from: Option<NaiveDate>,
    pub effective_until: Option<NaiveDate>,
    #[serde(default)]
    pub references: String,
    #[serde(default)]
    pub attachments: Vec<AttachmentMeta>,
    pub status: ChangeRequestStatus,
    pub created_by_id: Option<Id>,
    #[serde(default)]
    pub created_by_name: String,
    pub internal_reviewer_id: Option<Id>,
    #[serde(default)]
    pub internal_reviewer_name: String,
    pub review_action: Option<ReviewAction>,
    #[serde(default)]
    pub review_notes: String,
    pub review_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub comment: String,
    pub impact: Option<ImpactAnalysis>,
    #[serde(default)]
    pub engineers: Vec<EngineerAssignment>,
    #[serde(default)]
    pub billing_adjustments: Vec<BillingAdjustment>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Wire shape of a change request, with the type still a raw label. The
/// label alone cannot pick a [`ChangeType`] variant because the MSA and
/// Fixed-Price catalogs share labels; the pairing is resolved in
/// [`TryFrom`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChangeRequestWire {
    id: Option<Id>,
    code: Option<String>,
    contract_id: Id,
    kind: ChangeRequestKind,
    title: String,
    #[serde(rename = "type")]
    change_type: String,
    summary: String,
    effective_from: Option<NaiveDate>,
    effective_until: Option<NaiveDate>,
    #[serde(default)]
    references: String,
    #[serde(default)]
    attachments: Vec<AttachmentMeta>,
    status: ChangeRequestStatus,
    created_by_id: Option<Id>,
    #[serde(default)]
    created_by_name: String,
    internal_reviewer_id: Option<Id>,
    #[serde(default)]
    internal_reviewer_name: String,
    review_action: Option<ReviewAction>,
    #[serde(default)]
    review_notes: String,
    review_date: Option<DateTime<Utc>>,
    #[serde(default)]
    comment: String,
    impact: Option<ImpactAnalysis>,
    #[serde(default)]
    engineers: Vec<EngineerAssignment>,
    #[serde(default)]
    billing_adjustments: Vec<BillingAdjustment>,
    #[serde(default)]
    history: Vec<HistoryEntry>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<ChangeRequestWire> for ChangeRequest {
    type Error = String;

    fn try_from(wire: ChangeRequestWire) -> Result<Self, Self::Error> {
        let change_type = ChangeType::parse(wire.kind, &wire.change_type).ok_or_else(|| {
            format!(
                "change type {:?} is not valid for kind {:?}",
                wire.change_type, wire.kind
            )
        })?;
        Ok(Self {
            id: wire.id,
            code: wire.code,
            contract_id: wire.contract_id,
            kind: wire.kind,
            title: wire.title,
            change_type,
            summary: wire.summary,
            effective_from: wire.effective_from,
            effective_until: wire.effective_until,
            references: wire.references,
            attachments: wire.attachments,
            status: wire.status,
            created_by_id: wire.created_by_id,
            created_by_name: wire.created_by_name,
            internal_reviewer_id: wire.internal_reviewer_id,
            internal_reviewer_name: wire.internal_reviewer_name,
            review_action: wire.review_action,
            review_notes: wire.review_notes,
            review_date: wire.review_date,
            comment: wire.comment,
            impact: wire.impact,
            engineers: wire.engineers,
            billing_adjustments: wire.billing_adjustments,
            history: wire.history,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
        })
    }
}

impl Identifiable for ChangeRequest {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl Timestamped for ChangeRequest {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

impl Auditable for ChangeRequest {
    fn created_by_id(&self) -> Option<Id> {
        self.created_by_id
    }
}

impl ChangeRequest {
    /// A fresh in-memory draft for a contract, before any save.
    pub fn new_draft(contract_id: Id, kind: ChangeRequestKind) -> Self {
        Self {
            id: None,
            code: None,
            contract_id,
            kind,
            title: String::new(),
            change_type: ChangeType::default_for(kind),
            summary: String::new(),
            effective_from: None,
            effective_until: None,
            references: String::new(),
            attachments: Vec::new(),
            status: ChangeRequestStatus::Draft,
            created_by_id: None,
            created_by_name: String::new(),
            internal_reviewer_id: None,
            internal_reviewer_name: String::new(),
            review_action: None,
            review_notes: String::new(),
            review_date: None,
            comment: String::new(),
            impact: if kind.is_fixed_price() {
                Some(ImpactAnalysis::default())
            } else {
                None
            },
            engineers: Vec::new(),
            billing_adjustments: Vec::new(),
            history: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    /// How the given session user relates to this record.
    pub fn actor_role(&self, user_id: Id) -> ActorRole {
        if self.internal_reviewer_id == Some(user_id)
            && self.status == ChangeRequestStatus::UnderInternalReview
        {
            ActorRole::Reviewer
        } else if self.created_by_id == Some(user_id) || self.created_by_id.is_none() {
            // An unsaved draft belongs to whoever is editing it.
            ActorRole::Creator
        } else {
            ActorRole::Other
        }
    }
}
