//! Change request status and the transition table
//!
//! The original client scattered the lifecycle across boolean flags
//! (`isDraft`, `canReview`, `canEditProcessing`, ...). Here the status is an
//! explicit enum and (status, actor role) maps to the allowed actions once
//! per load.

use serde::{Deserialize, Serialize};

use crate::change_request::ChangeRequestKind;

/// Lifecycle state of a change request.
///
/// Wire labels are the backend's human-readable strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeRequestStatus {
    Draft,
    #[serde(rename = "Under Internal Review")]
    UnderInternalReview,
    #[serde(rename = "Client Under Review")]
    ClientUnderReview,
    Processing,
    /// Reviewer sent the request back; editable again like a draft.
    #[serde(rename = "Request for Change")]
    RequestForChange,
    Approved,
    Active,
    Terminated,
    Rejected,
}

impl ChangeRequestStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ChangeRequestStatus::Draft => "Draft",
            ChangeRequestStatus::UnderInternalReview => "Under Internal Review",
            ChangeRequestStatus::ClientUnderReview => "Client Under Review",
            ChangeRequestStatus::Processing => "Processing",
            ChangeRequestStatus::RequestForChange => "Request for Change",
            ChangeRequestStatus::Approved => "Approved",
            ChangeRequestStatus::Active => "Active",
            ChangeRequestStatus::Terminated => "Terminated",
            ChangeRequestStatus::Rejected => "Rejected",
        }
    }

    /// Draft-like states in which the creator may edit freely.
    pub fn is_editable_draft(&self) -> bool {
        matches!(
            self,
            ChangeRequestStatus::Draft | ChangeRequestStatus::RequestForChange
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ChangeRequestStatus::Approved
                | ChangeRequestStatus::Active
                | ChangeRequestStatus::Terminated
                | ChangeRequestStatus::Rejected
        )
    }
}

impl std::fmt::Display for ChangeRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// How the session user relates to the record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorRole {
    Creator,
    Reviewer,
    Other,
}

/// Everything a user can do to a change request from the edit session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrAction {
    Save,
    Submit,
    Review,
    Approve,
    Reject,
    EditImpactAnalysis,
}

/// The transition table: which actions are available for (status, role, kind).
///
/// Fixed-Price requests in Processing go through the review decision with
/// editable impact analysis; Retainer requests in Processing use the
/// terminal approve/reject pair. The backend remains the authority; this
/// table only drives what the client offers.
pub fn allowed_actions(
    status: ChangeRequestStatus,
    role: ActorRole,
    kind: ChangeRequestKind,
) -> &'static [CrAction] {
    use ActorRole::*;
    use ChangeRequestStatus::*;
    use CrAction::*;

    match (status, role) {
        (Draft | RequestForChange, Creator) => &[Save, Submit],
        (UnderInternalReview, Reviewer) => &[Review],
        (Processing, _) => match kind {
            ChangeRequestKind::SowRetainer => &[Save, Approve, Reject],
            ChangeRequestKind::SowFixedPrice => &[Save, Review, EditImpactAnalysis],
            ChangeRequestKind::Msa => &[Save, Review],
        },
        _ => &[],
    }
}
