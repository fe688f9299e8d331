//! Edit policy
//!
//! Computed once per session from (record, session user) and consulted for
//! every rendered control. The backend stays the authority; these gates
//! only keep the client from offering actions the server would refuse.

use chrono::NaiveDate;
use sb_core::traits::UserContext;
use sb_models::{
    allowed_actions, ActorRole, ChangeRequest, ChangeRequestStatus, CrAction, EngineerAssignment,
};

/// What the session user may do with the loaded change request.
#[derive(Debug, Clone)]
pub struct EditPolicy {
    role: ActorRole,
    status: ChangeRequestStatus,
    actions: &'static [CrAction],
    effective_from: Option<NaiveDate>,
}

impl EditPolicy {
    pub fn for_session(record: &ChangeRequest, user: &impl UserContext) -> Self {
        let role = record.actor_role(user.user_id());
        Self {
            role,
            status: record.status,
            actions: allowed_actions(record.status, role, record.kind),
            effective_from: record.effective_from,
        }
    }

    pub fn role(&self) -> ActorRole {
        self.role
    }

    pub fn allows(&self, action: CrAction) -> bool {
        self.actions.contains(&action)
    }

    /// Form fields are editable only for the creator while the request is
    /// still in a draft-like status.
    pub fn can_edit_fields(&self) -> bool {
        self.role == ActorRole::Creator && self.status.is_editable_draft()
    }

    /// Impact-analysis and approval fields open up again while the request
    /// is processing, regardless of role.
    pub fn can_edit_impact(&self) -> bool {
        self.can_edit_fields() || self.allows(CrAction::EditImpactAnalysis)
    }

    pub fn can_review(&self) -> bool {
        self.allows(CrAction::Review)
    }

    /// Rows whose start date falls before the change takes effect cover
    /// already-elapsed periods and are read-only no matter what.
    pub fn row_locked(&self, row: &EngineerAssignment) -> bool {
        match (row.start_date, self.effective_from) {
            (Some(start), Some(effective_from)) => start < effective_from,
            _ => false,
        }
    }

    /// Rows carried over from the contract keep their level label; only
    /// dates, rating, and compensation may change on them.
    pub fn level_label_locked(&self, row: &EngineerAssignment) -> bool {
        row.has_backend_identity()
    }

    /// Recompute after the status or reviewer changed on a resync.
    pub fn refresh(&mut self, record: &ChangeRequest, user: &impl UserContext) {
        *self = Self::for_session(record, user);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sb_models::{ChangeRequestKind, SalesRole, SessionUser};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record_with(
        status: ChangeRequestStatus,
        created_by: i64,
        reviewer: Option<i64>,
    ) -> ChangeRequest {
        let mut cr = ChangeRequest::new_draft(1, ChangeRequestKind::SowRetainer);
        cr.status = status;
        cr.created_by_id = Some(created_by);
        cr.internal_reviewer_id = reviewer;
        cr.effective_from = Some(date(2025, 1, 1));
        cr
    }

    #[test]
    fn test_creator_edits_own_draft() {
        let user = SessionUser::new(10, SalesRole::SalesRep);
        let record = record_with(ChangeRequestStatus::Draft, 10, None);
        let policy = EditPolicy::for_session(&record, &user);

        assert!(policy.can_edit_fields());
        assert!(policy.allows(CrAction::Submit));
        assert!(!policy.can_review());
    }

    #[test]
    fn test_non_creator_cannot_edit() {
        let user = SessionUser::new(99, SalesRole::SalesRep);
        let record = record_with(ChangeRequestStatus::Draft, 10, None);
        let policy = EditPolicy::for_session(&record, &user);

        assert!(!policy.can_edit_fields());
        assert!(!policy.allows(CrAction::Save));
    }

    #[test]
    fn test_reviewer_gets_review_during_internal_review() {
        let user = SessionUser::new(42, SalesRole::SalesManager);
        let record = record_with(ChangeRequestStatus::UnderInternalReview, 10, Some(42));
        let policy = EditPolicy::for_session(&record, &user);

        assert!(policy.can_review());
        assert!(!policy.can_edit_fields());
    }

    #[test]
    fn test_request_for_change_is_editable_again() {
        let user = SessionUser::new(10, SalesRole::SalesRep);
        let record = record_with(ChangeRequestStatus::RequestForChange, 10, Some(42));
        let policy = EditPolicy::for_session(&record, &user);

        assert!(policy.can_edit_fields());
    }

    #[test]
    fn test_rows_before_effective_from_are_locked() {
        let user = SessionUser::new(10, SalesRole::SalesRep);
        let record = record_with(ChangeRequestStatus::Draft, 10, None);
        let policy = EditPolicy::for_session(&record, &user);

        let mut row = EngineerAssignment::blank();
        row.start_date = Some(date(2024, 11, 1));
        assert!(policy.row_locked(&row));

        row.start_date = Some(date(2025, 1, 1));
        assert!(!policy.row_locked(&row));
    }
}
