//! Edit session
//!
//! One session per open change request. It owns the draft, the edit
//! policy, the Before-view snapshot, and drives every backend transition.
//! After a successful mutation the authoritative record is reloaded so
//! local state never drifts from the server. Failed calls leave the draft
//! exactly as the user left it; nothing is retried.

use std::sync::Arc;

use chrono::Utc;
use sb_api::dto::{ChangeRequestPreview, DraftAction, PresignedUrl};
use sb_api::{ApiError, ChangeRequestApi};
use sb_core::error::SbError;
use sb_core::result::{SbResult, ServiceResult};
use sb_core::traits::Id;
use sb_models::{
    ChangeRequest, ChangeRequestKind, ChangeRequestStatus, ContractSnapshot, CrAction,
    CurrentResource, ReviewAction, SalesUser, SessionUser,
};
use tracing::{info, instrument, warn};

use crate::draft::ChangeRequestDraft;
use crate::payload::build_payload;
use crate::policy::EditPolicy;
use crate::snapshot::{ReseedPrompt, ResourceSnapshot};

fn backend_failure<T>(err: ApiError) -> ServiceResult<T> {
    let message = match err.server_message() {
        Some(message) => message.to_string(),
        None => err.to_string(),
    };
    ServiceResult::failure_with_message(message)
}

pub struct EditSession {
    api: Arc<dyn ChangeRequestApi>,
    user: SessionUser,
    contract: ContractSnapshot,
    draft: ChangeRequestDraft,
    policy: EditPolicy,
    snapshot: ResourceSnapshot,
    preview: Option<ChangeRequestPreview>,
    closed: bool,
}

impl EditSession {
    /// Start a session for a brand-new draft against a contract.
    pub async fn create(
        api: Arc<dyn ChangeRequestApi>,
        user: SessionUser,
        contract_id: Id,
        kind: ChangeRequestKind,
    ) -> SbResult<Self> {
        let contract = api.contract_detail(contract_id).await.map_err(SbError::from)?;
        contract.ensure_valid()?;
        let draft = ChangeRequestDraft::for_contract(&contract, kind);
        let policy = EditPolicy::for_session(draft.record(), &user);
        Ok(Self {
            api,
            user,
            contract,
            draft,
            policy,
            snapshot: ResourceSnapshot::new(),
            preview: None,
            closed: false,
        })
    }

    /// Open a session on an existing change request.
    pub async fn open(
        api: Arc<dyn ChangeRequestApi>,
        user: SessionUser,
        change_request_id: Id,
    ) -> SbResult<Self> {
        let record = api
            .change_request_detail(change_request_id)
            .await
            .map_err(SbError::from)?;
        let contract = api
            .contract_detail(record.contract_id)
            .await
            .map_err(SbError::from)?;
        contract.ensure_valid()?;
        let policy = EditPolicy::for_session(&record, &user);
        let draft = ChangeRequestDraft::from_record(record, &contract);
        Ok(Self {
            api,
            user,
            contract,
            draft,
            policy,
            snapshot: ResourceSnapshot::new(),
            preview: None,
            closed: false,
        })
    }

    pub fn contract(&self) -> &ContractSnapshot {
        &self.contract
    }

    pub fn draft(&self) -> &ChangeRequestDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut ChangeRequestDraft {
        &mut self.draft
    }

    pub fn policy(&self) -> &EditPolicy {
        &self.policy
    }

    /// The Before-view as last loaded.
    pub fn resources(&self) -> &[CurrentResource] {
        self.snapshot.resources()
    }

    /// Whether a successful submit/approve/reject has ended this session.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Load (or reload) the Before-view for the draft's effective-from
    /// date, seeding the After-view per the reseed rules. Only meaningful
    /// for retainer resource-change drafts with an effective-from set.
    pub async fn load_resources(&mut self, prompt: &dyn ReseedPrompt) -> SbResult<()> {
        if !self.draft.record().change_type.is_resource_change() {
            return Ok(());
        }
        let Some(as_of) = self.draft.record().effective_from else {
            return Ok(());
        };
        let Some(contract_id) = self.contract.id else {
            return Ok(());
        };
        self.snapshot
            .load(self.api.as_ref(), contract_id, as_of, &mut self.draft, prompt)
            .await
    }

    /// Sales managers eligible as internal reviewers.
    pub async fn reviewer_candidates(&self) -> SbResult<Vec<SalesUser>> {
        let managers = self.api.sales_managers().await.map_err(SbError::from)?;
        Ok(managers.into_iter().filter(SalesUser::can_review).collect())
    }

    /// Resolve an attachment's storage key to a short-lived URL.
    pub async fn attachment_url(&self, storage_key: &str) -> SbResult<PresignedUrl> {
        self.api
            .presigned_url(storage_key)
            .await
            .map_err(SbError::from)
    }

    async fn persist(&self, action: DraftAction) -> Result<ChangeRequest, ApiError> {
        let payload = build_payload(self.draft.record(), self.snapshot.resources(), action);
        match self.draft.record().id {
            Some(id) => self.api.update_change_request(id, &payload).await,
            None => self.api.create_change_request(&payload).await,
        }
    }

    /// Reload the authoritative record after a mutation and rebuild the
    /// session state on top of it.
    async fn resync(&mut self, id: Id) -> Result<ChangeRequest, ApiError> {
        let record = self.api.change_request_detail(id).await?;
        self.draft = ChangeRequestDraft::from_record(record.clone(), &self.contract);
        self.policy = EditPolicy::for_session(&record, &self.user);
        self.preview = None;
        Ok(record)
    }

    /// Persist the draft as-is. No validation gate; an incomplete draft
    /// is a legitimate save.
    #[instrument(skip(self), fields(change_request_id = ?self.draft.record().id))]
    pub async fn save(&mut self) -> ServiceResult<ChangeRequest> {
        if !self.policy.allows(CrAction::Save) {
            return ServiceResult::failure_with_message(
                "You are not allowed to edit this change request",
            );
        }

        let saved = match self.persist(DraftAction::Save).await {
            Ok(record) => record,
            Err(err) => {
                warn!(error = %err, "save failed");
                return backend_failure(err);
            }
        };
        let Some(id) = saved.id else {
            return ServiceResult::failure_with_message(
                "Backend did not return the change request id",
            );
        };

        match self.resync(id).await {
            Ok(record) => {
                info!(change_request_id = id, "draft saved");
                ServiceResult::success(record)
            }
            Err(err) => backend_failure(err),
        }
    }

    /// Validate and submit for internal review. On validation failure no
    /// backend call is made and the error flags land on the draft.
    #[instrument(skip(self), fields(change_request_id = ?self.draft.record().id))]
    pub async fn submit(&mut self) -> ServiceResult<ChangeRequest> {
        if !self.policy.allows(CrAction::Submit) {
            return ServiceResult::failure_with_message(
                "You are not allowed to submit this change request",
            );
        }

        let today = Utc::now().date_naive();
        if !self.draft.validate_for_submit(&self.contract, today) {
            return ServiceResult::failure(self.draft.errors().clone());
        }
        let Some(reviewer_id) = self.draft.record().internal_reviewer_id else {
            return ServiceResult::failure_with_message("An internal reviewer must be selected");
        };

        let saved = match self.persist(DraftAction::Submit).await {
            Ok(record) => record,
            Err(err) => {
                warn!(error = %err, "persist before submit failed");
                return backend_failure(err);
            }
        };
        let Some(id) = saved.id else {
            return ServiceResult::failure_with_message(
                "Backend did not return the change request id",
            );
        };

        match self.api.submit_change_request(id, reviewer_id).await {
            Ok(record) => {
                info!(change_request_id = id, reviewer_id, "submitted for internal review");
                self.draft = ChangeRequestDraft::from_record(record.clone(), &self.contract);
                self.policy = EditPolicy::for_session(&record, &self.user);
                self.closed = true;
                ServiceResult::success(record)
            }
            Err(err) => backend_failure(err),
        }
    }

    /// Record the review decision. For Fixed-Price requests in
    /// processing, pending impact-analysis edits are persisted first.
    #[instrument(skip(self, notes), fields(change_request_id = ?self.draft.record().id))]
    pub async fn review(
        &mut self,
        action: ReviewAction,
        notes: &str,
    ) -> ServiceResult<ChangeRequest> {
        if !self.policy.can_review() {
            return ServiceResult::failure_with_message(
                "Only the assigned reviewer can review this change request",
            );
        }
        let Some(id) = self.draft.record().id else {
            return ServiceResult::failure_with_message("The change request is not saved yet");
        };

        if self.draft.record().kind.is_fixed_price()
            && self.draft.record().status == ChangeRequestStatus::Processing
        {
            if let Err(err) = self.persist(DraftAction::Save).await {
                warn!(error = %err, "persisting impact analysis failed");
                return backend_failure(err);
            }
        }

        if let Err(err) = self.api.submit_review(id, action, notes).await {
            return backend_failure(err);
        }
        match self.resync(id).await {
            Ok(record) => {
                info!(change_request_id = id, ?action, "review recorded");
                ServiceResult::success(record)
            }
            Err(err) => backend_failure(err),
        }
    }

    /// Approve a processing retainer request. Pending edits are persisted
    /// first; the backend applies the effects to the live contract
    /// atomically.
    #[instrument(skip(self, notes), fields(change_request_id = ?self.draft.record().id))]
    pub async fn approve(&mut self, notes: Option<&str>) -> ServiceResult<ChangeRequest> {
        if !self.policy.allows(CrAction::Approve) {
            return ServiceResult::failure_with_message(
                "This change request cannot be approved from its current state",
            );
        }
        let Some(id) = self.draft.record().id else {
            return ServiceResult::failure_with_message("The change request is not saved yet");
        };

        if let Err(err) = self.persist(DraftAction::Save).await {
            warn!(error = %err, "persisting pending edits failed");
            return backend_failure(err);
        }

        match self.api.approve_change_request(id, notes).await {
            Ok(record) => {
                info!(change_request_id = id, "change request approved");
                self.draft = ChangeRequestDraft::from_record(record.clone(), &self.contract);
                self.policy = EditPolicy::for_session(&record, &self.user);
                self.closed = true;
                ServiceResult::success(record)
            }
            Err(err) => backend_failure(err),
        }
    }

    /// Reject a processing retainer request with an optional reason.
    #[instrument(skip(self, reason), fields(change_request_id = ?self.draft.record().id))]
    pub async fn reject(&mut self, reason: Option<&str>) -> ServiceResult<ChangeRequest> {
        if !self.policy.allows(CrAction::Reject) {
            return ServiceResult::failure_with_message(
                "This change request cannot be rejected from its current state",
            );
        }
        let Some(id) = self.draft.record().id else {
            return ServiceResult::failure_with_message("The change request is not saved yet");
        };

        match self.api.reject_change_request(id, reason).await {
            Ok(record) => {
                info!(change_request_id = id, "change request rejected");
                self.draft = ChangeRequestDraft::from_record(record.clone(), &self.contract);
                self.policy = EditPolicy::for_session(&record, &self.user);
                self.closed = true;
                ServiceResult::success(record)
            }
            Err(err) => backend_failure(err),
        }
    }

    /// The server-computed before/after comparison, cached until the next
    /// explicit refresh.
    pub async fn preview(&mut self) -> SbResult<ChangeRequestPreview> {
        if let Some(preview) = &self.preview {
            return Ok(preview.clone());
        }
        let Some(id) = self.draft.record().id else {
            return Err(SbError::Internal(
                "the change request is not saved yet".to_string(),
            ));
        };
        let fetched = self
            .api
            .change_request_preview(id)
            .await
            .map_err(SbError::from)?;
        self.preview = Some(fetched.clone());
        Ok(fetched)
    }

    pub async fn refresh_preview(&mut self) -> SbResult<ChangeRequestPreview> {
        self.preview = None;
        self.preview().await
    }
}
