//! Backend client seam
//!
//! The REST backend is authoritative and opaque. Everything the workflow
//! needs from it goes through this trait, so tests substitute in-memory
//! doubles and no HTTP stack leaks into the core.

use async_trait::async_trait;
use chrono::NaiveDate;
use sb_core::traits::Id;
use sb_models::{ChangeRequest, ContractSnapshot, CurrentResource, ReviewAction, SalesUser};

use crate::dto::{ChangeRequestPayload, ChangeRequestPreview, CurrentResourcesResponse, PresignedUrl};
use crate::error::ApiResult;

/// Operations the change-request workflow performs against the backend.
/// All calls carry the session's bearer credential; none are retried.
#[async_trait]
pub trait ChangeRequestApi: Send + Sync {
    /// Fetch a contract snapshot including its current billing schedule.
    async fn contract_detail(&self, contract_id: Id) -> ApiResult<ContractSnapshot>;

    /// Fetch the engineers assigned to a contract as of a given date.
    async fn current_resources(
        &self,
        contract_id: Id,
        as_of: NaiveDate,
    ) -> ApiResult<CurrentResourcesResponse>;

    /// Create a change request from a draft payload.
    async fn create_change_request(
        &self,
        payload: &ChangeRequestPayload,
    ) -> ApiResult<ChangeRequest>;

    /// Update an existing change request.
    async fn update_change_request(
        &self,
        id: Id,
        payload: &ChangeRequestPayload,
    ) -> ApiResult<ChangeRequest>;

    /// Fetch the authoritative record.
    async fn change_request_detail(&self, id: Id) -> ApiResult<ChangeRequest>;

    /// Submit for internal review, assigning the reviewer.
    async fn submit_change_request(&self, id: Id, reviewer_id: Id) -> ApiResult<ChangeRequest>;

    /// Record the assigned reviewer's decision.
    async fn submit_review(
        &self,
        id: Id,
        action: ReviewAction,
        notes: &str,
    ) -> ApiResult<ChangeRequest>;

    /// Approve a processing retainer request, applying its effects to the
    /// live contract atomically on the server.
    async fn approve_change_request(&self, id: Id, notes: Option<&str>)
        -> ApiResult<ChangeRequest>;

    /// Reject a processing retainer request.
    async fn reject_change_request(
        &self,
        id: Id,
        reason: Option<&str>,
    ) -> ApiResult<ChangeRequest>;

    /// Fetch the server-computed before/after comparison.
    async fn change_request_preview(&self, id: Id) -> ApiResult<ChangeRequestPreview>;

    /// Sales managers eligible to review change requests.
    async fn sales_managers(&self) -> ApiResult<Vec<SalesUser>>;

    /// Resolve a stored-file key to a short-lived downloadable URL.
    async fn presigned_url(&self, storage_key: &str) -> ApiResult<PresignedUrl>;
}

/// Convenience accessor mirroring the wire response shape.
impl CurrentResourcesResponse {
    pub fn into_resources(self) -> Vec<CurrentResource> {
        self.resources
    }
}
