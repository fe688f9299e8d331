//! Current-resources snapshot
//!
//! The Before-view: the engineers assigned to the contract as of the
//! draft's effective-from date. On first load the After-view (the draft's
//! engineer list) is seeded from it, one MODIFY row per assignment. Once
//! the user has edited the After-view, reseeding discards their work, so
//! it is gated behind a confirmation seam.

use chrono::NaiveDate;
use sb_api::ChangeRequestApi;
use sb_core::result::SbResult;
use sb_core::traits::Id;
use sb_models::{CurrentResource, EngineerAssignment};
use tracing::{debug, instrument};

use crate::draft::ChangeRequestDraft;

/// Asks the user whether edited rows may be thrown away on a reseed.
/// Keeps UI toolkits out of the workflow core.
pub trait ReseedPrompt {
    fn confirm_reseed(&self) -> bool;
}

/// Prompt for non-interactive callers: always reseed.
pub struct AutoConfirm;

impl ReseedPrompt for AutoConfirm {
    fn confirm_reseed(&self) -> bool {
        true
    }
}

/// Point-in-time Before-view with its load bookkeeping.
#[derive(Debug, Default)]
pub struct ResourceSnapshot {
    resources: Vec<CurrentResource>,
    loaded_for: Option<NaiveDate>,
}

impl ResourceSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resources(&self) -> &[CurrentResource] {
        &self.resources
    }

    pub fn is_loaded_for(&self, as_of: NaiveDate) -> bool {
        self.loaded_for == Some(as_of)
    }

    fn seed_rows(&self) -> Vec<EngineerAssignment> {
        self.resources.iter().map(CurrentResource::to_assignment).collect()
    }

    /// Load the Before-view as of `as_of` and seed or reseed the draft.
    ///
    /// Loads with an unchanged date are no-ops. After a fetch, the draft's
    /// engineer list is replaced when it is still untouched; otherwise the
    /// user is asked first, and declining keeps the edited draft while the
    /// Before-view still refreshes.
    #[instrument(skip(self, api, draft, prompt))]
    pub async fn load(
        &mut self,
        api: &dyn ChangeRequestApi,
        contract_id: Id,
        as_of: NaiveDate,
        draft: &mut ChangeRequestDraft,
        prompt: &dyn ReseedPrompt,
    ) -> SbResult<()> {
        if self.is_loaded_for(as_of) {
            return Ok(());
        }

        let response = api
            .current_resources(contract_id, as_of)
            .await
            .map_err(sb_core::error::SbError::from)?;
        self.resources = response.resources;
        self.loaded_for = Some(as_of);
        debug!(count = self.resources.len(), "loaded current resources");

        if draft.engineers_untouched() || prompt.confirm_reseed() {
            draft.seed_engineers(self.seed_rows());
        }

        Ok(())
    }
}
