//! # sb-models
//!
//! Domain models for SkillBridge RS.
//!
//! Entities mirror the backend's contract/change-request records. Each model
//! implements the core traits from `sb-core` where it has a backend identity.

pub use sb_core::traits::{Auditable, Id, Identifiable, Timestamped};

pub mod attachment;
pub mod billing;
pub mod change_request;
pub mod contract;
pub mod engineer;
pub mod impact;
pub mod status;
pub mod user;

// Re-exports for convenience
pub use attachment::AttachmentMeta;
pub use billing::{derive_invoice_date, BillingAdjustment, BillingLine, MilestoneInput};
pub use change_request::{
    ChangeRequest, ChangeRequestKind, ChangeType, FixedPriceChangeType, HistoryEntry,
    MsaChangeType, RetainerChangeType, ReviewAction,
};
pub use contract::{BaselineBillingLine, ContractSnapshot, EngagementType};
pub use engineer::{Compensation, CurrentResource, EngineerAssignment, RowAction};
pub use impact::ImpactAnalysis;
pub use status::{allowed_actions, ActorRole, ChangeRequestStatus, CrAction};
pub use user::{SalesRole, SalesUser, SessionUser};
