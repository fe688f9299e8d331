//! # sb-workflow
//!
//! Change request workflow controller for SkillBridge RS.
//!
//! Owns the lifecycle of one change-request edit session: the draft form
//! state, the edit policy, the current-resources snapshot, submission
//! payload reduction, the Fixed-Price milestone editor, and the
//! save/submit/review/approve/reject transitions against the backend.

pub mod draft;
pub mod milestones;
pub mod payload;
pub mod policy;
pub mod session;
pub mod snapshot;

pub use draft::ChangeRequestDraft;
pub use milestones::MilestoneEditor;
pub use payload::{build_payload, reduce_engineers};
pub use policy::EditPolicy;
pub use session::EditSession;
pub use snapshot::{AutoConfirm, ReseedPrompt, ResourceSnapshot};
