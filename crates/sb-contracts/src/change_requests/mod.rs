//! Change request contracts
//!
//! - the base contract checks the fields every change request carries
//! - the submit contract runs the full gate for the draft's kind and type
//! - milestone and attachment contracts cover the Fixed-Price billing
//!   schedule and file uploads

mod attachments;
mod base;
mod milestones;
mod submit;

pub use attachments::AttachmentContract;
pub use base::ChangeRequestBaseContract;
pub use milestones::MilestoneContract;
pub use submit::SubmitChangeRequestContract;
