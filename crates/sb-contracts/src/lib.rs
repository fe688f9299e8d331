//! # sb-contracts
//!
//! Contract validation for SkillBridge RS.
//!
//! Contracts validate a change request before a state transition is sent to
//! the backend. They exist to avoid needless round-trips and give immediate
//! per-field feedback; the backend remains the authority.

pub mod base;
pub mod change_requests;

pub use base::*;
