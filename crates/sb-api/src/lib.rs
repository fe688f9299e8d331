//! # sb-api
//!
//! Backend client abstraction for SkillBridge RS.
//!
//! The change-request workflow talks to an opaque REST backend. This crate
//! defines the client trait, the wire DTOs, and the error type carrying
//! server messages back to the user. No HTTP implementation lives here.

pub mod client;
pub mod dto;
pub mod error;

pub use client::ChangeRequestApi;
pub use dto::{
    ChangeRequestPayload, ChangeRequestPreview, CurrentResourcesResponse, DraftAction,
    EngineerRowDto, PresignedUrl,
};
pub use error::{ApiError, ApiResult};
