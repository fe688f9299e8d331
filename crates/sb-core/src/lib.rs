//! # sb-core
//!
//! Core types, traits, and utilities for SkillBridge RS.
//!
//! This crate provides the foundational building blocks used across all other crates:
//! - Common error types and the field-level validation error map
//! - Result type aliases and the service result pattern
//! - Core traits (Identifiable, Timestamped, UserContext)
//! - Client configuration

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::*;
pub use result::*;
pub use traits::*;
