//! Core error types for SkillBridge RS
//!
//! Covers the three failure families of the change-request workflow:
//! client-side validation (field error map), backend call failures, and
//! permission violations.

use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Core error type for all SkillBridge operations
#[derive(Error, Debug)]
pub enum SbError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Backend error: {message}")]
    Backend { status: Option<u16>, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SbError {
    pub fn backend(message: impl Into<String>) -> Self {
        SbError::Backend {
            status: None,
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        SbError::Forbidden {
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            SbError::NotFound { .. } => "not_found",
            SbError::Forbidden { .. } => "forbidden",
            SbError::Validation(_) => "validation_failed",
            SbError::Backend { .. } => "backend_error",
            SbError::Config(_) => "configuration_error",
            SbError::Internal(_) => "internal_error",
        }
    }
}

/// Field-level validation errors.
///
/// Mirrors the form's per-field error map: every violated field gets a flag
/// plus a human-readable message, and all violations are reported together
/// rather than short-circuiting on the first. Row-scoped fields (engineer
/// and billing table cells) use indexed keys such as `engineerLevel_2`.
#[derive(Error, Debug, Default, Clone, PartialEq)]
#[error("Validation errors: {errors:?}")]
pub struct ValidationErrors {
    /// Field-specific errors: field_name -> messages
    pub errors: HashMap<String, Vec<String>>,
    /// Errors not tied to a specific field
    pub base_errors: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Add an error for a row-scoped field, e.g. `engineerLevel_2`.
    pub fn add_indexed(&mut self, field: &str, index: usize, message: impl Into<String>) {
        self.add(format!("{field}_{index}"), message);
    }

    pub fn add_base(&mut self, message: impl Into<String>) {
        self.base_errors.push(message.into());
    }

    /// Drop any errors recorded for a field. Field setters call this so an
    /// edit immediately clears the stale flag.
    pub fn clear(&mut self, field: &str) {
        self.errors.remove(field);
    }

    pub fn clear_indexed(&mut self, field: &str, index: usize) {
        self.errors.remove(&format!("{field}_{index}"));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.base_errors.is_empty()
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn has_indexed(&self, field: &str, index: usize) -> bool {
        self.errors.contains_key(&format!("{field}_{index}"))
    }

    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.errors.get(field)
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.errors {
            self.errors.entry(field).or_default().extend(messages);
        }
        self.base_errors.extend(other.base_errors);
    }

    /// The field -> flag view handed to form renderers.
    pub fn flags(&self) -> BTreeMap<String, bool> {
        self.errors.keys().map(|k| (k.clone(), true)).collect()
    }

    /// Consolidated human-readable messages, base errors first.
    pub fn full_messages(&self) -> Vec<String> {
        let mut messages = self.base_errors.clone();
        let mut fields: Vec<_> = self.errors.iter().collect();
        fields.sort_by(|a, b| a.0.cmp(b.0));
        for (field, field_messages) in fields {
            for msg in field_messages {
                messages.push(format!("{field} {msg}"));
            }
        }
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_flags() {
        let mut errors = ValidationErrors::new();
        errors.add("title", "can't be blank");
        errors.add_indexed("engineerLevel", 1, "can't be blank");

        assert!(errors.has_error("title"));
        assert!(errors.has_indexed("engineerLevel", 1));
        assert!(!errors.has_indexed("engineerLevel", 0));
        assert!(errors.flags()["engineerLevel_1"]);
    }

    #[test]
    fn test_clear_removes_flag() {
        let mut errors = ValidationErrors::new();
        errors.add("effectiveUntil", "must be after effective from");
        errors.clear("effectiveUntil");
        assert!(errors.is_empty());
    }

    #[test]
    fn test_full_messages_include_base_errors() {
        let mut errors = ValidationErrors::new();
        errors.add_base("fill in all required fields");
        errors.add("summary", "can't be blank");

        let messages = errors.full_messages();
        assert_eq!(messages[0], "fill in all required fields");
        assert!(messages.contains(&"summary can't be blank".to_string()));
    }

    #[test]
    fn test_merge() {
        let mut a = ValidationErrors::new();
        a.add("title", "can't be blank");
        let mut b = ValidationErrors::new();
        b.add("title", "is too long");
        b.add("type", "can't be blank");

        a.merge(b);
        assert_eq!(a.get("title").unwrap().len(), 2);
        assert!(a.has_error("type"));
    }
}
