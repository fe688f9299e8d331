//! Base contract system

use sb_core::error::ValidationErrors;

/// Result of contract validation
pub type ValidationResult = Result<(), ValidationErrors>;

/// Base contract trait
pub trait Contract<T>: Send + Sync {
    /// Validate the entity
    fn validate(&self, entity: &T) -> ValidationResult;

    /// Check if an attribute is writable
    fn is_writable(&self, _attribute: &str) -> bool {
        true
    }
}
