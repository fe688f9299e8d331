//! Result type aliases and the service result pattern
//!
//! Every workflow action (save, submit, review, approve, reject) returns a
//! `ServiceResult` so validation failures and backend failures travel the
//! same channel back to the caller.

use crate::error::{SbError, ValidationErrors};

/// Standard Result type for SkillBridge operations
pub type SbResult<T> = Result<T, SbError>;

/// Outcome of a service-object call: either a value, or the collected
/// validation/backend errors. A failed result always leaves the caller's
/// draft untouched so the user can correct and retry.
#[derive(Debug)]
pub struct ServiceResult<T> {
    pub success: bool,
    pub result: Option<T>,
    pub errors: ValidationErrors,
}

impl<T> ServiceResult<T> {
    pub fn success(result: T) -> Self {
        Self {
            success: true,
            result: Some(result),
            errors: ValidationErrors::new(),
        }
    }

    pub fn failure(errors: ValidationErrors) -> Self {
        Self {
            success: false,
            result: None,
            errors,
        }
    }

    pub fn failure_with_message(message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add_base(message);
        Self::failure(errors)
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn is_failure(&self) -> bool {
        !self.success
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ServiceResult<U> {
        ServiceResult {
            success: self.success,
            result: self.result.map(f),
            errors: self.errors,
        }
    }

    pub fn and_then<U, F: FnOnce(T) -> ServiceResult<U>>(self, f: F) -> ServiceResult<U> {
        if self.success {
            if let Some(result) = self.result {
                return f(result);
            }
        }
        ServiceResult {
            success: false,
            result: None,
            errors: self.errors,
        }
    }

    pub fn into_result(self) -> SbResult<T> {
        if self.success {
            self.result
                .ok_or_else(|| SbError::Internal("ServiceResult success but no result value".into()))
        } else {
            Err(SbError::Validation(self.errors))
        }
    }
}

impl<T> From<SbResult<T>> for ServiceResult<T> {
    fn from(result: SbResult<T>) -> Self {
        match result {
            Ok(value) => ServiceResult::success(value),
            Err(SbError::Validation(errors)) => ServiceResult::failure(errors),
            Err(e) => ServiceResult::failure_with_message(e.to_string()),
        }
    }
}

impl<T> From<ServiceResult<T>> for SbResult<T> {
    fn from(result: ServiceResult<T>) -> Self {
        result.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_round_trip() {
        let result = ServiceResult::success(42);
        assert!(result.is_success());
        assert_eq!(result.into_result().unwrap(), 42);
    }

    #[test]
    fn test_failure_carries_field_errors() {
        let mut errors = ValidationErrors::new();
        errors.add("internalReviewerId", "must be selected");
        let result: ServiceResult<()> = ServiceResult::failure(errors);

        assert!(result.is_failure());
        match result.into_result() {
            Err(SbError::Validation(e)) => assert!(e.has_error("internalReviewerId")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_backend_error_becomes_base_message() {
        let err: SbResult<()> = Err(SbError::backend("contract is locked"));
        let result: ServiceResult<()> = err.into();
        assert!(result.is_failure());
        assert_eq!(
            result.errors.full_messages(),
            vec!["Backend error: contract is locked".to_string()]
        );
    }
}
